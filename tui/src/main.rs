//! EusaSpark TUI Entry Point
//!
//! Launches the EusaSpark showcase page in the terminal.
//!
//! Usage:
//!   eusaspark-tui [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>         Configuration file (default: ~/.config/eusaspark/showcase.toml)
//!   --log-file <FILE>           Write logs here (the terminal belongs to the UI)
//!   --char-delay-ms <MS>        Override the typing speed
//!   --no-typing                 Show the page without the typing demo

use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use eusaspark_tui::App;
use site_core::config::default_config_path;
use site_core::{load_config_from_path, ConfigOverrides};

/// EusaSpark TUI - the EusaSpark page, in your terminal
#[derive(Parser, Debug)]
#[command(name = "eusaspark-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "EUSASPARK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file path (logs are discarded when unset)
    #[arg(long, env = "EUSASPARK_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "EUSASPARK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Delay between revealed characters, in milliseconds
    #[arg(long, value_name = "MS")]
    char_delay_ms: Option<u64>,

    /// Disable the typing demo
    #[arg(long)]
    no_typing: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref(), &args.log_level)?;

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("loading configuration")?;
    let mut overrides = ConfigOverrides::default();
    if let Some(ms) = args.char_delay_ms {
        overrides = overrides.with_char_delay_ms(ms);
    }
    if args.no_typing {
        overrides = overrides.with_typing_enabled(false);
    }
    overrides.apply(&mut config);
    config.validate().context("validating configuration")?;
    tracing::info!(source = %config.source(), "Configuration loaded");

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: eusaspark-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        tracing::error!(panic = %panic_info, "TUI panicked");
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = crossterm::terminal::size()?;
    let result = run_app(&mut terminal, config, size).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: site_core::SiteConfig,
    size: (u16, u16),
) -> anyhow::Result<()> {
    let mut app = App::new(config, size)?;
    app.run(terminal).await
}

/// Route tracing output away from the terminal the UI draws on
fn init_logging(log_file: Option<&PathBuf>, level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("eusaspark_tui={level},site_core={level}"))
    });

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init();
        }
    }

    Ok(())
}
