//! TOML Configuration File Support
//!
//! Centralized configuration loading for the showcase, supporting a TOML
//! configuration file at `~/.config/eusaspark/showcase.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [typing]
//! enabled = true
//! char_delay_ms = 30
//! line_pause_ms = 100
//! document_pause_ms = 8000
//!
//! [[typing.documents]]
//! id = "python"
//! tab_label = "main.py"
//! markup = "<span class=\"keyword\">pass</span>"
//!
//! [page]
//! header_threshold = 5
//! spy_lead = 3
//! mobile_breakpoint = 100
//! resize_debounce_ms = 250
//!
//! [contact]
//! submit_delay_ms = 2000
//! message_ttl_ms = 5000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Document};
use crate::page::contact::{DEFAULT_MESSAGE_TTL, DEFAULT_SUBMIT_DELAY};
use crate::page::debounce::DEFAULT_RESIZE_DEBOUNCE;
use crate::page::header::DEFAULT_HEADER_THRESHOLD;
use crate::page::menu::DEFAULT_MOBILE_BREAKPOINT;
use crate::page::navigation::DEFAULT_SPY_LEAD;
use crate::sequencer::Timing;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Typing demo section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingToml {
    /// Whether the typing demo runs at all
    pub enabled: Option<bool>,

    /// Delay after each visible character in milliseconds
    pub char_delay_ms: Option<u64>,

    /// Pause after each line in milliseconds
    pub line_pause_ms: Option<u64>,

    /// Pause after each document in milliseconds
    pub document_pause_ms: Option<u64>,

    /// Replacement document catalog
    pub documents: Option<Vec<Document>>,
}

/// Page behaviour section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageToml {
    /// Rows scrolled before the header turns translucent
    pub header_threshold: Option<u32>,

    /// Rows of lead for scroll-spy
    pub spy_lead: Option<u32>,

    /// Width in columns at or below which the layout is mobile
    pub mobile_breakpoint: Option<u16>,

    /// Quiet period for resize handling in milliseconds
    pub resize_debounce_ms: Option<u64>,
}

/// Contact form section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactToml {
    /// Simulated submission time in milliseconds
    pub submit_delay_ms: Option<u64>,

    /// Banner lifetime in milliseconds
    pub message_ttl_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteToml {
    /// Typing demo configuration section
    pub typing: TypingToml,

    /// Page behaviour configuration section
    pub page: PageToml,

    /// Contact form configuration section
    pub contact: ContactToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Centralized configuration for the showcase
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Whether the typing demo runs
    pub typing_enabled: bool,

    /// Typing demo delays
    pub timing: Timing,

    /// Documents replacing the built-in catalog, if configured
    pub documents: Option<Vec<Document>>,

    /// Rows scrolled before the header turns translucent
    pub header_threshold: u32,

    /// Rows of lead for scroll-spy
    pub spy_lead: u32,

    /// Width in columns at or below which the layout is mobile
    pub mobile_breakpoint: u16,

    /// Quiet period for resize handling
    pub resize_debounce: Duration,

    /// Simulated contact submission time
    pub submit_delay: Duration,

    /// Contact banner lifetime
    pub message_ttl: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            typing_enabled: true,
            timing: Timing::default(),
            documents: None,
            header_threshold: DEFAULT_HEADER_THRESHOLD,
            spy_lead: DEFAULT_SPY_LEAD,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            submit_delay: DEFAULT_SUBMIT_DELAY,
            message_ttl: DEFAULT_MESSAGE_TTL,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl SiteConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// The document catalog to play: configured documents or the built-in set
    ///
    /// # Errors
    ///
    /// Returns a validation error if the configured documents are empty or
    /// one of them has a blank tab label.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.documents {
            Some(documents) => Catalog::new(documents.clone())
                .map_err(|e| ConfigError::ValidationError(e.to_string())),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Check values that cannot be expressed in the types
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog()?;
        if self.mobile_breakpoint == 0 {
            return Err(ConfigError::ValidationError(
                "mobile_breakpoint must be greater than zero".to_string(),
            ));
        }
        // Without a document pause the typing loop never waits on a timer.
        if self.typing_enabled && self.timing.document_pause.is_zero() {
            return Err(ConfigError::ValidationError(
                "document_pause_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/eusaspark/showcase.toml` or
/// `~/.config/eusaspark/showcase.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("eusaspark").join("showcase.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed or holds
/// invalid values. A missing config file is not an error.
pub fn load_config() -> Result<SiteConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read, parsed or
/// validated.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<SiteConfig, ConfigError> {
    let mut config = SiteConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: SiteToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut SiteConfig, toml: &SiteToml) {
    // Typing demo
    if let Some(enabled) = toml.typing.enabled {
        config.typing_enabled = enabled;
    }
    if let Some(ms) = toml.typing.char_delay_ms {
        config.timing.char_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.typing.line_pause_ms {
        config.timing.line_pause = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.typing.document_pause_ms {
        config.timing.document_pause = Duration::from_millis(ms);
    }
    if toml.typing.documents.is_some() {
        config.documents = toml.typing.documents.clone();
    }

    // Page behaviour
    if let Some(rows) = toml.page.header_threshold {
        config.header_threshold = rows;
    }
    if let Some(rows) = toml.page.spy_lead {
        config.spy_lead = rows;
    }
    if let Some(cols) = toml.page.mobile_breakpoint {
        config.mobile_breakpoint = cols;
    }
    if let Some(ms) = toml.page.resize_debounce_ms {
        config.resize_debounce = Duration::from_millis(ms);
    }

    // Contact form
    if let Some(ms) = toml.contact.submit_delay_ms {
        config.submit_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.contact.message_ttl_ms {
        config.message_ttl = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut SiteConfig) {
    if let Ok(delay) = std::env::var("EUSASPARK_CHAR_DELAY_MS") {
        if let Ok(ms) = delay.parse::<u64>() {
            config.timing.char_delay = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(pause) = std::env::var("EUSASPARK_LINE_PAUSE_MS") {
        if let Ok(ms) = pause.parse::<u64>() {
            config.timing.line_pause = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(pause) = std::env::var("EUSASPARK_DOCUMENT_PAUSE_MS") {
        if let Ok(ms) = pause.parse::<u64>() {
            config.timing.document_pause = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(enabled) = std::env::var("EUSASPARK_TYPING") {
        config.typing_enabled = enabled != "0" && enabled.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Per-character delay override (milliseconds)
    pub char_delay_ms: Option<u64>,

    /// Typing demo enabled override
    pub typing_enabled: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set per-character delay override
    #[must_use]
    pub fn with_char_delay_ms(mut self, ms: u64) -> Self {
        self.char_delay_ms = Some(ms);
        self
    }

    /// Set typing enabled override
    #[must_use]
    pub fn with_typing_enabled(mut self, enabled: bool) -> Self {
        self.typing_enabled = Some(enabled);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut SiteConfig) {
        if self.char_delay_ms.is_some() || self.typing_enabled.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ms) = self.char_delay_ms {
            config.timing.char_delay = Duration::from_millis(ms);
        }
        if let Some(enabled) = self.typing_enabled {
            config.typing_enabled = enabled;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::{const_mutex, Mutex};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Serializes tests that read or write process environment variables
    static ENV_LOCK: Mutex<()> = const_mutex(());

    /// Clean up all environment variables used by config loading.
    fn clear_config_env_vars() {
        std::env::remove_var("EUSASPARK_CHAR_DELAY_MS");
        std::env::remove_var("EUSASPARK_LINE_PAUSE_MS");
        std::env::remove_var("EUSASPARK_DOCUMENT_PAUSE_MS");
        std::env::remove_var("EUSASPARK_TYPING");
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();

        assert!(config.typing_enabled);
        assert_eq!(config.timing, Timing::default());
        assert!(config.documents.is_none());
        assert_eq!(config.header_threshold, 5);
        assert_eq!(config.spy_lead, 3);
        assert_eq!(config.mobile_breakpoint, 100);
        assert_eq!(config.resize_debounce, Duration::from_millis(250));
        assert_eq!(config.submit_delay, Duration::from_millis(2000));
        assert_eq!(config.message_ttl, Duration::from_millis(5000));
        assert_eq!(config.source(), ConfigSource::Default);
        assert_eq!(config.catalog().unwrap().len(), 3);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("eusaspark"));
            assert!(p.to_string_lossy().ends_with("showcase.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let file = write_config(
            r#"
[typing]
enabled = false
char_delay_ms = 5
line_pause_ms = 10
document_pause_ms = 1000

[[typing.documents]]
id = "shell"
tab_label = "run.sh"
markup = "<span class=\"keyword\">echo</span> hola"

[page]
header_threshold = 8
spy_lead = 1
mobile_breakpoint = 90
resize_debounce_ms = 100

[contact]
submit_delay_ms = 500
message_ttl_ms = 1500
"#,
        );

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert!(!config.typing_enabled);
        assert_eq!(config.timing.char_delay, Duration::from_millis(5));
        assert_eq!(config.timing.line_pause, Duration::from_millis(10));
        assert_eq!(config.timing.document_pause, Duration::from_millis(1000));
        assert_eq!(config.header_threshold, 8);
        assert_eq!(config.spy_lead, 1);
        assert_eq!(config.mobile_breakpoint, 90);
        assert_eq!(config.resize_debounce, Duration::from_millis(100));
        assert_eq!(config.submit_delay, Duration::from_millis(500));
        assert_eq!(config.message_ttl, Duration::from_millis(1500));

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).tab_label, "run.sh");

        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let file = write_config("[typing]\nchar_delay_ms = 12\n");
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.timing.char_delay, Duration::from_millis(12));
        assert_eq!(config.timing.line_pause, Duration::from_millis(100));
        assert_eq!(config.header_threshold, 5);
        assert!(config.documents.is_none());
    }

    #[test]
    fn test_parse_empty_toml() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let file = write_config("");
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.timing, Timing::default());
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_graceful() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let path = PathBuf::from("/nonexistent/eusaspark/showcase.toml");
        let config = load_config_from_path(Some(path)).unwrap();

        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let config = load_config_from_path(None).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.typing_enabled);
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_config("[typing\nchar_delay_ms = ");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_empty_document_list_rejected() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let file = write_config("[typing]\ndocuments = []\n");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_blank_tab_label_rejected() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let file = write_config(
            r#"
[[typing.documents]]
id = "x"
tab_label = "  "
markup = "x"
"#,
        );
        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("`x`"));
    }

    #[test]
    fn test_zero_breakpoint_rejected() {
        let mut config = SiteConfig::default();
        config.mobile_breakpoint = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_document_pause_rejected() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let file = write_config(
            r#"
[typing]
char_delay_ms = 0
line_pause_ms = 0
document_pause_ms = 0
"#,
        );
        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("document_pause_ms"));
    }

    #[test]
    fn test_zero_document_pause_from_env_rejected() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();
        std::env::set_var("EUSASPARK_DOCUMENT_PAUSE_MS", "0");

        let result = load_config_from_path(None);
        clear_config_env_vars();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_timing_allowed_when_typing_disabled() {
        let mut config = SiteConfig::default();
        config.timing = Timing::instant();
        assert!(config.validate().is_err());

        config.typing_enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_char_delay_keeps_document_pause() {
        let mut config = SiteConfig::default();
        ConfigOverrides::new().with_char_delay_ms(0).apply(&mut config);
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // Override Priority Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        let file = write_config("[typing]\nchar_delay_ms = 12\nline_pause_ms = 40\n");
        std::env::set_var("EUSASPARK_CHAR_DELAY_MS", "7");
        std::env::set_var("EUSASPARK_TYPING", "false");

        let config = load_config_from_path(Some(file.path().to_path_buf()));
        clear_config_env_vars();
        let config = config.unwrap();

        assert_eq!(config.timing.char_delay, Duration::from_millis(7));
        assert_eq!(config.timing.line_pause, Duration::from_millis(40));
        assert!(!config.typing_enabled);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_unparseable_env_is_ignored() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        std::env::set_var("EUSASPARK_LINE_PAUSE_MS", "soon");
        let config = load_config_from_path(None);
        clear_config_env_vars();
        let config = config.unwrap();

        assert_eq!(config.timing.line_pause, Duration::from_millis(100));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let _guard = ENV_LOCK.lock();
        clear_config_env_vars();

        std::env::set_var("EUSASPARK_CHAR_DELAY_MS", "7");
        let config = load_config_from_path(None);
        clear_config_env_vars();
        let mut config = config.unwrap();

        ConfigOverrides::new()
            .with_char_delay_ms(1)
            .with_typing_enabled(false)
            .apply(&mut config);

        assert_eq!(config.timing.char_delay, Duration::from_millis(1));
        assert!(!config.typing_enabled);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = SiteConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
        assert_eq!(config.timing, Timing::default());
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = SiteToml {
            typing: TypingToml {
                char_delay_ms: Some(20),
                documents: Some(vec![Document::new("a", "a.txt", "hola")]),
                ..Default::default()
            },
            ..Default::default()
        };
        let text = toml::to_string(&toml).unwrap();
        let parsed: SiteToml = toml::from_str(&text).unwrap();
        assert_eq!(parsed.typing.char_delay_ms, Some(20));
        assert_eq!(parsed.typing.documents.unwrap()[0].tab_label, "a.txt");
    }
}
