//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in site-core and the TUI MUST NOT block on
//! sleep. Every wait is either an animation pause that races a cancellation
//! token, or a periodic frame tick.
//!
//! **Exceptions**: cancellable pauses (`select!` against `cancelled()`),
//! `tokio::time::interval` ticks, test code

use std::fs;
use std::path::{Path, PathBuf};

/// Test that production code does not contain bare sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  {}", violation);
        }

        eprintln!("\nACCEPTABLE sleep uses:");
        eprintln!("  - Pauses raced against a cancellation token inside select!");
        eprintln!("  - Periodic ticks using tokio::time::interval()");
        eprintln!("  - Test code (#[test] or #[tokio::test] functions)");
        eprintln!("\nFORBIDDEN:");
        eprintln!("  - Sleep in polling loops");
        eprintln!("  - Sleep as poor man's synchronization");
        eprintln!("  - Uncancellable animation delays");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// The scanned directories exist, so the check above is not vacuous
#[test]
fn test_checked_directories_exist() {
    for dir in CHECKED_DIRS {
        let path = workspace_root().join(dir);
        assert!(path.is_dir(), "missing source directory {}", path.display());
    }
}

const CHECKED_DIRS: [&str; 2] = ["site/core/src", "tui/src"];

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();
    let policy = SleepPolicy {
        allow_cancellable: true,
        allow_tests: true,
    };

    for dir in CHECKED_DIRS {
        check_directory(&workspace_root().join(dir), &mut violations, &policy);
    }

    violations
}

struct SleepPolicy {
    allow_cancellable: bool,
    allow_tests: bool,
}

fn check_directory(path: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    if !path.exists() {
        return;
    }

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            check_file(entry.path(), violations, policy);
        }
    }
}

fn check_file(path: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return,
    };

    let lines: Vec<&str> = content.lines().collect();
    for (line_number, line) in find_violations_in(&lines, policy) {
        violations.push(format!("{}:{} - {}", path.display(), line_number, line));
    }
}

/// Offending (1-based line number, trimmed line) pairs
fn find_violations_in(lines: &[&str], policy: &SleepPolicy) -> Vec<(usize, String)> {
    let mut found = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        // Skip comments
        let code_part = line.split("//").next().unwrap_or(line);

        if !(code_part.contains("::sleep(") || code_part.contains(".sleep(")) {
            continue;
        }

        if policy.allow_tests && is_in_test_function(lines, idx) {
            continue;
        }

        if policy.allow_cancellable && is_cancellable_pause(lines, idx) {
            continue;
        }

        if is_interval_pattern(lines, idx) {
            continue;
        }

        found.push((idx + 1, line.trim().to_string()));
    }

    found
}

/// Check if line is inside a test function
fn is_in_test_function(lines: &[&str], current_idx: usize) -> bool {
    // Scan backwards for #[test] or #[tokio::test]
    for i in (0..current_idx).rev() {
        let line = lines[i].trim();

        if line.starts_with("fn ") && !line.contains("test") {
            return false; // Found a non-test function first
        }

        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }

        // Stop at module boundaries
        if line.starts_with("mod ") || line.starts_with("impl ") {
            return false;
        }
    }
    false
}

/// Check if the sleep is one arm of a `select!` racing a cancellation token
fn is_cancellable_pause(lines: &[&str], current_idx: usize) -> bool {
    let context_range = current_idx.saturating_sub(5)..std::cmp::min(current_idx + 3, lines.len());

    let mut has_select = false;
    let mut has_cancel_arm = false;

    for i in context_range {
        let line = lines[i];
        if line.contains("select!") {
            has_select = true;
        }
        if line.contains(".cancelled()") {
            has_cancel_arm = true;
        }
    }

    has_select && has_cancel_arm
}

/// Check if this is tokio::time::interval pattern (acceptable for periodic tasks)
fn is_interval_pattern(lines: &[&str], current_idx: usize) -> bool {
    // Look backwards for interval usage
    let context_range = current_idx.saturating_sub(20)..current_idx;

    for i in context_range {
        let line = lines[i];
        if line.contains("interval.tick()") || line.contains("tokio::time::interval") {
            return true;
        }
    }

    // Also check forward a bit
    let forward_range = current_idx..std::cmp::min(current_idx + 5, lines.len());
    for i in forward_range {
        if lines[i].contains("interval.tick()") {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: SleepPolicy = SleepPolicy {
        allow_cancellable: false,
        allow_tests: false,
    };

    const LENIENT: SleepPolicy = SleepPolicy {
        allow_cancellable: true,
        allow_tests: true,
    };

    #[test]
    fn test_sleep_violation_detection() {
        let test_code = vec![
            "fn bad_function() {",
            "    tokio::time::sleep(Duration::from_millis(10)).await;",
            "}",
        ];

        assert!(!is_in_test_function(&test_code, 1));
        assert_eq!(find_violations_in(&test_code, &LENIENT).len(), 1);
    }

    #[test]
    fn test_commented_sleep_ignored() {
        let test_code = vec!["    // tokio::time::sleep(delay).await;"];
        assert!(find_violations_in(&test_code, &STRICT).is_empty());
    }

    #[test]
    fn test_test_function_detection() {
        let test_code = vec![
            "#[tokio::test(start_paused = true)]",
            "async fn test_pause() {",
            "    tokio::time::sleep(Duration::from_millis(10)).await;",
            "}",
        ];

        assert!(is_in_test_function(&test_code, 2));
        assert!(find_violations_in(&test_code, &LENIENT).is_empty());
        assert_eq!(find_violations_in(&test_code, &STRICT).len(), 1);
    }

    #[test]
    fn test_cancellable_pause_detection() {
        let test_code = vec![
            "async fn pause(duration: Duration, cancel: &CancelToken) {",
            "    tokio::select! {",
            "        biased;",
            "        () = cancel.cancelled() => return Err(Cancelled),",
            "        () = tokio::time::sleep(duration) => {}",
            "    }",
            "}",
        ];

        assert!(is_cancellable_pause(&test_code, 4));
        assert!(find_violations_in(&test_code, &LENIENT).is_empty());
    }

    #[test]
    fn test_select_without_cancel_is_violation() {
        let test_code = vec![
            "async fn wait(rx: &mut Receiver<()>) {",
            "    tokio::select! {",
            "        _ = rx.recv() => {}",
            "        () = tokio::time::sleep(delay) => {}",
            "    }",
            "}",
        ];

        assert!(!is_cancellable_pause(&test_code, 3));
        assert_eq!(find_violations_in(&test_code, &LENIENT).len(), 1);
    }

    #[test]
    fn test_interval_detection() {
        let test_code = vec![
            "let mut frame_tick = tokio::time::interval(FRAME_DURATION);",
            "loop {",
            "    std::thread::sleep(d);",
            "}",
        ];

        assert!(is_interval_pattern(&test_code, 2));
    }
}
