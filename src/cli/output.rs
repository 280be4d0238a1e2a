//! Output formatting for the runbook CLI
//!
//! Human-readable colored output, or one JSON object per line with
//! `--format json`. Diagnostics go to stderr, results to stdout.

use colored::Colorize;
use runbook::output::WrittenArtifacts;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Output formatter for different output modes
pub struct OutputFormatter {
    /// Use colored output
    use_color: bool,
    /// JSON output mode
    json_mode: bool,
    /// Verbosity level
    verbosity: u8,
    /// Start time for duration calculations
    start_time: Instant,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(use_color: bool, json_mode: bool, verbosity: u8) -> Self {
        // Respect NO_COLOR environment variable
        let use_color = use_color && std::env::var("NO_COLOR").is_err();

        Self {
            use_color,
            json_mode,
            verbosity,
            start_time: Instant::now(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.json_mode
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("\n{}", title.cyan().bold());
            println!("{}", "-".repeat(title.len()).cyan());
        } else {
            println!("\n{}", title);
            println!("{}", "-".repeat(title.len()));
        }
    }

    /// Report freshly written artifacts
    pub fn generated(&self, written: &WrittenArtifacts, debug: bool) {
        if self.json_mode {
            let event = serde_json::json!({
                "type": "generated",
                "output_dir": written.output_dir,
                "inventory": written.inventory_path,
                "playbook": written.playbook_path,
                "debug": debug,
            });
            println!("{}", event);
            return;
        }

        let message = format!(
            "Generated inventory and playbook in {}",
            written.output_dir.display()
        );
        if self.use_color {
            println!("{}", message.green());
        } else {
            println!("{}", message);
        }
    }

    /// Report a finished engine run
    pub fn completed(&self, program: &str) {
        let elapsed = format_duration(self.start_time.elapsed());

        if self.json_mode {
            let event = serde_json::json!({
                "type": "completed",
                "program": program,
                "elapsed": elapsed,
            });
            println!("{}", event);
            return;
        }

        if self.use_color {
            println!(
                "{} {}",
                format!("{} completed in", program).green().bold(),
                elapsed.bright_white()
            );
        } else {
            println!("{} completed in {}", program, elapsed);
        }
    }

    /// Print the closing line of a successful validation
    pub fn valid(&self, runbook: &str) {
        if self.json_mode {
            return;
        }

        let message = valid_message(runbook);
        if self.use_color {
            println!("\n{}", message.green().bold());
        } else {
            println!("\n{}", message);
        }
    }

    /// Print an arbitrary JSON document (JSON mode only)
    pub fn json(&self, value: &serde_json::Value) {
        if self.json_mode {
            println!("{}", value);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.json_mode {
            let err = serde_json::json!({
                "type": "error",
                "message": message
            });
            eprintln!("{}", err);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "ERROR:".red().bold(), message);
        } else {
            eprintln!("ERROR: {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.json_mode {
            let warn = serde_json::json!({
                "type": "warning",
                "message": message
            });
            eprintln!("{}", warn);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "WARNING:".yellow().bold(), message);
        } else {
            eprintln!("WARNING: {}", message);
        }
    }

    /// Print a hint message
    pub fn hint(&self, message: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "HINT:".cyan().bold(), message);
        } else {
            eprintln!("HINT: {}", message);
        }
    }

    /// Print an info message (respects verbosity)
    pub fn info(&self, message: &str) {
        if self.verbosity < 1 || self.json_mode {
            return;
        }

        if self.use_color {
            println!("{} {}", "INFO:".blue(), message);
        } else {
            println!("INFO: {}", message);
        }
    }

    /// Print a list of items
    pub fn list(&self, title: &str, items: &[String]) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("\n{}:", title.bright_white().bold());
        } else {
            println!("\n{}:", title);
        }

        for item in items {
            if self.use_color {
                println!("  {} {}", "-".bright_black(), item);
            } else {
                println!("  - {}", item);
            }
        }
    }

    /// Print raw text to stdout
    pub fn raw(&self, text: &str) {
        print!("{}", text);
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

fn valid_message(runbook: &str) -> String {
    format!("Runbook '{}' is valid", runbook)
}

/// Format a duration as a human-readable string
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;
        format!("{}h {}m {}s", hours, mins, secs)
    } else if secs >= 60 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
