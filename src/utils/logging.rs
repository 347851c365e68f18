// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored CLI output helpers
// reference: https://docs.rs/tracing-subscriber

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logs go to stderr; stdout stays free for streamed frames and reports.
/// `RUST_LOG` overrides the level picked by `verbose`.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Colors a match score by band: green from 75, yellow from 50, red below.
pub fn format_score(score: f64) -> String {
    let text = format!("{:>5.1}%", score);
    if score >= 75.0 {
        text.green().bold().to_string()
    } else if score >= 50.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

pub fn format_rank(rank: usize, total: usize) -> String {
    format!("[{}/{}]", rank, total).cyan().bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_helpers_keep_message() {
        colored::control::set_override(false);
        assert_eq!(format_success("done"), "✓ done");
        assert_eq!(format_score(82.04), " 82.0%");
        assert_eq!(format_rank(2, 5), "[2/5]");
    }
}
