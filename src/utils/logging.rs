// file: src/utils/logging.rs
// description: Tracing subscriber initialization with optional ANSI coloring

use colored::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::new(level);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_heading(msg: &str) -> String {
    msg.cyan().bold().to_string()
}

pub fn format_link(url: &str) -> String {
    url.blue().underline().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_error_contains_message() {
        let formatted = format_error("something broke");
        assert!(formatted.contains("something broke"));
    }
}
