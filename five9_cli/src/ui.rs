//! Terminal output helpers.
//!
//! Status lines go to stderr so stdout only carries command output.

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use clap::ValueEnum;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

static PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

/// Shared progress area. Log output is routed through it.
pub fn progress() -> &'static MultiProgress {
    PROGRESS.get_or_init(MultiProgress::new)
}

fn status_line(line: String) {
    progress().suspend(|| eprintln!("{}", line));
}

pub fn header(msg: &str) {
    status_line(format!("{}", style(msg).bold().cyan()));
}

pub fn success(msg: &str) {
    status_line(format!("{} {}", style("✓").green().bold(), msg));
}

pub fn info(msg: &str) {
    status_line(format!("{} {}", style("•").blue(), msg));
}

pub fn warning(msg: &str) {
    status_line(format!("{} {}", style("!").yellow().bold(), style(msg).yellow()));
}

pub fn error(msg: &str) {
    status_line(format!("{} {}", style("✗").red().bold(), style(msg).red()));
}

pub fn error_with_details(msg: &str, details: &str) {
    status_line(format!(
        "{} {}: {}",
        style("✗").red().bold(),
        style(msg).red(),
        style(details).dim()
    ));
}

pub fn debug(msg: &str) {
    log::debug!("{}", msg);
}

pub fn spinner(msg: &str) -> ProgressBar {
    let spinner = progress().add(ProgressBar::new_spinner());
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
    let bar = progress().add(ProgressBar::new(len));
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(msg.to_string());
    bar
}

pub fn raw_output(output: &str) {
    progress().suspend(|| println!("{}", output));
}

pub fn json_output<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => raw_output(&json),
        Err(e) => error_with_details("Failed to serialize output", &e.to_string()),
    }
}

/// Prints `key: value` pairs with aligned keys.
pub fn pretty_output_pairs<K: fmt::Display, V: fmt::Display>(pairs: &[(K, V)]) {
    let width = pairs
        .iter()
        .map(|(key, _)| key.to_string().len())
        .max()
        .unwrap_or(0);
    for (key, value) in pairs {
        let key = format!("{:width$}", key.to_string(), width = width);
        raw_output(&format!("{}  {}", style(key).bold(), value));
    }
}
