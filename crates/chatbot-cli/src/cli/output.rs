//! Shared output helpers: JSON vs styled text, spinners, truncation.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use chatbot_types::error::AuthError;
use chatbot_types::identity::AuthOutcome;

/// How command results are printed.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
}

impl OutputMode {
    /// Whether decorations (spinners, hints, banners) should be shown.
    pub fn decorated(&self) -> bool {
        !self.json && !self.quiet
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report the result of an identity operation.
///
/// In JSON mode the `{success, ...}` outcome is printed either way. A failure
/// is returned as an error so the process exits non-zero.
pub fn report_auth<T, F>(
    result: Result<T, AuthError>,
    mode: OutputMode,
    render: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    if mode.json {
        let failure = result.as_ref().err().cloned();
        print_json(&AuthOutcome::from(result))?;
        return match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        };
    }

    let value = result?;
    render(&value);
    Ok(())
}

/// Print a green check line unless quiet.
pub fn success(mode: OutputMode, message: &str) {
    if mode.decorated() {
        println!("  {} {message}", style("✓").green().bold());
    }
}

/// A "thinking" spinner; hidden unless output is decorated.
pub fn spinner(mode: OutputMode, message: &str) -> ProgressBar {
    if !mode.decorated() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
