//! Console Progress Rendering
//!
//! Single-line progress for the `optimize` command, redrawn in place on
//! stderr so stdout stays clean for `--format json`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use console::{Term, style};

use crate::optimizer::ProgressSink;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const BAR_WIDTH: usize = 30;

/// Progress sink drawing a bar, percentage and the latest milestone
pub struct ConsoleProgress {
    term: Term,
    started: Instant,
    enabled: bool,
    ticks: AtomicUsize,
}

impl ConsoleProgress {
    /// Draws only when stderr is a terminal
    pub fn new() -> Self {
        let term = Term::stderr();
        let enabled = term.is_term();
        Self {
            term,
            started: Instant::now(),
            enabled,
            ticks: AtomicUsize::new(0),
        }
    }

    /// Whether a progress line can be drawn at all
    pub fn terminal_attached() -> bool {
        Term::stderr().is_term()
    }

    /// Never draws (`--quiet`)
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// One progress line, without styling
    pub fn render(&self, fraction: f32, message: &str) -> String {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        let spinner = if fraction >= 1.0 {
            '✓'
        } else {
            SPINNER[tick % SPINNER.len()]
        };
        format!(
            "{} {} {:>3}% {} ({})",
            spinner,
            render_progress_bar(fraction, BAR_WIDTH),
            (fraction.clamp(0.0, 1.0) * 100.0).round() as u32,
            message,
            format_duration(self.started.elapsed().as_secs())
        )
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn report(&self, fraction: f32, message: &str) {
        tracing::debug!("progress {:.2}: {}", fraction, message);
        if !self.enabled {
            return;
        }
        let line = self.render(fraction, message);
        // Drawing failures are cosmetic
        let _ = self.term.clear_line();
        if fraction >= 1.0 {
            let _ = self.term.write_line(&style(line).green().to_string());
        } else {
            let _ = self.term.write_str(&style(line).cyan().to_string());
        }
    }
}

/// Log filter used when `RUST_LOG` is unset.
///
/// Info lines share stderr with the in-place progress line and would split
/// it, so a visible progress line lowers the default to warnings.
pub fn default_log_level(verbose: bool, quiet: bool, progress_visible: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else if progress_visible {
        "warn"
    } else {
        "info"
    }
}

/// Render a simple progress bar
fn render_progress_bar(fraction: f32, width: usize) -> String {
    let progress = fraction.clamp(0.0, 1.0);
    let filled = (progress * width as f32) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format duration as human-readable string
fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_render() {
        assert_eq!(render_progress_bar(0.0, 10), "[░░░░░░░░░░]");
        assert_eq!(render_progress_bar(0.5, 10), "[█████░░░░░]");
        assert_eq!(render_progress_bar(1.0, 10), "[██████████]");
        assert_eq!(render_progress_bar(1.7, 10), "[██████████]");
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(false, false, false), "info");
        assert_eq!(default_log_level(false, false, true), "warn");
        assert_eq!(default_log_level(true, false, true), "debug");
        assert_eq!(default_log_level(false, true, false), "error");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30s");
        assert_eq!(format_duration(90), "1m 30s");
        assert_eq!(format_duration(3700), "1h 1m");
    }

    #[test]
    fn test_render_line() {
        let progress = ConsoleProgress::hidden();
        let line = progress.render(0.8, "Semantic Matcher complete (10/10)");
        assert!(line.contains(" 80% Semantic Matcher complete (10/10)"));
        assert!(progress.render(1.0, "Done in 3.2s").starts_with('✓'));
    }

    #[test]
    fn test_hidden_sink_is_silent() {
        let progress = ConsoleProgress::hidden();
        progress.report(0.5, "nothing drawn");
        assert!(!progress.enabled);
    }
}
