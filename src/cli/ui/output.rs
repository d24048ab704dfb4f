use console::style;

/// Styled console messages for command handlers
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<14} {}", style(format!("{}:", label)).dim(), value);
    }

    /// Score with a colour matching its band
    pub fn score(&self, label: &str, score: f64) {
        let rendered = format!("{:.1}/100", score);
        let styled = if score >= 70.0 {
            style(rendered).green()
        } else if score >= 55.0 {
            style(rendered).yellow()
        } else {
            style(rendered).red()
        };
        println!("  {:<14} {}", style(format!("{}:", label)).dim(), styled.bold());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
