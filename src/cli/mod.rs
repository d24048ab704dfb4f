pub mod commands;
pub mod progress;
pub mod report;
pub mod ui;

pub use progress::{ConsoleProgress, default_log_level};
pub use report::render_text;
