pub mod error;
pub mod utils;

pub use error::{ErrorCategory, ErrorClassifier, KarooError, LlmError, Result};
pub use utils::{char_len, dedup_preserving_order, format_thousands, join_or, truncate_chars};
