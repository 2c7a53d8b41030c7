// ============================================================================
// error.rs — KeyIntent
// Configuration errors raised when a key binding table is rejected.
// ============================================================================

use thiserror::Error;

/// A binding table that cannot be observed. Raised synchronously by
/// `KeyBinding::validate` and `InputIntentTracker::start`, before any
/// listener is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("key binding table is empty")]
    EmptyBinding,

    #[error("physical key {key:?} is bound more than once")]
    DuplicateKey { key: String },

    #[error("binding entry {index} has a blank {field}")]
    BlankEntry { index: usize, field: &'static str },
}
