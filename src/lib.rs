// ============================================================================
// lib.rs — KeyIntent
// Keyboard input -> held intent tracking, plus the pieces that host it.
// ============================================================================

pub mod binding;
pub mod config;
pub mod error;
pub mod headless;
pub mod input;
pub mod intent;
pub mod motion;
pub mod session;
pub mod surface;
pub mod tracker;

pub use binding::{BindingEntry, KeyBinding};
pub use error::ConfigurationError;
pub use intent::IntentState;
pub use surface::{KeyEvent, KeyEventKind, KeyboardSurface, ListenerId};
pub use tracker::{Handle, InputIntentTracker, ObserverId, TrackerStatus};
