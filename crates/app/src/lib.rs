// Library exports for the CLI and other consumers

/// Note store over HTTP
pub mod remote;
/// On-disk configuration
pub mod state;

pub use remote::{ApiError, HttpNoteStore};
pub use state::{AppConfig, AppState, StateError};
