// ABOUTME: Session file data model: the session and window specifications decoded from YAML

/// Session specification.
pub mod session;
/// Window specification.
pub mod window;

pub use session::{EnvironmentSpec, SessionSpec};
pub use window::{WindowSpec, DEFAULT_WINDOW_COMMAND};
