//! Vestibule Core - error taxonomy, configuration and logging
//!
//! Shared foundation for the application and web layers.

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
