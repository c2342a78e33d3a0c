pub mod build_info;
pub mod error;
pub mod settings;
pub mod tracing;

// Re-exports
pub use ::tracing::{debug, error, info, metadata, trace, warn};
pub use build_info::BuildInfo;
