// Public modules
pub mod context;
pub mod defaults;
pub mod error;
pub mod local_files;
pub mod matcher;
pub mod naming;
pub mod paths;
pub mod pattern;
pub mod template;
pub mod version;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
