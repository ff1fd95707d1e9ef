// magic-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;

// Re-export key types
pub use config::InstallerConfig;
pub use error::{MagicError, Result};
pub use model::adapter::{AdapterDef, AdapterFormat};
pub use model::project::ProjectConfig;
