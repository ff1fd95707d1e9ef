// magic-core/src/lib.rs
pub mod adapter;
pub mod backup;
pub mod checksum;
pub mod conflict;
pub mod copy;
pub mod doctor;
pub mod eject;
pub mod extract;
pub mod payload;
pub mod script;
pub mod state;

// Re-export key types
pub use conflict::ConflictChoice;
pub use payload::{Payload, PayloadSpec};
