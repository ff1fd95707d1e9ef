// magic-net/src/lib.rs
pub mod http;
pub mod validation;

pub use http::{archive_url, download_archive, GitReference};
