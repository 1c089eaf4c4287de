//! Filesystem-backed collaborators for the browser and the readiness gate

pub mod content_reader;
pub mod local_fs;
pub mod validator;

pub use content_reader::ContentReader;
pub use local_fs::LocalFileSystem;
pub use validator::{Arena2Validator, REQUIRED_ARCHIVES};
