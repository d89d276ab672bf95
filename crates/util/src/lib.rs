//! Small shared helpers: secret redaction, upload file loading, text utilities.

mod files;
mod redact;
mod text;

pub use files::{FileError, read_upload};
pub use redact::redact_sensitive;
pub use text::{preview_line, word_count};
