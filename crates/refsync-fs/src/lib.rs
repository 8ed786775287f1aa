//! Filesystem support for refsync.
//!
//! Handles the concerns around the rewrite engine: decoding file bytes to
//! text while remembering the original encoding, writing replacements
//! atomically, and enumerating candidate files.

pub mod encoding;
pub mod error;
pub mod io;
pub mod walk;

pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use io::{read_text, write_atomic, write_text};
pub use walk::collect_files;
