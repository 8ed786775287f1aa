//! Reference-block recognition and substitution engine.
//!
//! Scans text files for delimited reference blocks such as:
//! ```text
//! // ref:path/to/canonical.txt
//! (replaced body)
//! // endref
//! ```
//! and replaces the block body with the current contents of the referenced
//! resource, leaving the marker lines and everything outside the block
//! byte-for-byte untouched. Several comment syntaxes are supported (C-style,
//! hash, SQL, semicolon, HTML comments) plus C# `#region` blocks with proper
//! nesting.
//!
//! The engine does no I/O of its own: content for a locator is obtained
//! through the [`ContentFetcher`] trait.

pub mod error;
pub mod grammar;
pub mod lines;
pub mod matcher;
pub mod options;
pub mod rewriter;
pub mod select;

pub use error::{Error, Result};
pub use lines::{Line, split_lines};
pub use matcher::{CompositeMatcher, EndPolicy, Matcher, RegexMatcher, RegionMatcher};
pub use options::{EndOfLine, ReferenceMatch};
pub use rewriter::{ContentFetcher, Rewrite, rewrite};
pub use select::matcher_for_path;
