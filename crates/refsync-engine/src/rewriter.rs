//! The block rewriter: walks a file's lines, drives the matcher, and
//! replaces each closed block's body with freshly fetched content.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::lines::split_lines;
use crate::matcher::Matcher;
use crate::options::{EndOfLine, ReferenceMatch};

/// Supplies the content behind a reference locator. Implementations resolve
/// relative locators against the referencing file's directory and fetch
/// absolute http(s) URLs remotely; concurrent fetches for the same resolved
/// locator must be coalesced into a single operation.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_text(&self, referencing_file: &Path, locator: &str) -> Result<String>;
    async fn fetch_bytes(&self, referencing_file: &Path, locator: &str) -> Result<Vec<u8>>;
}

/// Outcome of rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// No start marker matched; the file is untouched.
    Unchanged,
    /// Blocks matched but every body already held the current content.
    UpToDate,
    /// Blocks matched and at least one body changed.
    Updated(String),
}

/// Rewrites `content` by replacing each matched block body with the fetched
/// content for its locator. Lines outside blocks are copied verbatim with
/// their original separators. `default_eol` applies where a block carries no
/// `eol` option.
///
/// A fetch failure aborts this file only. A block that never closes leaves
/// the whole file unchanged.
pub async fn rewrite(
    path: &Path,
    content: &str,
    matcher: &mut dyn Matcher,
    fetcher: &dyn ContentFetcher,
    default_eol: EndOfLine,
) -> Result<Rewrite> {
    let mut output = String::with_capacity(content.len());
    let mut in_block = false;
    let mut found_any = false;
    let mut open_line = 0usize;
    let mut line_number = 0usize;

    for line in split_lines(content) {
        line_number += 1;

        if in_block {
            // Old body lines are discarded; only the end marker survives.
            if matcher.match_end(line.content) {
                in_block = false;
                output.push_str(line.content);
                output.push_str(line.separator);
            }
            continue;
        }

        match matcher.match_start(line.content) {
            Some(reference) => {
                tracing::debug!(
                    file = %path.display(),
                    line = line_number,
                    locator = %reference.locator,
                    "found reference block"
                );
                let fetched = fetcher.fetch_text(path, &reference.locator).await?;

                output.push_str(line.content);
                output.push_str(line.separator);
                output.push_str(&transform(&fetched, &reference, line.separator, default_eol));

                found_any = true;
                in_block = true;
                open_line = line_number;
            }
            None => {
                output.push_str(line.content);
                output.push_str(line.separator);
            }
        }
    }

    if in_block {
        tracing::warn!(
            file = %path.display(),
            line = open_line,
            "reference block never closes; leaving file unchanged"
        );
        return Ok(Rewrite::Unchanged);
    }

    if !found_any {
        return Ok(Rewrite::Unchanged);
    }

    if output == content {
        Ok(Rewrite::UpToDate)
    } else {
        Ok(Rewrite::Updated(output))
    }
}

/// Applies the per-block transformation pipeline to fetched content:
/// end-of-line normalization, trailing-blank trimming, then indentation
/// reflow. `start_separator` is the separator of the line the block opened
/// on, used by `auto` mode and appended by the later steps.
fn transform(
    fetched: &str,
    reference: &ReferenceMatch,
    start_separator: &str,
    default_eol: EndOfLine,
) -> String {
    let eol = reference.eol.unwrap_or(default_eol);
    let mut content = match eol {
        EndOfLine::AsIs => fetched.to_string(),
        EndOfLine::Auto => replace_line_endings(fetched, start_separator),
        _ => replace_line_endings(fetched, eol.separator().unwrap_or(start_separator)),
    };

    if reference.trim_final_lines.unwrap_or(true) {
        let trimmed = content.trim_end_matches(['\r', '\n']);
        content = format!("{trimmed}{start_separator}");
    }

    if reference.reindent.unwrap_or(true) && !reference.indentation.is_empty() {
        let mut indented = String::with_capacity(content.len() + reference.indentation.len() * 8);
        for line in split_lines(&content) {
            if line.content.trim().is_empty() {
                // Blank lines stay blank rather than gaining trailing spaces.
                indented.push_str(start_separator);
            } else {
                indented.push_str(&reference.indentation);
                indented.push_str(line.content);
                indented.push_str(start_separator);
            }
        }
        content = indented;
    }

    content
}

/// Replaces every line ending in `text` with `separator`, leaving a missing
/// final newline missing.
fn replace_line_endings(text: &str, separator: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for line in split_lines(text) {
        result.push_str(line.content);
        if !line.separator.is_empty() {
            result.push_str(separator);
        }
    }
    result
}
