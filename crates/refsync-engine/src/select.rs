//! Maps a file name to the matcher used to scan it.

use std::path::Path;

use crate::grammar;
use crate::matcher::{self, Matcher, RegexMatcher, RegionMatcher};

/// Picks the matcher for `path` based on its extension (case-insensitive),
/// with a filename override for `dockerfile` and a generic fallback for
/// everything else. Selection never fails; a file whose matcher finds no
/// start marker is simply left untouched.
pub fn matcher_for_path(path: &Path) -> Box<dyn Matcher> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("cs") => return Box::new(RegionMatcher::new()),
        Some("css") => return Box::new(RegexMatcher::new(&grammar::SLASH_STAR)),
        Some("js" | "ts" | "less" | "scss") => return Box::new(matcher::c_style()),
        // JSON has no native comments; `//` marker lines are recognized
        // anyway, so consumers must already tolerate non-standard JSON.
        Some("json" | "json5") => return Box::new(RegexMatcher::new(&grammar::DOUBLE_SLASH)),
        Some("sql") => return Box::new(RegexMatcher::new(&grammar::SQL_DASH)),
        Some("ini") => return Box::new(RegexMatcher::new(&grammar::SEMICOLON)),
        Some("md" | "xml" | "htm" | "html") => {
            return Box::new(RegexMatcher::new(&grammar::HTML_COMMENT));
        }
        Some("yml" | "yaml" | "sh" | "editorconfig") => {
            return Box::new(RegexMatcher::new(&grammar::HASH));
        }
        _ => {}
    }

    // A bare `.editorconfig` has no extension as far as Path is concerned,
    // so it is handled by file name, like `dockerfile`.
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if file_name.eq_ignore_ascii_case("dockerfile") || file_name.eq_ignore_ascii_case(".editorconfig")
    {
        return Box::new(RegexMatcher::new(&grammar::HASH));
    }

    Box::new(matcher::generic())
}
