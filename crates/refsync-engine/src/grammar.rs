//! Delimiter grammar table.
//!
//! A [`Grammar`] is an immutable (start, end) regex pair describing how a
//! reference block opens and closes in one comment syntax. All patterns are
//! case-insensitive and anchored to the whole line; the start pattern
//! captures the leading indentation, the reference locator, and an optional
//! tail of `;name=value` options.
//!
//! The `regex` crate only exposes the last repetition of a repeated capture
//! group, so the option tail is captured as a single `options` slice and
//! re-scanned with [`OPTION`] when the match is turned into a
//! [`crate::ReferenceMatch`].

use regex::Regex;
use std::sync::LazyLock;

/// Start/end regex pair for one comment syntax.
#[derive(Debug)]
pub struct Grammar {
    pub start: Regex,
    pub end: Regex,
}

pub const INDENT_GROUP: &str = "indent";
pub const LOCATOR_GROUP: &str = "locator";
pub const OPTIONS_GROUP: &str = "options";

const REF_START: &str = r"ref(?:erence)?:(?P<locator>.+?)";
const REF_END: &str = r"endref(?:erence)?(?::.+)?";
const INDENT: &str = r"(?P<indent>\s*)";
const OPTIONS: &str = r"(?P<options>(?:;[^=;]+=[^;]*)*);?";

/// Scans the captured `options` tail for individual `;name=value` pairs.
pub static OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";(?P<name>[^=;]+)=(?P<value>[^;]*)").expect("option pattern"));

fn start_pattern(prefix: &str, suffix: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)^{INDENT}{prefix}\s*{REF_START}\s*{OPTIONS}\s*{suffix}$"
    ))
    .expect("grammar start pattern")
}

fn end_pattern(prefix: &str, suffix: &str, with_options: bool) -> Regex {
    let options = if with_options { OPTIONS } else { "" };
    Regex::new(&format!(r"(?i)^\s*{prefix}\s*{REF_END}\s*{options}\s*{suffix}$"))
        .expect("grammar end pattern")
}

/// `// ref:...` / `// endref`
pub static DOUBLE_SLASH: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    start: start_pattern("//", ""),
    end: end_pattern("//", "", false),
});

/// `/* ref:... */` / `/* endref */`
pub static SLASH_STAR: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    start: start_pattern(r"/\*+", r"\*/\s*"),
    end: end_pattern(r"/\*+", r"\*/\s*", false),
});

/// `-- ref:...` / `-- endref` (SQL)
pub static SQL_DASH: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    start: start_pattern("--", ""),
    end: end_pattern("--", "", true),
});

/// `;ref:...` / `;endref` (INI)
pub static SEMICOLON: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    start: start_pattern(";", ""),
    end: end_pattern(";", "", true),
});

/// `# ref:...` / `# endref`
pub static HASH: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    start: start_pattern("#", ""),
    end: end_pattern("#", "", false),
});

/// `<!-- ref:... -->` / `<!-- endref -->`
pub static HTML_COMMENT: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    start: start_pattern("<!--", r"-->\s*"),
    end: end_pattern("<!--", r"-->\s*", true),
});

/// `#region ref:...` / `#endregion` (the referenced-region form; depth
/// tracking for bare inner regions lives in the matcher, see
/// [`REGION_OPEN`] and [`REGION_CLOSE`]).
pub static REGION: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    start: start_pattern("#region", ""),
    end: Regex::new(r"(?i)^\s*#endregion(?:\s|$)").expect("region end pattern"),
});

/// Bare `#region` opener, with or without a payload. Only used for depth
/// counting inside an open region block; it carries no reference.
pub static REGION_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#region(?:\s|$)").expect("region open pattern"));

/// `#endregion`, ignoring any trailing text after whitespace.
pub static REGION_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#endregion(?:\s|$)").expect("region close pattern"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_slash_start_captures_groups() {
        let caps = DOUBLE_SLASH.start.captures("  // ref:a/b.txt").unwrap();
        assert_eq!(&caps[INDENT_GROUP], "  ");
        assert_eq!(&caps[LOCATOR_GROUP], "a/b.txt");
        assert_eq!(caps.name(OPTIONS_GROUP).unwrap().as_str(), "");
    }

    #[test]
    fn test_start_with_options_tail() {
        let caps = DOUBLE_SLASH
            .start
            .captures("// ref:x.txt;eol=lf;indent=false")
            .unwrap();
        assert_eq!(&caps[LOCATOR_GROUP], "x.txt");
        assert_eq!(&caps[OPTIONS_GROUP], ";eol=lf;indent=false");
    }

    #[test]
    fn test_locator_may_contain_semicolon_without_equals() {
        // ";b" is not a valid option pair, so it stays part of the locator.
        let caps = DOUBLE_SLASH.start.captures("// ref:a;b;eol=lf").unwrap();
        assert_eq!(&caps[LOCATOR_GROUP], "a;b");
        assert_eq!(&caps[OPTIONS_GROUP], ";eol=lf");
    }

    #[test]
    fn test_reference_spelling_variants() {
        assert!(DOUBLE_SLASH.start.is_match("// reference:x.txt"));
        assert!(DOUBLE_SLASH.end.is_match("// endreference"));
        assert!(DOUBLE_SLASH.end.is_match("// endref"));
        assert!(DOUBLE_SLASH.end.is_match("// ENDREF"));
    }

    #[test]
    fn test_end_with_trailing_locator_is_accepted() {
        assert!(DOUBLE_SLASH.end.is_match("// endref:x.txt"));
    }

    #[test]
    fn test_empty_locator_does_not_match() {
        assert!(DOUBLE_SLASH.start.captures("// ref:").is_none());
    }

    #[test]
    fn test_html_comment_pair() {
        assert!(HTML_COMMENT.start.is_match("<!-- ref:x.txt -->"));
        assert!(HTML_COMMENT.start.is_match("  <!-- ref:x.txt;eol=crlf -->"));
        assert!(HTML_COMMENT.end.is_match("<!-- endref -->"));
    }

    #[test]
    fn test_slash_star_pair() {
        assert!(SLASH_STAR.start.is_match("/* ref:x.txt */"));
        assert!(SLASH_STAR.start.is_match("/** ref:x.txt */"));
        assert!(SLASH_STAR.end.is_match("/* endref */"));
    }

    #[test]
    fn test_sql_and_semicolon_and_hash() {
        assert!(SQL_DASH.start.is_match("-- ref:x.sql"));
        assert!(SQL_DASH.end.is_match("-- endref"));
        assert!(SEMICOLON.start.is_match(";ref:x.ini"));
        assert!(SEMICOLON.end.is_match("; endref"));
        assert!(HASH.start.is_match("# ref:x.yml"));
        assert!(HASH.end.is_match("# endref"));
    }

    #[test]
    fn test_region_patterns() {
        assert!(REGION.start.is_match("#region ref:x.txt"));
        assert!(REGION.start.is_match("  #region ref:x.txt;eol=lf"));
        assert!(REGION_OPEN.is_match("#region"));
        assert!(REGION_OPEN.is_match("#region Helpers"));
        assert!(!REGION_OPEN.is_match("#regionfoo"));
        assert!(REGION_CLOSE.is_match("#endregion"));
        assert!(REGION_CLOSE.is_match("  #endregion trailing"));
        assert!(!REGION_CLOSE.is_match("#endregionfoo"));
    }

    #[test]
    fn test_nothing_else_permitted_on_the_line() {
        assert!(!DOUBLE_SLASH.start.is_match("let x = 1; // ref:x.txt"));
        assert!(!HASH.end.is_match("value # endref"));
    }

    #[test]
    fn test_option_scan_iterates_all_pairs() {
        let pairs: Vec<(&str, &str)> = OPTION
            .captures_iter(";eol=lf;indent=false;custom=1")
            .map(|c| {
                (
                    c.name("name").unwrap().as_str(),
                    c.name("value").unwrap().as_str(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![("eol", "lf"), ("indent", "false"), ("custom", "1")]
        );
    }
}
