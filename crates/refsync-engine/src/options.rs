//! Parsed representation of a matched start-marker line.

use regex::Captures;

use crate::grammar::{self, INDENT_GROUP, LOCATOR_GROUP, OPTIONS_GROUP};

/// End-of-line handling for substituted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOfLine {
    /// Leave the fetched content's own line endings untouched.
    AsIs,
    /// Use the separator of the line the block starts on.
    #[default]
    Auto,
    Cr,
    Lf,
    Crlf,
}

impl EndOfLine {
    /// Parses an option value. Unknown values yield `None` and are ignored
    /// by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "as-is" | "asis" => Some(Self::AsIs),
            "auto" => Some(Self::Auto),
            "cr" => Some(Self::Cr),
            "lf" => Some(Self::Lf),
            "crlf" => Some(Self::Crlf),
            _ => None,
        }
    }

    /// The forced separator, or `None` for the context-dependent modes.
    pub fn separator(self) -> Option<&'static str> {
        match self {
            Self::Cr => Some("\r"),
            Self::Lf => Some("\n"),
            Self::Crlf => Some("\r\n"),
            Self::AsIs | Self::Auto => None,
        }
    }
}

/// Value extracted when a start marker matches: the reference locator, the
/// indentation preceding the marker, and any per-block option overrides.
/// `None` for an override means "use the caller's default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch {
    /// Raw locator text: a relative/absolute path or an http(s) URL.
    pub locator: String,
    /// Whitespace captured before the marker, reapplied to inserted lines.
    pub indentation: String,
    pub eol: Option<EndOfLine>,
    pub reindent: Option<bool>,
    pub trim_final_lines: Option<bool>,
}

impl ReferenceMatch {
    /// Builds a match from a start-pattern capture, parsing the `;name=value`
    /// option tail. Unrecognized option names and unparseable values are
    /// silently ignored so that new options can be added without breaking
    /// older versions of the tool.
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Self {
        let mut result = Self {
            locator: caps[LOCATOR_GROUP].to_string(),
            indentation: caps
                .name(INDENT_GROUP)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            eol: None,
            reindent: None,
            trim_final_lines: None,
        };

        let options = caps.name(OPTIONS_GROUP).map(|m| m.as_str()).unwrap_or("");
        for option in grammar::OPTION.captures_iter(options) {
            let name = option.name("name").map(|m| m.as_str()).unwrap_or("");
            let value = option.name("value").map(|m| m.as_str()).unwrap_or("");
            match name {
                "eol" => {
                    if let Some(eol) = EndOfLine::parse(value) {
                        result.eol = Some(eol);
                    }
                }
                "indent" => {
                    if let Some(indent) = parse_bool(value) {
                        result.reindent = Some(indent);
                    }
                }
                "trim-final-lines" => {
                    if let Some(trim) = parse_bool(value) {
                        result.trim_final_lines = Some(trim);
                    }
                }
                _ => {}
            }
        }

        result
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
