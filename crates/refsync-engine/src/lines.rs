//! Line splitting that preserves the original separators.
//!
//! Files may mix `\n`, `\r\n`, and lone `\r` line endings, and may or may
//! not end with a newline. The rewriter must reproduce every untouched line
//! exactly, so each line carries the separator that followed it in the
//! source (empty for a final line with no trailing newline). Concatenating
//! `content + separator` for every line reproduces the input.

/// One line of text plus the separator that terminated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line content, without its terminator.
    pub content: &'a str,
    /// `"\n"`, `"\r"`, `"\r\n"`, or `""` for an unterminated final line.
    pub separator: &'a str,
}

/// Splits `text` into [`Line`]s on any `\n`, lone `\r`, or `\r\n` boundary.
pub fn split_lines(text: &str) -> LineSplit<'_> {
    LineSplit { rest: text }
}

/// Iterator returned by [`split_lines`].
#[derive(Debug, Clone)]
pub struct LineSplit<'a> {
    rest: &'a str,
}

impl<'a> Iterator for LineSplit<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        let bytes = self.rest.as_bytes();
        let Some(index) = bytes.iter().position(|&b| b == b'\r' || b == b'\n') else {
            let line = Line {
                content: self.rest,
                separator: "",
            };
            self.rest = "";
            return Some(line);
        };

        let separator_len = if bytes[index] == b'\r' && bytes.get(index + 1) == Some(&b'\n') {
            2
        } else {
            1
        };

        let line = Line {
            content: &self.rest[..index],
            separator: &self.rest[index..index + separator_len],
        };
        self.rest = &self.rest[index + separator_len..];
        Some(line)
    }
}
