//! Line matchers: stateful recognizers that open and close reference blocks.
//!
//! A matcher is owned by exactly one file scan. The rewriter drives it
//! line-by-line: `match_start` while no block is open, `match_end` while one
//! is. Matchers never see both calls for the same line.

use crate::grammar::{self, Grammar};
use crate::options::ReferenceMatch;

/// Stateful recognizer for reference-block delimiters.
pub trait Matcher: Send {
    /// Tests whether `line` opens a reference block. On success the matcher
    /// records which grammar opened the block so that `match_end` can apply
    /// the corresponding end construct.
    fn match_start(&mut self, line: &str) -> Option<ReferenceMatch>;

    /// Tests whether `line` closes the currently open block. Only called
    /// while a block is open.
    fn match_end(&mut self, line: &str) -> bool;
}

/// Applies a single [`Grammar`]'s start/end patterns.
pub struct RegexMatcher {
    grammar: &'static Grammar,
}

impl RegexMatcher {
    pub fn new(grammar: &'static Grammar) -> Self {
        Self { grammar }
    }
}

impl Matcher for RegexMatcher {
    fn match_start(&mut self, line: &str) -> Option<ReferenceMatch> {
        self.grammar
            .start
            .captures(line)
            .map(|caps| ReferenceMatch::from_captures(&caps))
    }

    fn match_end(&mut self, line: &str) -> bool {
        self.grammar.end.is_match(line)
    }
}

/// How a [`CompositeMatcher`] tests end lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndPolicy {
    /// Only the sub-matcher whose start pattern opened the block may close
    /// it. Required when the opening syntax determines the valid closing
    /// syntax (e.g. a region block must end with the region construct).
    FollowsStart,
    /// Any sub-matcher's end pattern closes the block, tried in declared
    /// order. Used where closing syntax is syntax-agnostic.
    Any,
}

/// Tries an ordered list of sub-matchers. Start tests always run in declared
/// order and the first successful match wins, which keeps resolution
/// deterministic when a line could be read under more than one grammar.
pub struct CompositeMatcher {
    matchers: Vec<Box<dyn Matcher>>,
    policy: EndPolicy,
    current: Option<usize>,
}

impl CompositeMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>, policy: EndPolicy) -> Self {
        Self {
            matchers,
            policy,
            current: None,
        }
    }
}

impl Matcher for CompositeMatcher {
    fn match_start(&mut self, line: &str) -> Option<ReferenceMatch> {
        for (index, matcher) in self.matchers.iter_mut().enumerate() {
            if let Some(found) = matcher.match_start(line) {
                self.current = Some(index);
                return Some(found);
            }
        }
        None
    }

    fn match_end(&mut self, line: &str) -> bool {
        match self.policy {
            EndPolicy::FollowsStart => {
                let Some(index) = self.current else {
                    return false;
                };
                if self.matchers[index].match_end(line) {
                    self.current = None;
                    true
                } else {
                    false
                }
            }
            EndPolicy::Any => {
                for matcher in &mut self.matchers {
                    if matcher.match_end(line) {
                        self.current = None;
                        return true;
                    }
                }
                false
            }
        }
    }
}

/// Which end construct closes the block a [`RegionMatcher`] opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionEnd {
    Region,
    DoubleSlash,
}

/// Matcher for C# files: blocks open either with `#region ref:...` (closed
/// by the matching `#endregion`) or with a plain `// ref:...` line (closed
/// by `// endref`).
///
/// While a region block is open, a bare `#region` line increments a depth
/// counter instead of re-opening, and each `#endregion` decrements it; the
/// block only closes when the counter returns to zero. This lets the
/// referenced region itself contain ordinary nested regions.
pub struct RegionMatcher {
    depth: u32,
    end: Option<RegionEnd>,
}

impl RegionMatcher {
    pub fn new() -> Self {
        Self {
            depth: 0,
            end: None,
        }
    }
}

impl Default for RegionMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for RegionMatcher {
    fn match_start(&mut self, line: &str) -> Option<ReferenceMatch> {
        if let Some(caps) = grammar::REGION.start.captures(line) {
            self.depth = 1;
            self.end = Some(RegionEnd::Region);
            return Some(ReferenceMatch::from_captures(&caps));
        }

        if let Some(caps) = grammar::DOUBLE_SLASH.start.captures(line) {
            self.depth = 0;
            self.end = Some(RegionEnd::DoubleSlash);
            return Some(ReferenceMatch::from_captures(&caps));
        }

        None
    }

    fn match_end(&mut self, line: &str) -> bool {
        if self.depth > 0 && grammar::REGION_OPEN.is_match(line) {
            // Inside the referenced region: a nested region opens without
            // re-triggering the reference and must not close the block.
            self.depth += 1;
            return false;
        }

        let matched = match self.end {
            Some(RegionEnd::Region) => grammar::REGION_CLOSE.is_match(line),
            Some(RegionEnd::DoubleSlash) => grammar::DOUBLE_SLASH.end.is_match(line),
            None => false,
        };
        if !matched {
            return false;
        }

        if self.depth > 1 {
            self.depth -= 1;
            false
        } else {
            self.depth = 0;
            self.end = None;
            true
        }
    }
}

/// C-style composite: `//` or `/* */`, either end construct closes.
pub fn c_style() -> CompositeMatcher {
    CompositeMatcher::new(
        vec![
            Box::new(RegexMatcher::new(&grammar::DOUBLE_SLASH)),
            Box::new(RegexMatcher::new(&grammar::SLASH_STAR)),
        ],
        EndPolicy::Any,
    )
}

/// Fallback for unrecognized file types: C-style, hash, or HTML comment
/// markers, with any end construct accepted.
pub fn generic() -> CompositeMatcher {
    CompositeMatcher::new(
        vec![
            Box::new(c_style()),
            Box::new(RegexMatcher::new(&grammar::HASH)),
            Box::new(RegexMatcher::new(&grammar::HTML_COMMENT)),
        ],
        EndPolicy::Any,
    )
}
