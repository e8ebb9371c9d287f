//! Escape-aware word wrapping.
//!
//! Lines are broken at whitespace and after any of the configured
//! breakpoint characters. Words are never split, so a single word wider
//! than the limit overflows onto a line of its own. Escape sequences are
//! carried along with the word they precede and never counted.

use crate::ansi::{Segment, char_width, segments, visible_width};

/// Characters after which a line may be broken, in addition to whitespace.
pub const DEFAULT_BREAKPOINTS: &str = " ,.;-+|";

/// No-break space: whitespace that glues the words on either side.
const NBSP: char = '\u{a0}';

/// Wraps `s` so no line is wider than `limit` visible cells.
///
/// Existing newlines are kept. A `limit` of zero returns the input
/// unchanged.
///
/// ```rust
/// use glamour::wordwrap::{wordwrap, DEFAULT_BREAKPOINTS};
///
/// assert_eq!(wordwrap("foo-foobar", 4, DEFAULT_BREAKPOINTS), "foo-\nfoobar");
/// assert_eq!(wordwrap("the quick brown fox", 10, DEFAULT_BREAKPOINTS), "the quick\nbrown fox");
/// ```
pub fn wordwrap(s: &str, limit: usize, breakpoints: &str) -> String {
    if limit == 0 {
        return s.to_string();
    }
    let mut wrapper = Wrapper::new(limit, breakpoints, "");
    wrapper.write(s);
    wrapper.finish()
}

/// Wraps `s` at `limit`, starting every wrapped continuation line with
/// `indent`.
///
/// The indent counts toward the limit. Lines broken by newlines already in
/// the input are not indented.
///
/// ```rust
/// use glamour::wordwrap::wrap_with_indent;
///
/// let wrapped = wrap_with_indent(
///     "This is a long line that should wrap with proper indentation",
///     20,
///     "  ",
/// );
/// assert_eq!(
///     wrapped,
///     "This is a long line\n  that should wrap\n  with proper\n  indentation"
/// );
/// ```
pub fn wrap_with_indent(s: &str, limit: usize, indent: &str) -> String {
    if limit == 0 {
        return s.to_string();
    }
    let mut wrapper = Wrapper::new(limit, DEFAULT_BREAKPOINTS, indent);
    wrapper.write(s);
    wrapper.finish()
}

/// Streaming word wrapper.
#[derive(Debug)]
struct Wrapper<'a> {
    limit: usize,
    breakpoints: &'a str,
    indent: &'a str,
    indent_width: usize,

    buf: String,
    line_len: usize,
    line_has_content: bool,
    space: String,
    space_len: usize,
    word: String,
    word_len: usize,
}

impl<'a> Wrapper<'a> {
    fn new(limit: usize, breakpoints: &'a str, indent: &'a str) -> Self {
        Self {
            limit,
            breakpoints,
            indent,
            indent_width: visible_width(indent),
            buf: String::new(),
            line_len: 0,
            line_has_content: false,
            space: String::new(),
            space_len: 0,
            word: String::new(),
            word_len: 0,
        }
    }

    fn write(&mut self, s: &str) {
        for seg in segments(s) {
            match seg {
                Segment::Escape(e) => self.word.push_str(e),
                Segment::Char('\n') => self.hard_newline(),
                Segment::Char(c) if c.is_whitespace() && c != NBSP => {
                    self.add_word();
                    self.space.push(c);
                    self.space_len += char_width(c).max(1);
                }
                Segment::Char(c) => {
                    self.word.push(c);
                    self.word_len += char_width(c);
                    if self.line_has_content
                        && self.line_len + self.space_len + self.word_len > self.limit
                    {
                        self.soft_newline();
                    }
                    if self.breakpoints.contains(c) {
                        self.add_word();
                    }
                }
            }
        }
    }

    fn finish(mut self) -> String {
        self.flush_trailing_space();
        self.add_word();
        self.buf
    }

    fn add_space(&mut self) {
        self.line_len += self.space_len;
        self.buf.push_str(&self.space);
        self.space.clear();
        self.space_len = 0;
    }

    fn add_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        self.add_space();
        self.line_len += self.word_len;
        self.buf.push_str(&self.word);
        self.line_has_content |= self.word_len > 0;
        self.word.clear();
        self.word_len = 0;
    }

    /// Keeps pending spaces at a line end when they fit, drops them otherwise.
    fn flush_trailing_space(&mut self) {
        if self.word.is_empty() {
            if self.line_len + self.space_len <= self.limit {
                self.buf.push_str(&self.space);
            }
            self.space.clear();
            self.space_len = 0;
        }
    }

    fn hard_newline(&mut self) {
        self.flush_trailing_space();
        self.add_word();
        self.buf.push('\n');
        self.line_len = 0;
        self.line_has_content = false;
    }

    fn soft_newline(&mut self) {
        self.buf.push('\n');
        self.buf.push_str(self.indent);
        self.line_len = self.indent_width;
        self.line_has_content = false;
        self.space.clear();
        self.space_len = 0;
    }
}
