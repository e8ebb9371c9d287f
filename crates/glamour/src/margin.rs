//! The margin writer chain: alignment, indentation and right padding.
//!
//! A [`MarginWriter`] is three decorators stacked over one output buffer:
//!
//! ```text
//! MarginWriter (align) -> IndentWriter (indent, pen) -> PaddingWriter (pad) -> String
//! ```
//!
//! Text written through the chain must already be wrapped. The indent writer
//! tracks which SGR style and hyperlink are open in the content so that the
//! indent of the next line can be drawn in the parent's style without
//! bleeding the content's colors into it.

use std::fmt;

use crate::ansi::{ColorProfile, Pen, Segment, char_width, segments, visible_width};
use crate::element::styled;
use crate::style::{Align, StyleBlock, StylePrimitive};

/// Lines narrower than this share of the target width are never justified.
const JUSTIFY_MIN_FILL_NUMERATOR: usize = 3;
const JUSTIFY_MIN_FILL_DENOMINATOR: usize = 5;

// ============================================================================
// Padding
// ============================================================================

/// Right-pads every completed line to a fixed visible width.
///
/// Only content written through [`fmt::Write`] (or [`PaddingWriter::push`])
/// is measured; [`PaddingWriter::push_raw`] bypasses the count.
#[derive(Debug)]
pub struct PaddingWriter<'a> {
    out: &'a mut String,
    width: usize,
    profile: ColorProfile,
    style: StylePrimitive,
    line_width: usize,
}

impl<'a> PaddingWriter<'a> {
    /// Pads lines to `width` with spaces in `style`. A width of 0 disables padding.
    pub fn new(out: &'a mut String, width: usize, profile: ColorProfile, style: StylePrimitive) -> Self {
        Self {
            out,
            width,
            profile,
            style,
            line_width: 0,
        }
    }

    /// Writes measured content.
    pub fn push(&mut self, s: &str) {
        for seg in segments(s) {
            match seg {
                Segment::Escape(e) => self.out.push_str(e),
                Segment::Char('\n') => {
                    self.pad_line();
                    self.out.push('\n');
                    self.line_width = 0;
                }
                Segment::Char(c) => {
                    self.line_width += char_width(c);
                    self.out.push(c);
                }
            }
        }
    }

    /// Writes bytes that do not count toward the line width.
    pub fn push_raw(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Pads a trailing line that has no newline yet.
    pub fn finish(&mut self) {
        if self.line_width > 0 {
            self.pad_line();
            self.line_width = 0;
        }
    }

    fn pad_line(&mut self) {
        if self.width > self.line_width {
            let fill = " ".repeat(self.width - self.line_width);
            self.out.push_str(&styled(self.profile, &self.style, &fill));
        }
    }
}

impl fmt::Write for PaddingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s);
        Ok(())
    }
}

// ============================================================================
// Indentation
// ============================================================================

/// Writes an indent at the start of every line.
///
/// State machine over `{pen, at_line_start}`: before every newline it
/// closes whatever the pen holds, so padding and indents never inherit the
/// content's style; on the first byte of the next line it writes the indent
/// and reopens the pen. Escape sequences in the content update the pen as
/// they pass.
#[derive(Debug)]
pub struct IndentWriter<'a> {
    inner: PaddingWriter<'a>,
    indent: String,
    pen: Pen,
    at_line_start: bool,
}

impl<'a> IndentWriter<'a> {
    /// Wraps `inner`, writing the pre-rendered `indent` before every line.
    pub fn new(inner: PaddingWriter<'a>, indent: impl Into<String>) -> Self {
        Self {
            inner,
            indent: indent.into(),
            pen: Pen::new(),
            at_line_start: true,
        }
    }

    /// Writes content.
    pub fn push(&mut self, s: &str) {
        for seg in segments(s) {
            if self.at_line_start {
                self.begin_line();
            }
            match seg {
                Segment::Escape(e) => {
                    self.pen.observe(e);
                    self.inner.push(e);
                }
                Segment::Char('\n') => {
                    self.inner.push_raw(&self.pen.reset_sequence());
                    self.inner.push("\n");
                    self.at_line_start = true;
                }
                Segment::Char(c) => {
                    let mut buf = [0; 4];
                    self.inner.push(c.encode_utf8(&mut buf));
                }
            }
        }
    }

    /// Closes the pen and pads the last line.
    pub fn finish(&mut self) {
        if !self.at_line_start {
            self.inner.push_raw(&self.pen.reset_sequence());
            self.inner.finish();
        }
    }

    fn begin_line(&mut self) {
        self.inner.push_raw(&self.indent);
        self.inner.push_raw(&self.pen.restore_sequence());
        self.at_line_start = false;
    }
}

impl fmt::Write for IndentWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s);
        Ok(())
    }
}

// ============================================================================
// Margin (alignment + composition)
// ============================================================================

/// Aligns, indents and pads already-wrapped block content.
///
/// Left-aligned text streams straight through. Centered and justified text
/// is buffered a line at a time; call [`MarginWriter::finish`] to flush a
/// trailing partial line.
#[derive(Debug)]
pub struct MarginWriter<'a> {
    inner: IndentWriter<'a>,
    align: Align,
    width: usize,
    line: String,
}

impl<'a> MarginWriter<'a> {
    /// Builds the chain for a block styled with `rules` whose parent is
    /// styled with `parent`, writing into `out`.
    ///
    /// `width` is the content width of the block: lines are padded to it
    /// and aligned within it. The indent is the block's left margin in
    /// spaces followed by `indent` copies of its indent token, all drawn in
    /// the parent's style.
    pub fn new(
        out: &'a mut String,
        profile: ColorProfile,
        rules: &StyleBlock,
        parent: &StylePrimitive,
        width: usize,
    ) -> Self {
        let mut indent = " ".repeat(rules.left_margin());
        indent.push_str(&rules.indent_token_or_default().repeat(rules.indent.unwrap_or(0)));
        let indent = styled(profile, parent, &indent);

        let padding = PaddingWriter::new(out, width, profile, rules.style.clone());
        Self {
            inner: IndentWriter::new(padding, indent),
            align: rules.align.unwrap_or_default(),
            width,
            line: String::new(),
        }
    }

    /// Writes content.
    pub fn push(&mut self, s: &str) {
        if self.align == Align::Left || self.width == 0 {
            self.inner.push(s);
            return;
        }
        let mut rest = s;
        while let Some(nl) = rest.find('\n') {
            self.line.push_str(&rest[..nl]);
            let line = std::mem::take(&mut self.line);
            let aligned = align_line(&line, self.width, self.align);
            self.inner.push(&aligned);
            self.inner.push("\n");
            rest = &rest[nl + 1..];
        }
        self.line.push_str(rest);
    }

    /// Flushes a buffered partial line and pads it.
    pub fn finish(mut self) {
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            let aligned = align_line(&line, self.width, self.align);
            self.inner.push(&aligned);
        }
        self.inner.finish();
    }
}

impl fmt::Write for MarginWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s);
        Ok(())
    }
}

/// Aligns one line within `width` cells.
pub fn align_line(line: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => line.to_string(),
        Align::Center => center_line(line, width),
        Align::Justify => justify_line(line, width),
    }
}

fn center_line(line: &str, width: usize) -> String {
    let visible = visible_width(line);
    if visible >= width {
        return line.to_string();
    }
    let mut out = " ".repeat((width - visible) / 2);
    out.push_str(line);
    out
}

fn justify_line(line: &str, width: usize) -> String {
    let trimmed = line.trim_end_matches(' ');
    let visible = visible_width(trimmed);
    if visible >= width || visible * JUSTIFY_MIN_FILL_DENOMINATOR < width * JUSTIFY_MIN_FILL_NUMERATOR {
        return line.to_string();
    }

    let body = trimmed.trim_start_matches(' ');
    let lead = &trimmed[..trimmed.len() - body.len()];
    let words: Vec<&str> = body.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() < 2 {
        return line.to_string();
    }

    let word_width: usize = words.iter().map(|w| visible_width(w)).sum();
    let gaps = words.len() - 1;
    let spaces = width.saturating_sub(visible_width(lead) + word_width);
    let base = spaces / gaps;
    let extra = spaces % gaps;

    let mut out = String::with_capacity(line.len() + spaces);
    out.push_str(lead);
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let gap = base + usize::from(i <= extra);
            out.push_str(&" ".repeat(gap.max(1)));
        }
        out.push_str(word);
    }
    out
}
