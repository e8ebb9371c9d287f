//! List wrapping with hanging indents.
//!
//! Each line of a rendered list is checked for a leading item marker. When
//! one is found only the text after the marker is wrapped, and every
//! continuation line is indented to sit under the first character of the
//! item body instead of under the marker.

use crate::ansi::{Segment, char_width, segments, strip_ansi, visible_width};
use crate::wordwrap::{DEFAULT_BREAKPOINTS, wordwrap};

/// Below this body width the wrapper falls back to a fixed floor.
const MIN_BODY_WIDTH: usize = 10;

const BULLETS: &[&str] = &[
    "• ", "◦ ", "▪ ", "▸ ", "‣ ", "⁃ ", "⁌ ", "⁍ ", "* ", "- ", "+ ",
];
const TASK_BOXES: &[&str] = &["[✓] ", "[ ] ", "[x] ", "[X] "];
const TASK_GLYPHS: &[&str] = &["✓ ", "✗ ", "☑ ", "☐ "];

/// A list item marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    /// Spaces before the marker.
    pub leading_spaces: usize,
    /// Visible width of the marker, including its trailing space.
    pub width: usize,
    /// Length of the marker in characters.
    pub chars: usize,
}

impl ListMarker {
    /// Width of the hanging indent for continuation lines.
    pub const fn hanging_indent(&self) -> usize {
        self.leading_spaces + self.width
    }
}

/// Looks for an item marker at the start of a plain (escape-free) line.
pub fn detect_list_marker(plain: &str) -> Option<ListMarker> {
    let trimmed = plain.trim_start_matches(' ');
    if trimmed.is_empty() {
        return None;
    }
    let leading_spaces = plain.len() - trimmed.len();

    let marker = BULLETS
        .iter()
        .chain(TASK_BOXES)
        .chain(TASK_GLYPHS)
        .find(|m| trimmed.starts_with(**m))
        .map(|m| (*m).to_string())
        .or_else(|| numbered_marker(trimmed))?;

    Some(ListMarker {
        leading_spaces,
        width: visible_width(&marker),
        chars: marker.chars().count(),
    })
}

/// Matches one to three digits, a dot, and one whitespace character.
fn numbered_marker(s: &str) -> Option<String> {
    let digits = s.chars().take_while(char::is_ascii_digit).count();
    if !(1..=3).contains(&digits) {
        return None;
    }
    let mut rest = s[digits..].chars();
    match (rest.next(), rest.next()) {
        (Some('.'), Some(ws)) if ws.is_whitespace() => {
            let mut marker = s[..digits].to_string();
            marker.push('.');
            marker.push(ws);
            Some(marker)
        }
        _ => None,
    }
}

/// Wraps rendered list content at `width`, giving item lines hanging indents.
///
/// Blank lines pass through. Lines without a marker are word-wrapped as
/// plain text. A `width` of zero disables wrapping.
pub fn wrap_list_content(content: &str, width: usize) -> String {
    if width == 0 {
        return content.to_string();
    }
    let lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                return line.to_string();
            }
            match detect_list_marker(&strip_ansi(line)) {
                Some(marker) => wrap_list_item(line, width, marker),
                None => wordwrap(line, width, DEFAULT_BREAKPOINTS),
            }
        })
        .collect();
    lines.join("\n")
}

/// Wraps one item line whose marker has already been detected.
pub fn wrap_list_item(line: &str, width: usize, marker: ListMarker) -> String {
    let mut body_width = width.saturating_sub(marker.hanging_indent());
    if body_width < MIN_BODY_WIDTH {
        body_width = MIN_BODY_WIDTH.min((width / 2).max(5));
    }

    let (head, body) = split_at_plain_text_position(line, marker.leading_spaces + marker.chars);
    let wrapped = wordwrap(body, body_width, DEFAULT_BREAKPOINTS);
    let hanging = " ".repeat(marker.hanging_indent());

    let mut out = String::with_capacity(line.len() + hanging.len());
    out.push_str(head);
    let mut body_lines = wrapped.split('\n');
    if let Some(first) = body_lines.next() {
        out.push_str(first);
    }
    for continuation in body_lines.filter(|l| !l.trim().is_empty()) {
        out.push('\n');
        out.push_str(&hanging);
        out.push_str(continuation);
    }
    out
}

/// Splits `s` after `offset` visible characters of its plain text.
///
/// Escape sequences are never cut: one that sits before the split point
/// goes to the first half, one that sits right at it goes to the second.
///
/// ```rust
/// use glamour::list::split_at_plain_text_position;
///
/// let (a, b) = split_at_plain_text_position("\x1b[1m• \x1b[mitem", 2);
/// assert_eq!(a, "\x1b[1m• ");
/// assert_eq!(b, "\x1b[mitem");
/// ```
pub fn split_at_plain_text_position(s: &str, offset: usize) -> (&str, &str) {
    if offset == 0 {
        return ("", s);
    }
    let mut seen = 0;
    let mut consumed = 0;
    for seg in segments(s) {
        if seen == offset {
            break;
        }
        match seg {
            Segment::Escape(e) => consumed += e.len(),
            Segment::Char(c) => {
                consumed += c.len_utf8();
                seen += 1;
            }
        }
    }
    s.split_at(consumed)
}

/// Visible width of the leading whitespace of `line`.
pub fn leading_width(line: &str) -> usize {
    strip_ansi(line)
        .chars()
        .take_while(|c| *c == ' ')
        .map(char_width)
        .sum()
}
