//! Escape sequence primitives.
//!
//! Everything the engine emits goes through this module: SGR attribute and
//! color sequences, OSC 8 hyperlinks, and the escape-aware measuring helpers
//! used by the wrapping and padding writers.
//!
//! # Example
//!
//! ```rust
//! use glamour::ansi::{strip_ansi, visible_width, ColorProfile, Sgr};
//!
//! let sgr = Sgr::new(ColorProfile::Ansi256).foreground("228").bold();
//! let styled = sgr.paint("hello");
//! assert_eq!(styled, "\x1b[38;5;228;1mhello\x1b[m");
//! assert_eq!(strip_ansi(&styled), "hello");
//! assert_eq!(visible_width(&styled), 5);
//! ```

use unicode_width::UnicodeWidthChar;

/// Resets every SGR attribute.
pub const RESET: &str = "\x1b[m";

/// Closes the currently open OSC 8 hyperlink.
pub const HYPERLINK_RESET: &str = "\x1b]8;;\x1b\\";

const ESC: char = '\x1b';
const BEL: char = '\x07';

// ============================================================================
// Color Profiles
// ============================================================================

/// Color profile indicating terminal color capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorProfile {
    /// No color support. Text attributes are still emitted.
    Ascii,
    /// 16 ANSI colors (4-bit).
    Ansi,
    /// 256 colors (8-bit).
    Ansi256,
    /// True color / 16 million colors (24-bit).
    #[default]
    TrueColor,
}

impl ColorProfile {
    /// Returns true if this profile can show any color at all.
    pub const fn has_color(self) -> bool {
        !matches!(self, Self::Ascii)
    }
}

/// A color value parsed from a style sheet string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// An ANSI palette index (`"0"` to `"255"`).
    Indexed(u8),
    /// A 24-bit color (`"#rrggbb"` or `"#rgb"`).
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parses an ANSI index or a hex color.
    ///
    /// Returns `None` for anything else; an unparseable color in a style
    /// sheet is ignored rather than treated as an error.
    pub fn parse(s: &str) -> Option<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(hex) = raw.strip_prefix('#') {
            return parse_hex(hex);
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            return raw.parse::<u8>().ok().map(Self::Indexed);
        }
        None
    }

    /// Returns the RGB value of this color.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Rgb(r, g, b) => (r, g, b),
            Self::Indexed(n) => ansi256_to_rgb(n),
        }
    }

    fn sgr_params(self, profile: ColorProfile, background: bool) -> Option<String> {
        let base = if background { 48 } else { 38 };
        match (profile, self) {
            (ColorProfile::Ascii, _) => None,
            (ColorProfile::TrueColor, Self::Rgb(r, g, b)) => {
                Some(format!("{base};2;{r};{g};{b}"))
            }
            (ColorProfile::TrueColor | ColorProfile::Ansi256, Self::Indexed(n)) => {
                Some(format!("{base};5;{n}"))
            }
            (ColorProfile::Ansi256, Self::Rgb(r, g, b)) => {
                Some(format!("{base};5;{}", rgb_to_ansi256(r, g, b)))
            }
            (ColorProfile::Ansi, color) => {
                let n = match color {
                    Self::Indexed(n) if n < 16 => n,
                    other => {
                        let (r, g, b) = other.to_rgb();
                        rgb_to_ansi16(r, g, b)
                    }
                };
                let offset = if background { 10 } else { 0 };
                if n < 8 {
                    Some((30 + offset + u16::from(n)).to_string())
                } else {
                    Some((90 + offset + u16::from(n) - 8).to_string())
                }
            }
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Converts RGB to the closest ANSI 256 palette index.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return ((f64::from(r) - 8.0) / 247.0 * 24.0).round() as u8 + 232;
    }

    let r_idx = (f64::from(r) / 255.0 * 5.0).round() as u8;
    let g_idx = (f64::from(g) / 255.0 * 5.0).round() as u8;
    let b_idx = (f64::from(b) / 255.0 * 5.0).round() as u8;

    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Converts an ANSI 256 palette index to RGB.
pub const fn ansi256_to_rgb(n: u8) -> (u8, u8, u8) {
    if n < 16 {
        return ANSI_COLORS[n as usize];
    }
    if n >= 232 {
        let gray = (n - 232) * 10 + 8;
        return (gray, gray, gray);
    }
    let n = n - 16;
    ((n / 36) * 51, ((n % 36) / 6) * 51, (n % 6) * 51)
}

/// Converts RGB to the closest of the 16 basic ANSI colors.
#[allow(clippy::cast_possible_truncation)]
pub fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0u8;
    let mut best_dist = u32::MAX;

    for (i, &(ar, ag, ab)) in ANSI_COLORS.iter().enumerate() {
        let dr = (i32::from(r) - i32::from(ar)).unsigned_abs();
        let dg = (i32::from(g) - i32::from(ag)).unsigned_abs();
        let db = (i32::from(b) - i32::from(ab)).unsigned_abs();
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i as u8;
        }
    }

    best
}

const ANSI_COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

// ============================================================================
// SGR Builder
// ============================================================================

/// Accumulates SGR parameters and renders them as one escape sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sgr {
    profile: ColorProfile,
    params: Vec<String>,
}

impl Sgr {
    /// Creates an empty builder for the given profile.
    pub const fn new(profile: ColorProfile) -> Self {
        Self {
            profile,
            params: Vec::new(),
        }
    }

    /// Sets the foreground color. Unparseable colors are ignored.
    #[must_use]
    pub fn foreground(mut self, color: &str) -> Self {
        if let Some(p) = Color::parse(color).and_then(|c| c.sgr_params(self.profile, false)) {
            self.params.push(p);
        }
        self
    }

    /// Sets the background color. Unparseable colors are ignored.
    #[must_use]
    pub fn background(mut self, color: &str) -> Self {
        if let Some(p) = Color::parse(color).and_then(|c| c.sgr_params(self.profile, true)) {
            self.params.push(p);
        }
        self
    }

    /// Adds a raw attribute code such as `1` for bold.
    #[must_use]
    pub fn attr(mut self, code: u8) -> Self {
        self.params.push(code.to_string());
        self
    }

    /// Bold (`1`).
    #[must_use]
    pub fn bold(self) -> Self {
        self.attr(1)
    }

    /// Returns true if no parameters were added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the opening escape sequence, or an empty string.
    pub fn sequence(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        format!("\x1b[{}m", self.params.join(";"))
    }

    /// Wraps `s` in this style followed by a reset.
    ///
    /// Empty input and empty styles pass through unchanged.
    pub fn paint(&self, s: &str) -> String {
        if s.is_empty() || self.params.is_empty() {
            return s.to_string();
        }
        let mut out = self.sequence();
        out.push_str(s);
        out.push_str(RESET);
        out
    }
}

// ============================================================================
// OSC 8 Hyperlinks
// ============================================================================

/// Returns the OSC 8 sequence that opens a hyperlink to `url`.
pub fn hyperlink_start(url: &str, params: &str) -> String {
    format!("\x1b]8;{params};{url}\x1b\\")
}

/// Wraps `text` in an OSC 8 hyperlink to `url`.
pub fn hyperlink(text: &str, url: &str) -> String {
    let mut out = hyperlink_start(url, "");
    out.push_str(text);
    out.push_str(HYPERLINK_RESET);
    out
}

// ============================================================================
// Escape-aware scanning
// ============================================================================

/// One piece of a string that may contain escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A complete escape sequence (CSI, OSC or a two-byte escape).
    Escape(&'a str),
    /// A printable (or at least non-escape) character.
    Char(char),
}

/// Iterator over the [`Segment`]s of a string.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
}

/// Splits `s` into escape sequences and characters.
pub const fn segments(s: &str) -> Segments<'_> {
    Segments { rest: s }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.rest.chars().next()?;
        if c != ESC {
            self.rest = &self.rest[c.len_utf8()..];
            return Some(Segment::Char(c));
        }
        let len = escape_len(self.rest);
        let (seq, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(Segment::Escape(seq))
    }
}

/// Byte length of the escape sequence at the start of `s` (which starts with ESC).
fn escape_len(s: &str) -> usize {
    let mut chars = s.char_indices().skip(1);
    match chars.next() {
        Some((_, '[')) => {
            for (i, c) in chars {
                if ('@'..='~').contains(&c) {
                    return i + c.len_utf8();
                }
            }
            s.len()
        }
        Some((_, ']')) => {
            let mut prev_esc = false;
            for (i, c) in chars {
                if c == BEL || (prev_esc && c == '\\') {
                    return i + c.len_utf8();
                }
                prev_esc = c == ESC;
            }
            s.len()
        }
        Some((i, c)) => i + c.len_utf8(),
        None => s.len(),
    }
}

/// Display width of one character; control characters count as zero.
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Removes every escape sequence from `s`.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for seg in segments(s) {
        if let Segment::Char(c) = seg {
            out.push(c);
        }
    }
    out
}

/// Visible width of `s` in terminal cells, ignoring escape sequences.
///
/// For multi-line input this is the width of the widest line.
pub fn visible_width(s: &str) -> usize {
    let mut widest = 0;
    let mut current = 0;
    for seg in segments(s) {
        match seg {
            Segment::Char('\n') => {
                widest = widest.max(current);
                current = 0;
            }
            Segment::Char(c) => current += char_width(c),
            Segment::Escape(_) => {}
        }
    }
    widest.max(current)
}

/// Truncates `s` to at most `max` visible cells, appending `tail` when cut.
///
/// Escape sequences are kept intact. The tail counts toward `max`.
pub fn truncate(s: &str, max: usize, tail: &str) -> String {
    if visible_width(s) <= max {
        return s.to_string();
    }
    let tail_width = visible_width(tail);
    let budget = max.saturating_sub(tail_width);
    let mut out = String::with_capacity(s.len());
    let mut used = 0;
    let mut cut = false;
    for seg in segments(s) {
        match seg {
            Segment::Escape(e) => out.push_str(e),
            Segment::Char(c) => {
                if cut {
                    continue;
                }
                let w = char_width(c);
                if used + w > budget {
                    cut = true;
                    continue;
                }
                used += w;
                out.push(c);
            }
        }
    }
    if tail_width <= max {
        out.push_str(tail);
    }
    out
}

// ============================================================================
// Pen state
// ============================================================================

/// Tracks the SGR style and hyperlink that are active at the end of the
/// bytes observed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pen {
    style: String,
    link: Option<String>,
}

impl Pen {
    /// Creates a pen with nothing active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the pen with an escape sequence that passed through.
    pub fn observe(&mut self, seq: &str) {
        if let Some(params) = seq.strip_prefix("\x1b[").and_then(|s| s.strip_suffix('m')) {
            if params.is_empty() || params == "0" {
                self.style.clear();
            } else if let Some(rest) = params.strip_prefix("0;") {
                self.style.clear();
                self.style.push_str(&format!("\x1b[{rest}m"));
            } else {
                self.style.push_str(seq);
            }
            return;
        }
        if let Some(body) = seq.strip_prefix("\x1b]8;") {
            let body = body
                .strip_suffix("\x1b\\")
                .or_else(|| body.strip_suffix(BEL))
                .unwrap_or(body);
            let url = body.split_once(';').map_or("", |(_, url)| url);
            self.link = if url.is_empty() {
                None
            } else {
                Some(seq.to_string())
            };
        }
    }

    /// Returns true if neither a style nor a hyperlink is active.
    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.link.is_none()
    }

    /// Sequence that closes whatever is active.
    pub fn reset_sequence(&self) -> String {
        let mut out = String::new();
        if !self.style.is_empty() {
            out.push_str(RESET);
        }
        if self.link.is_some() {
            out.push_str(HYPERLINK_RESET);
        }
        out
    }

    /// Sequence that reopens whatever was active.
    pub fn restore_sequence(&self) -> String {
        let mut out = self.style.clone();
        if let Some(link) = &self.link {
            out.push_str(link);
        }
        out
    }
}
