//! Primitive text rendering: one token plus a resolved style in, an
//! escaped string out.

use crate::ansi::ColorProfile;
use crate::error::Result;
use crate::style::StylePrimitive;
use crate::template::Template;

/// Characters that a markdown backslash escape may precede.
const ESCAPABLE: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '<', '>', '(', ')', '#', '+', '-', '.', '!', '|',
];

/// Undoes markdown backslash escapes (`\*` becomes `*`).
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if ESCAPABLE.contains(&next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Inverse of [`unescape`] for text that is already literal.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' && chars.peek().is_some_and(|n| ESCAPABLE.contains(n)) {
            out.push('\\');
        }
    }
    out
}

/// Writes `s` with the case transform and SGR attributes of `style`.
///
/// Used for structural text (prefixes, suffixes, padding); no template is
/// applied and escapes are left alone. Empty input writes nothing.
pub fn render_text(out: &mut String, profile: ColorProfile, style: &StylePrimitive, s: &str) {
    if s.is_empty() {
        return;
    }
    let sgr = style.sgr(profile);
    match style.transform {
        Some(t) => out.push_str(&sgr.paint(&t.apply(s))),
        None => out.push_str(&sgr.paint(s)),
    }
}

/// Same as [`render_text`] but returns the string.
pub fn styled(profile: ColorProfile, style: &StylePrimitive, s: &str) -> String {
    let mut out = String::new();
    render_text(&mut out, profile, style, s);
    out
}

/// A styled token with optional decorations.
///
/// Rendering writes, in order: `prefix` and `block_prefix` in the outer
/// style, the merged style's own `prefix`, the token, then the suffixes in
/// reverse.
#[derive(Debug, Clone, Copy)]
pub struct BaseElement<'a> {
    token: &'a str,
    prefix: &'a str,
    suffix: &'a str,
    style: &'a StylePrimitive,
    leaf: bool,
}

impl<'a> BaseElement<'a> {
    /// Creates an element for `token` styled with `style`.
    pub const fn new(token: &'a str, style: &'a StylePrimitive) -> Self {
        Self {
            token,
            prefix: "",
            suffix: "",
            style,
            leaf: false,
        }
    }

    /// Sets an unstyled-by-self prefix written in the outer style.
    #[must_use]
    pub const fn prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }

    /// Sets an unstyled-by-self suffix written in the outer style.
    #[must_use]
    pub const fn suffix(mut self, suffix: &'a str) -> Self {
        self.suffix = suffix;
        self
    }

    /// Marks the token as leaf source text whose markdown escapes are undone.
    #[must_use]
    pub const fn leaf(mut self) -> Self {
        self.leaf = true;
        self
    }

    /// Renders inside a block styled with `outer`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if the style's format is invalid.
    pub fn render(&self, out: &mut String, profile: ColorProfile, outer: &StylePrimitive) -> Result<()> {
        let merged = outer.cascade(self.style, false);
        self.render_with(out, profile, outer, &merged)
    }

    /// Renders with an explicit outer style and merged token style.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if the merged style's format is invalid.
    pub fn render_with(
        &self,
        out: &mut String,
        profile: ColorProfile,
        outer: &StylePrimitive,
        merged: &StylePrimitive,
    ) -> Result<()> {
        render_text(out, profile, outer, self.prefix);
        render_text(out, profile, outer, merged.block_prefix.as_deref().unwrap_or_default());
        render_text(out, profile, merged, merged.prefix.as_deref().unwrap_or_default());

        out.push_str(&render_token(profile, merged, self.token, self.leaf)?);

        render_text(out, profile, merged, merged.suffix.as_deref().unwrap_or_default());
        render_text(out, profile, outer, merged.block_suffix.as_deref().unwrap_or_default());
        render_text(out, profile, outer, self.suffix);
        Ok(())
    }
}

/// Renders the token itself: case transform, SGR, format template, and
/// (for leaf text) escape removal.
fn render_token(profile: ColorProfile, style: &StylePrimitive, token: &str, leaf: bool) -> Result<String> {
    let text = if leaf { unescape(token) } else { token.to_string() };
    let text = match style.transform {
        Some(t) => t.apply(&text),
        None => text,
    };
    let sgr = style.sgr(profile);
    let painted = sgr.paint(&text);
    match style.format.as_deref() {
        Some(format) if !format.is_empty() => {
            let template = Template::parse(format)?;
            Ok(template.expand(&painted, |literal| sgr.paint(literal)))
        }
        _ => Ok(painted),
    }
}
