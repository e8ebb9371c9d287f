//! GitHub-style `:shortcode:` emoji.
//!
//! Shortcodes are looked up in the `emojis` table. Unknown codes, and
//! colons that do not close a code, are left as written.

use crate::ast::{Node, NodeKind};
use crate::element::{escape, unescape};

/// Replaces every known `:shortcode:` in `text` with its emoji.
///
/// ```rust
/// use glamour::emoji::replace_shortcodes;
///
/// assert_eq!(replace_shortcodes("ship it :rocket:"), "ship it 🚀");
/// assert_eq!(replace_shortcodes("at 10:30:00"), "at 10:30:00");
/// ```
pub fn replace_shortcodes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let found = tail
            .find(|c: char| !is_shortcode_char(c))
            .filter(|&len| len > 0 && tail[len..].starts_with(':'))
            .and_then(|len| emojis::get_by_shortcode(&tail[..len]).map(|emoji| (len, emoji)));
        match found {
            Some((len, emoji)) => {
                out.push_str(emoji.as_str());
                rest = &tail[len + 1..];
            }
            None => {
                out.push(':');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

const fn is_shortcode_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')
}

/// Expands shortcodes in every text node of `node`.
///
/// Code spans, code blocks and raw HTML are not text nodes and keep their
/// colons.
pub fn expand(node: &mut Node) {
    if let NodeKind::Text(text) = &mut node.kind {
        if text.contains(':') {
            let replaced = replace_shortcodes(&unescape(text));
            *text = escape(&replaced);
        }
    }
    for child in &mut node.children {
        expand(child);
    }
}
