//! Pluggable link formatting.
//!
//! Every link, autolink and image is handed to a [`LinkFormatter`] together
//! with the context it appears in. The built-in strategies cover the common
//! terminal setups; closures work too:
//!
//! ```rust
//! use glamour::link::{LinkContext, LinkData};
//! use glamour::{BoxError, Renderer};
//!
//! let renderer = Renderer::new().with_link_formatter(
//!     |data: &LinkData, _ctx: &LinkContext<'_>| -> Result<String, BoxError> {
//!         Ok(format!("<{}>", data.url))
//!     },
//! );
//! let out = renderer.render("[docs](https://example.com)").unwrap();
//! assert!(out.contains("<https://example.com>"));
//! ```

use crate::ansi::{ColorProfile, Segment, segments};
use crate::element::BaseElement;
use crate::error::{BoxError, Result};
use crate::hyperlink::{TerminalInfo, format_hyperlink, is_fragment_only, resolve_url};
use crate::style::StylePrimitive;

/// Everything known about one link at the point it is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkData {
    /// Destination as written in the document.
    pub url: String,
    /// Plain text of the link's children (alt text for images).
    pub text: String,
    /// Optional title.
    pub title: String,
    /// Whether the link is an autolink (`<https://...>` or a bare URL).
    pub is_auto_link: bool,
    /// Whether the link sits inside a table cell.
    pub is_in_table: bool,
    /// Whether the link is an image.
    pub is_image: bool,
    /// Style for the URL part.
    pub link_style: StylePrimitive,
    /// Style for the text part.
    pub text_style: StylePrimitive,
}

/// Render state passed to formatters.
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<'a> {
    /// Target color profile.
    pub profile: ColorProfile,
    /// Terminal capability signals.
    pub terminal: &'a TerminalInfo,
    /// Base URL for relative links.
    pub base_url: Option<&'a str>,
    /// Style of the enclosing block.
    pub block_style: &'a StylePrimitive,
}

impl LinkContext<'_> {
    /// Resolves `url` against the base URL.
    pub fn resolve(&self, url: &str) -> String {
        resolve_url(self.base_url, url)
    }

    /// Styles `text` the way the renderer styles a plain token.
    ///
    /// Empty text, and text that already carries escape sequences, come
    /// back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if `style` has an invalid format.
    pub fn apply_style(&self, text: &str, style: &StylePrimitive) -> Result<String> {
        if text.is_empty() || has_escapes(text) {
            return Ok(text.to_string());
        }
        let mut out = String::new();
        BaseElement::new(text, style).render(&mut out, self.profile, self.block_style)?;
        Ok(out)
    }
}

fn has_escapes(s: &str) -> bool {
    segments(s).any(|seg| matches!(seg, Segment::Escape(_)))
}

/// Turns a link into its rendered form.
pub trait LinkFormatter: Send + Sync {
    /// Formats one link.
    ///
    /// # Errors
    ///
    /// Any error is reported to the caller of the render, tagged with the
    /// link's URL.
    fn format_link(&self, data: &LinkData, ctx: &LinkContext<'_>) -> Result<String, BoxError>;
}

impl<F> LinkFormatter for F
where
    F: Fn(&LinkData, &LinkContext<'_>) -> Result<String, BoxError> + Send + Sync,
{
    fn format_link(&self, data: &LinkData, ctx: &LinkContext<'_>) -> Result<String, BoxError> {
        self(data, ctx)
    }
}

/// Text, a space, then the URL. Same-document anchors show the text only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl LinkFormatter for DefaultFormatter {
    fn format_link(&self, data: &LinkData, ctx: &LinkContext<'_>) -> Result<String, BoxError> {
        let mut out = ctx.apply_style(&data.text, &data.text_style)?;
        if !data.url.is_empty() && !is_fragment_only(&data.url) {
            if !data.text.is_empty() {
                out.push(' ');
            }
            out.push_str(&ctx.apply_style(&ctx.resolve(&data.url), &data.link_style)?);
        }
        Ok(out)
    }
}

/// Text only. The text becomes clickable on terminals that support it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOnlyFormatter;

impl LinkFormatter for TextOnlyFormatter {
    fn format_link(&self, data: &LinkData, ctx: &LinkContext<'_>) -> Result<String, BoxError> {
        if data.text.is_empty() {
            return Ok(String::new());
        }
        let text = ctx.apply_style(&data.text, &data.text_style)?;
        if ctx.terminal.supports_hyperlinks() {
            return Ok(format_hyperlink(&text, &ctx.resolve(&data.url)));
        }
        Ok(text)
    }
}

/// URL only. Same-document anchors render nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlOnlyFormatter;

impl LinkFormatter for UrlOnlyFormatter {
    fn format_link(&self, data: &LinkData, ctx: &LinkContext<'_>) -> Result<String, BoxError> {
        if data.url.is_empty() || is_fragment_only(&data.url) {
            return Ok(String::new());
        }
        Ok(ctx.apply_style(&ctx.resolve(&data.url), &data.link_style)?)
    }
}

/// Always an OSC 8 link around the text, whatever the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyperlinkFormatter;

impl LinkFormatter for HyperlinkFormatter {
    fn format_link(&self, data: &LinkData, ctx: &LinkContext<'_>) -> Result<String, BoxError> {
        if data.text.is_empty() {
            return Ok(String::new());
        }
        let text = ctx.apply_style(&data.text, &data.text_style)?;
        Ok(format_hyperlink(&text, &ctx.resolve(&data.url)))
    }
}

/// [`HyperlinkFormatter`] when the terminal supports links,
/// [`DefaultFormatter`] otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartHyperlinkFormatter;

impl LinkFormatter for SmartHyperlinkFormatter {
    fn format_link(&self, data: &LinkData, ctx: &LinkContext<'_>) -> Result<String, BoxError> {
        if ctx.terminal.supports_hyperlinks() {
            HyperlinkFormatter.format_link(data, ctx)
        } else {
            DefaultFormatter.format_link(data, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;

    fn data(text: &str, url: &str) -> LinkData {
        LinkData {
            url: url.to_string(),
            text: text.to_string(),
            ..LinkData::default()
        }
    }

    fn run(formatter: &dyn LinkFormatter, data: &LinkData, terminal: &TerminalInfo) -> String {
        let block = StylePrimitive::new();
        let ctx = LinkContext {
            profile: ColorProfile::TrueColor,
            terminal,
            base_url: None,
            block_style: &block,
        };
        formatter.format_link(data, &ctx).unwrap()
    }

    #[test]
    fn test_default_formatter() {
        let plain = TerminalInfo::default();
        assert_eq!(run(&DefaultFormatter, &data("docs", "https://x.io"), &plain), "docs https://x.io");
        assert_eq!(run(&DefaultFormatter, &data("top", "#top"), &plain), "top");
        assert_eq!(run(&DefaultFormatter, &data("", "https://x.io"), &plain), "https://x.io");
    }

    #[test]
    fn test_default_formatter_styles_parts() {
        let mut link = data("docs", "https://x.io");
        link.text_style = StylePrimitive::new().bold(true);
        link.link_style = StylePrimitive::new().underline(true);
        let out = run(&DefaultFormatter, &link, &TerminalInfo::default());
        assert_eq!(out, "\x1b[1mdocs\x1b[m \x1b[4mhttps://x.io\x1b[m");
    }

    #[test]
    fn test_text_only() {
        let link = data("docs", "https://x.io");
        assert_eq!(run(&TextOnlyFormatter, &link, &TerminalInfo::default()), "docs");
        let iterm = TerminalInfo::default().term_program("iTerm.app");
        let out = run(&TextOnlyFormatter, &link, &iterm);
        assert_eq!(out, "\x1b]8;;https://x.io\x1b\\docs\x1b]8;;\x1b\\");
    }

    #[test]
    fn test_url_only_suppresses_fragments() {
        let plain = TerminalInfo::default();
        assert_eq!(run(&UrlOnlyFormatter, &data("docs", "https://x.io"), &plain), "https://x.io");
        assert_eq!(run(&UrlOnlyFormatter, &data("top", "#top"), &plain), "");
    }

    #[test]
    fn test_hyperlink_always_wraps() {
        let out = run(&HyperlinkFormatter, &data("docs", "https://x.io"), &TerminalInfo::default());
        assert_eq!(strip_ansi(&out), "docs");
        assert!(out.starts_with("\x1b]8;;https://x.io"));
    }

    #[test]
    fn test_smart_falls_back() {
        let link = data("docs", "https://x.io");
        assert_eq!(run(&SmartHyperlinkFormatter, &link, &TerminalInfo::default()), "docs https://x.io");
        let kitty = TerminalInfo::default().term("xterm-kitty");
        assert_eq!(
            run(&SmartHyperlinkFormatter, &link, &kitty),
            run(&HyperlinkFormatter, &link, &kitty)
        );
    }

    #[test]
    fn test_closure_formatter() {
        let f = |d: &LinkData, _: &LinkContext<'_>| -> Result<String, BoxError> { Ok(d.url.to_uppercase()) };
        assert_eq!(run(&f, &data("x", "abc"), &TerminalInfo::default()), "ABC");
    }

    #[test]
    fn test_apply_style_leaves_escaped_text() {
        let block = StylePrimitive::new();
        let terminal = TerminalInfo::default();
        let ctx = LinkContext {
            profile: ColorProfile::TrueColor,
            terminal: &terminal,
            base_url: Some("https://x.io/docs/"),
            block_style: &block,
        };
        let bold = StylePrimitive::new().bold(true);
        assert_eq!(ctx.apply_style("\x1b[3mx\x1b[m", &bold).unwrap(), "\x1b[3mx\x1b[m");
        assert_eq!(ctx.resolve("a.md"), "https://x.io/docs/a.md");
    }
}
