#![forbid(unsafe_code)]

//! # Glamour
//!
//! Stylesheet-driven markdown rendering for ANSI terminals.
//!
//! A document tree is walked once, depth first. Every element looks up its
//! role in a [`StyleConfig`], cascades it over the enclosing block's style,
//! and writes styled text into a per-block buffer. Finished blocks are word
//! wrapped, indented and padded into their parent, so the output fits a
//! fixed wrap width with colors, OSC 8 hyperlinks and resets in place.
//!
//! ## Example
//!
//! ```rust
//! use glamour::{render, Renderer, Style};
//!
//! // One-shot render with a built-in style
//! let output = render("# Hello\n\nThis is **bold** text.", Style::Ascii).unwrap();
//! assert!(output.contains("# Hello"));
//!
//! // A configured renderer can be reused
//! let renderer = Renderer::new()
//!     .with_style(Style::Light)
//!     .with_word_wrap(60);
//! let output = renderer.render("# Heading\n\nParagraph text.").unwrap();
//! assert!(output.contains("Paragraph text."));
//! ```

pub mod ansi;
pub mod ast;
pub mod autolink;
pub mod block;
pub mod element;
pub mod emoji;
pub mod error;
pub mod highlight;
pub mod hyperlink;
pub mod link;
pub mod list;
pub mod margin;
pub mod presets;
mod render;
pub mod style;
#[cfg(feature = "syntax-highlighting")]
pub mod syntax;
pub mod table;
pub mod table_links;
pub mod template;
pub mod wordwrap;

use std::fmt;
use std::io;
use std::sync::Arc;

pub use ansi::ColorProfile;
pub use ast::{Node, NodeKind};
pub use error::{BoxError, Error, Result};
pub use highlight::Highlighter;
pub use hyperlink::TerminalInfo;
pub use link::{
    DefaultFormatter, HyperlinkFormatter, LinkContext, LinkData, LinkFormatter, SmartHyperlinkFormatter,
    TextOnlyFormatter, UrlOnlyFormatter,
};
pub use presets::{
    Style, ascii_style, available_styles, dark_style, dracula_style, light_style, notty_style, pink_style,
    tokyo_night_style,
};
pub use style::{
    Align, StyleBlock, StyleChroma, StyleCodeBlock, StyleConfig, StyleList, StylePrimitive, StyleTable, StyleTask,
    TextTransform,
};

use render::RenderContext;

const DEFAULT_WIDTH: usize = 80;

/// Environment variable naming the style used by [`Renderer::from_environment`].
pub const STYLE_ENV: &str = "GLAMOUR_STYLE";

// ============================================================================
// Renderer
// ============================================================================

/// Options for the markdown renderer.
#[derive(Clone)]
pub struct RendererOptions {
    /// Word wrap width. Zero disables wrapping.
    pub word_wrap: usize,
    /// Base URL for resolving relative links.
    pub base_url: Option<String>,
    /// Render soft line breaks as newlines.
    pub preserve_newlines: bool,
    /// Style configuration.
    pub styles: StyleConfig,
    /// Color depth of the output.
    pub color_profile: ColorProfile,
    /// Show table links in their cells instead of below the table.
    /// Always the case when a link formatter is set.
    pub inline_table_links: bool,
    /// Wrap table cells that do not fit instead of truncating them.
    pub table_wrap: bool,
    /// Custom link formatting; `None` uses the built-in text-then-URL form.
    pub link_formatter: Option<Arc<dyn LinkFormatter>>,
    /// Terminal capabilities, for hyperlink support.
    pub terminal: TerminalInfo,
    /// Code block highlighter.
    pub highlighter: Option<Arc<dyn Highlighter>>,
    /// Replace `:shortcode:` emoji in text.
    pub emoji: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            word_wrap: DEFAULT_WIDTH,
            base_url: None,
            preserve_newlines: false,
            styles: dark_style(),
            color_profile: ColorProfile::default(),
            inline_table_links: false,
            table_wrap: true,
            link_formatter: None,
            terminal: TerminalInfo::from_env(),
            highlighter: highlight::default_highlighter(),
            emoji: false,
        }
    }
}

impl fmt::Debug for RendererOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererOptions")
            .field("word_wrap", &self.word_wrap)
            .field("base_url", &self.base_url)
            .field("preserve_newlines", &self.preserve_newlines)
            .field("styles", &self.styles)
            .field("color_profile", &self.color_profile)
            .field("inline_table_links", &self.inline_table_links)
            .field("table_wrap", &self.table_wrap)
            .field("link_formatter", &self.link_formatter.is_some())
            .field("terminal", &self.terminal)
            .field("highlighter", &self.highlighter.is_some())
            .field("emoji", &self.emoji)
            .finish()
    }
}

/// Markdown renderer for terminal output.
///
/// A renderer holds only configuration; each call to [`Renderer::render`]
/// starts from fresh state, so one renderer can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RendererOptions,
}

impl Renderer {
    /// Creates a new renderer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer styled by the [`STYLE_ENV`] environment variable.
    ///
    /// The value is a built-in style name. With the `serde` feature it may
    /// also be a path to a JSON style sheet. Unset means [`Style::Auto`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStyle`] for a name that matches nothing, or
    /// the error from loading the style sheet.
    pub fn from_environment() -> Result<Self> {
        let config = match std::env::var(STYLE_ENV) {
            Ok(value) if !value.trim().is_empty() => style_from_value(&value)?,
            _ => Style::Auto.config(),
        };
        Ok(Self::new().with_style_config(config))
    }

    /// Returns the renderer's options.
    pub const fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Sets the style for rendering.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.options.styles = style.config();
        self
    }

    /// Sets a custom style configuration.
    #[must_use]
    pub fn with_style_config(mut self, config: StyleConfig) -> Self {
        self.options.styles = config;
        self
    }

    /// Loads the style configuration from a JSON style sheet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::StyleSheet`] if it is not a valid style sheet.
    #[cfg(feature = "serde")]
    pub fn with_style_path(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(self.with_style_config(StyleConfig::from_json(&json)?))
    }

    /// Sets the word wrap width. Zero disables wrapping.
    #[must_use]
    pub const fn with_word_wrap(mut self, width: usize) -> Self {
        self.options.word_wrap = width;
        self
    }

    /// Sets the base URL for resolving relative links.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.options.base_url = Some(url.into());
        self
    }

    /// Sets whether soft line breaks are kept as newlines.
    #[must_use]
    pub const fn with_preserved_newlines(mut self, preserve: bool) -> Self {
        self.options.preserve_newlines = preserve;
        self
    }

    /// Sets the color depth of the output.
    #[must_use]
    pub const fn with_color_profile(mut self, profile: ColorProfile) -> Self {
        self.options.color_profile = profile;
        self
    }

    /// Shows table links in their cells instead of listing them below.
    #[must_use]
    pub const fn with_inline_table_links(mut self, inline: bool) -> Self {
        self.options.inline_table_links = inline;
        self
    }

    /// Sets whether table cells wrap (true) or truncate (false).
    #[must_use]
    pub const fn with_table_wrap(mut self, wrap: bool) -> Self {
        self.options.table_wrap = wrap;
        self
    }

    /// Sets the link formatter.
    #[must_use]
    pub fn with_link_formatter(mut self, formatter: impl LinkFormatter + 'static) -> Self {
        self.options.link_formatter = Some(Arc::new(formatter));
        self
    }

    /// Shows only the text of links.
    #[must_use]
    pub fn with_text_only_links(self) -> Self {
        self.with_link_formatter(TextOnlyFormatter)
    }

    /// Shows only the URL of links.
    #[must_use]
    pub fn with_url_only_links(self) -> Self {
        self.with_link_formatter(UrlOnlyFormatter)
    }

    /// Renders links as OSC 8 hyperlinks.
    #[must_use]
    pub fn with_hyperlinks(self) -> Self {
        self.with_link_formatter(HyperlinkFormatter)
    }

    /// Renders OSC 8 hyperlinks where the terminal supports them and falls
    /// back to text and URL elsewhere.
    #[must_use]
    pub fn with_smart_hyperlinks(self) -> Self {
        self.with_link_formatter(SmartHyperlinkFormatter)
    }

    /// Overrides the detected terminal capabilities.
    #[must_use]
    pub fn with_terminal(mut self, terminal: TerminalInfo) -> Self {
        self.options.terminal = terminal;
        self
    }

    /// Sets the code block highlighter; `None` turns highlighting off.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Option<Arc<dyn Highlighter>>) -> Self {
        self.options.highlighter = highlighter;
        self
    }

    /// Replaces `:shortcode:` emoji such as `:tada:` with the emoji itself.
    #[must_use]
    pub const fn with_emoji(mut self) -> Self {
        self.options.emoji = true;
        self
    }

    /// Sets left and right margins on paragraphs and headings.
    #[must_use]
    pub fn with_margins(mut self, left: usize, right: usize) -> Self {
        self.options.styles.apply_layout(left, right, None);
        self
    }

    /// Centers paragraphs and headings between the given margins.
    #[must_use]
    pub fn with_center_alignment(mut self, left: usize, right: usize) -> Self {
        self.options.styles.apply_layout(left, right, Some(Align::Center));
        self
    }

    /// Justifies paragraphs and headings between the given margins.
    #[must_use]
    pub fn with_justified_alignment(mut self, left: usize, right: usize) -> Self {
        self.options.styles.apply_layout(left, right, Some(Align::Justify));
        self
    }

    /// Renders markdown to styled terminal output.
    ///
    /// # Errors
    ///
    /// Returns an error if a style's format template is invalid, or if the
    /// link formatter or the highlighter fails.
    pub fn render(&self, markdown: &str) -> Result<String> {
        let mut document = Node::parse(markdown);
        if self.options.emoji {
            emoji::expand(&mut document);
        }
        self.render_document(&document)
    }

    /// Renders an already-built document tree.
    ///
    /// The tree is rendered as given; run [`emoji::expand`] on it first
    /// for shortcode emoji.
    ///
    /// # Errors
    ///
    /// Same as [`Renderer::render`].
    pub fn render_document(&self, document: &Node) -> Result<String> {
        tracing::debug!(
            width = self.options.word_wrap,
            profile = ?self.options.color_profile,
            "rendering document"
        );
        let out = RenderContext::new(&self.options).render(document)?;
        tracing::debug!(bytes = out.len(), "rendered document");
        Ok(out)
    }

    /// Renders markdown bytes to styled terminal output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Utf8`] if `markdown` is not valid UTF-8, otherwise
    /// the same errors as [`Renderer::render`].
    pub fn render_bytes(&self, markdown: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(markdown)?;
        self.render(text)
    }

    /// Renders markdown straight into `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails, otherwise the same errors as
    /// [`Renderer::render`].
    pub fn render_to(&self, markdown: &str, mut writer: impl io::Write) -> Result<()> {
        let out = self.render(markdown)?;
        writer.write_all(out.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Resolves a [`STYLE_ENV`] value to a style configuration.
fn style_from_value(value: &str) -> Result<StyleConfig> {
    if let Some(style) = Style::from_name(value) {
        return Ok(style.config());
    }
    #[cfg(feature = "serde")]
    {
        let path = std::path::Path::new(value.trim());
        if path.is_file() {
            let json = std::fs::read_to_string(path)?;
            return StyleConfig::from_json(&json);
        }
    }
    Err(Error::UnknownStyle(value.to_string()))
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Renders markdown with the specified style.
///
/// # Errors
///
/// Same as [`Renderer::render`].
pub fn render(markdown: &str, style: Style) -> Result<String> {
    Renderer::new().with_style(style).render(markdown)
}

/// Renders markdown with the style named by [`STYLE_ENV`].
///
/// # Errors
///
/// Same as [`Renderer::from_environment`] and [`Renderer::render`].
pub fn render_with_environment_config(markdown: &str) -> Result<String> {
    Renderer::from_environment()?.render(markdown)
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        ColorProfile, Error, LinkFormatter, Node, Renderer, RendererOptions, Result, Style, StyleBlock,
        StyleCodeBlock, StyleConfig, StyleList, StylePrimitive, StyleTable, StyleTask, TerminalInfo, ascii_style,
        available_styles, dark_style, light_style, pink_style, render, render_with_environment_config,
    };
}

// ============================================================================
// Tests
// ============================================================================
