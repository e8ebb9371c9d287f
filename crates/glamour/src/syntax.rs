//! Code block highlighting with [syntect](https://crates.io/crates/syntect).
//!
//! ```rust
//! use glamour::ansi::{ColorProfile, strip_ansi};
//! use glamour::highlight::Highlighter;
//! use glamour::syntax::SyntectHighlighter;
//!
//! let code = "fn main() {}\n";
//! let out = SyntectHighlighter::new()
//!     .highlight(code, "rs", "base16-ocean.dark", ColorProfile::TrueColor)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(strip_ansi(&out), code);
//! ```

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{
    Color as ThemeColor, FontStyle, ScopeSelectors, Style, StyleModifier, Theme, ThemeItem, ThemeSet,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::ansi::{Color, ColorProfile, Sgr};
use crate::error::BoxError;
use crate::highlight::{Highlighter, registered_theme};
use crate::style::{StyleChroma, StylePrimitive};

/// Syntax definitions, loaded on first use.
pub static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// syntect's bundled themes, loaded on first use.
pub static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Theme used when a name matches neither a palette nor a bundled theme.
pub const FALLBACK_THEME: &str = "base16-ocean.dark";

const PLAIN_TEXT: &str = "Plain Text";

/// Fallback foreground for palettes without a text color.
const PALETTE_TEXT: ThemeColor = ThemeColor {
    r: 0xC4,
    g: 0xC4,
    b: 0xC4,
    a: 0xFF,
};

/// Maps code fence languages to syntect syntaxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    /// Creates a detector.
    pub const fn new() -> Self {
        Self
    }

    /// Finds the syntax for a fence language: by name or extension, then by
    /// a known alias. Unknown languages get the plain text syntax.
    pub fn detect(&self, lang: &str) -> &'static SyntaxReference {
        let lang = lang.trim().to_lowercase();
        if lang.is_empty() {
            return SYNTAX_SET.find_syntax_plain_text();
        }
        SYNTAX_SET
            .find_syntax_by_token(&lang)
            .or_else(|| SYNTAX_SET.find_syntax_by_token(resolve_alias(&lang)))
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(&lang))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
    }

    /// Returns true if `lang` resolves to something other than plain text.
    pub fn is_supported(&self, lang: &str) -> bool {
        self.detect(lang).name != PLAIN_TEXT
    }

    /// Number of bundled syntaxes.
    pub fn syntax_count() -> usize {
        SYNTAX_SET.syntaxes().len()
    }
}

/// Fence names that syntect knows under another token.
fn resolve_alias(lang: &str) -> &str {
    match lang {
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "py" | "py3" | "python3" => "python",
        "rs" => "rust",
        "rb" => "ruby",
        "sh" | "zsh" | "shell" | "shellscript" | "console" => "bash",
        "golang" => "go",
        "c++" | "cxx" | "hpp" | "hxx" | "hh" => "cpp",
        "cs" | "csharp" => "c#",
        "yml" => "yaml",
        "jsonc" | "json5" => "json",
        "md" => "markdown",
        "htm" | "xhtml" => "html",
        "hs" => "haskell",
        "ml" | "mli" => "ocaml",
        "pl" | "pm" => "perl",
        "tex" => "latex",
        "make" | "mk" => "makefile",
        "patch" => "diff",
        "clj" | "cljs" | "cljc" => "clojure",
        "erl" | "hrl" => "erlang",
        "svg" | "xsl" | "xslt" => "xml",
        "objc" => "objective-c",
        "bat" | "cmd" => "batch file",
        _ => lang,
    }
}

/// [`Highlighter`] backed by syntect's bundled syntaxes and themes.
///
/// A theme name resolves to a registered palette first, then to a bundled
/// syntect theme, then to [`FALLBACK_THEME`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectHighlighter {
    detector: LanguageDetector,
}

impl SyntectHighlighter {
    /// Creates a highlighter.
    pub const fn new() -> Self {
        Self {
            detector: LanguageDetector::new(),
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(
        &self,
        code: &str,
        language: &str,
        theme: &str,
        profile: ColorProfile,
    ) -> Result<Option<String>, BoxError> {
        let syntax = self.detector.detect(language);
        if syntax.name == PLAIN_TEXT {
            tracing::warn!(language, "unknown code block language, rendering without highlighting");
            return Ok(None);
        }
        let theme = resolve_theme(theme);
        let mut lines = HighlightLines::new(syntax, &theme);
        let mut out = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            for (style, piece) in lines.highlight_line(line, &SYNTAX_SET)? {
                paint(&mut out, profile, style, piece);
            }
        }
        Ok(Some(out))
    }
}

fn resolve_theme(name: &str) -> Cow<'static, Theme> {
    if let Some(palette) = registered_theme(name) {
        return Cow::Owned(theme_from_palette(name, &palette));
    }
    if let Some(theme) = THEME_SET.themes.get(name) {
        return Cow::Borrowed(theme);
    }
    tracing::warn!(theme = name, fallback = FALLBACK_THEME, "unknown highlight theme");
    THEME_SET
        .themes
        .get(FALLBACK_THEME)
        .map_or_else(|| Cow::Owned(Theme::default()), Cow::Borrowed)
}

/// Writes `piece` in the colors of `style`. Newlines stay outside the
/// escapes so every line carries its own.
fn paint(out: &mut String, profile: ColorProfile, style: Style, piece: &str) {
    let ThemeColor { r, g, b, .. } = style.foreground;
    let mut sgr = Sgr::new(profile).foreground(&format!("#{r:02x}{g:02x}{b:02x}"));
    for (flag, code) in [
        (FontStyle::BOLD, 1),
        (FontStyle::ITALIC, 3),
        (FontStyle::UNDERLINE, 4),
    ] {
        if style.font_style.contains(flag) {
            sgr = sgr.attr(code);
        }
    }
    for (i, part) in piece.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&sgr.paint(part));
    }
}

/// Token classes and the TextMate scopes they color.
fn palette_scopes(p: &StyleChroma) -> [(&'static str, &StylePrimitive); 24] {
    [
        ("invalid", &p.error),
        ("comment", &p.comment),
        ("meta.preprocessor, keyword.control.import", &p.comment_preproc),
        ("keyword, storage", &p.keyword),
        ("keyword.control, storage.modifier", &p.keyword_reserved),
        ("keyword.other.namespace, entity.name.namespace", &p.keyword_namespace),
        ("storage.type, support.type", &p.keyword_type),
        ("keyword.operator", &p.operator),
        ("punctuation", &p.punctuation),
        ("variable", &p.name),
        ("support.function.builtin, variable.language", &p.name_builtin),
        ("entity.name.tag", &p.name_tag),
        ("entity.other.attribute-name", &p.name_attribute),
        ("entity.name.class, entity.name.type", &p.name_class),
        ("meta.annotation, entity.name.function.decorator", &p.name_decorator),
        ("entity.name.function, support.function", &p.name_function),
        ("constant.numeric", &p.literal_number),
        ("string", &p.literal_string),
        ("constant.character.escape", &p.literal_string_escape),
        ("markup.deleted", &p.generic_deleted),
        ("markup.italic", &p.generic_emph),
        ("markup.inserted", &p.generic_inserted),
        ("markup.bold", &p.generic_strong),
        ("markup.heading", &p.generic_subheading),
    ]
}

/// Builds a syntect theme from a token palette.
pub fn theme_from_palette(name: &str, palette: &StyleChroma) -> Theme {
    let mut theme = Theme {
        name: Some(name.to_string()),
        ..Theme::default()
    };
    theme.settings.foreground = Some(theme_color(palette.text.color.as_deref()).unwrap_or(PALETTE_TEXT));
    theme.settings.background = theme_color(palette.background.background_color.as_deref());
    theme.scopes = palette_scopes(palette)
        .into_iter()
        .filter_map(|(selector, style)| theme_item(selector, style))
        .collect();
    theme
}

fn theme_item(selector: &str, style: &StylePrimitive) -> Option<ThemeItem> {
    let mut font = FontStyle::empty();
    for (flag, on) in [
        (FontStyle::BOLD, style.bold),
        (FontStyle::ITALIC, style.italic),
        (FontStyle::UNDERLINE, style.underline),
    ] {
        if on == Some(true) {
            font |= flag;
        }
    }
    let modifier = StyleModifier {
        foreground: theme_color(style.color.as_deref()),
        background: theme_color(style.background_color.as_deref()),
        font_style: (!font.is_empty()).then_some(font),
    };
    if modifier.foreground.is_none() && modifier.background.is_none() && modifier.font_style.is_none() {
        return None;
    }
    Some(ThemeItem {
        scope: ScopeSelectors::from_str(selector).ok()?,
        style: modifier,
    })
}

fn theme_color(color: Option<&str>) -> Option<ThemeColor> {
    let (r, g, b) = Color::parse(color?)?.to_rgb();
    Some(ThemeColor { r, g, b, a: 0xFF })
}
