//! OSC 8 hyperlinks, terminal capability detection and URL helpers.

use std::env;

use url::Url;

use crate::ansi::{HYPERLINK_RESET, hyperlink_start, strip_ansi};

/// Terminal programs (`TERM_PROGRAM`) known to support OSC 8.
const HYPERLINK_PROGRAMS: &[&str] = &["iTerm.app", "vscode", "Windows Terminal", "WezTerm", "Hyper"];

/// `TERM` substrings known to support OSC 8.
const HYPERLINK_TERMS: &[&str] = &[
    "xterm-256color",
    "screen-256color",
    "tmux-256color",
    "alacritty",
    "xterm-kitty",
];

/// Wraps `text` in an OSC 8 hyperlink. An empty `url` returns `text` as is.
///
/// ```rust
/// use glamour::ansi::strip_ansi;
/// use glamour::hyperlink::format_hyperlink;
///
/// let link = format_hyperlink("docs", "https://example.com");
/// assert_eq!(strip_ansi(&link), "docs");
/// assert_eq!(format_hyperlink("docs", ""), "docs");
/// ```
pub fn format_hyperlink(text: &str, url: &str) -> String {
    if url.is_empty() {
        return text.to_string();
    }
    let mut out = hyperlink_start(url, "");
    out.push_str(text);
    out.push_str(HYPERLINK_RESET);
    out
}

/// The environment signals used to guess whether a terminal renders OSC 8.
///
/// Detection is a heuristic. A terminal missing from the lists gets plain
/// text even if it could show links, and a terminal that advertises a
/// matching `TERM` without supporting links will show the raw escapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalInfo {
    /// Value of `TERM_PROGRAM`.
    pub term_program: Option<String>,
    /// Value of `TERM`.
    pub term: Option<String>,
    /// Whether `KITTY_WINDOW_ID` is set.
    pub kitty: bool,
    /// Whether `ALACRITTY_LOG` or `ALACRITTY_SOCKET` is set.
    pub alacritty: bool,
}

impl TerminalInfo {
    /// Reads the signals from the process environment.
    pub fn from_env() -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            term_program: non_empty("TERM_PROGRAM"),
            term: non_empty("TERM"),
            kitty: non_empty("KITTY_WINDOW_ID").is_some(),
            alacritty: non_empty("ALACRITTY_LOG").is_some() || non_empty("ALACRITTY_SOCKET").is_some(),
        }
    }

    /// Sets `TERM_PROGRAM`.
    #[must_use]
    pub fn term_program(mut self, program: impl Into<String>) -> Self {
        self.term_program = Some(program.into());
        self
    }

    /// Sets `TERM`.
    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Returns true if the terminal is believed to render OSC 8 links.
    pub fn supports_hyperlinks(&self) -> bool {
        if let Some(program) = &self.term_program {
            if HYPERLINK_PROGRAMS.contains(&program.as_str()) {
                return true;
            }
        }
        if let Some(term) = &self.term {
            if HYPERLINK_TERMS.iter().any(|t| term.contains(t)) {
                return true;
            }
        }
        self.kitty || self.alacritty
    }
}

/// A link ready to be written, derived from a link and the terminal's
/// capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    /// Target URL.
    pub url: String,
    /// Plain display text.
    pub text: String,
    /// Optional title.
    pub title: String,
}

impl Hyperlink {
    /// Creates a hyperlink, trimming every field and stripping escapes from
    /// the text.
    pub fn new(url: &str, text: &str, title: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            text: strip_ansi(text.trim()),
            title: title.trim().to_string(),
        }
    }

    /// The OSC 8 form.
    pub fn render_osc8(&self) -> String {
        format_hyperlink(&self.text, &self.url)
    }

    /// The plain form: `text (url)`, or whichever of the two is present.
    pub fn render_plain(&self) -> String {
        match (self.text.is_empty(), self.url.is_empty()) {
            (true, _) => self.url.clone(),
            (false, true) => self.text.clone(),
            (false, false) => format!("{} ({})", self.text, self.url),
        }
    }

    /// OSC 8 when the terminal supports it, plain otherwise.
    pub fn render_smart(&self, terminal: &TerminalInfo) -> String {
        if terminal.supports_hyperlinks() {
            self.render_osc8()
        } else {
            self.render_plain()
        }
    }

    /// Returns true if the link has a URL or text.
    pub fn is_valid(&self) -> bool {
        !(self.url.is_empty() && self.text.is_empty())
    }
}

/// Returns true for same-document anchors such as `#install`.
///
/// Percent-escaped fragments do not count: they decode to something other
/// than the literal text after the `#`.
pub fn is_fragment_only(url: &str) -> bool {
    url.strip_prefix('#').is_some_and(|fragment| !fragment.contains('%'))
}

/// Resolves `url` against `base`.
///
/// Absolute URLs and URLs that cannot be resolved are returned unchanged. A
/// leading `/` on a relative path is dropped, so the base's own path is
/// kept.
///
/// ```rust
/// use glamour::hyperlink::resolve_url;
///
/// assert_eq!(resolve_url(Some("https://x.io/docs/"), "/guide.md"), "https://x.io/docs/guide.md");
/// assert_eq!(resolve_url(Some("https://x.io/"), "https://y.io/a"), "https://y.io/a");
/// assert_eq!(resolve_url(None, "guide.md"), "guide.md");
/// ```
pub fn resolve_url(base: Option<&str>, url: &str) -> String {
    if Url::parse(url).is_ok() {
        return url.to_string();
    }
    let Some(base) = base.filter(|b| !b.is_empty()) else {
        return url.to_string();
    };
    match Url::parse(base).and_then(|b| b.join(url.trim_start_matches('/'))) {
        Ok(resolved) => resolved.to_string(),
        Err(err) => {
            tracing::warn!(base, url, error = %err, "cannot resolve link, using it verbatim");
            url.to_string()
        }
    }
}

/// Stable `id=` parameter for a link, so terminals can group the pieces of
/// one link that a wrap or a style change split apart.
pub fn hyperlink_id(url: &str) -> String {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;
    let hash = url
        .bytes()
        .fold(FNV_OFFSET, |h, b| (h ^ u32::from(b)).wrapping_mul(FNV_PRIME));
    format!("id={hash}")
}

/// Opening and closing sequences for an `id`-tagged link, or `None` for
/// URLs that should not become links.
pub fn hyperlink_bounds(url: &str) -> Option<(String, &'static str)> {
    if url.is_empty() || is_fragment_only(url) {
        return None;
    }
    Some((hyperlink_start(url, &hyperlink_id(url)), HYPERLINK_RESET))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hyperlink() {
        assert_eq!(
            format_hyperlink("x", "https://a.b"),
            "\x1b]8;;https://a.b\x1b\\x\x1b]8;;\x1b\\"
        );
        assert_eq!(format_hyperlink("x", ""), "x");
    }

    #[test]
    fn test_detection_by_program() {
        let info = TerminalInfo::default().term_program("iTerm.app");
        assert!(info.supports_hyperlinks());
        let info = TerminalInfo::default().term_program("Apple_Terminal");
        assert!(!info.supports_hyperlinks());
    }

    #[test]
    fn test_detection_by_term_substring() {
        assert!(TerminalInfo::default().term("xterm-256color").supports_hyperlinks());
        assert!(TerminalInfo::default().term("foo-tmux-256color-bar").supports_hyperlinks());
        assert!(!TerminalInfo::default().term("xterm").supports_hyperlinks());
        assert!(!TerminalInfo::default().term("dumb").supports_hyperlinks());
    }

    #[test]
    fn test_detection_by_presence() {
        let kitty = TerminalInfo {
            kitty: true,
            ..TerminalInfo::default()
        };
        assert!(kitty.supports_hyperlinks());
        assert!(!TerminalInfo::default().supports_hyperlinks());
    }

    #[test]
    fn test_unknown_program_falls_through_to_term() {
        let info = TerminalInfo::default().term_program("Apple_Terminal").term("xterm-kitty");
        assert!(info.supports_hyperlinks());
    }

    #[test]
    fn test_hyperlink_token() {
        let link = Hyperlink::new(" https://a.b ", " \x1b[1mdocs\x1b[m ", "");
        assert_eq!(link.text, "docs");
        assert_eq!(link.render_plain(), "docs (https://a.b)");
        assert_eq!(Hyperlink::new("", "t", "").render_plain(), "t");
        assert_eq!(Hyperlink::new("u", "", "").render_plain(), "u");
        assert!(!Hyperlink::new("", "", "").is_valid());
        assert_eq!(
            link.render_smart(&TerminalInfo::default()),
            "docs (https://a.b)"
        );
    }

    #[test]
    fn test_fragment_only() {
        assert!(is_fragment_only("#install"));
        assert!(is_fragment_only("#"));
        assert!(!is_fragment_only("#a%20b"));
        assert!(!is_fragment_only("https://x.io/#install"));
        assert!(!is_fragment_only("install"));
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_url(Some("https://x.io/a/b"), "c"), "https://x.io/a/c");
        assert_eq!(resolve_url(Some("not a url"), "c"), "c");
        assert_eq!(resolve_url(Some(""), "/c"), "/c");
    }

    #[test]
    fn test_hyperlink_id_is_stable() {
        assert_eq!(hyperlink_id("a"), hyperlink_id("a"));
        assert_ne!(hyperlink_id("a"), hyperlink_id("b"));
        assert_eq!(hyperlink_id(""), "id=2166136261");
        assert!(hyperlink_bounds("#top").is_none());
        assert!(hyperlink_bounds("").is_none());
    }
}
