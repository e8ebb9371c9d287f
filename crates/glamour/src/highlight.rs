//! The code block highlighter seam and its shared theme registry.
//!
//! A [`Highlighter`] turns code into styled text. Themes are looked up by
//! name; a style sheet can carry its own token palette, which the renderer
//! registers under the code block's theme name the first time it is seen.
//! The registry is process-wide and guarded by one mutex.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use crate::ansi::ColorProfile;
use crate::error::BoxError;
use crate::style::StyleChroma;

/// Theme name used for palettes that do not name their own theme.
pub const DEFAULT_PALETTE_THEME: &str = "charm";

static THEMES: LazyLock<Mutex<HashMap<String, StyleChroma>>> = LazyLock::new(|| Mutex::new(HashMap::new()));

/// Registers the palette built by `builder` under `name`, unless a palette
/// of that name exists already.
///
/// The check and the insert happen under one lock, so concurrent callers
/// race safely and exactly one builder runs. Returns true if `builder` ran.
///
/// ```rust
/// use glamour::highlight::{register_if_absent, registered_theme};
/// use glamour::style::{StyleChroma, StylePrimitive};
///
/// let palette = || StyleChroma {
///     keyword: StylePrimitive::new().color("#ff0000"),
///     ..StyleChroma::default()
/// };
/// assert!(register_if_absent("doc-example", palette));
/// assert!(!register_if_absent("doc-example", StyleChroma::default));
/// assert_eq!(registered_theme("doc-example").unwrap().keyword.color.as_deref(), Some("#ff0000"));
/// ```
pub fn register_if_absent(name: &str, builder: impl FnOnce() -> StyleChroma) -> bool {
    let mut themes = THEMES.lock().unwrap_or_else(PoisonError::into_inner);
    if themes.contains_key(name) {
        return false;
    }
    tracing::debug!(theme = name, "registering highlight palette");
    themes.insert(name.to_string(), builder());
    true
}

/// The palette registered under `name`, if any.
pub fn registered_theme(name: &str) -> Option<StyleChroma> {
    THEMES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Highlights code blocks.
pub trait Highlighter: Send + Sync {
    /// Highlights `code` written in `language` with the theme called
    /// `theme`, emitting colors for `profile`.
    ///
    /// Returns `Ok(None)` when the language is unknown; the renderer then
    /// falls back to the plain code block style.
    ///
    /// # Errors
    ///
    /// Any error aborts the render as [`crate::Error::Highlight`].
    fn highlight(
        &self,
        code: &str,
        language: &str,
        theme: &str,
        profile: ColorProfile,
    ) -> Result<Option<String>, BoxError>;
}

/// The highlighter a new renderer starts with: syntect when the
/// `syntax-highlighting` feature is on, none otherwise.
#[cfg(feature = "syntax-highlighting")]
pub fn default_highlighter() -> Option<std::sync::Arc<dyn Highlighter>> {
    Some(std::sync::Arc::new(crate::syntax::SyntectHighlighter::new()))
}

/// The highlighter a new renderer starts with: syntect when the
/// `syntax-highlighting` feature is on, none otherwise.
#[cfg(not(feature = "syntax-highlighting"))]
pub fn default_highlighter() -> Option<std::sync::Arc<dyn Highlighter>> {
    None
}
