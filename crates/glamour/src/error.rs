//! Error types for rendering.

use std::io;

use thiserror::Error;

/// Boxed error returned by custom link formatters and highlighters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// A style's `format` template could not be parsed or executed.
    #[error("invalid format template {template:?}: {reason}")]
    Template {
        /// The offending template.
        template: String,
        /// What went wrong.
        reason: String,
    },

    /// Writing to the destination failed.
    #[error("failed to write rendered output: {0}")]
    Io(#[from] io::Error),

    /// A link formatter returned an error.
    #[error("link formatter failed for {url:?}")]
    LinkFormatter {
        /// URL of the link being formatted.
        url: String,
        /// The formatter's error.
        #[source]
        source: BoxError,
    },

    /// The syntax highlighter failed on a code block.
    #[error("failed to highlight {language:?} code block")]
    Highlight {
        /// Language of the code block.
        language: String,
        /// The highlighter's error.
        #[source]
        source: BoxError,
    },

    /// Input bytes were not valid UTF-8.
    #[error("markdown input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A style name did not match any built-in style.
    #[error("unknown style {0:?}")]
    UnknownStyle(String),

    /// A JSON style sheet could not be decoded.
    #[cfg(feature = "serde")]
    #[error("invalid style sheet: {0}")]
    StyleSheet(#[from] serde_json::Error),
}

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        Self::Template {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_template_message() {
        let err = Error::template("{{.text", "unclosed action");
        assert_eq!(
            err.to_string(),
            "invalid format template \"{{.text\": unclosed action"
        );
    }

    #[test]
    fn test_link_formatter_keeps_source() {
        let err = Error::LinkFormatter {
            url: "https://example.com".to_string(),
            source: "boom".into(),
        };
        assert!(err.to_string().contains("https://example.com"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("boom"));
    }

    #[test]
    fn test_unknown_style_message() {
        assert_eq!(Error::UnknownStyle("neon".into()).to_string(), "unknown style \"neon\"");
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
