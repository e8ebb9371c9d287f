//! The `{{.text}}` format templates used by style primitives.
//!
//! The only supported action substitutes the token text. Both `{{.text}}`
//! and `{{text}}` are accepted, with optional surrounding whitespace.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Text,
}

/// A parsed format template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    pieces: Vec<Piece<'a>>,
}

impl<'a> Template<'a> {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] for an unclosed action or an action that
    /// refers to anything other than the token text.
    pub fn parse(source: &'a str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut rest = source;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                pieces.push(Piece::Literal(&rest[..open]));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| Error::template(source, "unclosed action"))?;
            let action = after[..close].trim();
            match action {
                ".text" | "text" => pieces.push(Piece::Text),
                "" => return Err(Error::template(source, "missing value for command")),
                other => {
                    return Err(Error::template(
                        source,
                        format!("can't evaluate field {other:?}"),
                    ));
                }
            }
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            pieces.push(Piece::Literal(rest));
        }
        Ok(Self { pieces })
    }

    /// Substitutes `text` into the template.
    pub fn execute(&self, text: &str) -> String {
        self.expand(text, str::to_string)
    }

    /// Substitutes `text`, passing every literal piece through `literal`.
    pub fn expand(&self, text: &str, literal: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(l) => out.push_str(&literal(l)),
                Piece::Text => out.push_str(text),
            }
        }
        out
    }
}
