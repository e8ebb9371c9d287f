//! Style sheet types and the cascade that merges them.
//!
//! Every field is optional: `None` means "inherit from the enclosing block"
//! (or "unset" at the root). Merging is always field-wise with the more
//! specific style winning.

use crate::ansi::{ColorProfile, Sgr, visible_width};

/// Default additional indent for nested lists.
pub const DEFAULT_LIST_LEVEL_INDENT: usize = 4;

// ============================================================================
// Primitive styles
// ============================================================================

/// Case transformation applied to a token before it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextTransform {
    /// Convert to UPPERCASE.
    Upper,
    /// Convert to lowercase.
    Lower,
    /// Capitalize the first letter of each word, lowercasing the rest.
    Title,
}

impl TextTransform {
    /// Apply the transformation to a string.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Title => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for c in text.chars() {
                    if c.is_alphanumeric() {
                        if at_word_start {
                            out.extend(c.to_uppercase());
                        } else {
                            out.extend(c.to_lowercase());
                        }
                        at_word_start = false;
                    } else {
                        out.push(c);
                        at_word_start = c != '\'';
                    }
                }
                out
            }
        }
    }
}

/// Horizontal alignment of a block's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Align {
    /// Flush left (default).
    #[default]
    Left,
    /// Centered within the available width.
    Center,
    /// Stretched to the available width by widening inter-word gaps.
    Justify,
}

/// Primitive style settings for text elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StylePrimitive {
    /// Written before the element, in the enclosing block's style.
    pub block_prefix: Option<String>,
    /// Written after the element, in the enclosing block's style.
    pub block_suffix: Option<String>,
    /// Written before the token, in the element's style.
    pub prefix: Option<String>,
    /// Written after the token, in the element's style.
    pub suffix: Option<String>,
    /// Foreground color (ANSI index or hex).
    pub color: Option<String>,
    /// Background color (ANSI index or hex).
    pub background_color: Option<String>,
    pub underline: Option<bool>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub crossed_out: Option<bool>,
    pub faint: Option<bool>,
    pub inverse: Option<bool>,
    pub blink: Option<bool>,
    pub conceal: Option<bool>,
    pub overlined: Option<bool>,
    /// Case transformation.
    pub transform: Option<TextTransform>,
    /// Template applied to the token, e.g. `"Image: {{.text}}"`.
    pub format: Option<String>,
}

impl StylePrimitive {
    /// Creates a new empty style primitive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix.
    #[must_use]
    pub fn prefix(mut self, p: impl Into<String>) -> Self {
        self.prefix = Some(p.into());
        self
    }

    /// Sets the suffix.
    #[must_use]
    pub fn suffix(mut self, s: impl Into<String>) -> Self {
        self.suffix = Some(s.into());
        self
    }

    /// Sets the block prefix.
    #[must_use]
    pub fn block_prefix(mut self, p: impl Into<String>) -> Self {
        self.block_prefix = Some(p.into());
        self
    }

    /// Sets the block suffix.
    #[must_use]
    pub fn block_suffix(mut self, s: impl Into<String>) -> Self {
        self.block_suffix = Some(s.into());
        self
    }

    /// Sets the foreground color.
    #[must_use]
    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = Some(c.into());
        self
    }

    /// Sets the background color.
    #[must_use]
    pub fn background_color(mut self, c: impl Into<String>) -> Self {
        self.background_color = Some(c.into());
        self
    }

    /// Sets bold.
    #[must_use]
    pub const fn bold(mut self, b: bool) -> Self {
        self.bold = Some(b);
        self
    }

    /// Sets italic.
    #[must_use]
    pub const fn italic(mut self, i: bool) -> Self {
        self.italic = Some(i);
        self
    }

    /// Sets underline.
    #[must_use]
    pub const fn underline(mut self, u: bool) -> Self {
        self.underline = Some(u);
        self
    }

    /// Sets strikethrough.
    #[must_use]
    pub const fn crossed_out(mut self, c: bool) -> Self {
        self.crossed_out = Some(c);
        self
    }

    /// Sets faint.
    #[must_use]
    pub const fn faint(mut self, f: bool) -> Self {
        self.faint = Some(f);
        self
    }

    /// Sets inverse video.
    #[must_use]
    pub const fn inverse(mut self, i: bool) -> Self {
        self.inverse = Some(i);
        self
    }

    /// Sets blink.
    #[must_use]
    pub const fn blink(mut self, b: bool) -> Self {
        self.blink = Some(b);
        self
    }

    /// Sets the case transformation.
    #[must_use]
    pub const fn transform(mut self, t: TextTransform) -> Self {
        self.transform = Some(t);
        self
    }

    /// Sets the format string.
    #[must_use]
    pub fn format(mut self, f: impl Into<String>) -> Self {
        self.format = Some(f.into());
        self
    }

    /// Merges `child` over `self`.
    ///
    /// Colors, attributes and the case transform are inherited. Prefixes and
    /// suffixes are inherited only when `to_block` is set. The format is
    /// never inherited.
    #[must_use]
    pub fn cascade(&self, child: &Self, to_block: bool) -> Self {
        let pick = |parent: &Option<String>, child: &Option<String>| {
            if to_block {
                child.clone().or_else(|| parent.clone())
            } else {
                child.clone()
            }
        };
        Self {
            block_prefix: pick(&self.block_prefix, &child.block_prefix),
            block_suffix: pick(&self.block_suffix, &child.block_suffix),
            prefix: pick(&self.prefix, &child.prefix),
            suffix: pick(&self.suffix, &child.suffix),
            color: child.color.clone().or_else(|| self.color.clone()),
            background_color: child
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            underline: child.underline.or(self.underline),
            bold: child.bold.or(self.bold),
            italic: child.italic.or(self.italic),
            crossed_out: child.crossed_out.or(self.crossed_out),
            faint: child.faint.or(self.faint),
            inverse: child.inverse.or(self.inverse),
            blink: child.blink.or(self.blink),
            conceal: child.conceal.or(self.conceal),
            overlined: child.overlined.or(self.overlined),
            transform: child.transform.or(self.transform),
            format: child.format.clone(),
        }
    }

    /// Colors, attributes and case transform only, without decorations or
    /// format.
    #[must_use]
    pub fn attributes(&self) -> Self {
        Self {
            block_prefix: None,
            block_suffix: None,
            prefix: None,
            suffix: None,
            format: None,
            ..self.clone()
        }
    }

    /// Lays the colors and attributes of `attrs` over `self`, keeping this
    /// style's own decorations and format.
    #[must_use]
    pub fn overlay(&self, attrs: &Self) -> Self {
        let mut merged = self.cascade(&attrs.attributes(), false);
        merged.block_prefix.clone_from(&self.block_prefix);
        merged.block_suffix.clone_from(&self.block_suffix);
        merged.prefix.clone_from(&self.prefix);
        merged.suffix.clone_from(&self.suffix);
        merged.format.clone_from(&self.format);
        merged
    }

    /// Builds the SGR sequence for this style's colors and attributes.
    pub fn sgr(&self, profile: ColorProfile) -> Sgr {
        let mut sgr = Sgr::new(profile);
        if let Some(color) = &self.color {
            sgr = sgr.foreground(color);
        }
        if let Some(bg) = &self.background_color {
            sgr = sgr.background(bg);
        }
        let attrs = [
            (self.underline, 4),
            (self.bold, 1),
            (self.italic, 3),
            (self.crossed_out, 9),
            (self.faint, 2),
            (self.inverse, 7),
            (self.blink, 5),
            (self.conceal, 8),
            (self.overlined, 53),
        ];
        for (flag, code) in attrs {
            if flag == Some(true) {
                sgr = sgr.attr(code);
            }
        }
        sgr
    }
}

/// Folds `styles` left to right with block inheritance.
pub fn cascade_primitives<'a>(styles: impl IntoIterator<Item = &'a StylePrimitive>) -> StylePrimitive {
    styles
        .into_iter()
        .fold(StylePrimitive::default(), |acc, s| acc.cascade(s, true))
}

// ============================================================================
// Block styles
// ============================================================================

/// Block-level style settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleBlock {
    /// Primitive style settings.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub style: StylePrimitive,
    /// Number of indent tokens written at the start of each line.
    pub indent: Option<usize>,
    /// Token used for indentation (defaults to a space).
    pub indent_token: Option<String>,
    /// Margin on both sides of the block.
    pub margin: Option<usize>,
    /// Left margin, overriding `margin`.
    pub margin_left: Option<usize>,
    /// Right margin, overriding `margin`.
    pub margin_right: Option<usize>,
    /// Line alignment.
    pub align: Option<Align>,
}

impl StyleBlock {
    /// Creates a new empty block style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primitive style.
    #[must_use]
    pub fn style(mut self, s: StylePrimitive) -> Self {
        self.style = s;
        self
    }

    /// Sets the indent.
    #[must_use]
    pub const fn indent(mut self, i: usize) -> Self {
        self.indent = Some(i);
        self
    }

    /// Sets the indent token.
    #[must_use]
    pub fn indent_token(mut self, t: impl Into<String>) -> Self {
        self.indent_token = Some(t.into());
        self
    }

    /// Sets the margin on both sides.
    #[must_use]
    pub const fn margin(mut self, m: usize) -> Self {
        self.margin = Some(m);
        self
    }

    /// Sets independent left and right margins.
    #[must_use]
    pub const fn margins(mut self, left: usize, right: usize) -> Self {
        self.margin_left = Some(left);
        self.margin_right = Some(right);
        self
    }

    /// Sets the line alignment.
    #[must_use]
    pub const fn align(mut self, a: Align) -> Self {
        self.align = Some(a);
        self
    }

    /// Indent token, a single space when unset.
    pub fn indent_token_or_default(&self) -> &str {
        self.indent_token.as_deref().unwrap_or(" ")
    }

    /// Indent width in cells: the indent count times the token's width.
    pub fn indent_width(&self) -> usize {
        self.indent.unwrap_or(0) * visible_width(self.indent_token_or_default())
    }

    /// Effective left margin.
    pub fn left_margin(&self) -> usize {
        self.margin_left.or(self.margin).unwrap_or(0)
    }

    /// Effective right margin.
    pub fn right_margin(&self) -> usize {
        self.margin_right.or(self.margin).unwrap_or(0)
    }

    /// Horizontal space this block consumes from its parent's width.
    pub fn consumed_width(&self) -> usize {
        self.indent_width() + self.left_margin() + self.right_margin()
    }

    /// Merges `child` over `self`.
    ///
    /// With `to_block` unset the layout fields (indent, margins, alignment)
    /// come from the child alone, which is what stack frames need: the
    /// stack already sums its ancestors' layout. With `to_block` set an
    /// unspecified child indent or margin inherits the parent's.
    #[must_use]
    pub fn cascade(&self, child: &Self, to_block: bool) -> Self {
        let mut merged = child.clone();
        merged.style = self.style.cascade(&child.style, to_block);
        if to_block {
            merged.indent = child.indent.or(self.indent);
            merged.indent_token = child
                .indent_token
                .clone()
                .or_else(|| self.indent_token.clone());
            merged.margin = child.margin.or(self.margin);
            merged.margin_left = child.margin_left.or(self.margin_left);
            merged.margin_right = child.margin_right.or(self.margin_right);
            merged.align = child.align.or(self.align);
        }
        merged
    }
}

/// Folds `blocks` left to right with block inheritance.
pub fn cascade_blocks<'a>(blocks: impl IntoIterator<Item = &'a StyleBlock>) -> StyleBlock {
    blocks
        .into_iter()
        .fold(StyleBlock::default(), |acc, b| acc.cascade(b, true))
}

/// Token-class palette for syntax highlighting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleChroma {
    pub text: StylePrimitive,
    pub error: StylePrimitive,
    pub comment: StylePrimitive,
    pub comment_preproc: StylePrimitive,
    pub keyword: StylePrimitive,
    pub keyword_reserved: StylePrimitive,
    pub keyword_namespace: StylePrimitive,
    pub keyword_type: StylePrimitive,
    pub operator: StylePrimitive,
    pub punctuation: StylePrimitive,
    pub name: StylePrimitive,
    pub name_builtin: StylePrimitive,
    pub name_tag: StylePrimitive,
    pub name_attribute: StylePrimitive,
    pub name_class: StylePrimitive,
    pub name_decorator: StylePrimitive,
    pub name_function: StylePrimitive,
    pub literal_number: StylePrimitive,
    pub literal_string: StylePrimitive,
    pub literal_string_escape: StylePrimitive,
    pub generic_deleted: StylePrimitive,
    pub generic_emph: StylePrimitive,
    pub generic_inserted: StylePrimitive,
    pub generic_strong: StylePrimitive,
    pub generic_subheading: StylePrimitive,
    pub background: StylePrimitive,
}

/// Code block style settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleCodeBlock {
    /// Block style settings.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub block: StyleBlock,
    /// Name of a highlighter theme.
    pub theme: Option<String>,
    /// Custom palette, registered with the highlighter under the theme name.
    pub chroma: Option<StyleChroma>,
}

impl StyleCodeBlock {
    /// Creates a new code block style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block style.
    #[must_use]
    pub fn block(mut self, b: StyleBlock) -> Self {
        self.block = b;
        self
    }

    /// Sets the theme.
    #[must_use]
    pub fn theme(mut self, t: impl Into<String>) -> Self {
        self.theme = Some(t.into());
        self
    }

    /// Sets a custom palette.
    #[must_use]
    pub fn chroma(mut self, c: StyleChroma) -> Self {
        self.chroma = Some(c);
        self
    }
}

/// List style settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleList {
    /// Block style settings.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub block: StyleBlock,
    /// Indent of each nested list level.
    pub level_indent: usize,
}

impl Default for StyleList {
    fn default() -> Self {
        Self {
            block: StyleBlock::default(),
            level_indent: DEFAULT_LIST_LEVEL_INDENT,
        }
    }
}

impl StyleList {
    /// Creates a new list style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block style.
    #[must_use]
    pub fn block(mut self, b: StyleBlock) -> Self {
        self.block = b;
        self
    }

    /// Sets the level indent.
    #[must_use]
    pub const fn level_indent(mut self, i: usize) -> Self {
        self.level_indent = i;
        self
    }
}

/// Table style settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleTable {
    /// Block style settings.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub block: StyleBlock,
    /// Character used where borders cross.
    pub center_separator: Option<String>,
    /// Vertical border character.
    pub column_separator: Option<String>,
    /// Horizontal border character.
    pub row_separator: Option<String>,
}

impl StyleTable {
    /// Creates a new table style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets separators.
    #[must_use]
    pub fn separators(
        mut self,
        center: impl Into<String>,
        column: impl Into<String>,
        row: impl Into<String>,
    ) -> Self {
        self.center_separator = Some(center.into());
        self.column_separator = Some(column.into());
        self.row_separator = Some(row.into());
        self
    }
}

/// Task item style settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleTask {
    /// Primitive style settings.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub style: StylePrimitive,
    /// Marker for checked items.
    pub ticked: String,
    /// Marker for unchecked items.
    pub unticked: String,
}

impl Default for StyleTask {
    fn default() -> Self {
        Self {
            style: StylePrimitive::default(),
            ticked: "[x] ".to_string(),
            unticked: "[ ] ".to_string(),
        }
    }
}

impl StyleTask {
    /// Creates a new task style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ticked marker.
    #[must_use]
    pub fn ticked(mut self, t: impl Into<String>) -> Self {
        self.ticked = t.into();
        self
    }

    /// Sets the unticked marker.
    #[must_use]
    pub fn unticked(mut self, u: impl Into<String>) -> Self {
        self.unticked = u.into();
        self
    }
}

/// Complete style configuration for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StyleConfig {
    // Document
    pub document: StyleBlock,

    // Block elements
    pub block_quote: StyleBlock,
    pub paragraph: StyleBlock,
    pub list: StyleList,

    // Headings
    pub heading: StyleBlock,
    pub h1: StyleBlock,
    pub h2: StyleBlock,
    pub h3: StyleBlock,
    pub h4: StyleBlock,
    pub h5: StyleBlock,
    pub h6: StyleBlock,

    // Inline elements
    pub text: StylePrimitive,
    pub strikethrough: StylePrimitive,
    pub emph: StylePrimitive,
    pub strong: StylePrimitive,
    pub horizontal_rule: StylePrimitive,

    // List items
    pub item: StylePrimitive,
    pub enumeration: StylePrimitive,
    pub task: StyleTask,

    // Links and images
    pub link: StylePrimitive,
    pub link_text: StylePrimitive,
    pub image: StylePrimitive,
    pub image_text: StylePrimitive,

    // Code
    pub code: StyleBlock,
    pub code_block: StyleCodeBlock,

    // Tables
    pub table: StyleTable,

    // Definition lists
    pub definition_list: StyleBlock,
    pub definition_term: StylePrimitive,
    pub definition_description: StylePrimitive,

    // Raw HTML
    pub html_block: StyleBlock,
    pub html_span: StyleBlock,
}

impl StyleConfig {
    /// Creates a new empty style config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the style for a heading level (1-6; out of range clamps).
    pub const fn heading_style(&self, level: u8) -> &StyleBlock {
        match level {
            0 | 1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            _ => &self.h6,
        }
    }

    /// Sets margins and alignment on paragraphs and headings.
    pub fn apply_layout(&mut self, left: usize, right: usize, align: Option<Align>) {
        for block in [
            &mut self.paragraph,
            &mut self.heading,
            &mut self.h1,
            &mut self.h2,
            &mut self.h3,
            &mut self.h4,
            &mut self.h5,
            &mut self.h6,
        ] {
            block.margin_left = Some(left);
            block.margin_right = Some(right);
            if align.is_some() {
                block.align = align;
            }
        }
    }

    /// Parses a JSON style sheet. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StyleSheet`] if the JSON is malformed or a
    /// field has the wrong type.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_child_wins() {
        let parent = StylePrimitive::new().color("1").bold(true);
        let child = StylePrimitive::new().color("2");
        let merged = parent.cascade(&child, false);
        assert_eq!(merged.color.as_deref(), Some("2"));
        assert_eq!(merged.bold, Some(true));
    }

    #[test]
    fn test_cascade_prefix_inheritance() {
        let parent = StylePrimitive::new().prefix("> ").block_suffix("\n");
        let child = StylePrimitive::new().italic(true);

        let leaf = parent.cascade(&child, false);
        assert_eq!(leaf.prefix, None);
        assert_eq!(leaf.block_suffix, None);

        let block = parent.cascade(&child, true);
        assert_eq!(block.prefix.as_deref(), Some("> "));
        assert_eq!(block.block_suffix.as_deref(), Some("\n"));
    }

    #[test]
    fn test_cascade_format_not_inherited() {
        let parent = StylePrimitive::new().format("Image: {{.text}}");
        let merged = parent.cascade(&StylePrimitive::new(), true);
        assert_eq!(merged.format, None);
    }

    #[test]
    fn test_overlay_keeps_own_decorations() {
        let text = StylePrimitive::new().color("252").prefix("<").format("{{.text}}!");
        let emph = StylePrimitive::new().italic(true).color("35").prefix("*");
        let merged = text.overlay(&emph);
        assert_eq!(merged.color.as_deref(), Some("35"));
        assert_eq!(merged.italic, Some(true));
        assert_eq!(merged.prefix.as_deref(), Some("<"));
        assert_eq!(merged.format.as_deref(), Some("{{.text}}!"));

        let attrs = emph.attributes();
        assert_eq!(attrs.prefix, None);
        assert_eq!(attrs.italic, Some(true));
    }

    #[test]
    fn test_block_cascade_indent() {
        let parent = StyleBlock::new().indent(2).margin(1);
        let child = StyleBlock::new().style(StylePrimitive::new().bold(true));

        let frame = parent.cascade(&child, false);
        assert_eq!(frame.indent, None);
        assert_eq!(frame.margin, None);

        let inherited = parent.cascade(&child, true);
        assert_eq!(inherited.indent, Some(2));
        assert_eq!(inherited.margin, Some(1));

        let own = parent.cascade(&StyleBlock::new().indent(4), true);
        assert_eq!(own.indent, Some(4));
    }

    #[test]
    fn test_cascade_blocks_heading_levels() {
        let heading = StyleBlock::new().style(StylePrimitive::new().color("39").bold(true));
        let h1 = StyleBlock::new().style(StylePrimitive::new().prefix("# "));
        let merged = cascade_blocks([&heading, &h1]);
        assert_eq!(merged.style.color.as_deref(), Some("39"));
        assert_eq!(merged.style.prefix.as_deref(), Some("# "));
    }

    #[test]
    fn test_margins() {
        let block = StyleBlock::new().margin(2).margins(1, 3).indent(1);
        assert_eq!(block.left_margin(), 1);
        assert_eq!(block.right_margin(), 3);
        assert_eq!(block.consumed_width(), 5);
        assert_eq!(StyleBlock::new().margin(2).consumed_width(), 4);
        assert_eq!(StyleBlock::new().indent(1).indent_token("│ ").consumed_width(), 2);
    }

    #[test]
    fn test_empty_style_has_no_sgr() {
        assert!(StylePrimitive::new().sgr(ColorProfile::TrueColor).is_empty());
        assert!(
            StylePrimitive::new()
                .bold(false)
                .sgr(ColorProfile::TrueColor)
                .is_empty()
        );
    }

    #[test]
    fn test_sgr_attribute_order() {
        let style = StylePrimitive::new().color("228").background_color("63").bold(true);
        assert_eq!(
            style.sgr(ColorProfile::TrueColor).sequence(),
            "\x1b[38;5;228;48;5;63;1m"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(TextTransform::Title.apply("hELLO wORLD"), "Hello World");
        assert_eq!(TextTransform::Title.apply("it's a-b"), "It's A-B");
        assert_eq!(TextTransform::Upper.apply("abc"), "ABC");
    }

    #[test]
    fn test_list_default_level_indent() {
        assert_eq!(StyleList::new().level_indent, DEFAULT_LIST_LEVEL_INDENT);
        assert_eq!(StyleList::new().block.indent, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_ignores_unknown_keys() {
        let json = r##"{
            "document": { "margin": 2, "color": "252", "mystery": true },
            "h1": { "prefix": "# ", "transform": "upper" },
            "table": { "center_separator": "+" }
        }"##;
        let config = StyleConfig::from_json(json).expect("valid style sheet");
        assert_eq!(config.document.margin, Some(2));
        assert_eq!(config.document.style.color.as_deref(), Some("252"));
        assert_eq!(config.h1.style.transform, Some(TextTransform::Upper));
        assert_eq!(config.table.center_separator.as_deref(), Some("+"));
    }
}
