//! Bordered table layout.
//!
//! Cells arrive already styled; this module measures them (ignoring escape
//! sequences), sizes the columns, fits oversized cells by wrapping or
//! truncating them, and draws the grid.
//!
//! # Example
//!
//! ```rust
//! use glamour::table::{Alignment, TableBorder, TableBuilder, TableLayout};
//!
//! let mut table = TableBuilder::new(vec![Alignment::Left, Alignment::Right]);
//! table.header(vec!["Name".into(), "Age".into()]);
//! table.row(vec!["Alice".into(), "30".into()]);
//!
//! let rendered = table.render(&TableBorder::ascii(), &TableLayout::default());
//! assert_eq!(
//!     rendered,
//!     "+-------+-----+\n\
//!      | Name  | Age |\n\
//!      +-------+-----+\n\
//!      | Alice |  30 |\n\
//!      +-------+-----+"
//! );
//! ```

pub use pulldown_cmark::Alignment;

use crate::ansi::{truncate, visible_width};
use crate::style::StyleTable;
use crate::wordwrap::{DEFAULT_BREAKPOINTS, wordwrap};

/// Marker appended to truncated cells.
pub const ELLIPSIS: &str = "…";

// ============================================================================
// Borders
// ============================================================================

/// Border characters for table rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBorder {
    pub top_left: String,
    pub top_right: String,
    pub bottom_left: String,
    pub bottom_right: String,
    /// Horizontal line character.
    pub horizontal: String,
    /// Vertical line character.
    pub vertical: String,
    /// Cross intersection character.
    pub cross: String,
    pub top_t: String,
    pub bottom_t: String,
    pub left_t: String,
    pub right_t: String,
}

impl TableBorder {
    /// Box-drawing border with square corners.
    pub fn normal() -> Self {
        Self::from_parts(["┌", "┐", "└", "┘", "─", "│", "┼", "┬", "┴", "├", "┤"])
    }

    /// Box-drawing border with rounded corners.
    pub fn rounded() -> Self {
        Self::from_parts(["╭", "╮", "╰", "╯", "─", "│", "┼", "┬", "┴", "├", "┤"])
    }

    /// Plain ASCII border.
    pub fn ascii() -> Self {
        Self::uniform("+", "|", "-")
    }

    /// A border that uses `center` for every corner and intersection.
    pub fn uniform(center: &str, column: &str, row: &str) -> Self {
        Self {
            top_left: center.to_string(),
            top_right: center.to_string(),
            bottom_left: center.to_string(),
            bottom_right: center.to_string(),
            horizontal: row.to_string(),
            vertical: column.to_string(),
            cross: center.to_string(),
            top_t: center.to_string(),
            bottom_t: center.to_string(),
            left_t: center.to_string(),
            right_t: center.to_string(),
        }
    }

    /// The border a table style asks for.
    ///
    /// Custom separators apply only when all three are set; anything less
    /// falls back to [`TableBorder::normal`].
    pub fn from_style(style: &StyleTable) -> Self {
        match (&style.center_separator, &style.column_separator, &style.row_separator) {
            (Some(center), Some(column), Some(row)) => Self::uniform(center, column, row),
            _ => Self::normal(),
        }
    }

    fn from_parts(parts: [&str; 11]) -> Self {
        let [tl, tr, bl, br, h, v, x, tt, bt, lt, rt] = parts.map(str::to_string);
        Self {
            top_left: tl,
            top_right: tr,
            bottom_left: bl,
            bottom_right: br,
            horizontal: h,
            vertical: v,
            cross: x,
            top_t: tt,
            bottom_t: bt,
            left_t: lt,
            right_t: rt,
        }
    }
}

impl Default for TableBorder {
    fn default() -> Self {
        Self::normal()
    }
}

/// Position of a horizontal border line within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPosition {
    /// Top edge of the table.
    Top,
    /// Between the header and the body.
    Middle,
    /// Bottom edge of the table.
    Bottom,
}

// ============================================================================
// Layout
// ============================================================================

/// Sizing options for a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Spaces on each side of cell content.
    pub cell_padding: usize,
    /// Widest the whole table may be (0 = no limit).
    pub max_width: usize,
    /// Wrap cells that do not fit instead of truncating them.
    pub wrap: bool,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            cell_padding: 1,
            max_width: 0,
            wrap: true,
        }
    }
}

impl TableLayout {
    /// Sets the maximum table width.
    #[must_use]
    pub const fn max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Sets whether oversized cells wrap.
    #[must_use]
    pub const fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }
}

/// Sizes columns to their content, shrinking them proportionally when the
/// table would be wider than `max_width`.
///
/// `overhead` is the width taken by borders and padding. Every column keeps
/// at least one cell.
///
/// ```rust
/// use glamour::table::calculate_column_widths;
///
/// assert_eq!(calculate_column_widths(&[5, 3], 7, 0), vec![5, 3]);
/// assert_eq!(calculate_column_widths(&[20, 20], 7, 27), vec![10, 10]);
/// ```
pub fn calculate_column_widths(natural: &[usize], overhead: usize, max_width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = natural.iter().map(|w| (*w).max(1)).collect();
    let content: usize = widths.iter().sum();
    if max_width == 0 || content + overhead <= max_width {
        return widths;
    }

    let available = max_width.saturating_sub(overhead);
    if available < widths.len() {
        widths.fill(1);
        return widths;
    }

    let last = widths.len() - 1;
    let mut remaining = available;
    for width in widths.iter_mut().take(last) {
        let scaled = (*width * available / content).max(1);
        *width = scaled;
        remaining = remaining.saturating_sub(scaled);
    }
    widths[last] = remaining.clamp(1, natural[last].max(1));
    widths
}

/// Pads `content` to `width` visible cells with the given alignment.
///
/// Content already at least `width` wide is returned unchanged.
///
/// ```rust
/// use glamour::table::{pad_content, Alignment};
///
/// assert_eq!(pad_content("Hi", 6, Alignment::Left), "Hi    ");
/// assert_eq!(pad_content("Hi", 6, Alignment::Right), "    Hi");
/// assert_eq!(pad_content("Hi", 6, Alignment::Center), "  Hi  ");
/// ```
pub fn pad_content(content: &str, width: usize, alignment: Alignment) -> String {
    let content_width = visible_width(content);
    if content_width >= width {
        return content.to_string();
    }
    let padding = width - content_width;
    let (left, right) = match alignment {
        Alignment::None | Alignment::Left => (0, padding),
        Alignment::Right => (padding, 0),
        Alignment::Center => (padding / 2, padding - padding / 2),
    };
    let mut out = String::with_capacity(content.len() + padding);
    out.push_str(&" ".repeat(left));
    out.push_str(content);
    out.push_str(&" ".repeat(right));
    out
}

/// Fits a cell into `width` columns, one string per output line.
///
/// With `wrap` the content is word-wrapped and any word that still does not
/// fit is cut; without it every line is truncated with [`ELLIPSIS`].
pub fn fit_cell(content: &str, width: usize, wrap: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for line in content.split('\n') {
        if visible_width(line) <= width {
            lines.push(line.to_string());
        } else if wrap {
            for wrapped in wordwrap(line, width, DEFAULT_BREAKPOINTS).split('\n') {
                lines.push(truncate(wrapped.trim_end_matches(' '), width, ELLIPSIS));
            }
        } else {
            lines.push(truncate(line, width, ELLIPSIS));
        }
    }
    lines
}

// ============================================================================
// Builder
// ============================================================================

/// Collects a table's rendered cells and lays them out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableBuilder {
    alignments: Vec<Alignment>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    /// Starts a table with the given per-column alignments.
    pub const fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Sets the header cells.
    pub fn header(&mut self, cells: Vec<String>) {
        self.header = cells;
    }

    /// Appends a body row.
    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Number of columns: the widest of the header, the rows and the
    /// declared alignments.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain([self.header.len(), self.alignments.len()])
            .max()
            .unwrap_or(0)
    }

    /// Number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has neither a header nor rows.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    fn alignment(&self, column: usize) -> Alignment {
        self.alignments.get(column).copied().unwrap_or(Alignment::None)
    }

    /// Renders the grid. Lines are joined with `\n`, without a trailing one.
    pub fn render(&self, border: &TableBorder, layout: &TableLayout) -> String {
        let columns = self.column_count();
        if self.is_empty() || columns == 0 {
            return String::new();
        }

        let mut natural = vec![0; columns];
        for row in std::iter::once(&self.header).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                natural[i] = natural[i].max(visible_width(cell));
            }
        }
        let overhead = columns * layout.cell_padding * 2 + (columns + 1) * visible_width(&border.vertical);
        let widths = calculate_column_widths(&natural, overhead, layout.max_width);
        tracing::trace!(columns, rows = self.rows.len(), ?widths, "table layout");

        let mut lines = Vec::new();
        let push_border = |lines: &mut Vec<String>, position| {
            let line = render_horizontal_border(&widths, border, position, layout.cell_padding);
            if !line.is_empty() {
                lines.push(line);
            }
        };

        push_border(&mut lines, BorderPosition::Top);
        if !self.header.is_empty() {
            lines.extend(self.render_row(&self.header, &widths, border, layout));
            // A header with no body closes straight into the bottom border.
            if !self.rows.is_empty() {
                push_border(&mut lines, BorderPosition::Middle);
            }
        }
        for row in &self.rows {
            lines.extend(self.render_row(row, &widths, border, layout));
        }
        push_border(&mut lines, BorderPosition::Bottom);

        lines.join("\n")
    }

    fn render_row(&self, cells: &[String], widths: &[usize], border: &TableBorder, layout: &TableLayout) -> Vec<String> {
        let fitted: Vec<Vec<String>> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| fit_cell(cells.get(i).map_or("", String::as_str), *width, layout.wrap))
            .collect();
        let height = fitted.iter().map(Vec::len).max().unwrap_or(1);
        let padding = " ".repeat(layout.cell_padding);

        (0..height)
            .map(|line| {
                let mut out = border.vertical.clone();
                for (i, width) in widths.iter().enumerate() {
                    let content = fitted[i].get(line).map_or("", String::as_str);
                    out.push_str(&padding);
                    out.push_str(&pad_content(content, *width, self.alignment(i)));
                    out.push_str(&padding);
                    out.push_str(&border.vertical);
                }
                out
            })
            .collect()
    }
}

/// Renders a horizontal border line.
///
/// ```rust
/// use glamour::table::{render_horizontal_border, BorderPosition, TableBorder};
///
/// let line = render_horizontal_border(&[5, 3, 7], &TableBorder::ascii(), BorderPosition::Top, 1);
/// assert_eq!(line, "+-------+-----+---------+");
/// ```
pub fn render_horizontal_border(
    widths: &[usize],
    border: &TableBorder,
    position: BorderPosition,
    cell_padding: usize,
) -> String {
    if widths.is_empty() || border.horizontal.is_empty() {
        return String::new();
    }
    let (left, mid, right) = match position {
        BorderPosition::Top => (&border.top_left, &border.top_t, &border.top_right),
        BorderPosition::Middle => (&border.left_t, &border.cross, &border.right_t),
        BorderPosition::Bottom => (&border.bottom_left, &border.bottom_t, &border.bottom_right),
    };

    let segments: Vec<String> = widths
        .iter()
        .map(|w| border.horizontal.repeat(w + cell_padding * 2))
        .collect();
    format!("{left}{}{right}", segments.join(mid))
}
