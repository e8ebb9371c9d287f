//! The element dispatcher.
//!
//! [`RenderContext`] walks a document tree depth first. Block nodes push a
//! frame onto the [`BlockStack`] and, when they finish, wrap their buffer
//! and write it through a [`MarginWriter`] into the parent frame. Inline
//! nodes render straight into the current frame's buffer.

use crate::RendererOptions;
use crate::ansi::ColorProfile;
use crate::ast::{Alignment, LinkKind, Node, NodeKind};
use crate::block::{BlockElement, BlockStack};
use crate::element::{BaseElement, render_text};
use crate::error::{Error, Result};
use crate::highlight::{DEFAULT_PALETTE_THEME, register_if_absent};
use crate::hyperlink::{hyperlink_bounds, is_fragment_only, resolve_url};
use crate::link::{LinkContext, LinkData, LinkFormatter};
use crate::list::wrap_list_content;
use crate::margin::MarginWriter;
use crate::style::{StyleBlock, StylePrimitive, cascade_blocks};
use crate::table::{TableBorder, TableBuilder, TableLayout};
use crate::table_links::{TableLink, TableLinks};
use crate::wordwrap::{DEFAULT_BREAKPOINTS, wordwrap};

/// How a finished block's buffer is wrapped and padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Word wrap, pad with the block's own style.
    Words,
    /// Word wrap, pad with the parent's style so backgrounds stop at the text.
    Heading,
    /// List wrap with hanging indents.
    List,
}

/// Per-table state, alive from entering a table to finishing it.
#[derive(Debug)]
struct TableState {
    builder: TableBuilder,
    /// Links listed below the table; `None` when links render inline.
    links: Option<TableLinks>,
}

/// State of one render pass.
pub(crate) struct RenderContext<'a> {
    options: &'a RendererOptions,
    stack: BlockStack,
    table: Option<TableState>,
    list_depth: usize,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(options: &'a RendererOptions) -> Self {
        Self {
            options,
            stack: BlockStack::new(),
            table: None,
            list_depth: 0,
        }
    }

    /// Renders `root` and returns the output.
    pub(crate) fn render(mut self, root: &Node) -> Result<String> {
        self.node(root, &NodeKind::Document, 0, true)?;
        while !self.stack.is_empty() {
            self.finish_block(Flow::Words);
        }
        Ok(self.stack.take_root())
    }

    const fn profile(&self) -> ColorProfile {
        self.options.color_profile
    }

    fn block_style(&self) -> StylePrimitive {
        self.stack.current().style.style.clone()
    }

    fn write(&mut self, s: &str) {
        self.stack.current_buffer().push_str(s);
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    fn children(&mut self, node: &Node) -> Result<()> {
        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            self.node(child, &node.kind, index, index + 1 == count)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node, parent: &NodeKind, index: usize, last: bool) -> Result<()> {
        let options = self.options;
        let styles = &options.styles;
        let first = index == 0;
        match &node.kind {
            NodeKind::Document => {
                self.begin_block(BlockElement::new(styles.document.clone()).with_margin(true));
                self.children(node)?;
                self.finish_block(Flow::Words);
            }
            NodeKind::FrontMatter(_) => {}
            NodeKind::Paragraph => self.paragraph(node, parent, first)?,
            NodeKind::Heading(level) => {
                let rules = cascade_blocks([&styles.heading, styles.heading_style(*level)]);
                if !first {
                    self.write("\n");
                }
                let style = self.stack.current().style.cascade(&rules, false);
                self.begin_block(BlockElement::new(style).with_margin(true));
                self.children(node)?;
                self.finish_block(Flow::Heading);
            }
            NodeKind::BlockQuote => self.container(node, &styles.block_quote)?,
            NodeKind::DefinitionList => self.container(node, &styles.definition_list)?,
            NodeKind::DefinitionTerm => {
                if !first {
                    self.write("\n");
                }
                self.marker(BaseElement::new("", &styles.definition_term))?;
                self.children(node)?;
            }
            NodeKind::DefinitionDescription => {
                self.marker(BaseElement::new("", &styles.definition_description))?;
                self.children(node)?;
                self.write("\n");
            }
            NodeKind::CodeBlock { language, code } => self.code_block(language, code)?,
            NodeKind::HtmlBlock(html) => {
                let text = strip_html(html);
                let text = text.trim();
                if !text.is_empty() {
                    if !first {
                        self.write("\n");
                    }
                    self.marker(BaseElement::new(text, &styles.html_block.style))?;
                    self.write("\n");
                }
            }
            NodeKind::List { start } => self.list(node, *start)?,
            NodeKind::Item { task } => {
                let start = match parent {
                    NodeKind::List { start } => *start,
                    _ => None,
                };
                self.item(node, start, index, last, *task)?;
            }
            NodeKind::Table(alignments) => self.table(node, alignments)?,
            NodeKind::Rule => self.marker(BaseElement::new("", &styles.horizontal_rule))?,
            NodeKind::TableHead | NodeKind::TableRow | NodeKind::TableCell => self.children(node)?,
            _ => {
                let mut out = String::new();
                self.inline(&mut out, node, &StylePrimitive::default())?;
                self.write(&out);
            }
        }
        Ok(())
    }

    /// Renders a single element into the current block.
    fn marker(&mut self, element: BaseElement<'_>) -> Result<()> {
        let mut out = String::new();
        element.render(&mut out, self.profile(), &self.stack.current().style.style)?;
        self.write(&out);
        Ok(())
    }

    /// Pushes `frame`, writing its block prefix into the parent and its
    /// prefix into its own buffer.
    fn begin_block(&mut self, frame: BlockElement) {
        let profile = self.profile();
        let parent = self.block_style();
        let own = frame.style.style.clone();
        render_text(
            self.stack.current_buffer(),
            profile,
            &parent,
            own.block_prefix.as_deref().unwrap_or_default(),
        );
        self.stack.push(frame);
        render_text(
            self.stack.current_buffer(),
            profile,
            &own,
            own.prefix.as_deref().unwrap_or_default(),
        );
    }

    /// Flushes the top frame into its parent and pops it.
    fn finish_block(&mut self, flow: Flow) {
        let profile = self.profile();
        let width = self.stack.width(self.options.word_wrap);
        let parent_style = self.stack.parent().style.style.clone();
        let Some((current, parent)) = self.stack.current_and_parent_buffer() else {
            return;
        };

        if !current.margin {
            parent.push_str(&current.block);
        } else if !current.block.trim().is_empty() {
            let wrapped = match flow {
                Flow::List => wrap_list_content(&current.block, width),
                Flow::Words | Flow::Heading => wordwrap(&current.block, width, DEFAULT_BREAKPOINTS),
            };
            let mut layout = current.style.clone();
            if flow == Flow::Heading {
                layout.style = parent_style.clone();
            }
            let mut writer = MarginWriter::new(parent, profile, &layout, &parent_style, width);
            writer.push(&wrapped);
            if current.newline {
                writer.push("\n");
            }
            writer.finish();
        }

        let own = &current.style.style;
        render_text(parent, profile, own, own.suffix.as_deref().unwrap_or_default());
        render_text(
            parent,
            profile,
            &parent_style,
            own.block_suffix.as_deref().unwrap_or_default(),
        );
        self.stack.pop();
    }

    /// Block quotes and definition lists: an indented, wrapped frame.
    fn container(&mut self, node: &Node, rules: &StyleBlock) -> Result<()> {
        self.write("\n");
        let style = self.stack.current().style.cascade(rules, false);
        self.begin_block(BlockElement::new(style).with_margin(true).with_newline(true));
        self.children(node)?;
        self.finish_block(Flow::Words);
        Ok(())
    }

    fn paragraph(&mut self, node: &Node, parent: &NodeKind, first: bool) -> Result<()> {
        if !first {
            self.write("\n");
        }
        if matches!(
            parent,
            NodeKind::BlockQuote | NodeKind::Item { .. } | NodeKind::DefinitionDescription
        ) {
            return self.children(node);
        }
        let style = self
            .stack
            .current()
            .style
            .cascade(&self.options.styles.paragraph, false);
        self.begin_block(BlockElement::new(style).with_margin(true).with_newline(true));
        self.children(node)?;
        self.finish_block(Flow::Words);
        Ok(())
    }

    fn list(&mut self, node: &Node, start: Option<u64>) -> Result<()> {
        let styles = &self.options.styles;
        let level_indent = styles.list.level_indent;
        let nested = self.list_depth > 0;
        let mut rules = styles.list.block.clone();
        if nested {
            rules.indent = Some(level_indent);
        } else if rules.indent.is_none() {
            rules.indent = Some(0);
        }

        self.write("\n");
        let style = self.stack.current().style.cascade(&rules, false);
        self.begin_block(BlockElement::new(style).with_margin(true).with_newline(!nested));
        tracing::trace!(depth = self.list_depth, ordered = start.is_some(), "list");

        self.list_depth += 1;
        let result = self.children(node);
        self.list_depth -= 1;
        result?;

        self.finish_block(Flow::List);
        Ok(())
    }

    fn item(&mut self, node: &Node, start: Option<u64>, index: usize, last: bool, task: Option<bool>) -> Result<()> {
        let options = self.options;
        let styles = &options.styles;
        match (task, start) {
            (Some(checked), _) => {
                let marker = if checked {
                    &styles.task.ticked
                } else {
                    &styles.task.unticked
                };
                self.marker(BaseElement::new("", &styles.task.style).prefix(marker))?;
            }
            (None, Some(start)) => {
                let number = (start + index as u64).to_string();
                self.marker(BaseElement::new("", &styles.enumeration).prefix(&number))?;
            }
            (None, None) => self.marker(BaseElement::new("", &styles.item))?,
        }
        self.children(node)?;
        if !last {
            self.write("\n");
        }
        Ok(())
    }

    fn code_block(&mut self, language: &str, code: &str) -> Result<()> {
        let options = self.options;
        let profile = self.profile();
        let rules = &options.styles.code_block.block;
        let block = self.block_style();
        let code = code.strip_suffix('\n').unwrap_or(code);

        let mut body = String::new();
        match self.highlight(code, language)? {
            Some(highlighted) => {
                render_text(&mut body, profile, &block, rules.style.block_prefix.as_deref().unwrap_or_default());
                body.push_str(&highlighted);
                render_text(&mut body, profile, &block, rules.style.block_suffix.as_deref().unwrap_or_default());
            }
            None => BaseElement::new(code, &rules.style).render(&mut body, profile, &block)?,
        }
        body.push('\n');

        let out = self.stack.current_buffer();
        out.push('\n');
        let mut writer = MarginWriter::new(out, profile, rules, &block, 0);
        writer.push(&body);
        writer.finish();
        Ok(())
    }

    /// Runs the highlighter when one is configured and the block can use it.
    fn highlight(&self, code: &str, language: &str) -> Result<Option<String>> {
        let options = self.options;
        let rules = &options.styles.code_block;
        let Some(highlighter) = &options.highlighter else {
            return Ok(None);
        };
        if language.is_empty() || !options.color_profile.has_color() {
            return Ok(None);
        }
        if rules.theme.is_none() && rules.chroma.is_none() {
            return Ok(None);
        }
        let theme = rules.theme.as_deref().unwrap_or(DEFAULT_PALETTE_THEME);
        if let Some(palette) = &rules.chroma {
            register_if_absent(theme, || palette.clone());
        }
        highlighter
            .highlight(code, language, theme, options.color_profile)
            .map_err(|source| Error::Highlight {
                language: language.to_string(),
                source,
            })
    }

    // ========================================================================
    // Tables
    // ========================================================================

    fn table(&mut self, node: &Node, alignments: &[Alignment]) -> Result<()> {
        let options = self.options;
        let profile = self.profile();
        let rules = &options.styles.table;
        let block = self.block_style();
        let style = block.cascade(&rules.block.style, false);

        let out = self.stack.current_buffer();
        out.push('\n');
        render_text(out, profile, &block, style.block_prefix.as_deref().unwrap_or_default());
        render_text(out, profile, &style, style.prefix.as_deref().unwrap_or_default());

        // A link formatter owns link output, table cells included.
        let footer = !options.inline_table_links && options.link_formatter.is_none();
        let links = footer.then(|| TableLinks::collect(node));
        let outer = self.table.replace(TableState {
            builder: TableBuilder::new(alignments.to_vec()),
            links,
        });
        let result = self.table_rows(node);
        let state = std::mem::replace(&mut self.table, outer);
        result?;
        let Some(state) = state else {
            return Ok(());
        };

        let width = self.stack.width(options.word_wrap);
        let layout = TableLayout {
            cell_padding: 1,
            max_width: width.saturating_sub(rules.block.consumed_width()),
            wrap: options.table_wrap,
        };
        let grid = state.builder.render(&TableBorder::from_style(rules), &layout);

        let out = self.stack.current_buffer();
        let mut writer = MarginWriter::new(out, profile, &rules.block, &block, 0);
        writer.push(&grid);
        writer.finish();
        render_text(out, profile, &style, style.suffix.as_deref().unwrap_or_default());
        render_text(out, profile, &block, style.block_suffix.as_deref().unwrap_or_default());
        if let Some(links) = &state.links {
            links.render_footer(out, profile, &options.styles, &block, options.base_url.as_deref(), width)?;
        }
        out.push('\n');
        Ok(())
    }

    fn table_rows(&mut self, node: &Node) -> Result<()> {
        for part in &node.children {
            match part.kind {
                NodeKind::TableHead => {
                    let cells = self.cells(part)?;
                    if let Some(table) = &mut self.table {
                        table.builder.header(cells);
                    }
                }
                NodeKind::TableRow => {
                    let cells = self.cells(part)?;
                    if let Some(table) = &mut self.table {
                        table.builder.row(cells);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn cells(&self, row: &Node) -> Result<Vec<String>> {
        let attrs = self.options.styles.table.block.style.attributes();
        row.children
            .iter()
            .map(|cell| {
                let mut out = String::new();
                for child in &cell.children {
                    self.inline(&mut out, child, &attrs)?;
                }
                Ok(out)
            })
            .collect()
    }

    /// Footer links of the table being rendered, when links go below it.
    fn footer_links(&self) -> Option<&TableLinks> {
        self.table.as_ref().and_then(|t| t.links.as_ref())
    }

    // ========================================================================
    // Inlines
    // ========================================================================

    /// Renders an inline node. `attrs` holds the colors and attributes of
    /// the enclosing spans (emphasis, link text, table cell).
    fn inline(&self, out: &mut String, node: &Node, attrs: &StylePrimitive) -> Result<()> {
        let options = self.options;
        let styles = &options.styles;
        let profile = self.profile();
        let block = &self.stack.current().style.style;
        let outer = block.cascade(attrs, false);

        match &node.kind {
            NodeKind::Text(text) => {
                let merged = block.cascade(&styles.text, false).overlay(attrs);
                BaseElement::new(text, &styles.text)
                    .leaf()
                    .render_with(out, profile, &outer, &merged)?;
            }
            NodeKind::SoftBreak if options.preserve_newlines => out.push('\n'),
            NodeKind::SoftBreak => render_text(out, profile, &outer, " "),
            NodeKind::HardBreak => out.push('\n'),
            NodeKind::Code(code) => BaseElement::new(code, &styles.code.style).render(out, profile, block)?,
            NodeKind::Html(html) => {
                let text = strip_html(html);
                if !text.trim().is_empty() {
                    BaseElement::new(&text, &styles.html_span.style).render(out, profile, &outer)?;
                }
            }
            NodeKind::Emphasis => self.span(out, &node.children, attrs, &styles.emph)?,
            NodeKind::Strong => self.span(out, &node.children, attrs, &styles.strong)?,
            NodeKind::Strikethrough => self.span(out, &node.children, attrs, &styles.strikethrough)?,
            NodeKind::Link { url, title, kind } => self.link(out, node, url, title, *kind, attrs)?,
            NodeKind::Image { url, title } => self.image(out, node, url, title, attrs)?,
            _ => {
                for child in &node.children {
                    self.inline(out, child, attrs)?;
                }
            }
        }
        Ok(())
    }

    /// Renders `children` decorated by `role`: its block prefix and prefix,
    /// the children with its colors laid over theirs, then the suffixes.
    fn span(&self, out: &mut String, children: &[Node], attrs: &StylePrimitive, role: &StylePrimitive) -> Result<()> {
        let profile = self.profile();
        let outer = self.stack.current().style.style.cascade(attrs, false);
        let merged = outer.cascade(role, false);
        let inner = attrs.cascade(&role.attributes(), false);

        render_text(out, profile, &outer, merged.block_prefix.as_deref().unwrap_or_default());
        render_text(out, profile, &merged, merged.prefix.as_deref().unwrap_or_default());
        for child in children {
            self.inline(out, child, &inner)?;
        }
        render_text(out, profile, &merged, merged.suffix.as_deref().unwrap_or_default());
        render_text(out, profile, &outer, merged.block_suffix.as_deref().unwrap_or_default());
        Ok(())
    }

    fn link(
        &self,
        out: &mut String,
        node: &Node,
        url: &str,
        title: &str,
        kind: LinkKind,
        attrs: &StylePrimitive,
    ) -> Result<()> {
        let options = self.options;
        let styles = &options.styles;
        let profile = self.profile();
        let outer = self.stack.current().style.style.cascade(attrs, false);

        if let Some(links) = self.footer_links() {
            if let Some(link) = TableLink::from_node(node) {
                BaseElement::new(&links.display(&link), &styles.link_text).render(out, profile, &outer)?;
            }
            return Ok(());
        }

        let href = if kind == LinkKind::Email && !url.starts_with("mailto:") {
            format!("mailto:{url}")
        } else {
            url.to_string()
        };

        if let Some(formatter) = &options.link_formatter {
            let data = LinkData {
                url: href,
                text: node.plain_text(),
                title: title.to_string(),
                is_auto_link: kind != LinkKind::Inline,
                is_in_table: self.table.is_some(),
                is_image: false,
                link_style: styles.link.clone(),
                text_style: styles.link_text.clone(),
            };
            return self.format_link(out, formatter.as_ref(), &data, &outer);
        }

        let resolved = resolve_url(options.base_url.as_deref(), &href);
        let bounds = if profile.has_color() && options.terminal.supports_hyperlinks() {
            hyperlink_bounds(&resolved)
        } else {
            None
        };

        if let Some((open, _)) = &bounds {
            out.push_str(open);
        }
        self.span(out, &node.children, attrs, &styles.link_text)?;
        if let Some((_, close)) = &bounds {
            out.push_str(close);
        }

        // Autolinks already show their URL as the text.
        if kind != LinkKind::Inline || href.is_empty() || is_fragment_only(&href) {
            return Ok(());
        }
        let mut style = styles.link.clone();
        if node.children.is_empty() {
            style.block_prefix = None;
            style.block_suffix = None;
        } else {
            render_text(out, profile, &outer, " ");
        }
        if let Some((open, _)) = &bounds {
            out.push_str(open);
        }
        BaseElement::new(&resolved, &style).render(out, profile, &outer)?;
        if let Some((_, close)) = &bounds {
            out.push_str(close);
        }
        Ok(())
    }

    fn image(&self, out: &mut String, node: &Node, url: &str, title: &str, attrs: &StylePrimitive) -> Result<()> {
        let options = self.options;
        let styles = &options.styles;
        let profile = self.profile();
        let outer = self.stack.current().style.style.cascade(attrs, false);

        if let Some(links) = self.footer_links() {
            if let Some(link) = TableLink::from_node(node) {
                BaseElement::new(&links.display(&link), &styles.image_text).render(out, profile, &outer)?;
            }
            return Ok(());
        }

        let alt = node.plain_text();
        if let Some(formatter) = &options.link_formatter {
            let data = LinkData {
                url: url.to_string(),
                text: alt,
                title: title.to_string(),
                is_auto_link: false,
                is_in_table: self.table.is_some(),
                is_image: true,
                link_style: styles.image.clone(),
                text_style: styles.image_text.clone(),
            };
            return self.format_link(out, formatter.as_ref(), &data, &outer);
        }

        if !alt.is_empty() {
            BaseElement::new(&alt, &styles.image_text).render(out, profile, &outer)?;
        }
        if !url.is_empty() {
            let resolved = resolve_url(options.base_url.as_deref(), url);
            let prefix = if alt.is_empty() { "" } else { " " };
            BaseElement::new(&resolved, &styles.image)
                .prefix(prefix)
                .render(out, profile, &outer)?;
        }
        Ok(())
    }

    fn format_link(
        &self,
        out: &mut String,
        formatter: &dyn LinkFormatter,
        data: &LinkData,
        outer: &StylePrimitive,
    ) -> Result<()> {
        let ctx = LinkContext {
            profile: self.profile(),
            terminal: &self.options.terminal,
            base_url: self.options.base_url.as_deref(),
            block_style: outer,
        };
        let formatted = formatter
            .format_link(data, &ctx)
            .map_err(|source| Error::LinkFormatter {
                url: data.url.clone(),
                source,
            })?;
        out.push_str(&formatted);
        Ok(())
    }
}

// ============================================================================
// HTML
// ============================================================================

/// Drops tags and decodes character references.
fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    decode_entities(&text)
}

/// Longest reference considered, `&` and `;` included.
const MAX_ENTITY_LEN: usize = 12;

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&end| end < MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            return char::from_u32(code);
        }
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;
    use crate::error::BoxError;
    use crate::highlight::Highlighter;
    use crate::hyperlink::TerminalInfo;
    use crate::style::{StyleConfig, StyleTask};
    use std::sync::Arc;

    fn plain_styles() -> StyleConfig {
        StyleConfig {
            item: StylePrimitive::new().block_prefix("• "),
            enumeration: StylePrimitive::new().block_prefix(". "),
            block_quote: StyleBlock::new().indent(1).indent_token("| "),
            task: StyleTask::new(),
            ..StyleConfig::default()
        }
    }

    fn options(styles: StyleConfig, width: usize) -> RendererOptions {
        RendererOptions {
            styles,
            word_wrap: width,
            color_profile: ColorProfile::Ascii,
            terminal: TerminalInfo::default(),
            highlighter: None,
            ..RendererOptions::default()
        }
    }

    fn trimmed(out: &str) -> String {
        out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
    }

    fn render_opts(options: &RendererOptions, markdown: &str) -> String {
        RenderContext::new(options).render(&Node::parse(markdown)).unwrap()
    }

    fn render(markdown: &str) -> String {
        trimmed(&render_opts(&options(plain_styles(), 80), markdown))
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(render("Hello"), "Hello");
        assert_eq!(render("one\n\ntwo"), "one\n\ntwo");
    }

    #[test]
    fn test_soft_and_hard_breaks() {
        assert_eq!(render("a\nb"), "a b");
        assert_eq!(render("a  \nb"), "a\nb");
        let mut opts = options(plain_styles(), 80);
        opts.preserve_newlines = true;
        assert_eq!(trimmed(&render_opts(&opts, "a\nb")), "a\nb");
    }

    #[test]
    fn test_heading_then_paragraph() {
        let styles = StyleConfig {
            heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n")),
            h2: StyleBlock::new().style(StylePrimitive::new().prefix("## ")),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(&options(styles, 80), "## Title\n\nBody"));
        assert_eq!(out, "## Title\n\nBody");
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let out = render_opts(&options(plain_styles(), 20), "the quick brown fox jumps over the lazy dog");
        for line in out.lines() {
            assert_eq!(line.chars().count(), 20, "padded line {line:?}");
        }
        assert_eq!(trimmed(&out), "the quick brown fox\njumps over the lazy\ndog");
    }

    #[test]
    fn test_document_margin() {
        let styles = StyleConfig {
            document: StyleBlock::new().margin(2),
            ..plain_styles()
        };
        let out = render_opts(&options(styles, 12), "aaa bbb ccc ddd");
        assert_eq!(trimmed(&out), "  aaa bbb\n  ccc ddd");
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(render("- a\n- b"), "\n• a\n• b");
    }

    #[test]
    fn test_ordered_list_start() {
        assert_eq!(render("3. x\n4. y"), "\n3. x\n4. y");
    }

    #[test]
    fn test_nested_list_level_indent() {
        assert_eq!(render("- a\n  - b\n- c"), "\n• a\n    • b\n• c");
    }

    #[test]
    fn test_task_items() {
        let out = render("- [x] done\n- [ ] todo");
        let lines: Vec<&str> = out.lines().skip(1).collect();
        assert!(lines[0].starts_with("[x] ") && lines[0].ends_with("done"));
        assert!(lines[1].starts_with("[ ] ") && lines[1].ends_with("todo"));
    }

    #[test]
    fn test_list_hanging_indent() {
        let out = trimmed(&render_opts(
            &options(plain_styles(), 16),
            "- one two three four five six",
        ));
        assert_eq!(out, "\n• one two three\n  four five six");
    }

    #[test]
    fn test_block_quote_indent() {
        assert_eq!(render("> quoted text"), "\n| quoted text");
    }

    #[test]
    fn test_block_quote_wraps_inside_indent() {
        let out = trimmed(&render_opts(&options(plain_styles(), 12), "> aaa bbb ccc"));
        assert_eq!(out, "\n| aaa bbb\n| ccc");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(render("```\nlet x = 1;\n```"), "\nlet x = 1;");
        let styles = StyleConfig {
            code_block: crate::style::StyleCodeBlock::new().block(StyleBlock::new().margin(2)),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(&options(styles, 80), "```\na\nb\n```\n\nafter"));
        assert_eq!(out, "\n  a\n  b\n\nafter");
    }

    #[test]
    fn test_code_span_is_literal() {
        let styles = StyleConfig {
            code: StyleBlock::new().style(StylePrimitive::new().block_prefix("`").block_suffix("`")),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(&options(styles, 80), r"use `\*ptr` here"));
        assert_eq!(out, r"use `\*ptr` here");
    }

    #[test]
    fn test_escapes_removed_from_text() {
        assert_eq!(render(r"\*not emphasis\*"), "*not emphasis*");
    }

    #[test]
    fn test_emphasis_decorations() {
        let styles = StyleConfig {
            emph: StylePrimitive::new().block_prefix("*").block_suffix("*"),
            strong: StylePrimitive::new().block_prefix("**").block_suffix("**"),
            strikethrough: StylePrimitive::new().block_prefix("~~").block_suffix("~~"),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(&options(styles, 80), "*a* **b** ~~c~~"));
        assert_eq!(out, "*a* **b** ~~c~~");
    }

    #[test]
    fn test_emphasis_attributes_reach_text() {
        let styles = StyleConfig {
            emph: StylePrimitive::new().italic(true),
            ..plain_styles()
        };
        let mut opts = options(styles, 80);
        opts.color_profile = ColorProfile::TrueColor;
        let out = render_opts(&opts, "*hi*");
        assert!(out.starts_with("\x1b[3mhi"), "{out:?}");
        assert_eq!(strip_ansi(&trimmed(&out)), "hi");
    }

    #[test]
    fn test_colors_survive_wrapping() {
        let styles = StyleConfig {
            strong: StylePrimitive::new().color("#ff0000"),
            ..plain_styles()
        };
        let mut opts = options(styles, 10);
        opts.color_profile = ColorProfile::TrueColor;
        let out = render_opts(&opts, "**aaaa bbbb cccc**");
        assert_eq!(strip_ansi(&trimmed(&out)), "aaaa bbbb\ncccc");
    }

    #[test]
    fn test_link_text_and_url() {
        assert_eq!(render("[docs](https://x.io)"), "docs https://x.io");
        assert_eq!(render("[top](#top)"), "top");
    }

    #[test]
    fn test_autolink_shows_url_once() {
        assert_eq!(render("<https://x.io>"), "https://x.io");
        assert_eq!(render("see https://x.io."), "see https://x.io.");
    }

    #[test]
    fn test_relative_link_resolved() {
        let mut opts = options(plain_styles(), 80);
        opts.base_url = Some("https://x.io/docs/".to_string());
        assert_eq!(
            trimmed(&render_opts(&opts, "[guide](/guide.md)")),
            "guide https://x.io/docs/guide.md"
        );
    }

    #[test]
    fn test_hyperlinks_when_supported() {
        let mut opts = options(plain_styles(), 80);
        opts.color_profile = ColorProfile::TrueColor;
        opts.terminal = TerminalInfo::default().term_program("WezTerm");
        let out = render_opts(&opts, "[docs](https://x.io)");
        assert!(out.contains("\x1b]8;id="));
        assert_eq!(strip_ansi(&trimmed(&out)), "docs https://x.io");
    }

    #[test]
    fn test_custom_formatter() {
        let mut opts = options(plain_styles(), 80);
        opts.link_formatter = Some(Arc::new(
            |data: &LinkData, _: &LinkContext<'_>| -> Result<String, BoxError> {
                Ok(format!("<{}|{}|{}>", data.text, data.url, data.is_auto_link))
            },
        ));
        assert_eq!(
            trimmed(&render_opts(&opts, "[a](https://x.io) <me@x.io>")),
            "<a|https://x.io|false> <me@x.io|mailto:me@x.io|true>"
        );
    }

    #[test]
    fn test_formatter_error_names_url() {
        let mut opts = options(plain_styles(), 80);
        opts.link_formatter = Some(Arc::new(
            |_: &LinkData, _: &LinkContext<'_>| -> Result<String, BoxError> { Err("nope".into()) },
        ));
        let err = RenderContext::new(&opts)
            .render(&Node::parse("[a](https://x.io)"))
            .unwrap_err();
        assert!(matches!(err, Error::LinkFormatter { ref url, .. } if url == "https://x.io"));
    }

    #[test]
    fn test_image() {
        let styles = StyleConfig {
            image_text: StylePrimitive::new().format("Image: {{.text}} ->"),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(&options(styles, 80), "![logo](https://x.io/l.png)"));
        assert_eq!(out, "Image: logo -> https://x.io/l.png");
    }

    #[test]
    fn test_bad_template_is_an_error() {
        let styles = StyleConfig {
            image_text: StylePrimitive::new().format("{{.text"),
            ..plain_styles()
        };
        let result = RenderContext::new(&options(styles, 80)).render(&Node::parse("![a](b.png)"));
        assert!(matches!(result, Err(Error::Template { .. })));
    }

    #[test]
    fn test_rule() {
        let styles = StyleConfig {
            horizontal_rule: StylePrimitive::new().format("\n--------\n"),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(&options(styles, 80), "a\n\n---\n\nb"));
        assert_eq!(out, "a\n\n--------\n\nb");
    }

    #[test]
    fn test_table_grid() {
        let styles = StyleConfig {
            table: crate::style::StyleTable::new().separators("+", "|", "-"),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(
            &options(styles, 80),
            "| a | b |\n|:--|---|\n| a | b |\n| a | b |\n",
        ));
        assert_eq!(
            out,
            "\n+---+---+\n| a | b |\n+---+---+\n| a | b |\n| a | b |\n+---+---+"
        );
    }

    #[test]
    fn test_table_footer_links() {
        let styles = StyleConfig {
            table: crate::style::StyleTable::new().separators("+", "|", "-"),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(
            &options(styles, 80),
            "| a | b |\n|---|---|\n| [docs](https://a.io) | [docs](https://b.io) |\n",
        ));
        assert!(out.contains("| docs[1] | docs[2] |"), "{out}");
        assert!(out.ends_with("[1]: docs[1] https://a.io\n[2]: docs[2] https://b.io"), "{out}");
    }

    #[test]
    fn test_table_inline_links() {
        let mut opts = options(plain_styles(), 80);
        opts.inline_table_links = true;
        opts.link_formatter = Some(Arc::new(
            |data: &LinkData, _: &LinkContext<'_>| -> Result<String, BoxError> {
                Ok(format!("{}:{}", data.text, data.is_in_table))
            },
        ));
        let out = trimmed(&render_opts(&opts, "| a |\n|---|\n| [x](https://a.io) |\n"));
        assert!(out.contains("x:true"), "{out}");
        assert!(!out.contains("[1]:"));
    }

    #[test]
    fn test_table_links_use_formatter() {
        let mut opts = options(plain_styles(), 80);
        opts.link_formatter = Some(Arc::new(
            |data: &LinkData, _: &LinkContext<'_>| -> Result<String, BoxError> {
                Ok(format!("{}:{}", data.text, data.is_in_table))
            },
        ));
        let out = trimmed(&render_opts(&opts, "[y](https://b.io)\n\n| a |\n|---|\n| [x](https://a.io) |\n"));
        assert!(out.contains("y:false"), "{out}");
        assert!(out.contains("x:true"), "{out}");
        assert!(!out.contains("[1]:"), "{out}");
    }

    #[test]
    fn test_sibling_tables_do_not_share_links() {
        let out = render("| a |\n|---|\n| [x](https://a.io) |\n\ntext\n\n| b |\n|---|\n| [y](https://b.io) |\n");
        assert_eq!(out.matches("[1]:").count(), 2);
        assert!(!out.contains("[2]:"));
    }

    #[test]
    fn test_definition_list() {
        let styles = StyleConfig {
            definition_description: StylePrimitive::new().block_prefix("\n→ "),
            ..plain_styles()
        };
        let out = trimmed(&render_opts(&options(styles, 80), "Term\n: Meaning\n"));
        assert!(out.contains("Term\n→ Meaning"), "{out:?}");
    }

    #[test]
    fn test_html() {
        assert_eq!(render("<div>fish &amp; chips</div>"), "fish & chips");
        assert_eq!(render("a <b>bold</b> move"), "a bold move");
    }

    #[test]
    fn test_front_matter_hidden() {
        assert_eq!(render("---\ntitle: x\n---\n\nbody"), "\nbody");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &#65;&#x42; &bogus; &"), "a <b> AB &bogus; &");
    }

    struct Marked;

    impl Highlighter for Marked {
        fn highlight(
            &self,
            code: &str,
            language: &str,
            theme: &str,
            _profile: ColorProfile,
        ) -> Result<Option<String>, BoxError> {
            match language {
                "fail" => Err("broken lexer".into()),
                "none" => Ok(None),
                _ => Ok(Some(format!("[{theme}]{code}"))),
            }
        }
    }

    fn highlighting(theme: Option<&str>) -> RendererOptions {
        let mut code_block = crate::style::StyleCodeBlock::new();
        code_block.theme = theme.map(ToString::to_string);
        let mut opts = options(
            StyleConfig {
                code_block,
                ..plain_styles()
            },
            80,
        );
        opts.color_profile = ColorProfile::TrueColor;
        opts.highlighter = Some(Arc::new(Marked));
        opts
    }

    #[test]
    fn test_highlighter_used() {
        let opts = highlighting(Some("monokai"));
        assert_eq!(trimmed(&render_opts(&opts, "```rust\nfn x\n```")), "\n[monokai]fn x");
    }

    #[test]
    fn test_highlighter_skipped() {
        let opts = highlighting(Some("monokai"));
        assert_eq!(trimmed(&render_opts(&opts, "```\nfn x\n```")), "\nfn x");
        assert_eq!(trimmed(&render_opts(&opts, "```none\nfn x\n```")), "\nfn x");
        let opts = highlighting(None);
        assert_eq!(trimmed(&render_opts(&opts, "```rust\nfn x\n```")), "\nfn x");
        let mut opts = highlighting(Some("monokai"));
        opts.color_profile = ColorProfile::Ascii;
        assert_eq!(trimmed(&render_opts(&opts, "```rust\nfn x\n```")), "\nfn x");
    }

    #[test]
    fn test_highlighter_error() {
        let opts = highlighting(Some("monokai"));
        let err = RenderContext::new(&opts)
            .render(&Node::parse("```fail\nx\n```"))
            .unwrap_err();
        assert!(matches!(err, Error::Highlight { ref language, .. } if language == "fail"));
    }

    #[test]
    fn test_hand_built_tree() {
        let doc = Node::new(NodeKind::Document).child(
            Node::new(NodeKind::Paragraph)
                .child(Node::text("plain *star*"))
                .child(Node::new(NodeKind::Strong).child(Node::text("!"))),
        );
        let out = RenderContext::new(&options(plain_styles(), 80)).render(&doc).unwrap();
        assert_eq!(trimmed(&out), "plain *star*!");
    }
}
