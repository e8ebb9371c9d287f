//! The document tree walked by the renderer.
//!
//! [`Node::parse`] builds a tree from markdown with `pulldown-cmark`; any
//! other front end can build the same tree by hand and hand it to
//! [`crate::Renderer::render_document`].

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use crate::element::{escape, unescape};

pub use pulldown_cmark::Alignment;

/// How a link was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// `[text](url)` and reference links.
    Inline,
    /// `<https://...>` or a bare URL in running text.
    Auto,
    /// `<user@example.com>`.
    Email,
}

/// What a [`Node`] is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The root.
    Document,
    /// YAML metadata block, kept verbatim and never rendered.
    FrontMatter(String),
    Paragraph,
    /// Heading with its level, 1 through 6.
    Heading(u8),
    BlockQuote,
    /// Fenced or indented code with the first word of its info string.
    CodeBlock { language: String, code: String },
    /// Raw HTML block.
    HtmlBlock(String),
    /// A list; ordered lists carry their start number.
    List { start: Option<u64> },
    /// A list item; task items carry their checked state.
    Item { task: Option<bool> },
    /// A table with one alignment per column.
    Table(Vec<Alignment>),
    TableHead,
    TableRow,
    TableCell,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String, kind: LinkKind },
    Image { url: String, title: String },
    /// Text with markdown escapes re-applied; see [`escape`].
    Text(String),
    /// Code span contents, literal.
    Code(String),
    /// Inline HTML.
    Html(String),
    SoftBreak,
    HardBreak,
    Rule,
}

/// A node and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node without children.
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Adds a child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// A text leaf holding literal `text`.
    pub fn text(text: &str) -> Self {
        Self::new(NodeKind::Text(escape(text)))
    }

    /// Parses markdown into a tree.
    ///
    /// Tables, strikethrough, task lists, definition lists and YAML front
    /// matter are recognized. Bare `http://`, `https://` and `www.` URLs in
    /// running text become autolinks.
    ///
    /// ```rust
    /// use glamour::ast::{Node, NodeKind};
    ///
    /// let doc = Node::parse("# Title");
    /// assert_eq!(doc.children[0].kind, NodeKind::Heading(1));
    /// assert_eq!(doc.plain_text(), "Title");
    /// ```
    pub fn parse(markdown: &str) -> Self {
        let mut builder = TreeBuilder::default();
        for event in Parser::new_ext(markdown, parser_options()) {
            builder.event(event);
        }
        let mut root = builder.finish();
        linkify(&mut root);
        root
    }

    /// Literal text of the node and its descendants, escapes undone.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(t) => out.push_str(&unescape(t)),
            NodeKind::Code(c) => out.push_str(c),
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push(' '),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Calls `f` on this node and every descendant, depth first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Returns true for nodes rendered as part of the surrounding text.
    pub const fn is_inline(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Emphasis
                | NodeKind::Strong
                | NodeKind::Strikethrough
                | NodeKind::Link { .. }
                | NodeKind::Image { .. }
                | NodeKind::Text(_)
                | NodeKind::Code(_)
                | NodeKind::Html(_)
                | NodeKind::SoftBreak
                | NodeKind::HardBreak
        )
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Folds the flat event stream into nested nodes.
#[derive(Debug, Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Node>,
    /// One entry per `Start` event: whether it opened a node.
    opened: Vec<bool>,
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                let kind = start_kind(tag);
                self.opened.push(kind.is_some());
                if let Some(kind) = kind {
                    self.open.push(Node::new(kind));
                }
            }
            Event::End(_) => {
                if self.opened.pop().unwrap_or(false) {
                    self.close();
                }
            }
            Event::Text(text) => self.text(&text),
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.leaf(NodeKind::Code(code.into_string()));
            }
            Event::Html(html) => match self.open.last_mut().map(|n| &mut n.kind) {
                Some(NodeKind::HtmlBlock(block)) => block.push_str(&html),
                _ => self.leaf(NodeKind::Html(html.into_string())),
            },
            Event::InlineHtml(html) => self.leaf(NodeKind::Html(html.into_string())),
            Event::FootnoteReference(label) => self.text(&format!("[^{label}]")),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak),
            Event::HardBreak => self.leaf(NodeKind::HardBreak),
            Event::Rule => self.leaf(NodeKind::Rule),
            Event::TaskListMarker(checked) => {
                let item = self
                    .open
                    .iter_mut()
                    .rev()
                    .find(|n| matches!(n.kind, NodeKind::Item { .. }));
                if let Some(Node {
                    kind: NodeKind::Item { task },
                    ..
                }) = item
                {
                    *task = Some(checked);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(node) = self.open.last_mut() {
            match &mut node.kind {
                NodeKind::CodeBlock { code, .. } => return code.push_str(text),
                NodeKind::HtmlBlock(html) => return html.push_str(text),
                NodeKind::FrontMatter(yaml) => return yaml.push_str(text),
                _ => {}
            }
        }
        let siblings = self.siblings();
        if let Some(Node {
            kind: NodeKind::Text(prev),
            ..
        }) = siblings.last_mut()
        {
            // Escape the merged literal, not each piece: a lone `\` event
            // followed by `*` must not turn into the escape `\*`.
            let mut literal = unescape(prev);
            literal.push_str(text);
            *prev = escape(&literal);
        } else {
            siblings.push(Node::new(NodeKind::Text(escape(text))));
        }
    }

    fn leaf(&mut self, kind: NodeKind) {
        self.siblings().push(Node::new(kind));
    }

    fn siblings(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(node) => &mut node.children,
            None => &mut self.root,
        }
    }

    fn close(&mut self) {
        if let Some(node) = self.open.pop() {
            self.siblings().push(node);
        }
    }

    fn finish(mut self) -> Node {
        while !self.open.is_empty() {
            self.close();
        }
        Node {
            kind: NodeKind::Document,
            children: self.root,
        }
    }
}

fn start_kind(tag: Tag<'_>) -> Option<NodeKind> {
    let kind = match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading(level as u8),
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            language: match kind {
                CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or_default().to_string(),
                CodeBlockKind::Indented => String::new(),
            },
            code: String::new(),
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock(String::new()),
        Tag::List(start) => NodeKind::List { start },
        Tag::Item => NodeKind::Item { task: None },
        Tag::Table(alignments) => NodeKind::Table(alignments),
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::DefinitionList => NodeKind::DefinitionList,
        Tag::DefinitionListTitle => NodeKind::DefinitionTerm,
        Tag::DefinitionListDefinition => NodeKind::DefinitionDescription,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        } => NodeKind::Link {
            url: dest_url.into_string(),
            title: title.into_string(),
            kind: match link_type {
                LinkType::Autolink => LinkKind::Auto,
                LinkType::Email => LinkKind::Email,
                _ => LinkKind::Inline,
            },
        },
        Tag::Image { dest_url, title, .. } => NodeKind::Image {
            url: dest_url.into_string(),
            title: title.into_string(),
        },
        Tag::MetadataBlock(_) => NodeKind::FrontMatter(String::new()),
        _ => return None,
    };
    Some(kind)
}

// ============================================================================
// Bare URL detection
// ============================================================================

const URL_STARTS: &[&str] = &["https://", "http://", "www."];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '"', '\'', '*', '_', '~'];

/// Turns bare URLs in text into autolinks, outside links and images.
fn linkify(node: &mut Node) {
    if matches!(node.kind, NodeKind::Link { .. } | NodeKind::Image { .. }) {
        return;
    }
    let children = std::mem::take(&mut node.children);
    for mut child in children {
        if let NodeKind::Text(text) = &child.kind {
            split_urls(text, &mut node.children);
        } else {
            linkify(&mut child);
            node.children.push(child);
        }
    }
}

fn split_urls(text: &str, out: &mut Vec<Node>) {
    let mut rest = text;
    while let Some((start, end)) = find_url(rest) {
        if start > 0 {
            out.push(Node::new(NodeKind::Text(rest[..start].to_string())));
        }
        let shown = &rest[start..end];
        let literal = unescape(shown);
        let url = if literal.starts_with("www.") {
            format!("http://{literal}")
        } else {
            literal
        };
        out.push(
            Node::new(NodeKind::Link {
                url,
                title: String::new(),
                kind: LinkKind::Auto,
            })
            .child(Node::new(NodeKind::Text(shown.to_string()))),
        );
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        out.push(Node::new(NodeKind::Text(rest.to_string())));
    }
}

/// Byte range of the first bare URL in `s`.
fn find_url(s: &str) -> Option<(usize, usize)> {
    let mut search = 0;
    while search < s.len() {
        let (offset, scheme) = URL_STARTS
            .iter()
            .filter_map(|p| s[search..].find(p).map(|i| (search + i, *p)))
            .min_by_key(|(i, _)| *i)?;
        search = offset + scheme.len();

        let boundary = s[..offset]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || c == '(' || c == '<');
        if !boundary {
            continue;
        }
        let len = s[offset..]
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(s.len() - offset);
        let end = trim_url_end(&s[offset..offset + len]) + offset;
        if end > offset + scheme.len() {
            return Some((offset, end));
        }
    }
    None
}

/// Length of `candidate` without trailing punctuation and unbalanced `)`.
fn trim_url_end(candidate: &str) -> usize {
    let mut url = candidate;
    loop {
        let trimmed = url.trim_end_matches(TRAILING_PUNCTUATION);
        let trimmed = match trimmed.strip_suffix(')') {
            Some(inner) if trimmed.matches('(').count() < trimmed.matches(')').count() => inner,
            _ => trimmed,
        };
        if trimmed.len() == url.len() {
            return url.len();
        }
        url = trimmed;
    }
}
