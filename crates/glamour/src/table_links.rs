//! Links and images found in a table, listed below it.
//!
//! Table cells are too narrow for URLs. Unless links are shown inline, a
//! cell shows only a link's text and the URLs are listed after the table,
//! one numbered line each. Links come first, then images, each section
//! numbered from one.

use url::Url;

use crate::ansi::{ColorProfile, truncate, visible_width};
use crate::ast::{LinkKind, Node, NodeKind};
use crate::autolink;
use crate::element::BaseElement;
use crate::error::Result;
use crate::hyperlink::resolve_url;
use crate::style::{StyleConfig, StylePrimitive};
use crate::table::ELLIPSIS;

/// What kind of node a [`TableLink`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableLinkKind {
    Link,
    Auto,
    Image,
}

/// One link or image in a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableLink {
    pub href: String,
    pub title: String,
    /// Text shown for the link: its plain text, a short GitHub form for
    /// autolinks, or the URL's host.
    pub content: String,
    pub kind: TableLinkKind,
}

impl TableLink {
    /// Builds the entry for a link, autolink or image node.
    pub fn from_node(node: &Node) -> Option<Self> {
        let (href, title, content, kind) = match &node.kind {
            NodeKind::Link {
                url,
                title,
                kind: LinkKind::Email,
            } => {
                let address = url.strip_prefix("mailto:").unwrap_or(url).to_string();
                (format!("mailto:{address}"), title, address, TableLinkKind::Auto)
            }
            NodeKind::Link {
                url,
                title,
                kind: LinkKind::Auto,
            } => {
                let content = autolink::detect(url).unwrap_or_else(|| link_domain(url));
                (url.clone(), title, content, TableLinkKind::Auto)
            }
            NodeKind::Link { url, title, .. } => (url.clone(), title, node.plain_text(), TableLinkKind::Link),
            NodeKind::Image { url, title } => {
                let mut content = node.plain_text();
                if content.is_empty() {
                    content = link_domain(url);
                }
                (url.clone(), title, content, TableLinkKind::Image)
            }
            _ => return None,
        };
        Some(Self {
            href,
            title: title.clone(),
            content,
            kind,
        })
    }

    /// Returns true for images.
    pub const fn is_image(&self) -> bool {
        matches!(self.kind, TableLinkKind::Image)
    }
}

/// Host of `href`, or `"link"` when it has none.
fn link_domain(href: &str) -> String {
    Url::parse(href)
        .ok()
        .and_then(|u| u.host_str().filter(|h| !h.is_empty()).map(ToString::to_string))
        .unwrap_or_else(|| "link".to_string())
}

/// The deduplicated links and images of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLinks {
    links: Vec<TableLink>,
    images: Vec<TableLink>,
}

impl TableLinks {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every link, autolink and image under `table`.
    pub fn collect(table: &Node) -> Self {
        let mut links = Self::new();
        table.walk(&mut |node| {
            if let Some(link) = TableLink::from_node(node) {
                links.push(link);
            }
        });
        tracing::trace!(
            links = links.links.len(),
            images = links.images.len(),
            "collected table links"
        );
        links
    }

    /// Adds a link unless an identical one is already present.
    pub fn push(&mut self, link: TableLink) {
        let section = if link.is_image() {
            &mut self.images
        } else {
            &mut self.links
        };
        if !section.contains(&link) {
            section.push(link);
        }
    }

    /// Links and autolinks, in document order.
    pub fn links(&self) -> &[TableLink] {
        &self.links
    }

    /// Images, in document order.
    pub fn images(&self) -> &[TableLink] {
        &self.images
    }

    /// Returns true if the table has no links or images.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.images.is_empty()
    }

    fn section(&self, link: &TableLink) -> &[TableLink] {
        if link.is_image() { &self.images } else { &self.links }
    }

    /// Text shown for `link`: its content, plus `[k]` when other entries
    /// share that content.
    ///
    /// ```rust
    /// use glamour::table_links::{TableLink, TableLinkKind, TableLinks};
    ///
    /// let link = |href: &str| TableLink {
    ///     href: href.to_string(),
    ///     title: String::new(),
    ///     content: "docs".to_string(),
    ///     kind: TableLinkKind::Link,
    /// };
    /// let mut links = TableLinks::new();
    /// links.push(link("https://a.io"));
    /// assert_eq!(links.display(&link("https://a.io")), "docs");
    /// links.push(link("https://b.io"));
    /// assert_eq!(links.display(&link("https://a.io")), "docs[1]");
    /// assert_eq!(links.display(&link("https://b.io")), "docs[2]");
    /// ```
    pub fn display(&self, link: &TableLink) -> String {
        let mut group = self.section(link).iter().filter(|l| l.content == link.content);
        let Some(index) = group.position(|l| l == link) else {
            return link.content.clone();
        };
        let others = group.count();
        if index == 0 && others == 0 {
            return link.content.clone();
        }
        format!("{}[{}]", link.content, index + 1)
    }

    /// Writes the footer listing into `out`.
    ///
    /// Each section starts with a blank line. URLs are cut with an ellipsis
    /// to fit `width` after the link text; a `width` of zero never cuts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if a link style's format is invalid.
    pub fn render_footer(
        &self,
        out: &mut String,
        profile: ColorProfile,
        styles: &StyleConfig,
        block: &StylePrimitive,
        base_url: Option<&str>,
        width: usize,
    ) -> Result<()> {
        for section in [&self.links, &self.images] {
            if section.is_empty() {
                continue;
            }
            out.push('\n');
            let digits = section.len().to_string().len();
            for (i, link) in section.iter().enumerate() {
                let pos = i + 1;
                let number = format!("{}[{pos}]: ", " ".repeat(digits - pos.to_string().len()));
                let display = self.display(link);

                let mut text = String::new();
                if link.is_image() {
                    let mut style = styles.image_text.clone();
                    style.prefix = Some(format!(
                        "{number}{}",
                        styles.image_text.prefix.as_deref().unwrap_or_default()
                    ));
                    BaseElement::new(&display, &style).render(&mut text, profile, block)?;
                } else {
                    let token = format!("{number}{display}");
                    BaseElement::new(&token, &styles.link_text).render(&mut text, profile, block)?;
                }

                out.push('\n');
                out.push_str(&text);
                if link.href.is_empty() {
                    continue;
                }
                let mut href = resolve_url(base_url, &link.href);
                if width > 0 {
                    href = truncate(&href, width.saturating_sub(visible_width(&text) + 1), ELLIPSIS);
                }
                let style = if link.is_image() { &styles.image } else { &styles.link };
                BaseElement::new(&href, style).prefix(" ").render(out, profile, block)?;
            }
        }
        Ok(())
    }
}
