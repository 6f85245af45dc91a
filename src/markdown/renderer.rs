//! Markdown rendering with wiki link support.

use anyhow::{Context, Result};
use comrak::nodes::{Ast, AstNode, NodeValue};
use comrak::{Arena, Options, format_commonmark, format_html, parse_document};
use std::cell::RefCell;

use crate::config::Config;
use crate::from_markdown::FromMarkdown;
use crate::node::{Inline, WikiLinkNode};
use crate::safe::{ConstructName, SerializeContext};
use crate::syntax::WikiLinkSyntax;
use crate::to_markdown::ToMarkdown;

use super::protect::{ProtectedSource, Segment};

/// What resolved wiki links are spliced into the tree as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    /// `<a>` elements for HTML rendering
    Html,
    /// `[[...]]` text for CommonMark serialization
    CommonMark,
}

/// Renders markdown containing wiki links.
///
/// `[[Target]]` and `[[Target:Alias]]` occurrences are recognized in the
/// raw source and hidden from comrak, which then parses the document with
/// GitHub Flavored Markdown extensions. Occurrences that land in text
/// outside code, raw HTML, links and images are resolved against the
/// configured permalinks; all others are put back verbatim. The resolved link is spliced back
/// into the tree as inline HTML, either as an anchor element or as its
/// canonical wiki link text.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    syntax: WikiLinkSyntax,
    from_markdown: FromMarkdown,
    to_markdown: ToMarkdown,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with default wiki link configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates renderer with the given wiki link configuration.
    ///
    /// Configures GFM extensions (tables, strikethrough, autolinks, task
    /// lists, footnotes, description lists). Raw HTML passes through since
    /// resolved links are emitted as inline HTML.
    ///
    /// # Arguments
    ///
    /// * `config`: Syntax, resolution and serialization options
    pub fn with_config(config: Config) -> Self {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;

        options.render.unsafe_ = true;

        Self {
            options,
            syntax: WikiLinkSyntax::new(config.syntax),
            from_markdown: FromMarkdown::new(config.from_markdown),
            to_markdown: ToMarkdown::new(config.to_markdown),
        }
    }

    /// Returns every wiki link in the document, resolved, in document order.
    pub fn links(&self, content: &str) -> Vec<WikiLinkNode> {
        let arena = Arena::new();
        let protected = ProtectedSource::new(&self.syntax, content);
        let root = parse_document(&arena, protected.text(), &self.options);
        self.expand_wiki_links(&arena, root, &protected, Output::Html)
    }

    /// Renders markdown content to HTML string.
    ///
    /// # Errors
    ///
    /// Returns error if HTML formatting fails
    pub fn render(&self, content: &str) -> Result<String> {
        let arena = Arena::new();
        let protected = ProtectedSource::new(&self.syntax, content);
        let root = parse_document(&arena, protected.text(), &self.options);
        self.expand_wiki_links(&arena, root, &protected, Output::Html);

        let mut html: Vec<u8> = Vec::with_capacity(content.len() * 2);
        format_html(root, &self.options, &mut html).context("Failed to format HTML")?;
        String::from_utf8(html).context("Rendered HTML contains invalid UTF8")
    }

    /// Parses markdown content and serializes it back to CommonMark.
    ///
    /// Wiki links are written in canonical form using the configured alias
    /// divider, so `[[Page:Page]]` becomes `[[Page]]`.
    ///
    /// # Errors
    ///
    /// Returns error if CommonMark formatting fails
    pub fn to_markdown(&self, content: &str) -> Result<String> {
        let arena = Arena::new();
        let protected = ProtectedSource::new(&self.syntax, content);
        let root = parse_document(&arena, protected.text(), &self.options);
        self.expand_wiki_links(&arena, root, &protected, Output::CommonMark);

        let mut markdown: Vec<u8> = Vec::with_capacity(content.len());
        format_commonmark(root, &self.options, &mut markdown)
            .context("Failed to format CommonMark")?;
        String::from_utf8(markdown).context("Serialized markdown contains invalid UTF8")
    }

    /// Replaces protected wiki link spans with resolved inline nodes.
    ///
    /// Spans inside code, raw HTML, link destinations and link or image
    /// labels get their original text back. Spans in other text runs are
    /// tokenized, compiled and spliced in. comrak may split one run of text
    /// over several adjacent text nodes, so each run is joined first.
    ///
    /// # Returns
    ///
    /// Resolved links in document order
    fn expand_wiki_links<'b>(
        &self,
        arena: &'b Arena<AstNode<'b>>,
        root: &'b AstNode<'b>,
        protected: &ProtectedSource,
        output: Output,
    ) -> Vec<WikiLinkNode> {
        let mut links = Vec::new();
        if protected.is_empty() {
            return links;
        }

        restore_literals(root, protected);

        let mut context = SerializeContext::new().with_unsafe(ToMarkdown::unsafe_patterns());
        let parents: Vec<&'b AstNode<'b>> = root
            .descendants()
            .filter(|node| node.first_child().is_some() && !inside_link(*node))
            .collect();

        for parent in parents {
            let construct = construct_for(&parent.data.borrow().value);

            for run in text_runs(parent) {
                let text: String = run.iter().map(|node| text_value(node)).collect();
                let segments = protected.segments(&text);
                if !segments.iter().any(|s| matches!(s, Segment::Link(_))) {
                    continue;
                }

                let first = run[0];
                let start = first.data.borrow().sourcepos.start;

                for segment in segments {
                    let inlines = match segment {
                        Segment::Text(text) => vec![Inline::Text(text.to_string())],
                        Segment::Link(span) => {
                            let events = self.syntax.tokenize(span);
                            self.from_markdown.compile(span, &events)
                        }
                    };

                    for inline in inlines {
                        let value = match inline {
                            Inline::Text(text) => NodeValue::Text(text),
                            Inline::WikiLink(link) => {
                                let literal = match output {
                                    Output::Html => link.to_html(),
                                    Output::CommonMark => {
                                        self.serialize(&link, construct, &mut context)
                                    }
                                };
                                links.push(link);
                                NodeValue::HtmlInline(literal)
                            }
                        };
                        let node =
                            arena.alloc(AstNode::new(RefCell::new(Ast::new(value, start))));
                        first.insert_before(node);
                    }
                }

                for node in run {
                    node.detach();
                }
            }
        }

        log::debug!("expanded {} wiki links", links.len());
        links
    }

    fn serialize(
        &self,
        link: &WikiLinkNode,
        construct: Option<ConstructName>,
        context: &mut SerializeContext,
    ) -> String {
        match construct {
            Some(name) => context.scoped(name, |context| {
                context.scoped(ConstructName::Phrasing, |context| {
                    self.to_markdown.handle(link, context)
                })
            }),
            None => context.scoped(ConstructName::Phrasing, |context| {
                self.to_markdown.handle(link, context)
            }),
        }
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether this node is, or sits inside, a link or image.
///
/// Labels of links and images already are links; nesting an anchor inside
/// them would produce invalid HTML.
fn inside_link<'b>(node: &'b AstNode<'b>) -> bool {
    node.ancestors().any(|ancestor| {
        matches!(
            ancestor.data.borrow().value,
            NodeValue::Link(_) | NodeValue::Image(_)
        )
    })
}

/// Puts protected spans back wherever they must stay literal.
fn restore_literals<'b>(root: &'b AstNode<'b>, protected: &ProtectedSource) {
    for node in root.descendants() {
        let in_link = inside_link(node);
        let mut ast = node.data.borrow_mut();

        match &mut ast.value {
            NodeValue::Text(text) if in_link => protected.restore_in_place(text),
            NodeValue::Code(code) => protected.restore_in_place(&mut code.literal),
            NodeValue::CodeBlock(block) => {
                protected.restore_in_place(&mut block.info);
                protected.restore_in_place(&mut block.literal);
            }
            NodeValue::HtmlBlock(block) => protected.restore_in_place(&mut block.literal),
            NodeValue::HtmlInline(html) => protected.restore_in_place(html),
            NodeValue::Link(link) | NodeValue::Image(link) => {
                protected.restore_in_place(&mut link.url);
                protected.restore_in_place(&mut link.title);
            }
            NodeValue::FootnoteDefinition(footnote) => {
                protected.restore_in_place(&mut footnote.name)
            }
            NodeValue::FootnoteReference(footnote) => {
                protected.restore_in_place(&mut footnote.name)
            }
            _ => {}
        }
    }
}

fn construct_for(value: &NodeValue) -> Option<ConstructName> {
    match value {
        NodeValue::Paragraph => Some(ConstructName::Paragraph),
        NodeValue::Heading(_) => Some(ConstructName::Heading),
        NodeValue::TableCell => Some(ConstructName::TableCell),
        _ => None,
    }
}

/// Groups consecutive text children of `parent`.
fn text_runs<'b>(parent: &'b AstNode<'b>) -> Vec<Vec<&'b AstNode<'b>>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for child in parent.children() {
        if matches!(child.data.borrow().value, NodeValue::Text(_)) {
            current.push(child);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

fn text_value(node: &AstNode<'_>) -> String {
    match &node.data.borrow().value {
        NodeValue::Text(text) => text.clone(),
        _ => String::new(),
    }
}
