//! Resolved wiki link nodes and their HTML element metadata.

use maud::{Markup, Render, html};

/// Tag name of the element a wiki link renders to.
pub const ANCHOR_TAG: &str = "a";

/// Properties of the rendered anchor element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementProperties {
    /// Space separated class list
    pub class_name: String,
    pub href: String,
}

/// Child content of the rendered element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    Text(String),
}

impl ElementContent {
    /// Returns the text value of this child.
    pub fn value(&self) -> &str {
        match self {
            ElementContent::Text(value) => value,
        }
    }
}

impl Render for ElementContent {
    fn render_to(&self, buffer: &mut String) {
        match self {
            ElementContent::Text(value) => value.render_to(buffer),
        }
    }
}

/// Element a wiki link renders to: `<a class=".." href="..">alias</a>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag_name: &'static str,
    pub properties: ElementProperties,
    pub children: Vec<ElementContent>,
}

impl Element {
    /// Creates an anchor element holding a single text child.
    pub fn anchor(class_name: String, href: String, text: String) -> Self {
        Self {
            tag_name: ANCHOR_TAG,
            properties: ElementProperties { class_name, href },
            children: vec![ElementContent::Text(text)],
        }
    }
}

impl Render for Element {
    fn render(&self) -> Markup {
        html! {
            a class=(self.properties.class_name) href=(self.properties.href) {
                @for child in &self.children {
                    (child)
                }
            }
        }
    }
}

/// A wiki link after resolution.
///
/// Created only by finishing a [`WikiLinkBuilder`](crate::WikiLinkBuilder)
/// or by [`LinkResolver::resolve`](crate::LinkResolver::resolve), so every
/// instance carries a definite `exists` value and a permalink. Fields are
/// read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLinkNode {
    target: String,
    alias: String,
    permalink: String,
    exists: bool,
    element: Element,
}

impl WikiLinkNode {
    pub(crate) fn new(
        target: String,
        alias: String,
        permalink: String,
        exists: bool,
        element: Element,
    ) -> Self {
        Self {
            target,
            alias,
            permalink,
            exists,
            element,
        }
    }

    /// Raw page name as written between the brackets.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Display text. Equals the target when no alias was written.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Resolved page identifier, set even when the page is missing.
    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    /// Whether the permalink matched a known page.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Render metadata.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Composed class string.
    pub fn class_name(&self) -> &str {
        &self.element.properties.class_name
    }

    pub fn href(&self) -> &str {
        &self.element.properties.href
    }

    /// Renders the link element to an HTML string.
    pub fn to_html(&self) -> String {
        self.element.render().into_string()
    }
}

/// Inline content produced by compiling a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    WikiLink(WikiLinkNode),
}
