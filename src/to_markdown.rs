//! Serializer handler for wiki links.

use crate::config::ToMarkdownOptions;
use crate::node::WikiLinkNode;
use crate::safe::{ConstructName, SerializeContext, Unsafe};

/// Serialize side wiki link extension.
///
/// Writes `[[target]]`, or `[[target<divider>alias]]` when the alias
/// differs from the target.
#[derive(Debug, Clone)]
pub struct ToMarkdown {
    alias_divider: String,
}

impl ToMarkdown {
    /// Creates extension with the given serialization options.
    pub fn new(options: ToMarkdownOptions) -> Self {
        Self {
            alias_divider: options.alias_divider,
        }
    }

    pub fn alias_divider(&self) -> &str {
        &self.alias_divider
    }

    /// Characters that must be escaped around wiki links.
    ///
    /// `[` could open a new link in text, labels and references. `]`
    /// closes labels, references and the wiki link itself.
    pub fn unsafe_patterns() -> Vec<Unsafe> {
        vec![
            Unsafe::new(
                '[',
                &[
                    ConstructName::Phrasing,
                    ConstructName::Label,
                    ConstructName::Reference,
                ],
            ),
            Unsafe::new(
                ']',
                &[
                    ConstructName::Label,
                    ConstructName::Reference,
                    ConstructName::WikiLink,
                ],
            ),
        ]
    }

    /// Serializes a resolved wiki link.
    ///
    /// Target and alias are escaped for the constructs active in `context`
    /// before they are compared, so an alias that only differs by escaping
    /// is still collapsed.
    pub fn handle(&self, node: &WikiLinkNode, context: &mut SerializeContext) -> String {
        context.scoped(ConstructName::WikiLink, |context| {
            let value = context.safe(node.target());
            let alias = context.safe(node.alias());

            if alias != value {
                format!("[[{}{}{}]]", value, self.alias_divider, alias)
            } else {
                format!("[[{}]]", value)
            }
        })
    }
}

impl Default for ToMarkdown {
    fn default() -> Self {
        Self::new(ToMarkdownOptions::default())
    }
}
