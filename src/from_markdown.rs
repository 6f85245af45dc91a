//! Tree builder callbacks for wiki links.
//!
//! A markdown tree builder reports a wiki link in four steps: it opens the
//! occurrence, reads the target, optionally reads the alias, and closes
//! the occurrence. [`FromMarkdown`] exposes one callback per step. The
//! partially read link lives in a [`WikiLinkBuilder`] owned by the caller
//! and threaded through the callbacks, so two occurrences never share
//! state. Closing consumes the builder and resolves it.

use crate::config::FromMarkdownOptions;
use crate::markdown::LinkResolver;
use crate::node::{Inline, WikiLinkNode};
use crate::syntax::{Event, TokenKind, unescape_brackets};

/// A wiki link that has been opened but not yet resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiLinkBuilder {
    target: String,
    alias: String,
}

impl WikiLinkBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Alias read so far, empty when none was written.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Resolves the link and freezes it.
    pub fn finish(self, resolver: &LinkResolver) -> WikiLinkNode {
        resolver.resolve(&self.target, &self.alias)
    }
}

/// Parse side wiki link extension.
#[derive(Debug, Clone, Default)]
pub struct FromMarkdown {
    resolver: LinkResolver,
}

impl FromMarkdown {
    /// Creates extension with the given resolution options.
    pub fn new(options: FromMarkdownOptions) -> Self {
        Self {
            resolver: LinkResolver::new(options),
        }
    }

    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Resolves a link body directly, without going through the callbacks.
    pub fn resolve(&self, target: &str, alias: &str) -> WikiLinkNode {
        self.resolver.resolve(target, alias)
    }

    /// Opens a wiki link occurrence.
    pub fn enter_wiki_link(&self) -> WikiLinkBuilder {
        WikiLinkBuilder::new()
    }

    /// Records the target span of the open link.
    pub fn exit_wiki_link_target(&self, builder: &mut WikiLinkBuilder, target: &str) {
        builder.target = target.to_string();
    }

    /// Records the alias span of the open link.
    pub fn exit_wiki_link_alias(&self, builder: &mut WikiLinkBuilder, alias: &str) {
        builder.alias = alias.to_string();
    }

    /// Closes the link and resolves it.
    pub fn exit_wiki_link(&self, builder: WikiLinkBuilder) -> WikiLinkNode {
        builder.finish(&self.resolver)
    }

    /// Builds inline content from a tokenizer event stream.
    ///
    /// Drives the callbacks in event order. Data tokens become text,
    /// each wiki link token becomes a resolved node. Adjacent data is
    /// merged. Escaped brackets in targets and aliases are unescaped.
    ///
    /// # Arguments
    ///
    /// * `source`: Text the events were produced from
    /// * `events`: Events from [`WikiLinkSyntax::tokenize`](crate::WikiLinkSyntax::tokenize)
    pub fn compile(&self, source: &str, events: &[Event]) -> Vec<Inline> {
        let mut inlines = Vec::new();
        let mut current: Option<WikiLinkBuilder> = None;

        for event in events {
            match event {
                Event::Enter(token) if token.kind == TokenKind::WikiLink => {
                    current = Some(self.enter_wiki_link());
                }
                Event::Exit(token) => {
                    let slice = &source[token.range.clone()];
                    match token.kind {
                        TokenKind::Data => push_text(&mut inlines, slice),
                        TokenKind::WikiLinkTarget => {
                            if let Some(builder) = current.as_mut() {
                                self.exit_wiki_link_target(builder, &unescape_brackets(slice));
                            }
                        }
                        TokenKind::WikiLinkAlias => {
                            if let Some(builder) = current.as_mut() {
                                self.exit_wiki_link_alias(builder, &unescape_brackets(slice));
                            }
                        }
                        TokenKind::WikiLink => {
                            if let Some(builder) = current.take() {
                                inlines.push(Inline::WikiLink(self.exit_wiki_link(builder)));
                            }
                        }
                        TokenKind::WikiLinkMarker | TokenKind::WikiLinkAliasMarker => {}
                    }
                }
                Event::Enter(_) => {}
            }
        }

        inlines
    }
}

fn push_text(inlines: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        last.push_str(text);
    } else {
        inlines.push(Inline::Text(text.to_string()));
    }
}
