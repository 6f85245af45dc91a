//! Wiki links for markdown.
//!
//! Recognizes `[[Target]]` and `[[Target:Alias]]`, resolves each target
//! against a set of known permalinks, and serializes resolved links back to
//! their canonical text form.

mod config;
mod from_markdown;
mod markdown;
mod node;
mod safe;
mod syntax;
mod to_markdown;

pub use config::{
    Config, DEFAULT_ALIAS_DIVIDER, FromMarkdownOptions, HrefTemplate, PageResolver,
    SyntaxOptions, ToMarkdownOptions, default_href_template, default_page_resolver,
};
pub use from_markdown::{FromMarkdown, WikiLinkBuilder};
pub use markdown::{LinkResolver, MarkdownRenderer};
pub use node::{ANCHOR_TAG, Element, ElementContent, ElementProperties, Inline, WikiLinkNode};
pub use safe::{ConstructName, SerializeContext, Unsafe};
pub use syntax::{Event, Token, TokenKind, WikiLinkSyntax};
pub use to_markdown::ToMarkdown;
