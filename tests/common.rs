//! Shared test utilities for integration tests.
//!
//! Provides helpers for parsing a markdown snippet and picking out the
//! wiki links it contains.

use wikilinks::{Config, FromMarkdownOptions, MarkdownRenderer, WikiLinkNode};

/// Parses markdown and returns the only wiki link in it.
///
/// # Panics
///
/// Panics if the markdown holds no wiki link or more than one
pub fn single_link(markdown: &str, options: FromMarkdownOptions) -> WikiLinkNode {
    let renderer = MarkdownRenderer::with_config(Config::new().with_from_markdown(options));
    let mut links = renderer.links(markdown);
    assert_eq!(
        links.len(),
        1,
        "Expected exactly one wiki link in {:?}, got {:?}",
        markdown,
        links
    );
    links.remove(0)
}

/// Serializes markdown through a renderer with the given configuration.
pub fn stringify(markdown: &str, config: Config) -> String {
    MarkdownRenderer::with_config(config)
        .to_markdown(markdown)
        .expect("Should serialize markdown")
        .trim()
        .to_string()
}
