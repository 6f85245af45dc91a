//! Markdown pipeline integration.
//!
//! This module resolves wiki link targets and plugs the wiki link
//! extension into comrak for HTML rendering and CommonMark serialization.

mod links;
mod protect;
mod renderer;

pub use links::LinkResolver;
pub use renderer::MarkdownRenderer;
