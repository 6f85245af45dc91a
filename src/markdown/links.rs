//! Link resolution for wiki link targets.

use crate::config::FromMarkdownOptions;
use crate::node::{Element, WikiLinkNode};

/// Resolves wiki link targets to permalinks of known pages.
///
/// Maps the raw page name to candidate permalinks with the configured page
/// resolver and picks the first candidate that names an existing page.
/// Missing pages still get a permalink (the most preferred candidate) and
/// are marked with the configured "new" class.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    options: FromMarkdownOptions,
}

impl LinkResolver {
    /// Creates link resolver with the given options.
    ///
    /// # Arguments
    ///
    /// * `options`: Known permalinks and resolution policies
    pub fn new(options: FromMarkdownOptions) -> Self {
        Self { options }
    }

    /// Options this resolver applies.
    pub fn options(&self) -> &FromMarkdownOptions {
        &self.options
    }

    /// Resolves a raw link body to a finished wiki link node.
    ///
    /// Candidate order decides between several existing pages: the first
    /// candidate present in the known permalinks wins. When none exists the
    /// permalink falls back to the first candidate, or an empty string if
    /// the page resolver produced no candidates.
    ///
    /// # Arguments
    ///
    /// * `target`: Page name as written between the brackets
    /// * `alias`: Display text, empty when none was written
    ///
    /// # Returns
    ///
    /// Resolved node with permalink, existence flag and anchor element
    pub fn resolve(&self, target: &str, alias: &str) -> WikiLinkNode {
        let candidates = (self.options.page_resolver)(target);
        let matched = candidates
            .iter()
            .find(|candidate| self.options.permalinks.contains(candidate.as_str()));
        let exists = matched.is_some();

        let permalink = match matched {
            Some(permalink) => permalink.clone(),
            None => candidates.first().cloned().unwrap_or_default(),
        };

        let display = if alias.is_empty() { target } else { alias };

        let mut class_name = self.options.wiki_link_class_name.clone();
        if !exists {
            class_name.push(' ');
            class_name.push_str(&self.options.new_class_name);
        }

        let href = (self.options.href_template)(&permalink);

        log::debug!(
            "resolved wiki link {:?} to {:?} (exists: {})",
            target,
            permalink,
            exists
        );

        WikiLinkNode::new(
            target.to_string(),
            display.to_string(),
            permalink,
            exists,
            Element::anchor(class_name, href, display.to_string()),
        )
    }
}
