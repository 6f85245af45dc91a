//! Wiki link configuration.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Default separator between target and alias: `[[Target:Alias]]`.
pub const DEFAULT_ALIAS_DIVIDER: &str = ":";

/// Maps a raw page name to candidate permalinks, most preferred first.
pub type PageResolver = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Builds the href for a resolved permalink.
pub type HrefTemplate = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default page resolver.
///
/// Replaces spaces with underscores and lower-cases the result, producing
/// exactly one candidate: `"Wiki Link"` becomes `"wiki_link"`.
pub fn default_page_resolver(name: &str) -> Vec<String> {
    vec![name.replace(' ', "_").to_lowercase()]
}

/// Default href template: `#/page/{permalink}`.
pub fn default_href_template(permalink: &str) -> String {
    format!("#/page/{}", permalink)
}

/// Tokenizer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxOptions {
    /// Separator between target and alias inside `[[ ]]`
    pub alias_divider: String,
}

impl Default for SyntaxOptions {
    fn default() -> Self {
        Self {
            alias_divider: DEFAULT_ALIAS_DIVIDER.to_string(),
        }
    }
}

/// Resolution options applied when a wiki link is parsed.
///
/// Every policy is injected: the candidate mapping and href construction
/// are closures, class names are plain values. Defaults match
/// [`default_page_resolver`] and [`default_href_template`].
#[derive(Clone)]
pub struct FromMarkdownOptions {
    /// Permalinks of pages that already exist
    pub permalinks: HashSet<String>,
    /// Page name to candidate permalinks
    pub page_resolver: PageResolver,
    /// Class appended when the page does not exist
    pub new_class_name: String,
    /// Class applied to every wiki link
    pub wiki_link_class_name: String,
    /// Permalink to href
    pub href_template: HrefTemplate,
}

impl FromMarkdownOptions {
    /// Creates options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set of existing permalinks.
    pub fn with_permalinks<I, S>(mut self, permalinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permalinks = permalinks.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the page resolver.
    pub fn with_page_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.page_resolver = Arc::new(resolver);
        self
    }

    /// Replaces the class appended to links whose page does not exist.
    pub fn with_new_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.new_class_name = class_name.into();
        self
    }

    /// Replaces the class applied to every wiki link.
    pub fn with_wiki_link_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.wiki_link_class_name = class_name.into();
        self
    }

    /// Replaces the href template.
    pub fn with_href_template<F>(mut self, template: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.href_template = Arc::new(template);
        self
    }
}

impl Default for FromMarkdownOptions {
    fn default() -> Self {
        Self {
            permalinks: HashSet::new(),
            page_resolver: Arc::new(default_page_resolver),
            new_class_name: "new".to_string(),
            wiki_link_class_name: "internal".to_string(),
            href_template: Arc::new(default_href_template),
        }
    }
}

impl fmt::Debug for FromMarkdownOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromMarkdownOptions")
            .field("permalinks", &self.permalinks)
            .field("page_resolver", &"<fn>")
            .field("new_class_name", &self.new_class_name)
            .field("wiki_link_class_name", &self.wiki_link_class_name)
            .field("href_template", &"<fn>")
            .finish()
    }
}

/// Serialization options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToMarkdownOptions {
    /// Separator written between target and alias when they differ
    pub alias_divider: String,
}

impl ToMarkdownOptions {
    /// Replaces the alias divider.
    pub fn with_alias_divider(mut self, divider: impl Into<String>) -> Self {
        self.alias_divider = divider.into();
        self
    }
}

impl Default for ToMarkdownOptions {
    fn default() -> Self {
        Self {
            alias_divider: DEFAULT_ALIAS_DIVIDER.to_string(),
        }
    }
}

/// Complete configuration for a markdown pipeline with wiki links.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Tokenizer options
    pub syntax: SyntaxOptions,
    /// Resolution options applied while parsing
    pub from_markdown: FromMarkdownOptions,
    /// Serialization options
    pub to_markdown: ToMarkdownOptions,
}

impl Config {
    /// Creates configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the resolution options.
    pub fn with_from_markdown(mut self, options: FromMarkdownOptions) -> Self {
        self.from_markdown = options;
        self
    }

    /// Replaces the serialization options.
    pub fn with_to_markdown(mut self, options: ToMarkdownOptions) -> Self {
        self.to_markdown = options;
        self
    }

    /// Uses one divider for both parsing and serialization.
    pub fn with_alias_divider(mut self, divider: impl Into<String>) -> Self {
        let divider = divider.into();
        self.syntax.alias_divider = divider.clone();
        self.to_markdown.alias_divider = divider;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_resolver() {
        assert_eq!(default_page_resolver("Wiki Link"), vec!["wiki_link"]);
        assert_eq!(default_page_resolver("A  B"), vec!["a__b"]);
        assert_eq!(default_page_resolver(""), vec![""]);
    }

    #[test]
    fn test_default_href_template() {
        assert_eq!(default_href_template("wiki_link"), "#/page/wiki_link");
        assert_eq!(default_href_template(""), "#/page/");
    }

    #[test]
    fn test_from_markdown_defaults() {
        // Arrange & Act
        let options = FromMarkdownOptions::default();

        // Assert
        assert!(options.permalinks.is_empty());
        assert_eq!(options.new_class_name, "new");
        assert_eq!(options.wiki_link_class_name, "internal");
        assert_eq!((options.page_resolver)("New Page"), vec!["new_page"]);
        assert_eq!((options.href_template)("new_page"), "#/page/new_page");
    }

    #[test]
    fn test_from_markdown_builders() {
        // Arrange & Act
        let options = FromMarkdownOptions::new()
            .with_permalinks(["a", "b"])
            .with_page_resolver(|name| vec![name.to_string()])
            .with_new_class_name("missing")
            .with_wiki_link_class_name("wiki")
            .with_href_template(|p| format!("/wiki/{}", p));

        // Assert
        assert_eq!(options.permalinks.len(), 2);
        assert!(options.permalinks.contains("a"));
        assert_eq!((options.page_resolver)("A Page"), vec!["A Page"]);
        assert_eq!(options.new_class_name, "missing");
        assert_eq!(options.wiki_link_class_name, "wiki");
        assert_eq!((options.href_template)("x"), "/wiki/x");
    }

    #[test]
    fn test_from_markdown_debug_format() {
        // Arrange
        let options = FromMarkdownOptions::new().with_permalinks(["wiki_link"]);

        // Act
        let debug_str = format!("{:?}", options);

        // Assert
        assert!(debug_str.contains("FromMarkdownOptions"));
        assert!(debug_str.contains("wiki_link"));
        assert!(debug_str.contains("<fn>"));
    }

    #[test]
    fn test_alias_divider_applies_to_both_sides() {
        // Arrange & Act
        let config = Config::new().with_alias_divider("|");

        // Assert
        assert_eq!(config.syntax.alias_divider, "|");
        assert_eq!(config.to_markdown.alias_divider, "|");
    }

    #[test]
    fn test_default_alias_divider() {
        let config = Config::default();

        assert_eq!(config.syntax.alias_divider, ":");
        assert_eq!(config.to_markdown.alias_divider, ":");
    }
}
