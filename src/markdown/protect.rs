//! Shields wiki link spans from comrak's bracket parsing.
//!
//! comrak pairs `[` and `]` before any text is handed back to us, so a
//! `[[Foo]]` can be claimed by a `[Foo]: /x` definition or become an
//! ordinary link when followed by `(url)`. Every wiki link in the raw
//! source is swapped for an opaque placeholder before parsing and mapped
//! back to its original text afterwards.

use crate::syntax::{Event, TokenKind, WikiLinkSyntax};

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Piece of a text run after placeholders are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'s> {
    Text(&'s str),
    /// Original `[[...]]` source of a protected span
    Link(&'s str),
}

/// Markdown source with wiki link spans replaced by placeholders.
#[derive(Debug, Clone)]
pub(crate) struct ProtectedSource {
    text: String,
    spans: Vec<String>,
}

impl ProtectedSource {
    /// Replaces every wiki link in `content` that is not preceded by an
    /// escaping backslash.
    pub(crate) fn new(syntax: &WikiLinkSyntax, content: &str) -> Self {
        let mut text = String::with_capacity(content.len());
        let mut spans = Vec::new();
        let mut copied = 0;

        for event in syntax.tokenize(content) {
            let Event::Enter(token) = event else {
                continue;
            };
            if token.kind != TokenKind::WikiLink || is_escaped(content, token.range.start) {
                continue;
            }

            text.push_str(&content[copied..token.range.start]);
            text.push(PLACEHOLDER_OPEN);
            text.push_str(&spans.len().to_string());
            text.push(PLACEHOLDER_CLOSE);
            spans.push(content[token.range.clone()].to_string());
            copied = token.range.end;
        }
        text.push_str(&content[copied..]);

        log::trace!("protected {} wiki link spans", spans.len());
        Self { text, spans }
    }

    /// Source to hand to the markdown parser.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Splits `text` into plain text and protected spans.
    ///
    /// A placeholder that does not name a known span stays text.
    pub(crate) fn segments<'s>(&'s self, text: &'s str) -> Vec<Segment<'s>> {
        let mut segments = Vec::new();
        let mut text_start = 0;
        let mut pos = 0;

        while let Some(offset) = text[pos..].find(PLACEHOLDER_OPEN) {
            let start = pos + offset;
            let digits_start = start + PLACEHOLDER_OPEN.len_utf8();

            match self.lookup(&text[digits_start..]) {
                Some((span, len)) => {
                    if text_start < start {
                        segments.push(Segment::Text(&text[text_start..start]));
                    }
                    segments.push(Segment::Link(span));
                    pos = digits_start + len;
                    text_start = pos;
                }
                None => pos = digits_start,
            }
        }

        if text_start < text.len() {
            segments.push(Segment::Text(&text[text_start..]));
        }
        segments
    }

    /// Puts the original source back in place of every placeholder.
    pub(crate) fn restore(&self, text: &str) -> String {
        self.segments(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) | Segment::Link(text) => text,
            })
            .collect()
    }

    /// Restores `value` when it holds a placeholder.
    pub(crate) fn restore_in_place(&self, value: &mut String) {
        if value.contains(PLACEHOLDER_OPEN) {
            *value = self.restore(value);
        }
    }

    /// Reads `<index><close>` and returns the span with the bytes consumed.
    fn lookup(&self, rest: &str) -> Option<(&str, usize)> {
        let close = rest.find(PLACEHOLDER_CLOSE)?;
        let index: usize = rest[..close].parse().ok()?;
        let span = self.spans.get(index)?;
        Some((span.as_str(), close + PLACEHOLDER_CLOSE.len_utf8()))
    }
}

/// Whether the byte at `at` follows an odd number of backslashes.
fn is_escaped(content: &str, at: usize) -> bool {
    let backslashes = content[..at]
        .bytes()
        .rev()
        .take_while(|&b| b == b'\\')
        .count();
    backslashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protect(content: &str) -> ProtectedSource {
        ProtectedSource::new(&WikiLinkSyntax::default(), content)
    }

    #[test]
    fn test_replaces_wiki_links() {
        // Arrange & Act
        let protected = protect("See [[Foo]] and [[Bar:Baz]].");

        // Assert
        assert!(!protected.text().contains("[["), "{:?}", protected.text());
        assert_eq!(protected.restore(protected.text()), "See [[Foo]] and [[Bar:Baz]].");
    }

    #[test]
    fn test_segments_split_text_and_links() {
        // Arrange
        let protected = protect("a [[Foo]] b");

        // Act
        let segments = protected.segments(protected.text());

        // Assert
        assert_eq!(
            segments,
            vec![
                Segment::Text("a "),
                Segment::Link("[[Foo]]"),
                Segment::Text(" b"),
            ]
        );
    }

    #[test]
    fn test_escaped_opener_left_alone() {
        let protected = protect(r"\[[Foo]] and \\[[Bar]]");

        assert_eq!(protected.spans, vec!["[[Bar]]".to_string()]);
        assert!(protected.text().starts_with(r"\[[Foo]]"));
    }

    #[test]
    fn test_unknown_placeholder_stays_text() {
        // Arrange
        let protected = protect("[[Foo]]");
        let stray = format!("{}7{} x", PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE);

        // Act
        let segments = protected.segments(&stray);

        // Assert
        assert_eq!(segments, vec![Segment::Text(stray.as_str())]);
    }

    #[test]
    fn test_restore_in_place() {
        // Arrange
        let protected = protect("`[[Code]]`");
        let mut literal = protected.text().trim_matches('`').to_string();

        // Act
        protected.restore_in_place(&mut literal);

        // Assert
        assert_eq!(literal, "[[Code]]");
    }

    #[test]
    fn test_no_links() {
        let protected = protect("plain [text](url)");

        assert!(protected.is_empty());
        assert_eq!(protected.text(), "plain [text](url)");
    }
}
