//! Character level tokenizer for `[[Target]]` and `[[Target:Alias]]`.
//!
//! Produces a flat stream of enter/exit events over byte ranges of the
//! scanned text, the same shape a markdown tokenizer hands to a tree
//! builder. Text that is not part of a wiki link is reported as
//! [`TokenKind::Data`].

use std::ops::Range;

use crate::config::SyntaxOptions;

const OPEN_MARKER: &str = "[[";
const CLOSE_MARKER: &str = "]]";

/// Kind of a token in the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Plain text outside any wiki link
    Data,
    /// Whole `[[...]]` occurrence
    WikiLink,
    /// `[[` or `]]`
    WikiLinkMarker,
    WikiLinkTarget,
    /// Divider between target and alias
    WikiLinkAliasMarker,
    WikiLinkAlias,
}

/// Token spanning a byte range of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

/// Tokenizer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Enter(Token),
    Exit(Token),
}

/// Byte offsets of one recognized wiki link.
struct LinkSpan {
    target: Range<usize>,
    alias: Option<(Range<usize>, Range<usize>)>,
    end: usize,
}

/// Wiki link tokenizer.
#[derive(Debug, Clone)]
pub struct WikiLinkSyntax {
    alias_divider: String,
}

impl WikiLinkSyntax {
    /// Creates tokenizer with the given options.
    pub fn new(options: SyntaxOptions) -> Self {
        Self {
            alias_divider: options.alias_divider,
        }
    }

    /// Separator between target and alias.
    pub fn alias_divider(&self) -> &str {
        &self.alias_divider
    }

    /// Tokenizes a run of inline text.
    ///
    /// Every byte of `text` is covered by exactly one top level token,
    /// either [`TokenKind::Data`] or [`TokenKind::WikiLink`]. Malformed
    /// openers are left as data.
    pub fn tokenize(&self, text: &str) -> Vec<Event> {
        let mut events = Vec::new();
        let mut data_start = 0;
        let mut pos = 0;

        while let Some(offset) = text[pos..].find(OPEN_MARKER) {
            let start = pos + offset;

            match self.scan_link(text, start) {
                Some(span) => {
                    if data_start < start {
                        push_leaf(&mut events, TokenKind::Data, data_start..start);
                    }
                    self.push_link(&mut events, start, span.target, span.alias, span.end);
                    data_start = span.end;
                    pos = span.end;
                }
                None => {
                    log::trace!("no wiki link at byte {}", start);
                    pos = start + 1;
                }
            }
        }

        if data_start < text.len() {
            push_leaf(&mut events, TokenKind::Data, data_start..text.len());
        }

        events
    }

    /// Returns true when `text` holds at least one wiki link.
    pub fn contains_wiki_link(&self, text: &str) -> bool {
        self.tokenize(text).iter().any(|event| {
            matches!(event, Event::Enter(token) if token.kind == TokenKind::WikiLink)
        })
    }

    fn push_link(
        &self,
        events: &mut Vec<Event>,
        start: usize,
        target: Range<usize>,
        alias: Option<(Range<usize>, Range<usize>)>,
        end: usize,
    ) {
        let link = Token {
            kind: TokenKind::WikiLink,
            range: start..end,
        };
        events.push(Event::Enter(link.clone()));
        push_leaf(events, TokenKind::WikiLinkMarker, start..start + OPEN_MARKER.len());
        push_leaf(events, TokenKind::WikiLinkTarget, target);
        if let Some((divider, alias)) = alias {
            push_leaf(events, TokenKind::WikiLinkAliasMarker, divider);
            push_leaf(events, TokenKind::WikiLinkAlias, alias);
        }
        push_leaf(events, TokenKind::WikiLinkMarker, end - CLOSE_MARKER.len()..end);
        events.push(Event::Exit(link));
    }

    /// Scans a wiki link opening at `start`, which must point at `[[`.
    fn scan_link(&self, text: &str, start: usize) -> Option<LinkSpan> {
        let target_start = start + OPEN_MARKER.len();
        let mut pos = target_start;

        loop {
            let rest = &text[pos..];
            if rest.starts_with(CLOSE_MARKER) {
                if pos == target_start {
                    return None;
                }
                return Some(LinkSpan {
                    target: target_start..pos,
                    alias: None,
                    end: pos + CLOSE_MARKER.len(),
                });
            }
            if !self.alias_divider.is_empty() && rest.starts_with(self.alias_divider.as_str()) {
                if pos == target_start {
                    return None;
                }
                let divider = pos..pos + self.alias_divider.len();
                let (alias, end) = scan_alias(text, divider.end)?;
                return Some(LinkSpan {
                    target: target_start..pos,
                    alias: Some((divider, alias)),
                    end,
                });
            }
            pos += next_body_char(rest)?;
        }
    }
}

impl Default for WikiLinkSyntax {
    fn default() -> Self {
        Self::new(SyntaxOptions::default())
    }
}

/// Scans an alias starting at `start` up to the closing `]]`.
fn scan_alias(text: &str, start: usize) -> Option<(Range<usize>, usize)> {
    let mut pos = start;

    loop {
        let rest = &text[pos..];
        if rest.starts_with(CLOSE_MARKER) {
            if pos == start {
                return None;
            }
            return Some((start..pos, pos + CLOSE_MARKER.len()));
        }
        pos += next_body_char(rest)?;
    }
}

/// Byte length of the next character allowed inside a link body.
///
/// Line endings, end of input and a `]` that does not close the link end
/// the attempt. A backslash escaped bracket is consumed whole.
fn next_body_char(rest: &str) -> Option<usize> {
    let mut chars = rest.chars();
    match chars.next() {
        None | Some('\n') | Some('\r') | Some(']') => None,
        Some('\\') if matches!(chars.next(), Some('[') | Some(']')) => Some(2),
        Some(c) => Some(c.len_utf8()),
    }
}

/// Drops the backslash from `\[` and `\]`.
pub(crate) fn unescape_brackets(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && matches!(chars.peek(), Some('[') | Some(']')) {
            continue;
        }
        result.push(c);
    }
    result
}

fn push_leaf(events: &mut Vec<Event>, kind: TokenKind, range: Range<usize>) {
    let token = Token { kind, range };
    events.push(Event::Enter(token.clone()));
    events.push(Event::Exit(token));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax() -> WikiLinkSyntax {
        WikiLinkSyntax::new(SyntaxOptions::default())
    }

    /// Collects (kind, slice) pairs for every exited token.
    fn exits<'a>(text: &'a str, events: &[Event]) -> Vec<(TokenKind, &'a str)> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::Exit(token) => Some((token.kind, &text[token.range.clone()])),
                Event::Enter(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_tokenize_simple_link() {
        // Arrange
        let text = "[[Wiki Link]]";

        // Act
        let events = syntax().tokenize(text);

        // Assert
        assert_eq!(
            exits(text, &events),
            vec![
                (TokenKind::WikiLinkMarker, "[["),
                (TokenKind::WikiLinkTarget, "Wiki Link"),
                (TokenKind::WikiLinkMarker, "]]"),
                (TokenKind::WikiLink, "[[Wiki Link]]"),
            ]
        );
    }

    #[test]
    fn test_tokenize_aliased_link() {
        // Arrange
        let text = "[[Real Page:Page Alias]]";

        // Act
        let events = syntax().tokenize(text);

        // Assert
        assert_eq!(
            exits(text, &events),
            vec![
                (TokenKind::WikiLinkMarker, "[["),
                (TokenKind::WikiLinkTarget, "Real Page"),
                (TokenKind::WikiLinkAliasMarker, ":"),
                (TokenKind::WikiLinkAlias, "Page Alias"),
                (TokenKind::WikiLinkMarker, "]]"),
                (TokenKind::WikiLink, "[[Real Page:Page Alias]]"),
            ]
        );
    }

    #[test]
    fn test_tokenize_custom_divider() {
        // Arrange
        let syntax = WikiLinkSyntax::new(SyntaxOptions {
            alias_divider: "|".to_string(),
        });
        let text = "[[Real Page|Page Alias]] and [[a:b]]";

        // Act
        let events = syntax.tokenize(text);

        // Assert
        let pairs = exits(text, &events);
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, "Real Page")));
        assert!(pairs.contains(&(TokenKind::WikiLinkAlias, "Page Alias")));
        assert!(
            pairs.contains(&(TokenKind::WikiLinkTarget, "a:b")),
            "Colon is plain target text with a pipe divider: {:?}",
            pairs
        );
    }

    #[test]
    fn test_tokenize_surrounding_text() {
        // Arrange
        let text = "See [[Page]] now";

        // Act
        let events = syntax().tokenize(text);

        // Assert
        let pairs = exits(text, &events);
        assert_eq!(pairs.first(), Some(&(TokenKind::Data, "See ")));
        assert_eq!(pairs.last(), Some(&(TokenKind::Data, " now")));
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, "Page")));
    }

    #[test]
    fn test_tokenize_multiple_links() {
        let text = "[[One]][[Two:2]]";

        let events = syntax().tokenize(text);

        let links: Vec<_> = exits(text, &events)
            .into_iter()
            .filter(|(kind, _)| *kind == TokenKind::WikiLink)
            .collect();
        assert_eq!(
            links,
            vec![
                (TokenKind::WikiLink, "[[One]]"),
                (TokenKind::WikiLink, "[[Two:2]]")
            ]
        );
    }

    #[test]
    fn test_reject_empty_target() {
        let syntax = syntax();

        assert!(!syntax.contains_wiki_link("[[]]"));
        assert!(!syntax.contains_wiki_link("[[:alias]]"));
    }

    #[test]
    fn test_reject_empty_alias() {
        assert!(!syntax().contains_wiki_link("[[target:]]"));
    }

    #[test]
    fn test_reject_line_ending() {
        let syntax = syntax();

        assert!(!syntax.contains_wiki_link("[[Wiki\nLink]]"));
        assert!(!syntax.contains_wiki_link("[[Wiki:Li\r\nnk]]"));
    }

    #[test]
    fn test_reject_unclosed() {
        let syntax = syntax();

        assert!(!syntax.contains_wiki_link("[[Wiki Link"));
        assert!(!syntax.contains_wiki_link("[[Wiki Link]"));
        assert!(!syntax.contains_wiki_link("[[Wiki] Link]]"));
    }

    #[test]
    fn test_rejected_opener_stays_data() {
        // Arrange
        let text = "[[]] plain";

        // Act
        let events = syntax().tokenize(text);

        // Assert
        assert_eq!(exits(text, &events), vec![(TokenKind::Data, "[[]] plain")]);
    }

    #[test]
    fn test_retry_after_rejected_opener() {
        // Arrange: first opener has an empty target, the second is valid
        let text = "[[]][[Page]]";

        // Act
        let events = syntax().tokenize(text);

        // Assert
        let pairs = exits(text, &events);
        assert_eq!(pairs.first(), Some(&(TokenKind::Data, "[[]]")));
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, "Page")));
    }

    #[test]
    fn test_open_bracket_inside_target() {
        let text = "[[[Page]]";

        let events = syntax().tokenize(text);

        let pairs = exits(text, &events);
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, "[Page")));
    }

    #[test]
    fn test_escaped_close_bracket_inside_target() {
        // Arrange
        let text = r"[[a\]b]] and [[c\]]]";

        // Act
        let events = syntax().tokenize(text);

        // Assert
        let pairs = exits(text, &events);
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, r"a\]b")), "{:?}", pairs);
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, r"c\]")), "{:?}", pairs);
    }

    #[test]
    fn test_unescape_brackets() {
        assert_eq!(unescape_brackets(r"a\]b\[c"), "a]b[c");
        assert_eq!(unescape_brackets(r"a\b\"), r"a\b\");
        assert_eq!(unescape_brackets("plain"), "plain");
    }

    #[test]
    fn test_alias_may_contain_divider() {
        let text = "[[a:b:c]]";

        let events = syntax().tokenize(text);

        let pairs = exits(text, &events);
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, "a")));
        assert!(pairs.contains(&(TokenKind::WikiLinkAlias, "b:c")));
    }

    #[test]
    fn test_multibyte_target() {
        let text = "[[Café Ünïcode:Résumé]]";

        let events = syntax().tokenize(text);

        let pairs = exits(text, &events);
        assert!(pairs.contains(&(TokenKind::WikiLinkTarget, "Café Ünïcode")));
        assert!(pairs.contains(&(TokenKind::WikiLinkAlias, "Résumé")));
    }

    #[test]
    fn test_tokenize_empty_text() {
        assert!(syntax().tokenize("").is_empty());
    }
}
