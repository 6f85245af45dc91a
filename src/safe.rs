//! Construct aware escaping for markdown serialization.
//!
//! Which characters are unsafe depends on where text is written: a `]` is
//! harmless in running text but closes a link label. The context tracks
//! the stack of constructs being serialized and escapes only characters
//! whose registered pattern is in scope.

/// Syntactic construct being serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructName {
    /// Inline content such as paragraph text
    Phrasing,
    /// Link or image label text: `[label]`
    Label,
    /// Reference text: `[text][reference]`
    Reference,
    Paragraph,
    Heading,
    TableCell,
    WikiLink,
}

/// A character that must be escaped inside certain constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsafe {
    pub character: char,
    /// Applies when any of these is on the stack; always when empty
    pub in_construct: Vec<ConstructName>,
    /// Never applies when any of these is on the stack
    pub not_in_construct: Vec<ConstructName>,
}

impl Unsafe {
    /// Pattern for `character` inside the given constructs.
    pub fn new(character: char, in_construct: &[ConstructName]) -> Self {
        Self {
            character,
            in_construct: in_construct.to_vec(),
            not_in_construct: Vec::new(),
        }
    }

    /// Excludes constructs from this pattern.
    pub fn not_in(mut self, constructs: &[ConstructName]) -> Self {
        self.not_in_construct = constructs.to_vec();
        self
    }

    fn in_scope(&self, stack: &[ConstructName]) -> bool {
        let included = self.in_construct.is_empty()
            || stack.iter().any(|name| self.in_construct.contains(name));
        let excluded = stack.iter().any(|name| self.not_in_construct.contains(name));
        included && !excluded
    }
}

/// Serialization state handed to node handlers.
#[derive(Debug, Clone, Default)]
pub struct SerializeContext {
    stack: Vec<ConstructName>,
    unsafe_patterns: Vec<Unsafe>,
}

impl SerializeContext {
    /// Creates context with no constructs and no unsafe patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers additional unsafe patterns.
    pub fn with_unsafe(mut self, patterns: impl IntoIterator<Item = Unsafe>) -> Self {
        self.unsafe_patterns.extend(patterns);
        self
    }

    /// Pushes a construct on the stack.
    pub fn enter(&mut self, name: ConstructName) {
        self.stack.push(name);
    }

    /// Pops the innermost construct.
    pub fn exit(&mut self) -> Option<ConstructName> {
        self.stack.pop()
    }

    /// Runs `f` with `name` on the stack.
    pub fn scoped<T>(&mut self, name: ConstructName, f: impl FnOnce(&mut Self) -> T) -> T {
        self.enter(name);
        let result = f(self);
        self.exit();
        result
    }

    pub fn stack(&self) -> &[ConstructName] {
        &self.stack
    }

    /// Escapes every character of `value` that is unsafe in the current
    /// constructs.
    ///
    /// ASCII punctuation is backslash escaped, anything else becomes a
    /// hexadecimal character reference.
    pub fn safe(&self, value: &str) -> String {
        let active: Vec<char> = self
            .unsafe_patterns
            .iter()
            .filter(|pattern| pattern.in_scope(&self.stack))
            .map(|pattern| pattern.character)
            .collect();

        if active.is_empty() {
            return value.to_string();
        }

        let mut result = String::with_capacity(value.len());
        for c in value.chars() {
            if !active.contains(&c) {
                result.push(c);
            } else if c.is_ascii_punctuation() {
                result.push('\\');
                result.push(c);
            } else {
                result.push_str(&format!("&#x{:X};", c as u32));
            }
        }
        result
    }
}
