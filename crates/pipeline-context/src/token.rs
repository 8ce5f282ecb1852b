//! Template tokens: the unevaluated template tree produced by the YAML/expression layer.
//!
//! Only the shape matters here. Tokens carry no source positions and no
//! evaluation state; the parser that builds them lives elsewhere.

use std::fmt;

/// Kind discriminant of a [`TemplateToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Null,
    Boolean,
    Number,
    Literal,
    Sequence,
    Mapping,
    Expression,
}

impl TokenKind {
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Null => "Null",
            TokenKind::Boolean => "Boolean",
            TokenKind::Number => "Number",
            TokenKind::Literal => "Literal",
            TokenKind::Sequence => "Sequence",
            TokenKind::Mapping => "Mapping",
            TokenKind::Expression => "Expression",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar text token. The text may be null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralToken {
    value: Option<String>,
}

impl LiteralToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn null() -> Self {
        Self { value: None }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl From<Option<String>> for LiteralToken {
    fn from(value: Option<String>) -> Self {
        Self { value }
    }
}

/// Ordered list of tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequenceToken {
    items: Vec<TemplateToken>,
}

impl SequenceToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: TemplateToken) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TemplateToken> {
        self.items.iter()
    }
}

/// Ordered list of key/value token pairs. Keys are tokens too; only literal
/// keys have a context value form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingToken {
    pairs: Vec<(TemplateToken, TemplateToken)>,
}

impl MappingToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: TemplateToken, value: TemplateToken) {
        self.pairs.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TemplateToken, &TemplateToken)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }
}

/// A node of the template token tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateToken {
    Null,
    Boolean(bool),
    Number(f64),
    Literal(LiteralToken),
    Sequence(SequenceToken),
    Mapping(MappingToken),
    /// An unevaluated `${{ ... }}` expression.
    Expression(String),
}

impl TemplateToken {
    pub fn literal(value: impl Into<String>) -> Self {
        TemplateToken::Literal(LiteralToken::new(value))
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            TemplateToken::Null => TokenKind::Null,
            TemplateToken::Boolean(_) => TokenKind::Boolean,
            TemplateToken::Number(_) => TokenKind::Number,
            TemplateToken::Literal(_) => TokenKind::Literal,
            TemplateToken::Sequence(_) => TokenKind::Sequence,
            TemplateToken::Mapping(_) => TokenKind::Mapping,
            TemplateToken::Expression(_) => TokenKind::Expression,
        }
    }
}

impl From<LiteralToken> for TemplateToken {
    fn from(token: LiteralToken) -> Self {
        TemplateToken::Literal(token)
    }
}

impl From<SequenceToken> for TemplateToken {
    fn from(token: SequenceToken) -> Self {
        TemplateToken::Sequence(token)
    }
}

impl From<MappingToken> for TemplateToken {
    fn from(token: MappingToken) -> Self {
        TemplateToken::Mapping(token)
    }
}
