//! Token contract shared with the upstream lexer
//!
//! A [`Token`] mirrors the JSON shape produced by marked-style lexers: every
//! token has a `type` and the `raw` source span, block tokens nest their
//! content under `tokens`, lists under `items` and tables under
//! `header`/`rows`/`align`. Fields an extension tokenizer adds are kept in
//! [`Token::extra`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column or cell alignment of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// A single lexer token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Discriminant, e.g. `heading`, `em` or an extension name
    #[serde(rename = "type")]
    pub kind: String,

    /// Original source span
    #[serde(default)]
    pub raw: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Nested inline or block tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,

    /// List item tokens of a `list`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Token>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Header cells of a `table`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<TableCellToken>>,

    /// Data rows of a `table`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<TableCellToken>>>,

    /// Per-column alignment of a `table`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Vec<Option<Align>>>,

    /// Any other field, typically contributed by an extension tokenizer
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One cell of a table token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCellToken {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub header: bool,
    #[serde(default)]
    pub align: Option<Align>,
}

impl Token {
    /// Create a token with a type and its raw source span
    pub fn new(kind: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            raw: raw.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Attach an extension-defined field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Nested tokens, empty when the lexer supplied none
    pub fn child_tokens(&self) -> &[Token] {
        self.tokens.as_deref().unwrap_or_default()
    }

    pub fn list_items(&self) -> &[Token] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn header_cells(&self) -> &[TableCellToken] {
        self.header.as_deref().unwrap_or_default()
    }

    pub fn table_rows(&self) -> &[Vec<TableCellToken>] {
        self.rows.as_deref().unwrap_or_default()
    }

    pub fn column_align(&self) -> &[Option<Align>] {
        self.align.as_deref().unwrap_or_default()
    }

    /// Literal text, falling back to the raw span
    pub fn text_or_raw(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.raw)
    }

    /// Look up an extension-defined field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Look up an extension-defined string field
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

impl TableCellToken {
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            text: text.into(),
            tokens,
            header: false,
            align: None,
        }
    }
}
