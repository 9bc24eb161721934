//! # markdown-elements
//!
//! Convert markdown tokens into a typed element tree and render it through
//! a table of pluggable renderers.
//!
//! The pipeline has three stages:
//!
//! - **Lex**: markdown text becomes a forest of [`Token`]s. The built-in
//!   [`Lexer`] is backed by pulldown-cmark; token forests produced elsewhere
//!   can be loaded with [`tokens_from_json`].
//! - **Convert**: each token becomes exactly one [`Element`]. Extension
//!   converters are consulted before the built-in ones, and tokens nobody
//!   recognizes are kept as `text` elements holding their raw source.
//! - **Render**: elements are dispatched by type name to renderers that
//!   return [`DisplayNode`]s. Caller overrides replace built-in renderers
//!   and extension renderers replace both.
//!
//! ## Example
//!
//! ```rust
//! use markdown_elements::Markdown;
//!
//! let markdown = Markdown::default();
//! let html = markdown.render_html("# Hello\n\nSome *text*");
//! assert_eq!(html, "<h1>Hello</h1><p>Some <em>text</em></p>");
//! ```
//!
//! ## Example (extension)
//!
//! ```rust
//! use markdown_elements::{mention_extension, Markdown, MarkdownOptions, MentionOptions};
//!
//! let mention = mention_extension(MentionOptions::default()).unwrap();
//! let markdown = Markdown::new(MarkdownOptions::default().with_extension(mention));
//!
//! let html = markdown.render_html("Hi @ada");
//! assert_eq!(
//!     html,
//!     r#"<p>Hi <span class="mention" data-username="ada">@ada</span></p>"#
//! );
//! ```

mod convert;
mod extension;
mod lexer;
mod mention;
mod options;
mod render;
mod service;

pub use convert::{convert, convert_fn, is_builtin_token, ConvertFn, Converter, ConverterTable};
pub use extension::{
    build_tables, Extension, ExtensionBuilder, ExtensionLevel, ExtensionTables, Tokenizer,
};
pub use lexer::Lexer;
pub use markdown_elements_core::{
    escape_html, to_html, Align, DisplayElement, DisplayNode, Element, ElementKind,
    TableCellToken, Token, BUILTIN_TYPES,
};
pub use mention::{mention_extension, MentionOptions, MentionTokenizer};
pub use options::MarkdownOptions;
pub use render::{
    default_key, default_renderers, merge_renderers, render_fn, ChildrenFn, ElementsRenderer,
    Fallback, KeyFn, RenderFn, RenderProps, RendererTable,
};
pub use service::Markdown;

/// Error type for markdown-elements operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Extension `{name}` has no converter")]
    MissingConverter { name: String },

    #[error("Extension `{name}` has no renderer")]
    MissingRenderer { name: String },

    #[error("Invalid token JSON: {0}")]
    InvalidTokens(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Load a token forest serialized by an external lexer
pub fn tokens_from_json(json: &str) -> Result<Vec<Token>> {
    Ok(serde_json::from_str(json)?)
}
