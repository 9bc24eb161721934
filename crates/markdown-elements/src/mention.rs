//! `@username` mentions as an inline extension.

use markdown_elements_core::{DisplayNode, Element, Token};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::convert::convert_fn;
use crate::extension::{Extension, ExtensionLevel, Tokenizer};
use crate::lexer::Lexer;
use crate::render::render_fn;
use crate::Result;

static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([a-zA-Z0-9_-]+)").unwrap());

/// Options for [`mention_extension`]
#[derive(Debug, Clone)]
pub struct MentionOptions {
    /// Class attribute of the rendered mention
    pub class_name: String,

    /// Profile link prefix. When set, mentions render as links to
    /// `{profile_url}{username}` instead of plain spans.
    pub profile_url: Option<String>,
}

impl Default for MentionOptions {
    fn default() -> Self {
        Self {
            class_name: "mention".to_string(),
            profile_url: None,
        }
    }
}

/// Claims `@username` at the start of the input
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionTokenizer;

impl Tokenizer for MentionTokenizer {
    fn start(&self, src: &str) -> Option<usize> {
        src.find('@')
    }

    fn tokenize(&self, src: &str, _: &Lexer) -> Option<Token> {
        let captures = MENTION.captures(src)?;
        let raw = captures.get(0)?.as_str();
        let username = captures.get(1)?.as_str();
        Some(Token::new("mention", raw).with_field("username", username))
    }
}

/// Inline extension turning `@username` into a `mention` element
pub fn mention_extension(options: MentionOptions) -> Result<Extension> {
    let MentionOptions {
        class_name,
        profile_url,
    } = options;

    Extension::builder("mention")
        .level(ExtensionLevel::Inline)
        .tokenizer(MentionTokenizer)
        .converter(convert_fn(|token, _| {
            let username = token.str_field("username").unwrap_or_default();
            let mut fields = Map::new();
            fields.insert("username".to_string(), Value::from(username));
            Element::extension("mention", token.raw.as_str(), fields, Vec::new())
        }))
        .renderer(render_fn(move |props| {
            let username = props.element.str_field("username").unwrap_or_default();
            let node = match &profile_url {
                Some(prefix) => DisplayNode::tag("a").attr("href", format!("{prefix}{username}")),
                None => DisplayNode::tag("span"),
            };
            Some(
                node.attr("class", class_name.as_str())
                    .attr("data-username", username)
                    .with_child(DisplayNode::text(format!("@{username}"))),
            )
        }))
        .build()
}
