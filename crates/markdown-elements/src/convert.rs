//! Token to element conversion.
//!
//! Every token is dispatched by its type, first to the extension table and
//! then to the built-in table. Handlers receive the active [`Converter`] so
//! they can convert nested token sequences with the same extension table.
//! Tokens nobody handles become a `text` element holding the raw span.

use std::sync::Arc;

use indexmap::IndexMap;
use markdown_elements_core::{Element, TableCellToken, Token};
use once_cell::sync::Lazy;

/// Converter function of an extension
pub type ConvertFn = Arc<dyn Fn(&Token, &Converter<'_>) -> Element + Send + Sync>;

/// Extension converters by token type
pub type ConverterTable = IndexMap<String, ConvertFn>;

type BuiltinConvert = fn(&Token, &Converter<'_>) -> Element;

/// Wrap a closure as a [`ConvertFn`]
pub fn convert_fn<F>(f: F) -> ConvertFn
where
    F: Fn(&Token, &Converter<'_>) -> Element + Send + Sync + 'static,
{
    Arc::new(f)
}

static BUILTIN_CONVERTERS: Lazy<IndexMap<&'static str, BuiltinConvert>> = Lazy::new(|| {
    let entries: [(&'static str, BuiltinConvert); 17] = [
        ("space", convert_space),
        ("hr", convert_hr),
        ("br", convert_br),
        ("heading", convert_heading),
        ("list", convert_list),
        ("list_item", convert_list_item),
        ("link", convert_link),
        ("code", convert_code),
        ("image", convert_image),
        ("paragraph", convert_paragraph),
        ("strong", convert_strong),
        ("em", convert_emphasis),
        ("codespan", convert_codespan),
        ("blockquote", convert_blockquote),
        ("del", convert_delete),
        ("table", convert_table),
        ("escape", convert_escape),
    ];
    entries.into_iter().collect()
});

/// Converts token forests into element forests.
#[derive(Clone, Copy, Default)]
pub struct Converter<'a> {
    extensions: Option<&'a ConverterTable>,
}

impl<'a> Converter<'a> {
    /// Converter with only the built-in token types
    pub fn new() -> Self {
        Self { extensions: None }
    }

    /// Converter consulting `extensions` before the built-in table
    pub fn with_extensions(extensions: &'a ConverterTable) -> Self {
        Self {
            extensions: Some(extensions),
        }
    }

    /// Convert a sequence of tokens, preserving order
    pub fn convert(&self, tokens: &[Token]) -> Vec<Element> {
        self.convert_iter(tokens)
    }

    /// Convert any iterator of tokens, preserving order
    pub fn convert_iter<'t, I>(&self, tokens: I) -> Vec<Element>
    where
        I: IntoIterator<Item = &'t Token>,
    {
        tokens
            .into_iter()
            .map(|token| self.convert_token(token))
            .collect()
    }

    /// Convert a single token. Always yields exactly one element.
    pub fn convert_token(&self, token: &Token) -> Element {
        let kind = token.kind.as_str();

        if let Some(convert) = self.extensions.and_then(|table| table.get(kind)) {
            return convert(token, self);
        }

        if let Some(convert) = BUILTIN_CONVERTERS.get(kind) {
            return convert(token, self);
        }

        if kind != "text" {
            tracing::debug!(token_type = kind, "No converter for token, keeping raw text");
        }
        Element::new_text(token.raw.as_str())
    }
}

/// Convert `tokens` with an optional table of extension converters
pub fn convert(tokens: &[Token], extensions: Option<&ConverterTable>) -> Vec<Element> {
    match extensions {
        Some(table) => Converter::with_extensions(table).convert(tokens),
        None => Converter::new().convert(tokens),
    }
}

/// Whether a token type has a built-in converter
pub fn is_builtin_token(kind: &str) -> bool {
    BUILTIN_CONVERTERS.contains_key(kind)
}

fn convert_space(_: &Token, _: &Converter<'_>) -> Element {
    Element::space()
}

fn convert_hr(_: &Token, _: &Converter<'_>) -> Element {
    Element::hr()
}

fn convert_br(_: &Token, _: &Converter<'_>) -> Element {
    Element::br()
}

fn convert_heading(token: &Token, convert: &Converter<'_>) -> Element {
    let depth = token.depth.unwrap_or(1).clamp(1, 6) as u8;
    Element::heading(depth, convert.convert(token.child_tokens()))
}

fn convert_list(token: &Token, convert: &Converter<'_>) -> Element {
    Element::list(
        token.ordered.unwrap_or(false),
        convert.convert(token.list_items()),
    )
}

fn convert_list_item(token: &Token, convert: &Converter<'_>) -> Element {
    let task = token.task.unwrap_or(false);
    let checked = task.then(|| token.checked.unwrap_or(false));

    // Unwrap one level: block tokens with inline content are replaced by
    // that content so the item renders as inline flow.
    let flattened = token.child_tokens().iter().flat_map(|block| match &block.tokens {
        Some(inline) => inline.iter().collect::<Vec<_>>(),
        None => vec![block],
    });

    Element::list_item(task, checked, convert.convert_iter(flattened))
}

fn convert_link(token: &Token, convert: &Converter<'_>) -> Element {
    Element::link(
        token.href.clone().unwrap_or_default(),
        convert.convert(token.child_tokens()),
    )
}

fn convert_code(token: &Token, _: &Converter<'_>) -> Element {
    Element::code(token.text.clone().unwrap_or_default(), token.lang.clone())
}

fn convert_image(token: &Token, _: &Converter<'_>) -> Element {
    let alt = token
        .title
        .clone()
        .or_else(|| token.text.clone())
        .unwrap_or_default();
    Element::image(token.href.clone().unwrap_or_default(), alt)
}

fn convert_paragraph(token: &Token, convert: &Converter<'_>) -> Element {
    Element::paragraph(convert.convert(token.child_tokens()))
}

fn convert_strong(token: &Token, convert: &Converter<'_>) -> Element {
    Element::strong(convert.convert(token.child_tokens()))
}

fn convert_emphasis(token: &Token, convert: &Converter<'_>) -> Element {
    Element::emphasis(convert.convert(token.child_tokens()))
}

fn convert_codespan(token: &Token, _: &Converter<'_>) -> Element {
    Element::codespan(token.text.clone().unwrap_or_default())
}

fn convert_blockquote(token: &Token, convert: &Converter<'_>) -> Element {
    Element::blockquote(convert.convert(token.child_tokens()))
}

fn convert_delete(token: &Token, convert: &Converter<'_>) -> Element {
    Element::delete(convert.convert(token.child_tokens()))
}

// Escapes carry the unescaped character in `text`.
fn convert_escape(token: &Token, _: &Converter<'_>) -> Element {
    Element::new_text(token.text_or_raw())
}

fn convert_table(token: &Token, convert: &Converter<'_>) -> Element {
    let cells = |row: &[TableCellToken], header: bool| {
        row.iter()
            .map(|cell| Element::table_cell(header, cell.align, convert.convert(&cell.tokens)))
            .collect::<Vec<_>>()
    };

    let header = Element::table_header(vec![Element::table_row(cells(token.header_cells(), true))]);
    let body = Element::table_body(
        token
            .table_rows()
            .iter()
            .map(|row| Element::table_row(cells(row, false)))
            .collect(),
    );

    Element::table(token.column_align().to_vec(), header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_elements_core::{Align, ElementKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tokens(value: serde_json::Value) -> Vec<Token> {
        serde_json::from_value(value).unwrap()
    }

    fn to_json(elements: &[Element]) -> serde_json::Value {
        serde_json::to_value(elements).unwrap()
    }

    #[test]
    fn test_heading() {
        let input = tokens(json!([
            { "type": "heading", "raw": "## Hi", "depth": 2, "tokens": [{ "type": "text", "raw": "Hi" }] }
        ]));
        assert_eq!(
            to_json(&convert(&input, None)),
            json!([{
                "type": "heading",
                "text": "",
                "depth": 2,
                "children": [{ "type": "text", "text": "Hi" }]
            }])
        );
    }

    #[test]
    fn test_heading_depth_is_kept() {
        for depth in 1..=6u8 {
            let token = Token {
                depth: Some(u32::from(depth)),
                ..Token::new("heading", "")
            };
            let element = Converter::new().convert_token(&token);
            assert_eq!(element.kind(), &ElementKind::Heading { depth });
        }
    }

    #[test]
    fn test_heading_depth_is_clamped() {
        for (depth, expected) in [(0, 1), (7, 6), (300, 6)] {
            let token = Token {
                depth: Some(depth),
                ..Token::new("heading", "")
            };
            let element = Converter::new().convert_token(&token);
            assert_eq!(element.kind(), &ElementKind::Heading { depth: expected });
        }
    }

    #[test]
    fn test_wide_heading_depth_from_json() {
        let input = tokens(json!([{ "type": "heading", "raw": "#", "depth": 300, "tokens": [] }]));
        let element = Converter::new().convert_token(&input[0]);
        assert_eq!(element.kind(), &ElementKind::Heading { depth: 6 });
    }

    #[test]
    fn test_space_token() {
        let input = tokens(json!([{ "type": "space", "raw": "\n\n" }]));
        assert_eq!(convert(&input, None), vec![Element::space()]);
    }

    #[test]
    fn test_list_with_plain_item() {
        let input = tokens(json!([{
            "type": "list",
            "raw": "- A",
            "ordered": false,
            "items": [{
                "type": "list_item",
                "raw": "- A",
                "task": false,
                "tokens": [{ "type": "text", "raw": "A", "text": "A" }]
            }]
        }]));
        assert_eq!(
            to_json(&convert(&input, None)),
            json!([{
                "type": "list",
                "text": "",
                "ordered": false,
                "children": [{
                    "type": "list_item",
                    "text": "",
                    "task": false,
                    "children": [{ "type": "text", "text": "A" }]
                }]
            }])
        );
    }

    #[test]
    fn test_list_item_unwraps_one_level() {
        let input = tokens(json!([{
            "type": "list_item",
            "raw": "- [x] **A** b",
            "task": true,
            "checked": true,
            "tokens": [
                {
                    "type": "text",
                    "raw": "**A** b",
                    "tokens": [
                        { "type": "strong", "raw": "**A**", "tokens": [{ "type": "text", "raw": "A" }] },
                        { "type": "text", "raw": " b" }
                    ]
                },
                { "type": "hr", "raw": "---" }
            ]
        }]));
        let elements = convert(&input, None);
        let item = &elements[0];

        assert_eq!(item.kind(), &ElementKind::ListItem { task: true, checked: Some(true) });
        let names: Vec<&str> = item.children().iter().map(Element::type_name).collect();
        assert_eq!(names, vec!["strong", "text", "hr"]);
    }

    #[test]
    fn test_checked_only_for_tasks() {
        let plain = Token {
            task: Some(false),
            checked: Some(true),
            ..Token::new("list_item", "- a")
        };
        let task = Token {
            task: Some(true),
            ..Token::new("list_item", "- [ ] a")
        };
        let converter = Converter::new();

        assert_eq!(
            converter.convert_token(&plain).kind(),
            &ElementKind::ListItem { task: false, checked: None }
        );
        assert_eq!(
            converter.convert_token(&task).kind(),
            &ElementKind::ListItem { task: true, checked: Some(false) }
        );
    }

    #[test]
    fn test_table_shape() {
        let input = tokens(json!([{
            "type": "table",
            "raw": "| Name | Age |",
            "align": ["left", "right"],
            "header": [
                { "text": "Name", "tokens": [{ "type": "text", "raw": "Name" }], "header": true, "align": "left" },
                { "text": "Age", "tokens": [{ "type": "text", "raw": "Age" }], "header": true, "align": "right" }
            ],
            "rows": [[
                { "text": "Bob", "tokens": [{ "type": "text", "raw": "Bob" }], "header": false, "align": "left" },
                { "text": "5", "tokens": [{ "type": "text", "raw": "5" }], "header": false, "align": "right" }
            ]]
        }]));
        let cell = |header: bool, align: &str, text: &str| {
            json!({
                "type": "table_cell",
                "text": "",
                "header": header,
                "align": align,
                "children": [{ "type": "text", "text": text }]
            })
        };

        assert_eq!(
            to_json(&convert(&input, None)),
            json!([{
                "type": "table",
                "text": "",
                "align": ["left", "right"],
                "children": [
                    {
                        "type": "table_header",
                        "text": "",
                        "children": [{
                            "type": "table_row",
                            "text": "",
                            "children": [cell(true, "left", "Name"), cell(true, "right", "Age")]
                        }]
                    },
                    {
                        "type": "table_body",
                        "text": "",
                        "children": [{
                            "type": "table_row",
                            "text": "",
                            "children": [cell(false, "left", "Bob"), cell(false, "right", "5")]
                        }]
                    }
                ]
            }])
        );
    }

    #[test]
    fn test_table_without_rows_keeps_both_sections() {
        let token = Token {
            align: Some(vec![None]),
            header: Some(vec![TableCellToken::new("a", vec![Token::new("text", "a")])]),
            ..Token::new("table", "| a |\n|---|")
        };
        let table = Converter::new().convert_token(&token);

        assert_eq!(table.kind(), &ElementKind::Table { align: vec![None] });
        assert_eq!(table.children().len(), 2);
        assert_eq!(table.children()[0].type_name(), "table_header");
        assert_eq!(table.children()[1].type_name(), "table_body");
        assert!(table.children()[1].children().is_empty());
    }

    #[test]
    fn test_cell_align_comes_from_cell() {
        let mut cell = TableCellToken::new("x", vec![]);
        cell.align = Some(Align::Center);
        let token = Token {
            align: Some(vec![Some(Align::Left)]),
            rows: Some(vec![vec![cell]]),
            ..Token::new("table", "")
        };
        let table = Converter::new().convert_token(&token);
        let body_cell = &table.children()[1].children()[0].children()[0];

        assert_eq!(
            body_cell.kind(),
            &ElementKind::TableCell { header: false, align: Some(Align::Center) }
        );
    }

    #[test]
    fn test_unknown_token_falls_back_to_raw() {
        let input = tokens(json!([{ "type": "footnote", "raw": "[^1]" }]));
        assert_eq!(
            to_json(&convert(&input, None)),
            json!([{ "type": "text", "text": "[^1]" }])
        );
    }

    #[test]
    fn test_fallback_yields_one_element_per_token() {
        let input: Vec<Token> = ["html", "def", "footnote", "text"]
            .iter()
            .map(|kind| Token::new(*kind, format!("<{kind}>")))
            .collect();
        let elements = convert(&input, None);

        assert_eq!(elements.len(), input.len());
        for (element, token) in elements.iter().zip(&input) {
            assert_eq!(element.type_name(), "text");
            assert_eq!(element.text(), token.raw);
        }
    }

    #[test]
    fn test_leaf_text_is_verbatim() {
        let code = Token {
            text: Some("  let x = 1;\n\tlet y = \"<2>\";".to_string()),
            lang: Some("rust".to_string()),
            ..Token::new("code", "```rust\n...\n```")
        };
        let codespan = Token::new("codespan", "`` a`b ``").with_text(" a`b ");
        let converter = Converter::new();

        assert_eq!(converter.convert_token(&code).text(), "  let x = 1;\n\tlet y = \"<2>\";");
        assert_eq!(converter.convert_token(&codespan).text(), " a`b ");
    }

    #[test]
    fn test_image_title_wins_over_text() {
        let titled = Token {
            href: Some("a.png".to_string()),
            title: Some("Title".to_string()),
            text: Some("Alt".to_string()),
            ..Token::new("image", "![Alt](a.png \"Title\")")
        };
        let untitled = Token {
            href: Some("a.png".to_string()),
            text: Some("Alt".to_string()),
            ..Token::new("image", "![Alt](a.png)")
        };
        let converter = Converter::new();

        assert_eq!(
            converter.convert_token(&titled).kind(),
            &ElementKind::Image { src: "a.png".to_string(), alt: "Title".to_string() }
        );
        assert_eq!(
            converter.convert_token(&untitled).kind(),
            &ElementKind::Image { src: "a.png".to_string(), alt: "Alt".to_string() }
        );
    }

    #[test]
    fn test_renamed_discriminants() {
        let input = tokens(json!([
            { "type": "em", "raw": "*a*", "tokens": [] },
            { "type": "del", "raw": "~~a~~", "tokens": [] }
        ]));
        let names: Vec<String> = convert(&input, None)
            .iter()
            .map(|e| e.type_name().to_string())
            .collect();
        assert_eq!(names, vec!["emphasis", "delete"]);
    }

    #[test]
    fn test_missing_nested_tokens_is_empty() {
        let input = tokens(json!([{ "type": "paragraph", "raw": "x" }]));
        let elements = convert(&input, None);
        assert_eq!(elements[0].type_name(), "paragraph");
        assert!(elements[0].children().is_empty());
    }

    #[test]
    fn test_order_is_preserved_at_depth() {
        let input = tokens(json!([{
            "type": "blockquote",
            "raw": "> ...",
            "tokens": [
                { "type": "paragraph", "raw": "a", "tokens": [
                    { "type": "text", "raw": "1" },
                    { "type": "codespan", "raw": "`2`", "text": "2" },
                    { "type": "text", "raw": "3" }
                ]},
                { "type": "hr", "raw": "---" },
                { "type": "paragraph", "raw": "b", "tokens": [{ "type": "text", "raw": "4" }] }
            ]
        }]));
        let quote = &convert(&input, None)[0];
        let texts: Vec<String> = quote.children().iter().map(Element::plain_text).collect();
        assert_eq!(texts, vec!["123", "", "4"]);
    }

    #[test]
    fn test_extension_converter_recurses_with_same_table() {
        let mut table = ConverterTable::new();
        table.insert(
            "spoiler".to_string(),
            convert_fn(|token, convert| {
                Element::extension(
                    "spoiler",
                    "",
                    serde_json::Map::new(),
                    convert.convert(token.child_tokens()),
                )
            }),
        );
        table.insert(
            "shout".to_string(),
            convert_fn(|token, _| Element::new_text(token.raw.to_uppercase())),
        );

        let input = tokens(json!([{
            "type": "spoiler",
            "raw": "||hey @x||",
            "tokens": [
                { "type": "text", "raw": "hey " },
                { "type": "shout", "raw": "@x" }
            ]
        }]));
        let spoiler = &convert(&input, Some(&table))[0];

        assert_eq!(spoiler.type_name(), "spoiler");
        assert_eq!(spoiler.plain_text(), "hey @X");
    }

    #[test]
    fn test_extension_overrides_builtin() {
        let mut table = ConverterTable::new();
        table.insert(
            "hr".to_string(),
            convert_fn(|_, _| Element::new_text("---")),
        );
        let elements = convert(&[Token::new("hr", "***")], Some(&table));
        assert_eq!(elements, vec![Element::new_text("---")]);
    }
}
