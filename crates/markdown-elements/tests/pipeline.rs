use markdown_elements::{
    convert_fn, render_fn, to_html, tokens_from_json, DisplayNode, Element, Extension,
    ExtensionLevel, Fallback, Lexer, Markdown, MarkdownOptions, Token, Tokenizer,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn convert_json(value: Value) -> Value {
    let tokens = tokens_from_json(&value.to_string()).unwrap();
    serde_json::to_value(Markdown::default().convert(&tokens)).unwrap()
}

#[test]
fn test_heading_tokens_convert_to_heading_element() {
    let elements = convert_json(json!([
        {"type": "heading", "raw": "## Hi", "depth": 2, "tokens": [{"type": "text", "raw": "Hi"}]}
    ]));
    assert_eq!(
        elements,
        json!([{"type": "heading", "text": "", "depth": 2,
                "children": [{"type": "text", "text": "Hi"}]}])
    );
}

#[test]
fn test_list_item_wrapper_is_flattened() {
    let elements = convert_json(json!([{
        "type": "list", "raw": "- A", "ordered": false,
        "items": [{
            "type": "list_item", "raw": "- A", "task": false,
            "tokens": [{"type": "text", "raw": "A", "tokens": [{"type": "text", "raw": "A"}]}]
        }]
    }]));
    assert_eq!(
        elements,
        json!([{"type": "list", "text": "", "ordered": false, "children": [
            {"type": "list_item", "text": "", "task": false,
             "children": [{"type": "text", "text": "A"}]}
        ]}])
    );
}

#[test]
fn test_table_always_has_header_and_body() {
    let cell = |text: &str, header: bool, align: &str| {
        json!({"text": text, "header": header, "align": align,
               "tokens": [{"type": "text", "raw": text}]})
    };
    let elements = convert_json(json!([{
        "type": "table", "raw": "", "align": ["left", "right"],
        "header": [cell("Name", true, "left"), cell("Age", true, "right")],
        "rows": [[cell("Bob", false, "left"), cell("5", false, "right")]]
    }]));

    let out_cell = |text: &str, header: bool, align: &str| {
        json!({"type": "table_cell", "text": "", "header": header, "align": align,
               "children": [{"type": "text", "text": text}]})
    };
    assert_eq!(
        elements,
        json!([{"type": "table", "text": "", "align": ["left", "right"], "children": [
            {"type": "table_header", "text": "", "children": [
                {"type": "table_row", "text": "", "children": [
                    out_cell("Name", true, "left"), out_cell("Age", true, "right")
                ]}
            ]},
            {"type": "table_body", "text": "", "children": [
                {"type": "table_row", "text": "", "children": [
                    out_cell("Bob", false, "left"), out_cell("5", false, "right")
                ]}
            ]}
        ]}])
    );

    let empty = convert_json(json!([{"type": "table", "raw": "", "align": [null], "header": [], "rows": []}]));
    let sections: Vec<&str> = empty[0]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child["type"].as_str().unwrap())
        .collect();
    assert_eq!(sections, vec!["table_header", "table_body"]);
}

#[test]
fn test_unknown_tokens_become_raw_text() {
    let elements = convert_json(json!([
        {"type": "footnote", "raw": "[^1]"},
        {"type": "def", "raw": "[a]: https://a.dev"},
        {"type": "hr", "raw": "---"}
    ]));
    assert_eq!(
        elements,
        json!([
            {"type": "text", "text": "[^1]"},
            {"type": "text", "text": "[a]: https://a.dev"},
            {"type": "hr", "text": ""}
        ])
    );
}

#[test]
fn test_image_renders_as_leaf() {
    let nodes = Markdown::default().render_elements(&[Element::image("a.png", "A")]);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].tag_name(), Some("img"));
    assert_eq!(nodes[0].get_attr("src"), Some("a.png"));
    assert_eq!(nodes[0].get_attr("alt"), Some("A"));
    assert!(nodes[0].children().is_empty());
}

#[test]
fn test_order_is_preserved_at_every_depth() {
    let elements = Markdown::default().parse("# One\n\nTwo *three* **four**\n\n> five\n\n---");
    let types: Vec<&str> = elements.iter().map(Element::type_name).collect();
    assert_eq!(types, vec!["heading", "paragraph", "blockquote", "hr"]);

    let inline: Vec<&str> = elements[1].children().iter().map(Element::type_name).collect();
    assert_eq!(inline, vec!["text", "emphasis", "text", "strong"]);
}

#[test]
fn test_checked_is_set_only_for_task_items() {
    let markdown = Markdown::default();
    for element in markdown.parse("- [x] a\n- b\n- [ ] c")[0].children() {
        let value = serde_json::to_value(element).unwrap();
        assert_eq!(value.get("checked").is_some(), value["task"] == json!(true));
    }
}

#[test]
fn test_code_text_is_not_transformed() {
    let elements = Markdown::default().parse("```\n  a <b> &amp;\n```\n\n`a  <b>`");
    assert_eq!(elements[0].text(), "  a <b> &amp;");
    assert_eq!(elements[1].children()[0].text(), "a  <b>");
}

#[test]
fn test_override_changes_only_its_type() {
    let src = "# T\n\n**bold** and *em*\n\n- [x] item\n\n| a |\n|---|\n| b |";
    let plain = Markdown::default().render(src);
    let custom = Markdown::new(MarkdownOptions::default().with_render(
        "strong",
        render_fn(|props| Some(DisplayNode::tag("b").with_children(props.children))),
    ))
    .render(src);

    assert_eq!(plain.len(), custom.len());
    for (index, (a, b)) in plain.iter().zip(&custom).enumerate() {
        if index != 1 {
            assert_eq!(a, b);
        }
    }
    assert_eq!(
        to_html(&custom[1..2]),
        "<p><b>bold</b> and <em>em</em></p>"
    );
}

struct Shout;

impl Tokenizer for Shout {
    fn start(&self, src: &str) -> Option<usize> {
        src.find("!!")
    }

    fn tokenize(&self, src: &str, _: &Lexer) -> Option<Token> {
        let rest = src.strip_prefix("!!")?;
        let end = rest.find("!!")?;
        let raw = &src[..end + 4];
        Some(Token::new("shout", raw).with_text(&rest[..end]))
    }
}

fn shout_extension() -> Extension {
    Extension::builder("shout")
        .level(ExtensionLevel::Inline)
        .tokenizer(Shout)
        .converter(convert_fn(|token, _| {
            Element::extension("shout", token.text_or_raw(), Default::default(), Vec::new())
        }))
        .renderer(render_fn(|props| {
            Some(DisplayNode::tag("strong").with_child(DisplayNode::text(props.element.text().to_uppercase())))
        }))
        .build()
        .unwrap()
}

#[test]
fn test_extension_runs_through_every_stage() {
    let markdown = Markdown::new(MarkdownOptions::default().with_extension(shout_extension()));

    let tokens = markdown.lex("say !!hi!! now");
    let kinds: Vec<&str> = tokens[0]
        .child_tokens()
        .iter()
        .map(|token| token.kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["text", "shout", "text"]);

    assert_eq!(markdown.render_html("say !!hi!! now"), "<p>say <strong>HI</strong> now</p>");
}

#[test]
fn test_extension_renderer_wins_over_caller_override() {
    let markdown = Markdown::new(
        MarkdownOptions::default()
            .with_render("shout", render_fn(|_| Some(DisplayNode::text("caller"))))
            .with_extension(shout_extension()),
    );
    assert_eq!(markdown.render_html("!!x!!"), "<p><strong>X</strong></p>");
}

#[test]
fn test_unrendered_types_follow_fallback() {
    let element = Element::extension("widget", "raw widget", Default::default(), Vec::new());

    let dropped = Markdown::default().render_elements(std::slice::from_ref(&element));
    assert!(dropped.is_empty());

    let kept = Markdown::new(MarkdownOptions::default().with_fallback(Fallback::Text))
        .render_elements(&[element]);
    assert_eq!(to_html(&kept), "raw widget");
}

#[test]
fn test_keys_are_unique_among_siblings() {
    let nodes = Markdown::default().render("a\n\nb\n\nc");
    let keys: Vec<&str> = nodes.iter().filter_map(DisplayNode::key).collect();
    assert_eq!(keys, vec!["paragraph:0", "paragraph:1", "paragraph:2"]);
}
