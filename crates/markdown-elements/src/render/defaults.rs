//! Built-in renderers for the built-in element types.

use markdown_elements_core::{DisplayNode, ElementKind};
use once_cell::sync::Lazy;

use super::{render_fn, RenderFn, RenderProps, RendererTable};

static DEFAULT_RENDERERS: Lazy<RendererTable> = Lazy::new(|| {
    let entries: [(&str, RenderFn); 21] = [
        ("br", render_fn(|_| Some(DisplayNode::tag("br")))),
        ("hr", render_fn(|_| Some(DisplayNode::tag("hr")))),
        ("heading", render_fn(heading)),
        ("blockquote", wrap("blockquote")),
        ("list", render_fn(list)),
        ("list_item", render_fn(list_item)),
        ("link", render_fn(link)),
        ("code", render_fn(code)),
        ("codespan", render_fn(codespan)),
        ("image", render_fn(image)),
        ("delete", wrap("del")),
        ("emphasis", wrap("em")),
        ("strong", wrap("strong")),
        ("paragraph", wrap("p")),
        ("table", wrap("table")),
        ("table_header", wrap("thead")),
        ("table_body", wrap("tbody")),
        ("table_row", wrap("tr")),
        ("table_cell", render_fn(table_cell)),
        ("text", render_fn(|props| Some(DisplayNode::text(props.element.text())))),
        ("space", render_fn(|_| None)),
    ];
    entries
        .into_iter()
        .map(|(name, render)| (name.to_string(), render))
        .collect()
});

/// The process-wide table of built-in renderers
pub fn default_renderers() -> &'static RendererTable {
    &DEFAULT_RENDERERS
}

/// Plain container around the rendered children
fn wrap(tag: &'static str) -> RenderFn {
    render_fn(move |props| Some(DisplayNode::tag(tag).with_children(props.children)))
}

fn heading(props: RenderProps<'_>) -> Option<DisplayNode> {
    let depth = match props.element.kind() {
        ElementKind::Heading { depth } => (*depth).clamp(1, 6),
        _ => 1,
    };
    Some(DisplayNode::tag(format!("h{depth}")).with_children(props.children))
}

fn list(props: RenderProps<'_>) -> Option<DisplayNode> {
    let tag = match props.element.kind() {
        ElementKind::List { ordered: true } => "ol",
        _ => "ul",
    };
    Some(DisplayNode::tag(tag).with_children(props.children))
}

fn list_item(props: RenderProps<'_>) -> Option<DisplayNode> {
    let mut item = DisplayNode::tag("li");

    if let ElementKind::ListItem {
        task: true,
        checked,
    } = props.element.kind()
    {
        let mut checkbox = DisplayNode::tag("input")
            .attr("type", "checkbox")
            .attr("disabled", "");
        if checked.unwrap_or(false) {
            checkbox = checkbox.attr("checked", "");
        }
        item = item.with_child(checkbox.with_key("checkbox"));
    }

    Some(item.with_children(props.children))
}

fn link(props: RenderProps<'_>) -> Option<DisplayNode> {
    let href = match props.element.kind() {
        ElementKind::Link { href } => href.as_str(),
        _ => "",
    };
    Some(
        DisplayNode::tag("a")
            .attr("href", href)
            .attr("target", "_blank")
            .attr("rel", "noreferrer")
            .with_children(props.children),
    )
}

fn code(props: RenderProps<'_>) -> Option<DisplayNode> {
    let mut inner = DisplayNode::tag("code");
    if let ElementKind::Code { lang: Some(lang) } = props.element.kind() {
        if !lang.is_empty() {
            inner = inner.attr("class", format!("language-{lang}"));
        }
    }
    Some(DisplayNode::tag("pre").with_child(inner.with_child(DisplayNode::text(props.element.text()))))
}

fn codespan(props: RenderProps<'_>) -> Option<DisplayNode> {
    Some(DisplayNode::tag("code").with_child(DisplayNode::text(props.element.text())))
}

fn image(props: RenderProps<'_>) -> Option<DisplayNode> {
    let ElementKind::Image { src, alt } = props.element.kind() else {
        return None;
    };
    Some(DisplayNode::tag("img").attr("src", src).attr("alt", alt))
}

fn table_cell(props: RenderProps<'_>) -> Option<DisplayNode> {
    let (header, align) = match props.element.kind() {
        ElementKind::TableCell { header, align } => (*header, *align),
        _ => (false, None),
    };
    let mut cell = DisplayNode::tag(if header { "th" } else { "td" });
    if let Some(align) = align {
        cell = cell.attr("align", align.as_str());
    }
    Some(cell.with_children(props.children))
}
