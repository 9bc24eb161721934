//! One constructor per built-in element type.
//!
//! Constructors take only the fields that vary for their type and default
//! `text` to the empty string where it carries no meaning. Values are not
//! range-checked here.

use serde_json::{Map, Value};

use crate::element::{Element, ElementKind};
use crate::token::Align;

impl Element {
    fn leaf(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    fn container(kind: ElementKind, children: Vec<Element>) -> Self {
        Self {
            kind,
            text: String::new(),
            children,
        }
    }

    pub fn space() -> Self {
        Self::leaf(ElementKind::Space, "")
    }

    pub fn hr() -> Self {
        Self::leaf(ElementKind::Hr, "")
    }

    pub fn br() -> Self {
        Self::leaf(ElementKind::Br, "")
    }

    pub fn heading(depth: u8, children: Vec<Element>) -> Self {
        Self::container(ElementKind::Heading { depth }, children)
    }

    pub fn list(ordered: bool, children: Vec<Element>) -> Self {
        Self::container(ElementKind::List { ordered }, children)
    }

    pub fn list_item(task: bool, checked: Option<bool>, children: Vec<Element>) -> Self {
        Self::container(ElementKind::ListItem { task, checked }, children)
    }

    pub fn link(href: impl Into<String>, children: Vec<Element>) -> Self {
        Self::container(ElementKind::Link { href: href.into() }, children)
    }

    pub fn code(text: impl Into<String>, lang: Option<String>) -> Self {
        Self::leaf(ElementKind::Code { lang }, text)
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::leaf(
            ElementKind::Image {
                src: src.into(),
                alt: alt.into(),
            },
            "",
        )
    }

    pub fn paragraph(children: Vec<Element>) -> Self {
        Self::container(ElementKind::Paragraph, children)
    }

    pub fn strong(children: Vec<Element>) -> Self {
        Self::container(ElementKind::Strong, children)
    }

    pub fn emphasis(children: Vec<Element>) -> Self {
        Self::container(ElementKind::Emphasis, children)
    }

    pub fn codespan(text: impl Into<String>) -> Self {
        Self::leaf(ElementKind::Codespan, text)
    }

    pub fn blockquote(children: Vec<Element>) -> Self {
        Self::container(ElementKind::Blockquote, children)
    }

    pub fn delete(children: Vec<Element>) -> Self {
        Self::container(ElementKind::Delete, children)
    }

    /// Table with its two fixed sections, header first
    pub fn table(align: Vec<Option<Align>>, header: Element, body: Element) -> Self {
        Self::container(ElementKind::Table { align }, vec![header, body])
    }

    pub fn table_header(rows: Vec<Element>) -> Self {
        Self::container(ElementKind::TableHeader, rows)
    }

    pub fn table_body(rows: Vec<Element>) -> Self {
        Self::container(ElementKind::TableBody, rows)
    }

    pub fn table_row(cells: Vec<Element>) -> Self {
        Self::container(ElementKind::TableRow, cells)
    }

    pub fn table_cell(header: bool, align: Option<Align>, children: Vec<Element>) -> Self {
        Self::container(ElementKind::TableCell { header, align }, children)
    }

    pub fn new_text(text: impl Into<String>) -> Self {
        Self::leaf(ElementKind::Text, text)
    }

    /// Element of a type contributed by an extension
    pub fn extension(
        name: impl Into<String>,
        text: impl Into<String>,
        fields: Map<String, Value>,
        children: Vec<Element>,
    ) -> Self {
        Self {
            kind: ElementKind::Extension {
                name: name.into(),
                fields,
            },
            text: text.into(),
            children,
        }
    }
}
