//! Element tree
//!
//! Elements are the normalized nodes produced from lexer tokens. Every
//! element carries a type, a `text` (empty unless it is a literal leaf) and
//! an ordered list of children. Type-specific data lives in [`ElementKind`].
//! Elements are immutable once built: fields are only reachable through
//! accessors.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::token::Align;

/// Type and type-specific payload of an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Space,
    Hr,
    Br,

    /// Heading with depth 1-6
    Heading { depth: u8 },

    List { ordered: bool },

    /// `checked` is only set for task items
    ListItem { task: bool, checked: Option<bool> },

    Link { href: String },

    /// Code block, raw code is held in the element text
    Code { lang: Option<String> },

    Image { src: String, alt: String },

    Paragraph,
    Strong,
    Emphasis,
    Codespan,
    Blockquote,
    Delete,

    /// Table with one alignment per column; children are header then body
    Table { align: Vec<Option<Align>> },

    TableHeader,
    TableBody,
    TableRow,
    TableCell { header: bool, align: Option<Align> },

    Text,

    /// Element contributed by an extension converter
    Extension {
        name: String,
        fields: Map<String, Value>,
    },
}

impl ElementKind {
    /// The type discriminant used for renderer lookup
    pub fn type_name(&self) -> &str {
        match self {
            ElementKind::Space => "space",
            ElementKind::Hr => "hr",
            ElementKind::Br => "br",
            ElementKind::Heading { .. } => "heading",
            ElementKind::List { .. } => "list",
            ElementKind::ListItem { .. } => "list_item",
            ElementKind::Link { .. } => "link",
            ElementKind::Code { .. } => "code",
            ElementKind::Image { .. } => "image",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Strong => "strong",
            ElementKind::Emphasis => "emphasis",
            ElementKind::Codespan => "codespan",
            ElementKind::Blockquote => "blockquote",
            ElementKind::Delete => "delete",
            ElementKind::Table { .. } => "table",
            ElementKind::TableHeader => "table_header",
            ElementKind::TableBody => "table_body",
            ElementKind::TableRow => "table_row",
            ElementKind::TableCell { .. } => "table_cell",
            ElementKind::Text => "text",
            ElementKind::Extension { name, .. } => name,
        }
    }

    /// Whether elements of this kind carry a children list
    pub fn has_children(&self) -> bool {
        !matches!(
            self,
            ElementKind::Space
                | ElementKind::Hr
                | ElementKind::Br
                | ElementKind::Code { .. }
                | ElementKind::Image { .. }
                | ElementKind::Codespan
                | ElementKind::Text
        )
    }
}

/// Every type name in the built-in element set
pub const BUILTIN_TYPES: &[&str] = &[
    "space",
    "hr",
    "br",
    "heading",
    "list",
    "list_item",
    "link",
    "code",
    "image",
    "paragraph",
    "strong",
    "emphasis",
    "codespan",
    "blockquote",
    "delete",
    "table",
    "table_header",
    "table_body",
    "table_row",
    "table_cell",
    "text",
];

/// A node of the element tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) kind: ElementKind,
    pub(crate) text: String,
    pub(crate) children: Vec<Element>,
}

impl Element {
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Literal text; empty for container elements
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Children in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn is_extension(&self) -> bool {
        matches!(self.kind, ElementKind::Extension { .. })
    }

    /// Look up a field of an extension element
    pub fn field(&self, key: &str) -> Option<&Value> {
        match &self.kind {
            ElementKind::Extension { fields, .. } => fields.get(key),
            _ => None,
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// Concatenated literal text of this element and its descendants
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    out.push_str(&element.text);
    for child in &element.children {
        collect_text(child, out);
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        map.serialize_entry("text", &self.text)?;

        match &self.kind {
            ElementKind::Heading { depth } => map.serialize_entry("depth", depth)?,
            ElementKind::List { ordered } => map.serialize_entry("ordered", ordered)?,
            ElementKind::ListItem { task, checked } => {
                map.serialize_entry("task", task)?;
                if let Some(checked) = checked {
                    map.serialize_entry("checked", checked)?;
                }
            }
            ElementKind::Link { href } => map.serialize_entry("href", href)?,
            ElementKind::Code { lang } => {
                if let Some(lang) = lang {
                    map.serialize_entry("lang", lang)?;
                }
            }
            ElementKind::Image { src, alt } => {
                map.serialize_entry("src", src)?;
                map.serialize_entry("alt", alt)?;
            }
            ElementKind::Table { align } => map.serialize_entry("align", align)?,
            ElementKind::TableCell { header, align } => {
                map.serialize_entry("header", header)?;
                map.serialize_entry("align", align)?;
            }
            ElementKind::Extension { fields, .. } => {
                for (key, value) in fields {
                    if !matches!(key.as_str(), "type" | "text" | "children") {
                        map.serialize_entry(key, value)?;
                    }
                }
            }
            _ => {}
        }

        let is_extension = self.is_extension();
        if self.kind.has_children() && (!is_extension || !self.children.is_empty()) {
            map.serialize_entry("children", &self.children)?;
        }
        map.end()
    }
}
