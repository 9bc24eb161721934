//! Display tree handed to the presentation layer
//!
//! Renderers return [`DisplayNode`] values: tagged containers with
//! attributes, literal text, or keyed fragments grouping several nodes.

use indexmap::IndexMap;

/// A tagged display container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayElement {
    pub tag: String,
    pub key: Option<String>,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<DisplayNode>,
}

/// A node of the rendered output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Element(DisplayElement),
    Text(String),
    Fragment {
        key: Option<String>,
        children: Vec<DisplayNode>,
    },
}

impl DisplayNode {
    /// Create an empty container with the given tag
    pub fn tag(tag: impl Into<String>) -> Self {
        DisplayNode::Element(DisplayElement {
            tag: tag.into(),
            key: None,
            attrs: IndexMap::new(),
            children: Vec::new(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        DisplayNode::Text(text.into())
    }

    pub fn fragment(children: Vec<DisplayNode>) -> Self {
        DisplayNode::Fragment {
            key: None,
            children,
        }
    }

    /// Set an attribute; ignored on text and fragments
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let DisplayNode::Element(element) = &mut self {
            element.attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Append children; text nodes are wrapped in a fragment first
    pub fn with_children(self, children: Vec<DisplayNode>) -> Self {
        match self {
            DisplayNode::Element(mut element) => {
                element.children.extend(children);
                DisplayNode::Element(element)
            }
            DisplayNode::Fragment { key, children: mut existing } => {
                existing.extend(children);
                DisplayNode::Fragment {
                    key,
                    children: existing,
                }
            }
            text @ DisplayNode::Text(_) => {
                let mut all = vec![text];
                all.extend(children);
                DisplayNode::fragment(all)
            }
        }
    }

    pub fn with_child(self, child: DisplayNode) -> Self {
        self.with_children(vec![child])
    }

    /// Assign a sibling key. Text nodes cannot hold keys and are returned unchanged.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        match &mut self {
            DisplayNode::Element(element) => element.key = Some(key.into()),
            DisplayNode::Fragment { key: slot, .. } => *slot = Some(key.into()),
            DisplayNode::Text(_) => {}
        }
        self
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            DisplayNode::Element(element) => element.key.as_deref(),
            DisplayNode::Fragment { key, .. } => key.as_deref(),
            DisplayNode::Text(_) => None,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            DisplayNode::Element(element) => Some(&element.tag),
            _ => None,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            DisplayNode::Element(element) => element.attrs.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            DisplayNode::Element(element) => &element.children,
            DisplayNode::Fragment { children, .. } => children,
            DisplayNode::Text(_) => &[],
        }
    }
}
