//! Element tree rendering.
//!
//! The dispatcher walks an element forest post-order: children are rendered
//! first, then the renderer registered for the parent's type receives the
//! element, its rendered children and its sibling index. Renderer tables
//! are layered with later layers replacing earlier ones by type name.

mod defaults;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use markdown_elements_core::{DisplayNode, Element};

pub use defaults::default_renderers;

/// Renderer function: element plus rendered children to display node
pub type RenderFn = Arc<dyn Fn(RenderProps<'_>) -> Option<DisplayNode> + Send + Sync>;

/// Renderers by element type
pub type RendererTable = IndexMap<String, RenderFn>;

/// Sibling key scheme
pub type KeyFn = Arc<dyn Fn(&Element, usize) -> String + Send + Sync>;

/// Child lookup used by the dispatcher
pub type ChildrenFn = fn(&Element) -> &[Element];

/// Wrap a closure as a [`RenderFn`]
pub fn render_fn<F>(f: F) -> RenderFn
where
    F: Fn(RenderProps<'_>) -> Option<DisplayNode> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Input of a renderer call
pub struct RenderProps<'a> {
    pub element: &'a Element,
    /// Children, already rendered
    pub children: Vec<DisplayNode>,
    /// Unrendered child elements
    pub child_elements: &'a [Element],
    /// Position among siblings
    pub index: usize,
}

/// What to emit for an element whose type has no renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    /// Drop the element and its subtree
    #[default]
    Nothing,
    /// Emit the element's literal text, if any
    Text,
}

/// `type:index`, unique among siblings
pub fn default_key(element: &Element, index: usize) -> String {
    format!("{}:{}", element.type_name(), index)
}

/// Layer renderer tables: built-ins, then caller overrides, then extension
/// renderers. The built-in table is never modified.
pub fn merge_renderers(overrides: &RendererTable, extensions: &RendererTable) -> RendererTable {
    let mut merged = default_renderers().clone();
    for (name, render) in overrides.iter().chain(extensions) {
        merged.insert(name.clone(), Arc::clone(render));
    }
    merged
}

/// Dispatches elements to renderers by type.
#[derive(Clone)]
pub struct ElementsRenderer {
    renderers: RendererTable,
    fallback: Fallback,
    key_fn: KeyFn,
    get_children: ChildrenFn,
}

impl ElementsRenderer {
    /// Dispatcher over the given (already merged) renderer table
    pub fn new(renderers: RendererTable) -> Self {
        Self {
            renderers,
            fallback: Fallback::default(),
            key_fn: Arc::new(default_key),
            get_children: Element::children,
        }
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_key_fn(mut self, key_fn: KeyFn) -> Self {
        self.key_fn = key_fn;
        self
    }

    pub fn with_children_fn(mut self, get_children: ChildrenFn) -> Self {
        self.get_children = get_children;
        self
    }

    pub fn renderers(&self) -> &RendererTable {
        &self.renderers
    }

    /// Render a sibling list, keeping document order
    pub fn render(&self, elements: &[Element]) -> Vec<DisplayNode> {
        elements
            .iter()
            .enumerate()
            .filter_map(|(index, element)| self.render_element(element, index))
            .collect()
    }

    fn render_element(&self, element: &Element, index: usize) -> Option<DisplayNode> {
        let child_elements = (self.get_children)(element);
        let children = self.render(child_elements);

        let node = match self.renderers.get(element.type_name()) {
            Some(render) => render(RenderProps {
                element,
                children,
                child_elements,
                index,
            }),
            None => self.render_fallback(element),
        }?;

        Some(node.with_key((self.key_fn)(element, index)))
    }

    fn render_fallback(&self, element: &Element) -> Option<DisplayNode> {
        tracing::debug!(
            element_type = element.type_name(),
            fallback = ?self.fallback,
            "No renderer for element"
        );
        match self.fallback {
            Fallback::Nothing => None,
            Fallback::Text if element.text().is_empty() => None,
            Fallback::Text => Some(DisplayNode::text(element.text())),
        }
    }
}

impl Default for ElementsRenderer {
    fn default() -> Self {
        Self::new(default_renderers().clone())
    }
}

impl fmt::Debug for ElementsRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementsRenderer")
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
