//! Configuration for the [`Markdown`](crate::Markdown) pipeline

use std::fmt;
use std::sync::Arc;

use crate::extension::Extension;
use crate::render::{default_key, Fallback, KeyFn, RenderFn, RendererTable};

/// Options for the markdown pipeline
#[derive(Clone)]
pub struct MarkdownOptions {
    /// GitHub flavored extensions: tables, strikethrough, task lists, footnotes
    pub gfm: bool,

    /// Single newlines inside paragraphs become line breaks
    pub breaks: bool,

    /// Extension descriptors; later entries replace earlier ones by name
    pub extensions: Vec<Extension>,

    /// Caller overrides of renderers by element type
    pub renders: RendererTable,

    /// What to emit for element types without a renderer
    pub fallback: Fallback,

    /// Sibling key scheme
    pub key_fn: KeyFn,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: false,
            extensions: Vec::new(),
            renders: RendererTable::new(),
            fallback: Fallback::Nothing,
            key_fn: Arc::new(default_key),
        }
    }
}

impl MarkdownOptions {
    pub fn with_gfm(mut self, gfm: bool) -> Self {
        self.gfm = gfm;
        self
    }

    pub fn with_breaks(mut self, breaks: bool) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Override the renderer for one element type
    pub fn with_render(mut self, element_type: impl Into<String>, render: RenderFn) -> Self {
        self.renders.insert(element_type.into(), render);
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_key_fn(mut self, key_fn: KeyFn) -> Self {
        self.key_fn = key_fn;
        self
    }
}

impl fmt::Debug for MarkdownOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownOptions")
            .field("gfm", &self.gfm)
            .field("breaks", &self.breaks)
            .field("extensions", &self.extensions)
            .field("renders", &self.renders.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
