//! Markdown - the main entry point from markdown text to display nodes.

use std::fmt;

use markdown_elements_core::{to_html, DisplayNode, Element, Token};

use crate::convert::{Converter, ConverterTable};
use crate::extension::build_tables;
use crate::lexer::Lexer;
use crate::options::MarkdownOptions;
use crate::render::{merge_renderers, ElementsRenderer, RendererTable};

/// Lex, convert and render markdown with one configuration.
///
/// Extension tables and the merged renderer table are built once here and
/// reused for every call.
#[derive(Clone)]
pub struct Markdown {
    lexer: Lexer,
    converters: ConverterTable,
    renderer: ElementsRenderer,
}

impl Markdown {
    pub fn new(options: MarkdownOptions) -> Self {
        let tables = build_tables(&options.extensions);
        let renderers = merge_renderers(&options.renders, &tables.renderers);

        let lexer = Lexer::new()
            .with_gfm(options.gfm)
            .with_breaks(options.breaks)
            .with_extensions(&options.extensions);

        let renderer = ElementsRenderer::new(renderers)
            .with_fallback(options.fallback)
            .with_key_fn(options.key_fn);

        Self {
            lexer,
            converters: tables.converters,
            renderer,
        }
    }

    /// Tokenize markdown text
    pub fn lex(&self, src: &str) -> Vec<Token> {
        self.lexer.lex(src)
    }

    /// Tokenize and convert to elements
    pub fn parse(&self, src: &str) -> Vec<Element> {
        self.convert(&self.lex(src))
    }

    /// Convert an already lexed token forest
    pub fn convert(&self, tokens: &[Token]) -> Vec<Element> {
        let elements = Converter::with_extensions(&self.converters).convert(tokens);
        tracing::trace!(tokens = tokens.len(), elements = elements.len(), "Converted tokens");
        elements
    }

    /// Tokenize, convert and render
    pub fn render(&self, src: &str) -> Vec<DisplayNode> {
        self.render_elements(&self.parse(src))
    }

    /// Render elements produced elsewhere
    pub fn render_elements(&self, elements: &[Element]) -> Vec<DisplayNode> {
        let nodes = self.renderer.render(elements);
        tracing::trace!(elements = elements.len(), nodes = nodes.len(), "Rendered elements");
        nodes
    }

    /// Render straight to an HTML string
    pub fn render_html(&self, src: &str) -> String {
        to_html(&self.render(src))
    }

    /// The merged renderer table in effect
    pub fn renderers(&self) -> &RendererTable {
        self.renderer.renderers()
    }

    /// Extension converters by token type
    pub fn converters(&self) -> &ConverterTable {
        &self.converters
    }
}

impl fmt::Debug for Markdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Markdown")
            .field("lexer", &self.lexer)
            .field("converters", &self.converters.keys().collect::<Vec<_>>())
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}
