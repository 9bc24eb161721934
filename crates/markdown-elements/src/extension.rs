//! Extension descriptors and the registry builder.
//!
//! An extension bundles a tokenizer hook, a converter and a renderer under
//! one name. [`build_tables`] fans a list of extensions out into the
//! converter table used by [`Converter`](crate::Converter) and the renderer
//! table used by the dispatcher.

use std::fmt;
use std::sync::Arc;

use markdown_elements_core::Token;

use crate::convert::{ConvertFn, ConverterTable};
use crate::lexer::Lexer;
use crate::render::{RenderFn, RendererTable};
use crate::{Error, Result};

/// Where an extension tokenizer is offered input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionLevel {
    /// Offered each paragraph's source
    Block,
    /// Offered every run of plain text
    #[default]
    Inline,
}

/// Tokenizer hook consumed by the [`Lexer`].
pub trait Tokenizer: Send + Sync {
    /// Byte offset of the next position in `src` where a token might start
    fn start(&self, src: &str) -> Option<usize>;

    /// Claim a prefix of `src` as a token. The returned token's `raw` must
    /// be that prefix; nested content can be lexed with `lexer`.
    fn tokenize(&self, src: &str, lexer: &Lexer) -> Option<Token>;
}

/// A named tokenizer/converter/renderer triple
#[derive(Clone)]
pub struct Extension {
    name: String,
    level: ExtensionLevel,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    converter: ConvertFn,
    renderer: RenderFn,
}

impl Extension {
    pub fn builder(name: impl Into<String>) -> ExtensionBuilder {
        ExtensionBuilder {
            name: name.into(),
            level: ExtensionLevel::default(),
            tokenizer: None,
            converter: None,
            renderer: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> ExtensionLevel {
        self.level
    }

    pub fn tokenizer(&self) -> Option<&Arc<dyn Tokenizer>> {
        self.tokenizer.as_ref()
    }

    pub fn converter(&self) -> &ConvertFn {
        &self.converter
    }

    pub fn renderer(&self) -> &RenderFn {
        &self.renderer
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("tokenizer", &self.tokenizer.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Extension`]; converter and renderer are required
pub struct ExtensionBuilder {
    name: String,
    level: ExtensionLevel,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    converter: Option<ConvertFn>,
    renderer: Option<RenderFn>,
}

impl ExtensionBuilder {
    pub fn level(mut self, level: ExtensionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Some(Arc::new(tokenizer));
        self
    }

    pub fn converter(mut self, converter: ConvertFn) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn renderer(mut self, renderer: RenderFn) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Finish the descriptor, failing if a required function is missing
    pub fn build(self) -> Result<Extension> {
        let converter = self.converter.ok_or_else(|| Error::MissingConverter {
            name: self.name.clone(),
        })?;
        let renderer = self.renderer.ok_or_else(|| Error::MissingRenderer {
            name: self.name.clone(),
        })?;

        Ok(Extension {
            name: self.name,
            level: self.level,
            tokenizer: self.tokenizer,
            converter,
            renderer,
        })
    }
}

/// Lookup tables built from a list of extensions
#[derive(Clone, Default)]
pub struct ExtensionTables {
    pub converters: ConverterTable,
    pub renderers: RendererTable,
}

/// Build name-keyed converter and renderer tables. Later extensions replace
/// earlier ones with the same name.
pub fn build_tables(extensions: &[Extension]) -> ExtensionTables {
    let mut tables = ExtensionTables::default();

    for extension in extensions {
        let name = extension.name.clone();
        if tables.converters.contains_key(&name) {
            tracing::debug!(extension = %name, "Extension replaces an earlier registration");
        }
        tables
            .converters
            .insert(name.clone(), Arc::clone(&extension.converter));
        tables
            .renderers
            .insert(name, Arc::clone(&extension.renderer));
    }

    tables
}
