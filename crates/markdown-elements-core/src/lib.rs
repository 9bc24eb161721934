//! markdown-elements-core - token contract, element tree and display nodes
//!
//! This crate holds the data contracts of the markdown-elements pipeline.
//! It is used by `markdown-elements`, which converts tokens to elements and
//! dispatches elements to renderers.
//!
//! # Architecture
//!
//! ```text
//! Token forest ──convert──▶ ┌──────────────┐
//!                           │ Element tree │ ──render──▶ DisplayNode ──▶ HTML
//!                           └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use markdown_elements_core::{to_html, DisplayNode, Element};
//!
//! let heading = Element::heading(1, vec![Element::new_text("Hello World")]);
//! assert_eq!(heading.type_name(), "heading");
//!
//! let node = DisplayNode::tag("h1").with_child(DisplayNode::text("Hello World"));
//! assert_eq!(to_html(&[node]), "<h1>Hello World</h1>");
//! ```

mod constructors;
mod display;
mod element;
mod serialize;
mod token;

pub use display::{DisplayElement, DisplayNode};
pub use element::{Element, ElementKind, BUILTIN_TYPES};
pub use serialize::{escape_html, to_html};
pub use token::{Align, TableCellToken, Token};
