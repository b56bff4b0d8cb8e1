//! Content tree renderer with pluggable block renderers.
//!
//! This crate turns a [`Document`](tessera_content::Document) into HTML. At
//! every level of the tree the [`ContentRenderer`]:
//!
//! - dispatches each node to a [`BlockRenderer`] through the [`BlockRegistry`]
//!   (unknown types render a diagnostic placeholder instead of failing)
//! - computes a deterministic [`Address`] for the external live-edit overlay
//! - threads an immutable [`InheritedContext`] (alignment, heading level) down
//! - applies the [`SpacingPolicy`] between adjacent siblings
//!
//! Block renderers never compute their own address or spacing; the walker
//! wraps every output uniformly.
//!
//! # Example
//!
//! ```
//! use tessera_content::Document;
//! use tessera_renderer::ContentRenderer;
//!
//! let doc = Document::from_json(r#"[
//!     {"_key": "s1", "_type": "section", "title": "FAQ", "content": [
//!         {"_key": "t1", "_type": "richText", "body": "Ask **anything**."}
//!     ]}
//! ]"#).unwrap();
//!
//! let result = ContentRenderer::new().render_document(&doc);
//! assert!(result.html.contains(r#"data-content-path="content[_key==&quot;s1&quot;]""#));
//! assert!(result.html.contains("<h2 class=\"section-title\">FAQ</h2>"));
//! assert!(result.warnings.is_empty());
//! ```

mod address;
pub mod block;
mod context;
mod html;
mod spacing;
mod walker;

pub use address::{Address, selector};
pub use block::{BlockContext, BlockError, BlockOutput, BlockRegistry, BlockRenderer, RenderedBlock};
pub use context::{InheritedContext, MAX_HEADING_LEVEL, MIN_HEADING_LEVEL};
pub use html::escape_html;
pub use spacing::{Spacing, SpacingPolicy};
pub use walker::{ContentRenderer, DEFAULT_ADDRESS_ATTRIBUTE, DEFAULT_ROOT_PATH, RenderResult};
