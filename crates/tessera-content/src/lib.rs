//! Typed content tree model for CMS-managed pages.
//!
//! Page layout and copy live in the CMS as an ordered list of typed nodes.
//! This crate provides:
//!
//! - [`ContentNode`]: closed sum type over the known block kinds, plus
//!   explicit [`UnknownNode`] and [`InvalidNode`] arms so one bad node never
//!   poisons the rest of the document
//! - [`Document`]: the top-level node list with authoring operations
//!   (insert, remove, retitle) and pre-order traversal
//!
//! # Example
//!
//! ```
//! use tessera_content::{BlockKind, Document};
//!
//! let json = r#"{"content": [
//!     {"_key": "a1", "_type": "section", "title": "FAQ", "content": []},
//!     {"_key": "b2", "_type": "legacyWidget"}
//! ]}"#;
//!
//! let doc = Document::from_json(json).unwrap();
//! assert_eq!(doc.content[0].kind(), Some(BlockKind::Section));
//! assert_eq!(doc.content[1].kind(), None);
//! assert_eq!(doc.content[1].type_name(), "legacyWidget");
//! ```

mod document;
mod error;
mod node;

pub use document::{Document, Nodes};
pub use error::ContentError;
pub use node::{
    AlignSetting, BlockKind, CallToAction, ContentNode, Hero, Image, InvalidNode, Panel,
    RichText, Section, TextAlign, UnknownNode,
};
