//! Block dispatch: one renderer per [`BlockKind`](tessera_content::BlockKind).
//!
//! # Architecture
//!
//! The [`BlockRegistry`] maps each kind of the closed content union to a
//! [`BlockRenderer`]. Registration happens once at startup through builder
//! methods; there is no per-request registration. Nodes of unknown type, and
//! known kinds without a registered renderer, fall through to a diagnostic
//! placeholder that is still addressed and spaced like any other block.
//!
//! # Example
//!
//! ```
//! use tessera_content::{BlockKind, ContentNode};
//! use tessera_renderer::{BlockContext, BlockError, BlockRegistry, BlockRenderer};
//!
//! struct PlainHero;
//!
//! impl BlockRenderer for PlainHero {
//!     fn render(&self, node: &ContentNode, _ctx: &BlockContext<'_>) -> Result<String, BlockError> {
//!         let ContentNode::Hero(hero) = node else {
//!             return Err(BlockError::kind_mismatch(BlockKind::Hero, node));
//!         };
//!         Ok(hero.heading.clone().unwrap_or_default())
//!     }
//! }
//!
//! let registry = BlockRegistry::with_builtins().with_block(BlockKind::Hero, PlainHero);
//! assert!(registry.is_registered(BlockKind::Hero));
//! ```

mod builtin;
mod context;
mod output;
mod registry;

pub use builtin::{
    CallToActionBlock, HeroBlock, ImageBlock, PanelBlock, RichTextBlock, SectionBlock,
};
pub use context::BlockContext;
pub use output::{BlockOutput, RenderedBlock};
pub use registry::BlockRegistry;

use tessera_content::{BlockKind, ContentNode};

/// Renderer for one block kind.
///
/// Receives the node plus its effective alignment, address, heading level
/// (containers only) and pre-rendered children (containers only). Returns
/// the block's inner HTML; the walker adds the addressing wrapper.
pub trait BlockRenderer: Send + Sync {
    fn render(&self, node: &ContentNode, ctx: &BlockContext<'_>) -> Result<String, BlockError>;
}

/// Error rendering a single block. Contained at that block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    /// A field the block cannot render without is missing or blank.
    #[error("{kind} block is missing required field `{field}`")]
    MissingField {
        kind: BlockKind,
        field: &'static str,
    },
    /// Renderer registered for the wrong kind.
    #[error("renderer for {expected} received a `{found}` node")]
    KindMismatch { expected: BlockKind, found: String },
}

impl BlockError {
    #[must_use]
    pub fn missing(kind: BlockKind, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    #[must_use]
    pub fn kind_mismatch(expected: BlockKind, node: &ContentNode) -> Self {
        Self::KindMismatch {
            expected,
            found: node.type_name().to_owned(),
        }
    }
}
