//! Block dispatch registry.

use std::collections::HashMap;

use tessera_content::{BlockKind, ContentNode};

use super::builtin::{
    CallToActionBlock, HeroBlock, ImageBlock, PanelBlock, RichTextBlock, SectionBlock,
};
use super::{BlockContext, BlockError, BlockOutput, BlockRenderer};

/// Maps block kinds to renderers.
///
/// Built once at startup and then shared read-only across renders.
#[derive(Default)]
pub struct BlockRegistry {
    renderers: HashMap<BlockKind, Box<dyn BlockRenderer>>,
}

impl BlockRegistry {
    /// Create an empty registry. Every node renders as a placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in renderer for every known kind.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new()
            .with_block(BlockKind::Section, SectionBlock)
            .with_block(BlockKind::Panel, PanelBlock)
            .with_block(BlockKind::Hero, HeroBlock)
            .with_block(BlockKind::RichText, RichTextBlock)
            .with_block(BlockKind::Image, ImageBlock)
            .with_block(BlockKind::CallToAction, CallToActionBlock)
    }

    /// Register (or replace) the renderer for a kind.
    #[must_use]
    pub fn with_block<R: BlockRenderer + 'static>(mut self, kind: BlockKind, renderer: R) -> Self {
        self.renderers.insert(kind, Box::new(renderer));
        self
    }

    #[must_use]
    pub fn is_registered(&self, kind: BlockKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    /// Dispatch a node to its renderer.
    ///
    /// Unknown types and unregistered kinds yield a
    /// [`BlockOutput::Placeholder`]; this never fails for them. Errors come
    /// only from a registered renderer rejecting a malformed node.
    pub fn render(
        &self,
        node: &ContentNode,
        ctx: &BlockContext<'_>,
    ) -> Result<BlockOutput, BlockError> {
        match node.kind().and_then(|kind| self.renderers.get(&kind)) {
            Some(renderer) => renderer.render(node, ctx).map(BlockOutput::Html),
            None => Ok(BlockOutput::placeholder(node.type_name())),
        }
    }
}
