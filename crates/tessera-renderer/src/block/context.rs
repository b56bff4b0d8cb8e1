//! Per-block render context.

use tessera_content::TextAlign;

use crate::address::Address;
use crate::context::InheritedContext;

/// Everything a [`BlockRenderer`](super::BlockRenderer) may use besides the node.
///
/// Built by the walker for each node; renderers never compute addresses,
/// spacing, or child output themselves.
#[derive(Clone, Copy, Debug)]
pub struct BlockContext<'a> {
    /// Effective alignment of this node.
    pub align: TextAlign,
    /// Address of this node.
    pub address: &'a Address,
    /// Heading level for the node's title (containers only).
    pub heading_level: Option<u8>,
    /// Context inherited from the parent.
    pub inherited: &'a InheritedContext,
    /// Rendered children (containers only).
    pub children_html: Option<&'a str>,
}

impl BlockContext<'_> {
    /// Heading level for a container title, falling back to the inherited base.
    #[must_use]
    pub fn heading_level_or_base(&self) -> u8 {
        self.heading_level
            .unwrap_or(self.inherited.heading_base_level)
    }

    /// Rendered children, or an empty string for leaves.
    #[must_use]
    pub fn children(&self) -> &str {
        self.children_html.unwrap_or_default()
    }
}
