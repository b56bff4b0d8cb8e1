//! Block output types.

use tessera_content::{BlockKind, TextAlign};

use crate::address::Address;

/// What a single node rendered to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockOutput {
    /// Inner HTML from the block's renderer.
    Html(String),
    /// Diagnostic for a type with no renderer.
    Placeholder { type_name: String },
    /// Malformed node: renders nothing.
    Empty,
}

impl BlockOutput {
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Html(s.into())
    }

    #[must_use]
    pub fn placeholder(type_name: impl Into<String>) -> Self {
        Self::Placeholder {
            type_name: type_name.into(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// One walked node: its output plus the uniform wrapper data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBlock {
    pub key: String,
    pub type_name: String,
    pub kind: Option<BlockKind>,
    pub address: Address,
    pub align: TextAlign,
    /// Trailing spacing class, `None` for the last sibling.
    pub spacing_class: Option<String>,
    pub output: BlockOutput,
    /// Walked children of a container (empty for leaves and failed blocks).
    pub children: Vec<RenderedBlock>,
}

impl RenderedBlock {
    /// Pre-order iterator over this block and its descendants.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &RenderedBlock> + '_> {
        Box::new(std::iter::once(self).chain(self.children.iter().flat_map(RenderedBlock::iter)))
    }
}
