//! Inherited presentation context.
//!
//! An immutable value passed down the tree by the walker. Each container
//! derives a new context for its children; nothing is stored globally.

use tessera_content::{ContentNode, TextAlign};

/// Lowest HTML heading level.
pub const MIN_HEADING_LEVEL: u8 = 1;
/// Highest HTML heading level.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Presentation state inherited from ancestors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InheritedContext {
    /// Alignment applied to nodes without an explicit setting.
    pub text_align: TextAlign,
    /// Heading level for a titled container at this depth.
    pub heading_base_level: u8,
    /// Whether any ancestor container carried a title.
    pub ancestor_titled: bool,
}

impl Default for InheritedContext {
    fn default() -> Self {
        Self::new(TextAlign::Left, 2)
    }
}

impl InheritedContext {
    /// Root context. `heading_base_level` is clamped to 1..=6.
    #[must_use]
    pub fn new(text_align: TextAlign, heading_base_level: u8) -> Self {
        Self {
            text_align,
            heading_base_level: heading_base_level.clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL),
            ancestor_titled: false,
        }
    }

    /// Effective alignment of `node`: its own explicit setting, else ours.
    #[must_use]
    pub fn resolve_align(&self, node: &ContentNode) -> TextAlign {
        node.text_align().explicit().unwrap_or(self.text_align)
    }

    /// Heading level `relative_depth` levels below the base, clamped to 1..=6.
    #[must_use]
    pub fn heading_level(&self, relative_depth: i32) -> u8 {
        let level = (i32::from(self.heading_base_level) + relative_depth).clamp(
            i32::from(MIN_HEADING_LEVEL),
            i32::from(MAX_HEADING_LEVEL),
        );
        u8::try_from(level).unwrap_or(MAX_HEADING_LEVEL)
    }

    /// Context for the children of a container.
    ///
    /// Children inherit the container's effective alignment. The heading
    /// base moves one level deeper only when the container has a title.
    #[must_use]
    pub fn for_children(&self, container_align: TextAlign, container_titled: bool) -> Self {
        let heading_base_level = if container_titled {
            self.heading_level(1)
        } else {
            self.heading_base_level
        };
        Self {
            text_align: container_align,
            heading_base_level,
            ancestor_titled: self.ancestor_titled || container_titled,
        }
    }
}
