//! Inter-sibling spacing policy.
//!
//! Spacing is decided once, by the preceding sibling, looking ahead at the
//! next one. A structural container draws its own top margin through its
//! title block, so the node before it takes the larger class to keep the
//! rhythm even. The last sibling in a list gets no trailing spacing.

use tessera_content::ContentNode;

/// Default class for ordinary sibling gaps.
pub const DEFAULT_STANDARD_CLASS: &str = "spacing-standard";
/// Default class for gaps before a structural container.
pub const DEFAULT_LARGE_CLASS: &str = "spacing-large";

/// Gap after a node, relative to its next sibling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spacing {
    /// Last sibling: no trailing gap.
    None,
    Standard,
    /// Next sibling is a structural container.
    Large,
}

impl Spacing {
    /// Spacing after `current` given the `next` sibling.
    #[must_use]
    pub fn between(_current: &ContentNode, next: Option<&ContentNode>) -> Self {
        match next {
            None => Self::None,
            Some(next) if next.is_structural() => Self::Large,
            Some(_) => Self::Standard,
        }
    }
}

/// Maps [`Spacing`] to CSS class names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpacingPolicy {
    standard: String,
    large: String,
}

impl Default for SpacingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STANDARD_CLASS, DEFAULT_LARGE_CLASS)
    }
}

impl SpacingPolicy {
    #[must_use]
    pub fn new(standard: impl Into<String>, large: impl Into<String>) -> Self {
        Self {
            standard: standard.into(),
            large: large.into(),
        }
    }

    /// Class for a spacing decision, `None` when no spacing applies.
    #[must_use]
    pub fn class(&self, spacing: Spacing) -> Option<&str> {
        match spacing {
            Spacing::None => None,
            Spacing::Standard => Some(&self.standard),
            Spacing::Large => Some(&self.large),
        }
    }

    /// Class after `current` given the `next` sibling.
    #[must_use]
    pub fn spacing_class(&self, current: &ContentNode, next: Option<&ContentNode>) -> Option<&str> {
        self.class(Spacing::between(current, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(type_name: &str) -> ContentNode {
        ContentNode::from_value(json!({"_key": type_name, "_type": type_name}))
    }

    #[test]
    fn test_last_sibling_has_no_spacing() {
        let policy = SpacingPolicy::default();
        assert_eq!(policy.spacing_class(&node("hero"), None), None);
        assert_eq!(policy.spacing_class(&node("section"), None), None);
    }

    #[test]
    fn test_before_structural_container_is_large() {
        let policy = SpacingPolicy::default();
        for current in ["hero", "richText", "section", "legacyWidget"] {
            for next in ["section", "panel"] {
                assert_eq!(
                    policy.spacing_class(&node(current), Some(&node(next))),
                    Some(DEFAULT_LARGE_CLASS),
                    "{current} -> {next}"
                );
            }
        }
    }

    #[test]
    fn test_before_leaf_is_standard() {
        let policy = SpacingPolicy::default();
        for current in ["hero", "section", "panel"] {
            for next in ["hero", "richText", "image", "callToAction", "legacyWidget"] {
                assert_eq!(
                    policy.spacing_class(&node(current), Some(&node(next))),
                    Some(DEFAULT_STANDARD_CLASS),
                    "{current} -> {next}"
                );
            }
        }
    }

    #[test]
    fn test_before_undecodable_section_is_large() {
        let policy = SpacingPolicy::default();
        let broken = ContentNode::from_value(json!({"_key": "s", "_type": "section", "title": 42}));
        assert_eq!(
            policy.spacing_class(&node("hero"), Some(&broken)),
            Some(DEFAULT_LARGE_CLASS)
        );

        let broken_leaf = ContentNode::from_value(json!({"_key": "i", "_type": "image", "src": 7}));
        assert_eq!(
            policy.spacing_class(&node("hero"), Some(&broken_leaf)),
            Some(DEFAULT_STANDARD_CLASS)
        );
    }

    #[test]
    fn test_custom_class_names() {
        let policy = SpacingPolicy::new("mb-8", "mb-16");
        assert_eq!(policy.class(Spacing::Standard), Some("mb-8"));
        assert_eq!(policy.class(Spacing::Large), Some("mb-16"));
        assert_eq!(policy.class(Spacing::None), None);
    }
}
