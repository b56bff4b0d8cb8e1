//! Content node types.
//!
//! Nodes arrive from the CMS as JSON objects tagged with `_type` and keyed
//! with `_key`. Decoding is lenient: an unrecognized `_type` becomes
//! [`ContentNode::Unknown`] and an undecodable known node becomes
//! [`ContentNode::Invalid`], so a single malformed node never fails the
//! whole document.

use std::fmt;
use std::str::FromStr;

use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Name of the nested field holding a container's children.
const CHILDREN_FIELD: &str = "content";
/// Wire name of the anchor id field.
const ANCHOR_FIELD: &str = "anchorId";

/// Closed set of block kinds known to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Section,
    Panel,
    Hero,
    RichText,
    Image,
    CallToAction,
}

impl BlockKind {
    /// All known kinds, in registration order.
    pub const ALL: [Self; 6] = [
        Self::Section,
        Self::Panel,
        Self::Hero,
        Self::RichText,
        Self::Image,
        Self::CallToAction,
    ];

    /// The `_type` tag used on the wire.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Panel => "panel",
            Self::Hero => "hero",
            Self::RichText => "richText",
            Self::Image => "image",
            Self::CallToAction => "callToAction",
        }
    }

    /// Look up a kind by its `_type` tag.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Whether this kind is a structural container: it may carry a title
    /// and owns nested content.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::Section | Self::Panel)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Resolved horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Lowercase name (`left`, `center`, `right`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!(
                "invalid alignment '{other}' (expected left, center or right)"
            )),
        }
    }
}

/// Alignment as authored on a node. `Inherit` defers to the parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignSetting {
    #[default]
    Inherit,
    Left,
    Center,
    Right,
}

impl AlignSetting {
    /// The explicit alignment, or `None` for `Inherit`.
    #[must_use]
    pub const fn explicit(self) -> Option<TextAlign> {
        match self {
            Self::Inherit => None,
            Self::Left => Some(TextAlign::Left),
            Self::Center => Some(TextAlign::Center),
            Self::Right => Some(TextAlign::Right),
        }
    }

    #[must_use]
    pub const fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }
}

/// Titled structural container. The title is mandatory at render time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
    #[serde(default, skip_serializing_if = "AlignSetting::is_inherit")]
    pub text_align: AlignSetting,
    #[serde(default)]
    pub content: Vec<ContentNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structural container whose title is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
    #[serde(default, skip_serializing_if = "AlignSetting::is_inherit")]
    pub text_align: AlignSetting,
    #[serde(default)]
    pub content: Vec<ContentNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page banner with the page heading.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "AlignSetting::is_inherit")]
    pub text_align: AlignSetting,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Markdown body copy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichText {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "AlignSetting::is_inherit")]
    pub text_align: AlignSetting,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Image with a pre-resolved CDN URL.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Call-to-action link.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "AlignSetting::is_inherit")]
    pub text_align: AlignSetting,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Node whose `_type` is not a known [`BlockKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownNode {
    pub key: String,
    pub type_name: String,
    /// Original JSON object, kept for round-tripping.
    pub raw: Value,
}

/// Node of a known type whose fields could not be decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct InvalidNode {
    pub key: String,
    pub type_name: String,
    /// Kind named by `_type`; `None` when the node is not an object.
    pub kind: Option<BlockKind>,
    pub reason: String,
    /// Original JSON value, kept for round-tripping.
    pub raw: Value,
}

/// One element of the content tree.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentNode {
    Section(Section),
    Panel(Panel),
    Hero(Hero),
    RichText(RichText),
    Image(Image),
    CallToAction(CallToAction),
    Unknown(UnknownNode),
    Invalid(InvalidNode),
}

impl ContentNode {
    /// Decode a node from JSON without failing.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            tracing::warn!("Content node is not a JSON object");
            return Self::Invalid(InvalidNode {
                key: String::new(),
                type_name: String::new(),
                kind: None,
                reason: "node is not a JSON object".to_owned(),
                raw: value,
            });
        };

        let key = string_field(&map, "_key");
        let type_name = string_field(&map, "_type");
        if key.is_empty() {
            tracing::warn!(type_name = %type_name, "Content node has no _key");
        }

        let raw = Value::Object(map);
        let Some(kind) = BlockKind::from_type_name(&type_name) else {
            return Self::Unknown(UnknownNode {
                key,
                type_name,
                raw,
            });
        };

        let decoded = match kind {
            BlockKind::Section => Section::deserialize(&raw).map(Self::Section),
            BlockKind::Panel => Panel::deserialize(&raw).map(Self::Panel),
            BlockKind::Hero => Hero::deserialize(&raw).map(Self::Hero),
            BlockKind::RichText => RichText::deserialize(&raw).map(Self::RichText),
            BlockKind::Image => Image::deserialize(&raw).map(Self::Image),
            BlockKind::CallToAction => CallToAction::deserialize(&raw).map(Self::CallToAction),
        };

        decoded.unwrap_or_else(|err| {
            tracing::warn!(key = %key, type_name = %type_name, error = %err, "Failed to decode content node");
            Self::Invalid(InvalidNode {
                key,
                type_name,
                kind: Some(kind),
                reason: err.to_string(),
                raw,
            })
        })
    }

    /// Stable key, unique within its document.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Section(n) => &n.key,
            Self::Panel(n) => &n.key,
            Self::Hero(n) => &n.key,
            Self::RichText(n) => &n.key,
            Self::Image(n) => &n.key,
            Self::CallToAction(n) => &n.key,
            Self::Unknown(n) => &n.key,
            Self::Invalid(n) => &n.key,
        }
    }

    pub(crate) fn set_key(&mut self, key: String) {
        match self {
            Self::Section(n) => n.key = key,
            Self::Panel(n) => n.key = key,
            Self::Hero(n) => n.key = key,
            Self::RichText(n) => n.key = key,
            Self::Image(n) => n.key = key,
            Self::CallToAction(n) => n.key = key,
            Self::Unknown(UnknownNode { key: k, raw, .. })
            | Self::Invalid(InvalidNode { key: k, raw, .. }) => {
                if let Value::Object(map) = raw {
                    map.insert("_key".to_owned(), Value::String(key.clone()));
                }
                *k = key;
            }
        }
    }

    /// Known kind, or `None` for unknown and invalid nodes.
    #[must_use]
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Self::Section(_) => Some(BlockKind::Section),
            Self::Panel(_) => Some(BlockKind::Panel),
            Self::Hero(_) => Some(BlockKind::Hero),
            Self::RichText(_) => Some(BlockKind::RichText),
            Self::Image(_) => Some(BlockKind::Image),
            Self::CallToAction(_) => Some(BlockKind::CallToAction),
            Self::Unknown(_) | Self::Invalid(_) => None,
        }
    }

    /// The `_type` tag as authored.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unknown(n) => &n.type_name,
            Self::Invalid(n) => &n.type_name,
            known => known.kind().map_or("", BlockKind::type_name),
        }
    }

    /// Kind named by the `_type` tag, including nodes that failed to decode.
    #[must_use]
    pub fn declared_kind(&self) -> Option<BlockKind> {
        match self {
            Self::Invalid(n) => n.kind,
            known => known.kind(),
        }
    }

    /// Whether the `_type` tag names a structural container. A section that
    /// failed to decode still counts.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        self.declared_kind().is_some_and(BlockKind::is_structural)
    }

    /// Children of a container node.
    #[must_use]
    pub fn children(&self) -> Option<&[Self]> {
        match self {
            Self::Section(n) => Some(&n.content),
            Self::Panel(n) => Some(&n.content),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Section(n) => Some(&mut n.content),
            Self::Panel(n) => Some(&mut n.content),
            _ => None,
        }
    }

    /// Field name under which a container stores its children.
    #[must_use]
    pub fn nested_field(&self) -> Option<&'static str> {
        self.children().map(|_| CHILDREN_FIELD)
    }

    /// Authored alignment (`Inherit` for types without one).
    #[must_use]
    pub fn text_align(&self) -> AlignSetting {
        match self {
            Self::Section(n) => n.text_align,
            Self::Panel(n) => n.text_align,
            Self::Hero(n) => n.text_align,
            Self::RichText(n) => n.text_align,
            Self::CallToAction(n) => n.text_align,
            Self::Image(_) | Self::Unknown(_) | Self::Invalid(_) => AlignSetting::Inherit,
        }
    }

    /// Whether this node type carries a title (and therefore an anchor).
    #[must_use]
    pub fn has_title_field(&self) -> bool {
        matches!(self, Self::Section(_) | Self::Panel(_))
    }

    /// Title of a titled container; `None` when unset or blank.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        let title = match self {
            Self::Section(n) => n.title.as_deref(),
            Self::Panel(n) => n.title.as_deref(),
            _ => None,
        };
        title.filter(|t| !t.trim().is_empty())
    }

    /// Set the title. Returns `false` if the node has no title field.
    pub fn set_title(&mut self, title: Option<String>) -> bool {
        match self {
            Self::Section(n) => n.title = title,
            Self::Panel(n) => n.title = title,
            _ => return false,
        }
        true
    }

    /// Stored anchor id. Undecodable containers report the `anchorId` of
    /// their raw object so it still takes part in uniqueness checks.
    #[must_use]
    pub fn anchor_id(&self) -> Option<&str> {
        match self {
            Self::Section(n) => n.anchor_id.as_deref(),
            Self::Panel(n) => n.anchor_id.as_deref(),
            Self::Invalid(n) if self.is_structural() => {
                n.raw.get(ANCHOR_FIELD).and_then(Value::as_str)
            }
            _ => None,
        }
    }

    /// Set the anchor id. Returns `false` if the node has no title field.
    pub fn set_anchor_id(&mut self, anchor_id: Option<String>) -> bool {
        match self {
            Self::Section(n) => n.anchor_id = anchor_id,
            Self::Panel(n) => n.anchor_id = anchor_id,
            _ => return false,
        }
        true
    }
}

fn string_field(map: &Map<String, Value>, name: &str) -> String {
    map.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for ContentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Section(n) => serialize_tagged(BlockKind::Section, n, serializer),
            Self::Panel(n) => serialize_tagged(BlockKind::Panel, n, serializer),
            Self::Hero(n) => serialize_tagged(BlockKind::Hero, n, serializer),
            Self::RichText(n) => serialize_tagged(BlockKind::RichText, n, serializer),
            Self::Image(n) => serialize_tagged(BlockKind::Image, n, serializer),
            Self::CallToAction(n) => serialize_tagged(BlockKind::CallToAction, n, serializer),
            Self::Unknown(n) => n.raw.serialize(serializer),
            Self::Invalid(n) => n.raw.serialize(serializer),
        }
    }
}

fn serialize_tagged<T: Serialize, S: Serializer>(
    kind: BlockKind,
    node: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut value = serde_json::to_value(node).map_err(S::Error::custom)?;
    if let Value::Object(map) = &mut value {
        map.insert(
            "_type".to_owned(),
            Value::String(kind.type_name().to_owned()),
        );
    }
    value.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_section_with_children() {
        let node = ContentNode::from_value(json!({
            "_key": "s1",
            "_type": "section",
            "title": "About Us",
            "anchorId": "about-us",
            "textAlign": "center",
            "content": [{"_key": "t1", "_type": "richText", "body": "Hello"}]
        }));

        let ContentNode::Section(section) = &node else {
            panic!("expected section, got {node:?}");
        };
        assert_eq!(section.title.as_deref(), Some("About Us"));
        assert_eq!(section.anchor_id.as_deref(), Some("about-us"));
        assert_eq!(section.text_align, AlignSetting::Center);
        assert_eq!(node.children().map(<[_]>::len), Some(1));
        assert_eq!(node.nested_field(), Some("content"));
    }

    #[test]
    fn test_unknown_type_keeps_name_and_key() {
        let node = ContentNode::from_value(json!({"_key": "w1", "_type": "legacyWidget", "x": 1}));
        assert_eq!(node.kind(), None);
        assert_eq!(node.key(), "w1");
        assert_eq!(node.type_name(), "legacyWidget");
    }

    #[test]
    fn test_wrong_field_type_becomes_invalid() {
        let node = ContentNode::from_value(json!({"_key": "s1", "_type": "section", "title": 42}));
        let ContentNode::Invalid(invalid) = node else {
            panic!("expected invalid node");
        };
        assert_eq!(invalid.key, "s1");
        assert_eq!(invalid.type_name, "section");
        assert_eq!(invalid.kind, Some(BlockKind::Section));
        assert!(!invalid.reason.is_empty());
    }

    #[test]
    fn test_invalid_section_is_still_structural() {
        let node = ContentNode::from_value(json!({
            "_key": "s1",
            "_type": "section",
            "title": 42,
            "anchorId": "pricing"
        }));
        assert_eq!(node.kind(), None);
        assert_eq!(node.declared_kind(), Some(BlockKind::Section));
        assert!(node.is_structural());
        assert_eq!(node.anchor_id(), Some("pricing"));
        assert!(!node.has_title_field());

        let hero = ContentNode::from_value(json!({"_key": "h", "_type": "hero", "heading": 1, "anchorId": "x"}));
        assert!(!hero.is_structural());
        assert_eq!(hero.anchor_id(), None);
    }

    #[test]
    fn test_non_object_becomes_invalid() {
        let node = ContentNode::from_value(json!("just a string"));
        assert!(matches!(node, ContentNode::Invalid(_)));
        assert_eq!(node.key(), "");
    }

    #[test]
    fn test_inherit_alignment_is_default() {
        let node = ContentNode::from_value(json!({"_key": "h", "_type": "hero", "textAlign": "inherit"}));
        assert_eq!(node.text_align(), AlignSetting::Inherit);
        assert_eq!(node.text_align().explicit(), None);
    }

    #[test]
    fn test_blank_title_is_none() {
        let node = ContentNode::from_value(json!({"_key": "p", "_type": "panel", "title": "   "}));
        assert!(node.has_title_field());
        assert_eq!(node.title(), None);
    }

    #[test]
    fn test_serialize_adds_type_and_keeps_extra_fields() {
        let input = json!({
            "_key": "c1",
            "_type": "callToAction",
            "label": "Contact",
            "href": "/contact",
            "style": "primary"
        });
        let node = ContentNode::from_value(input.clone());
        assert_eq!(serde_json::to_value(&node).unwrap(), input);
    }

    #[test]
    fn test_serialize_unknown_round_trips_raw() {
        let input = json!({"_key": "w1", "_type": "legacyWidget", "config": {"a": [1, 2]}});
        let node = ContentNode::from_value(input.clone());
        assert_eq!(serde_json::to_value(&node).unwrap(), input);
    }

    #[test]
    fn test_block_kind_type_names() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(BlockKind::from_type_name("Section"), None);
        assert!(BlockKind::Section.is_structural());
        assert!(BlockKind::Panel.is_structural());
        assert!(!BlockKind::Hero.is_structural());
    }

    #[test]
    fn test_text_align_from_str() {
        assert_eq!("center".parse::<TextAlign>(), Ok(TextAlign::Center));
        assert!("justify".parse::<TextAlign>().is_err());
    }

    #[test]
    fn test_set_title_on_leaf_is_rejected() {
        let mut node = ContentNode::Hero(Hero::default());
        assert!(!node.set_title(Some("x".to_owned())));
        assert!(!node.set_anchor_id(Some("x".to_owned())));
    }
}
