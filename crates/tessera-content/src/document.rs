//! Document: the ordered top-level node list and its authoring operations.

use std::collections::HashSet;
use std::path::Path;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ContentError;
use crate::node::ContentNode;

/// Number of hex characters kept from a UUID for new node keys.
const KEY_LEN: usize = 12;

/// Name of the top-level node list in the object form.
const CONTENT_FIELD: &str = "content";

/// JSON shape the document was read from, reproduced on save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Envelope {
    /// `{"content": [...], ...}`
    #[default]
    Object,
    /// `[...]`
    Array,
}

/// An ordered sequence of top-level content nodes.
///
/// Order is render order. Node identity is the `key`, never the position:
/// non-empty keys are unique across the whole tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub content: Vec<ContentNode>,
    /// Top-level fields other than `content` (`_id`, `_type`, `slug`, ...),
    /// written back unchanged.
    pub fields: Map<String, Value>,
    envelope: Envelope,
}

impl Document {
    /// Document in the object form with no extra fields.
    ///
    /// Key uniqueness is not checked here; [`Document::from_value`] and
    /// [`Document::insert`] enforce it.
    #[must_use]
    pub fn new(content: Vec<ContentNode>) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Parse a document from CMS JSON.
    ///
    /// Accepts either a bare node array or an object with a `content` array.
    /// Individual nodes never fail; see [`ContentNode::from_value`].
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a document from an already parsed JSON value.
    ///
    /// Fails on a bad top-level shape or when two nodes anywhere in the
    /// tree share a non-empty key.
    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        let (envelope, fields, nodes) = match value {
            Value::Array(nodes) => (Envelope::Array, Map::new(), nodes),
            Value::Object(mut fields) => match fields.remove(CONTENT_FIELD) {
                Some(Value::Array(nodes)) => (Envelope::Object, fields, nodes),
                _ => return Err(ContentError::Shape),
            },
            _ => return Err(ContentError::Shape),
        };
        let document = Self {
            content: nodes.into_iter().map(ContentNode::from_value).collect(),
            fields,
            envelope,
        };
        if let Some(key) = first_duplicate(document.iter().map(ContentNode::key)) {
            return Err(ContentError::DuplicateKey(key.to_owned()));
        }
        Ok(document)
    }

    /// Read and parse a document file.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path)?;
        let doc = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), nodes = doc.len(), "Loaded document");
        Ok(doc)
    }

    /// Serialize to pretty-printed JSON in the CMS wire format.
    pub fn to_json(&self) -> Result<String, ContentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document back to disk.
    pub fn save(&self, path: &Path) -> Result<(), ContentError> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Generate a fresh node key.
    ///
    /// Keys are random, so a deleted node's key is never handed out again.
    #[must_use]
    pub fn new_key() -> String {
        let mut key = uuid::Uuid::new_v4().simple().to_string();
        key.truncate(KEY_LEN);
        key
    }

    /// Total number of nodes at every depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Pre-order traversal over every node in the tree.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![self.content.iter()],
        }
    }

    /// Find a node anywhere in the tree by key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&ContentNode> {
        self.iter().find(|node| node.key() == key)
    }

    /// Find a node anywhere in the tree by key, mutably.
    pub fn find_mut(&mut self, key: &str) -> Option<&mut ContentNode> {
        find_in_mut(&mut self.content, key)
    }

    /// Insert a node at `index` in the top-level list (`parent == None`) or
    /// in the children of the container keyed `parent`.
    ///
    /// A node with an empty key gets a fresh one. The index is clamped to
    /// the list length. Fails when any key in the inserted subtree is
    /// already used anywhere in the document. Returns the inserted node's key.
    pub fn insert(
        &mut self,
        parent: Option<&str>,
        index: usize,
        mut node: ContentNode,
    ) -> Result<String, ContentError> {
        if node.key().is_empty() {
            node.set_key(Self::new_key());
        }
        let subtree = Nodes {
            stack: vec![std::slice::from_ref(&node).iter()],
        };
        if let Some(key) = first_duplicate(self.iter().chain(subtree).map(ContentNode::key)) {
            return Err(ContentError::DuplicateKey(key.to_owned()));
        }
        let key = node.key().to_owned();

        let siblings = match parent {
            None => &mut self.content,
            Some(parent_key) => self
                .find_mut(parent_key)
                .ok_or_else(|| ContentError::NotFound(parent_key.to_owned()))?
                .children_mut()
                .ok_or_else(|| ContentError::NotContainer(parent_key.to_owned()))?,
        };

        let index = index.min(siblings.len());
        siblings.insert(index, node);
        tracing::debug!(key = %key, parent = ?parent, index, "Inserted content node");
        Ok(key)
    }

    /// Remove a node (and its subtree) by key.
    pub fn remove(&mut self, key: &str) -> Option<ContentNode> {
        let removed = remove_in(&mut self.content, key);
        if removed.is_some() {
            tracing::debug!(key = %key, "Removed content node");
        }
        removed
    }

    /// Set the title of a titled container. An empty title unsets it.
    pub fn set_title(&mut self, key: &str, title: &str) -> Result<(), ContentError> {
        let node = self
            .find_mut(key)
            .ok_or_else(|| ContentError::NotFound(key.to_owned()))?;
        let title = (!title.is_empty()).then(|| title.to_owned());
        if node.set_title(title) {
            Ok(())
        } else {
            Err(ContentError::NoTitle(key.to_owned()))
        }
    }
}

/// First non-empty key seen twice.
fn first_duplicate<'a>(keys: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    keys.filter(|key| !key.is_empty())
        .find(|key| !seen.insert(*key))
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.envelope {
            Envelope::Array => self.content.serialize(serializer),
            Envelope::Object => {
                let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
                for (name, value) in &self.fields {
                    map.serialize_entry(name, value)?;
                }
                map.serialize_entry(CONTENT_FIELD, &self.content)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

fn find_in_mut<'a>(nodes: &'a mut [ContentNode], key: &str) -> Option<&'a mut ContentNode> {
    for node in nodes {
        if node.key() == key {
            return Some(node);
        }
        if let Some(children) = node.children_mut()
            && let Some(found) = find_in_mut(children, key)
        {
            return Some(found);
        }
    }
    None
}

fn remove_in(nodes: &mut Vec<ContentNode>, key: &str) -> Option<ContentNode> {
    if let Some(pos) = nodes.iter().position(|node| node.key() == key) {
        return Some(nodes.remove(pos));
    }
    nodes
        .iter_mut()
        .filter_map(ContentNode::children_mut)
        .find_map(|children| remove_in(children, key))
}

/// Pre-order iterator over a document's nodes.
pub struct Nodes<'a> {
    stack: Vec<std::slice::Iter<'a, ContentNode>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a ContentNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    if let Some(children) = node.children() {
                        self.stack.push(children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Hero, Section};
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::from_json(
            r#"{"content": [
                {"_key": "hero", "_type": "hero", "heading": "Welcome"},
                {"_key": "s1", "_type": "section", "title": "Services", "content": [
                    {"_key": "p1", "_type": "panel", "content": [
                        {"_key": "t1", "_type": "richText", "body": "Deep"}
                    ]}
                ]},
                {"_key": "s2", "_type": "section", "title": "FAQ", "content": []}
            ]}"#,
        )
        .unwrap()
    }

    fn keys(doc: &Document) -> Vec<&str> {
        doc.iter().map(ContentNode::key).collect()
    }

    #[test]
    fn test_from_json_bare_array() {
        let doc = Document::from_json(r#"[{"_key": "a", "_type": "hero"}]"#).unwrap();
        assert_eq!(doc.content.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_scalar() {
        let err = Document::from_json("42").unwrap_err();
        assert!(matches!(err, ContentError::Shape));
    }

    #[test]
    fn test_from_json_rejects_object_without_content() {
        let err = Document::from_json(r#"{"title": "x"}"#).unwrap_err();
        assert!(matches!(err, ContentError::Shape));
    }

    #[test]
    fn test_iter_is_pre_order() {
        let doc = sample();
        assert_eq!(keys(&doc), vec!["hero", "s1", "p1", "t1", "s2"]);
        assert_eq!(doc.len(), 5);
    }

    #[test]
    fn test_find_nested() {
        let doc = sample();
        assert_eq!(doc.find("t1").map(ContentNode::type_name), Some("richText"));
        assert!(doc.find("missing").is_none());
    }

    #[test]
    fn test_insert_into_container_assigns_key() {
        let mut doc = sample();
        let key = doc
            .insert(Some("s2"), 0, ContentNode::Hero(Hero::default()))
            .unwrap();
        assert_eq!(key.len(), KEY_LEN);
        assert_eq!(doc.find("s2").unwrap().children().unwrap()[0].key(), key);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut doc = sample();
        let node = ContentNode::Hero(Hero {
            key: "late".to_owned(),
            ..Hero::default()
        });
        doc.insert(None, 99, node).unwrap();
        assert_eq!(doc.content.last().unwrap().key(), "late");
    }

    #[test]
    fn test_insert_into_leaf_fails() {
        let mut doc = sample();
        let err = doc
            .insert(Some("hero"), 0, ContentNode::Hero(Hero::default()))
            .unwrap_err();
        assert!(matches!(err, ContentError::NotContainer(key) if key == "hero"));
    }

    #[test]
    fn test_insert_key_used_elsewhere_fails() {
        let mut doc = sample();
        let node = ContentNode::Hero(Hero {
            key: "t1".to_owned(),
            ..Hero::default()
        });
        let err = doc.insert(Some("s2"), 0, node).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateKey(key) if key == "t1"));
        assert!(doc.find("s2").unwrap().children().unwrap().is_empty());
    }

    #[test]
    fn test_insert_checks_nested_keys_of_new_node() {
        let mut doc = sample();
        let node = ContentNode::Section(Section {
            key: "s3".to_owned(),
            content: vec![ContentNode::Hero(Hero {
                key: "hero".to_owned(),
                ..Hero::default()
            })],
            ..Section::default()
        });
        let err = doc.insert(None, 0, node).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateKey(key) if key == "hero"));
    }

    #[test]
    fn test_from_json_rejects_nested_duplicate_key() {
        let err = Document::from_json(
            r#"[
                {"_key": "a", "_type": "section", "title": "FAQ", "content": [
                    {"_key": "a", "_type": "panel", "anchorId": "faq"}
                ]}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateKey(key) if key == "a"));
    }

    #[test]
    fn test_from_json_allows_several_keyless_nodes() {
        let doc = Document::from_json(
            r#"[{"_type": "hero"}, {"_type": "richText", "body": "x"}]"#,
        )
        .unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_to_json_keeps_top_level_fields() {
        let input = serde_json::json!({
            "_id": "home",
            "_type": "page",
            "slug": {"current": "home"},
            "content": [{"_key": "h", "_type": "hero", "heading": "Hi"}]
        });
        let doc = Document::from_value(input.clone()).unwrap();
        assert_eq!(doc.fields.get("_id"), Some(&serde_json::json!("home")));

        let output: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_to_json_keeps_bare_array() {
        let input = serde_json::json!([{"_key": "h", "_type": "hero", "heading": "Hi"}]);
        let doc = Document::from_value(input.clone()).unwrap();
        let output: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_insert_duplicate_sibling_key_fails() {
        let mut doc = sample();
        let node = ContentNode::Section(Section {
            key: "s1".to_owned(),
            ..Section::default()
        });
        let err = doc.insert(None, 0, node).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateKey(_)));
    }

    #[test]
    fn test_remove_nested_subtree() {
        let mut doc = sample();
        let removed = doc.remove("p1").unwrap();
        assert_eq!(removed.key(), "p1");
        assert_eq!(keys(&doc), vec!["hero", "s1", "s2"]);
        assert!(doc.remove("p1").is_none());
    }

    #[test]
    fn test_new_keys_are_not_reused() {
        let first = Document::new_key();
        let second = Document::new_key();
        assert_ne!(first, second);
    }

    #[test]
    fn test_set_title() {
        let mut doc = sample();
        doc.set_title("s2", "Questions").unwrap();
        assert_eq!(doc.find("s2").unwrap().title(), Some("Questions"));

        doc.set_title("s2", "").unwrap();
        assert_eq!(doc.find("s2").unwrap().title(), None);

        assert!(matches!(
            doc.set_title("hero", "x"),
            Err(ContentError::NoTitle(_))
        ));
        assert!(matches!(
            doc.set_title("nope", "x"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("page.json");
        let doc = sample();

        doc.save(&path).unwrap();
        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded, doc);
    }
}
