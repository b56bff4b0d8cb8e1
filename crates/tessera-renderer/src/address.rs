//! Node addresses for the live-edit overlay.
//!
//! An address locates a node in the source document:
//!
//! ```text
//! <rootPath><selector>{.<nestedField><selector>}*
//! selector(key) = [_key=="<key>"]
//! ```
//!
//! The overlay correlates a clicked DOM region with a document field using
//! exactly this string, so the format is preserved byte-for-byte. Addresses
//! depend only on tree shape and keys, never on positions or field values.

use std::fmt;

/// Array-element selector for a node key.
///
/// Quotes and backslashes inside the key are backslash-escaped so the
/// selector stays parseable.
///
/// # Example
///
/// ```
/// use tessera_renderer::selector;
///
/// assert_eq!(selector("abc123"), r#"[_key=="abc123"]"#);
/// ```
#[must_use]
pub fn selector(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 10);
    out.push_str("[_key==\"");
    for c in key.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push_str("\"]");
    out
}

/// Deterministic path string identifying a node (or a children list).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Address of the top-level node list (e.g. `content`).
    #[must_use]
    pub fn root(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Address of the element keyed `key` within this list.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        Self(format!("{}{}", self.0, selector(key)))
    }

    /// Address of a nested list field (e.g. `.content`) of this node.
    #[must_use]
    pub fn nested(&self, field: &str) -> Self {
        Self(format!("{}.{field}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_top_level_address() {
        let addr = Address::root("content").child("a1");
        assert_eq!(addr.as_str(), r#"content[_key=="a1"]"#);
    }

    #[test]
    fn test_nested_address() {
        let addr = Address::root("content")
            .child("s1")
            .nested("content")
            .child("t1");
        assert_eq!(
            addr.as_str(),
            r#"content[_key=="s1"].content[_key=="t1"]"#
        );
    }

    #[test]
    fn test_custom_root_path() {
        let addr = Address::root("pageBuilder").child("x");
        assert_eq!(addr.to_string(), r#"pageBuilder[_key=="x"]"#);
    }

    #[test]
    fn test_selector_escapes_quotes() {
        assert_eq!(selector(r#"a"b\c"#), r#"[_key=="a\"b\\c"]"#);
    }

    #[test]
    fn test_empty_key_selector() {
        assert_eq!(selector(""), r#"[_key==""]"#);
    }
}
