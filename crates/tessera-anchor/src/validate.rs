//! Save-time anchor validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tessera_content::Document;

use crate::AnchorViolation;

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Whether `anchor` is a well-formed anchor id.
#[must_use]
pub fn is_valid_anchor(anchor: &str) -> bool {
    ANCHOR_RE.is_match(anchor)
}

/// Check every anchor in `document` for format and uniqueness.
///
/// Empty anchor ids count as unset and are skipped. Never modifies the document: unlike generation, nothing is corrected
/// here. Format violations are reported in document order, followed by
/// duplicates ordered by anchor id.
pub fn validate(document: &Document) -> Result<(), Vec<AnchorViolation>> {
    let mut violations = Vec::new();
    let mut owners: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for node in document.iter() {
        // An empty anchor is an unset one.
        let Some(anchor) = node.anchor_id().filter(|anchor| !anchor.is_empty()) else {
            continue;
        };
        if !is_valid_anchor(anchor) {
            violations.push(AnchorViolation::InvalidFormat {
                key: node.key().to_owned(),
                anchor: anchor.to_owned(),
            });
        }
        owners.entry(anchor).or_default().push(node.key().to_owned());
    }

    violations.extend(
        owners
            .into_iter()
            .filter(|(_, keys)| keys.len() > 1)
            .map(|(anchor, keys)| AnchorViolation::Duplicate {
                anchor: anchor.to_owned(),
                keys,
            }),
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
