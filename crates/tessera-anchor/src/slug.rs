//! Title to anchor id conversion.

use std::collections::HashSet;

use crate::AnchorError;

/// Maximum length of a normalized anchor id, before any numeric suffix.
pub const MAX_ANCHOR_LEN: usize = 50;

/// Normalize a title into an anchor id.
///
/// Lowercases, drops everything except ASCII letters, digits, whitespace
/// and hyphens, turns whitespace runs and repeated hyphens into a single
/// hyphen, trims hyphens from both ends and truncates to
/// [`MAX_ANCHOR_LEN`] characters.
///
/// # Errors
///
/// Returns [`AnchorError::EmptyAnchor`] if nothing is left.
///
/// # Example
///
/// ```
/// use tessera_anchor::normalize;
///
/// assert_eq!(normalize("About Our Services!").unwrap(), "about-our-services");
/// assert!(normalize("!!!").is_err());
/// ```
pub fn normalize(title: &str) -> Result<String, AnchorError> {
    let mut result = String::with_capacity(title.len());
    let mut last_was_dash = true; // Prevents leading dash

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            result.push(c);
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-') {
            result.push('-');
            last_was_dash = true;
        }
    }

    result.truncate(MAX_ANCHOR_LEN);
    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        return Err(AnchorError::EmptyAnchor {
            title: title.to_owned(),
        });
    }
    Ok(result)
}

/// Generate an anchor id for `title` that is absent from `existing`.
///
/// Collisions get the first free suffix of `-2`, `-3`, ...
///
/// # Errors
///
/// Returns [`AnchorError::EmptyAnchor`] if the title normalizes to nothing.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use tessera_anchor::generate;
///
/// let existing = HashSet::from(["faq".to_owned()]);
/// assert_eq!(generate("FAQ", &existing).unwrap(), "faq-2");
/// ```
pub fn generate(title: &str, existing: &HashSet<String>) -> Result<String, AnchorError> {
    let base = normalize(title)?;
    if !existing.contains(&base) {
        return Ok(base);
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !existing.contains(&candidate) {
            return Ok(candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("About Our Services!").unwrap(), "about-our-services");
        assert_eq!(normalize("  Spaces  ").unwrap(), "spaces");
        assert_eq!(normalize("Multiple   Spaces").unwrap(), "multiple-spaces");
        assert_eq!(normalize("kebab--case").unwrap(), "kebab-case");
        assert_eq!(normalize("- dashes - everywhere -").unwrap(), "dashes-everywhere");
        assert_eq!(normalize("What's New?").unwrap(), "whats-new");
        assert_eq!(normalize("Q&A 2024").unwrap(), "qa-2024");
    }

    #[test]
    fn test_normalize_drops_underscores_and_non_ascii() {
        assert_eq!(normalize("snake_case").unwrap(), "snakecase");
        assert_eq!(normalize("Café Menu").unwrap(), "caf-menu");
    }

    #[test]
    fn test_normalize_empty_is_error() {
        for title in ["", "   ", "!!!", "---", "日本語"] {
            assert_eq!(
                normalize(title),
                Err(AnchorError::EmptyAnchor {
                    title: title.to_owned()
                }),
                "{title:?}"
            );
        }
    }

    #[test]
    fn test_normalize_truncates_without_trailing_hyphen() {
        let title = format!("{} tail", "a".repeat(49));
        let anchor = normalize(&title).unwrap();
        assert_eq!(anchor, "a".repeat(49));

        let long = "word ".repeat(30);
        let anchor = normalize(&long).unwrap();
        assert!(anchor.len() <= MAX_ANCHOR_LEN);
        assert!(!anchor.ends_with('-'));
    }

    #[test]
    fn test_generate_without_collision() {
        assert_eq!(generate("FAQ", &set(&["pricing"])).unwrap(), "faq");
    }

    #[test]
    fn test_generate_takes_first_free_suffix() {
        assert_eq!(generate("FAQ", &set(&["faq"])).unwrap(), "faq-2");
        assert_eq!(generate("FAQ", &set(&["faq", "faq-2"])).unwrap(), "faq-3");
        assert_eq!(generate("FAQ", &set(&["faq", "faq-3"])).unwrap(), "faq-2");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let existing = set(&["faq", "team"]);
        let first = generate("FAQ", &existing).unwrap();
        assert_eq!(first, generate("FAQ", &existing).unwrap());

        let mut with_first = existing.clone();
        with_first.insert(first.clone());
        let second = generate("FAQ", &with_first).unwrap();
        assert_ne!(first, second);
    }
}
