//! URL slugs for companies and job postings.

use std::collections::HashSet;

const MAX_SLUG_LENGTH: usize = 200;

/// Lowercases `text` and joins its alphanumeric runs with single hyphens.
///
/// Returns `"item"` when nothing usable is left.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }

        if slug.len() >= MAX_SLUG_LENGTH {
            break;
        }
    }

    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}

/// Picks `base`, or `base-1`, `base-2`, ... whichever is first not in `taken`.
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();

    if !taken.contains(base) {
        return base.to_string();
    }

    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Senior Rust Engineer"), "senior-rust-engineer");
        assert_eq!(slugify("  C++ / .NET Dev!! "), "c-net-dev");
        assert_eq!(slugify("Acme Ltd."), "acme-ltd");
        assert_eq!(slugify("!!!"), "item");
    }

    #[test]
    fn test_slugify_truncates() {
        let long = "a".repeat(500);
        assert_eq!(slugify(&long).len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn test_unique_slug() {
        assert_eq!(unique_slug("acme", &[]), "acme");

        let taken = vec!["acme".to_string(), "acme-1".to_string()];
        assert_eq!(unique_slug("acme", &taken), "acme-2");

        let gap = vec!["acme".to_string(), "acme-2".to_string()];
        assert_eq!(unique_slug("acme", &gap), "acme-1");
    }
}
