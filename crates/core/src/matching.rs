//! Name-matching rules for remote reconciliation.
//!
//! Both the variant price synchronizer (local model number vs. remote
//! variant name) and the webhook product resolver (line-item
//! description vs. product title) use the same rule: case-insensitive
//! trimmed comparison, accepting exact equality or either string
//! containing the other.

/// Case-insensitive trimmed match: equality, or one side being a
/// substring of the other. Empty strings never match anything (an
/// empty needle would otherwise be a substring of everything).
pub fn names_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_case_insensitive() {
        assert!(names_match("MSB-30tons", "msb-30tons"));
    }

    #[test]
    fn substring_matches_both_directions() {
        assert!(names_match("MSB-30tons", "msb-30tons-extra"));
        assert!(names_match("msb-30tons-extra", "MSB-30tons"));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        assert!(!names_match("ABC", "XYZ"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(names_match("  MSB-30tons ", "msb-30tons"));
    }

    #[test]
    fn empty_strings_never_match() {
        assert!(!names_match("", "anything"));
        assert!(!names_match("anything", ""));
        assert!(!names_match("", ""));
        assert!(!names_match("   ", "anything"));
    }
}
