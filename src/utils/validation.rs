use validator::ValidateEmail;

pub fn is_valid_email(raw: &str) -> bool {
    raw.validate_email()
}

/// Splits free-form participant input on whitespace, commas and semicolons,
/// keeps only strings shaped like emails, and deduplicates preserving the
/// order of first appearance.
pub fn parse_participant_emails(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .map(str::trim)
        .filter(|s| !s.is_empty() && is_valid_email(s))
        .filter(|s| seen.insert(s.to_ascii_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_email_and_rejects_garbage() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not-an-email"));
    }

    #[test]
    fn splits_dedupes_and_filters() {
        let parsed =
            parse_participant_emails("a@b.co, junk;b@c.io a@b.co\nA@B.CO;c@d.org");
        assert_eq!(parsed, vec!["a@b.co", "b@c.io", "c@d.org"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_participant_emails("  , ; ").is_empty());
    }
}
