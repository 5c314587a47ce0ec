//! URL substitution over translated output.
//!
//! Learned URL mappings are applied longest-first so a specific page path
//! wins over a bare domain that would otherwise match as its substring. A
//! mapping is skipped when an already-applied URL has this mapping's source
//! as a prefix: the nested URL was superseded by the more specific match and
//! replacing it again would clobber the rewritten text. Matching is plain
//! substring containment, nothing URL-grammar-aware.

use crate::model::UrlMapping;

/// Replace every occurrence of each applicable `source_url` with its
/// `target_url`. Mappings must already be scoped to the active language
/// pair. Unmatched URLs are left untouched.
pub fn rewrite_urls(text: &str, mappings: &[UrlMapping]) -> String {
    let mut sorted: Vec<&UrlMapping> = mappings.iter().collect();
    sorted.sort_by(|a, b| b.source_url.len().cmp(&a.source_url.len()));

    let mut matched_urls: Vec<&str> = Vec::new();
    let mut output = text.to_string();

    for mapping in sorted {
        if !output.contains(&mapping.source_url) {
            continue;
        }
        if matched_urls
            .iter()
            .any(|matched| matched.starts_with(mapping.source_url.as_str()))
        {
            continue;
        }
        matched_urls.push(&mapping.source_url);
        output = output.replace(&mapping.source_url, &mapping.target_url);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(source: &str, target: &str) -> UrlMapping {
        UrlMapping::new(source.into(), target.into(), "en".into(), "fr".into())
    }

    #[test]
    fn test_replaces_known_url() {
        let mappings = [mapping("https://example.com/a", "https://example.com/b")];
        let output = rewrite_urls("Bonjour https://example.com/a", &mappings);
        assert_eq!(output, "Bonjour https://example.com/b");
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let mappings = [mapping("https://x.com/a", "https://x.com/b")];
        let output = rewrite_urls("https://x.com/a and https://x.com/a", &mappings);
        assert_eq!(output, "https://x.com/b and https://x.com/b");
    }

    #[test]
    fn test_longer_source_wins_and_prefix_is_skipped() {
        let mappings = [
            mapping("https://x.com/", "https://y.com/"),
            mapping("https://x.com/page", "https://x.com/strona"),
        ];
        let output = rewrite_urls("see https://x.com/page", &mappings);
        // Only the specific mapping applies; the bare-domain one still
        // occurs in the rewritten text but is skipped because an
        // already-matched URL starts with it
        assert_eq!(output, "see https://x.com/strona");
    }

    #[test]
    fn test_independent_urls_both_replaced() {
        let mappings = [
            mapping("https://a.com/one", "https://a.com/un"),
            mapping("https://b.com/two", "https://b.com/deux"),
        ];
        let output = rewrite_urls("https://a.com/one https://b.com/two", &mappings);
        assert_eq!(output, "https://a.com/un https://b.com/deux");
    }

    #[test]
    fn test_unmatched_urls_are_untouched() {
        let mappings = [mapping("https://x.com/a", "https://x.com/b")];
        let output = rewrite_urls("visit https://other.com/a", &mappings);
        assert_eq!(output, "visit https://other.com/a");
    }

    #[test]
    fn test_no_mappings_is_identity() {
        assert_eq!(rewrite_urls("Hello there.", &[]), "Hello there.");
    }
}
