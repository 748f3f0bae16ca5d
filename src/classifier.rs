//! Asset vs. application request classification.

use regex::Regex;

/// Decides whether a request targets static content.
///
/// The pattern is searched (unanchored) in the request's original URL. A
/// missing or malformed pattern classifies everything as application
/// traffic; classification never fails a request.
#[derive(Debug, Clone, Default)]
pub struct AssetClassifier {
    pattern: Option<Regex>,
}

impl AssetClassifier {
    pub fn new(pattern: Option<&str>) -> Self {
        let pattern = pattern.and_then(|raw| match Regex::new(raw) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!("ignoring invalid asset path pattern '{raw}': {err}");
                None
            }
        });
        Self { pattern }
    }

    pub fn is_asset(&self, original_url: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|regex| regex.is_match(original_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_pattern_is_never_asset() {
        let classifier = AssetClassifier::new(None);
        assert!(!classifier.is_asset("/assets/app.css"));
        assert!(!classifier.is_asset(""));
    }

    #[test]
    fn test_matches_asset_paths() {
        let classifier = AssetClassifier::new(Some("/assets/.*"));
        assert!(classifier.is_asset("/assets/app.css"));
        assert!(classifier.is_asset("/assets/app.css?v=3"));
        assert!(!classifier.is_asset("/api/data"));
    }

    #[test]
    fn test_malformed_pattern_degrades_to_not_asset() {
        let classifier = AssetClassifier::new(Some("("));
        assert!(!classifier.is_asset("/assets/app.css"));
        assert!(!classifier.is_asset("("));
    }
}
