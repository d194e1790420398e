use crate::config::ClassifierConfig;
use crate::engine::TokenCandidate;
use std::collections::BTreeSet;

/// Reduce a detection to an uppercase A-Z token, or drop it.
///
/// A candidate survives when its trimmed text has at least
/// `min_token_len` characters, its confidence is strictly above
/// `min_confidence`, and at least `min_token_len` letters remain once
/// everything outside A-Z is stripped from the uppercased text.
pub fn clean_token(candidate: &TokenCandidate, config: &ClassifierConfig) -> Option<String> {
    let trimmed = candidate.text().trim();
    if trimmed.chars().count() < config.min_token_len {
        return None;
    }
    if candidate.confidence() <= config.min_confidence {
        return None;
    }

    let cleaned: String = trimmed
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase())
        .collect();

    (cleaned.len() >= config.min_token_len).then_some(cleaned)
}

/// Clean every candidate and collapse duplicates
pub fn filter_tokens<'a, I>(candidates: I, config: &ClassifierConfig) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a TokenCandidate>,
{
    candidates
        .into_iter()
        .filter_map(|c| clean_token(c, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str, confidence: u8) -> Option<String> {
        clean_token(
            &TokenCandidate::new(text, confidence),
            &ClassifierConfig::default(),
        )
    }

    #[test]
    fn test_keeps_confident_word() {
        assert_eq!(clean("Aspirin", 90), Some("ASPIRIN".to_string()));
    }

    #[test]
    fn test_drops_low_confidence() {
        assert_eq!(clean("ASPIRIN", 60), None);
        assert_eq!(clean("ASPIRIN", 61), Some("ASPIRIN".to_string()));
    }

    #[test]
    fn test_drops_short_trimmed_text() {
        assert_eq!(clean("  abc  ", 99), None);
    }

    #[test]
    fn test_dosage_collapses_below_min_length() {
        // "25MG" passes the raw length check but only "MG" survives cleaning
        assert_eq!(clean("25MG", 80), None);
    }

    #[test]
    fn test_strips_punctuation_and_digits() {
        assert_eq!(clean("Ibu-profen200", 75), Some("IBUPROFEN".to_string()));
    }

    #[test]
    fn test_non_latin_letters_are_removed() {
        assert_eq!(clean("Café", 90), None);
        assert_eq!(clean("Paracétamol", 90), Some("PARACTAMOL".to_string()));
    }

    #[test]
    fn test_filter_deduplicates() {
        let candidates = vec![
            TokenCandidate::new("ASPIRIN", 90),
            TokenCandidate::new("aspirin", 88),
            TokenCandidate::new("Aspirin.", 70),
            TokenCandidate::new("tablets", 40),
        ];
        let tokens = filter_tokens(&candidates, &ClassifierConfig::default());
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains("ASPIRIN"));
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ClassifierConfig {
            min_confidence: 30,
            min_token_len: 3,
            ..Default::default()
        };
        let candidates = [TokenCandidate::new("tab", 31)];
        let tokens = filter_tokens(&candidates, &config);
        assert!(tokens.contains("TAB"));
    }
}
