//! Banned-phrase matching.
//!
//! Matching is a lowercase substring test: `"trump"` matches `"TRUMP news"`
//! and also `"subtrumpet"`. Word boundaries are deliberately ignored.

/// Immutable, lowercase-normalized set of banned phrases
///
/// Built once at engine construction and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannedPhraseSet {
    phrases: Vec<String>,
}

impl BannedPhraseSet {
    /// Normalize and store `phrases`
    ///
    /// Blank phrases are dropped (an empty phrase would match every post) and
    /// duplicates after lowercasing are kept once, in first-seen order.
    pub fn new<S: AsRef<str>>(phrases: impl IntoIterator<Item = S>) -> Self {
        let mut normalized: Vec<String> = Vec::new();
        for phrase in phrases {
            let phrase = phrase.as_ref();
            if phrase.trim().is_empty() {
                continue;
            }
            let lowered = phrase.to_lowercase();
            if !normalized.contains(&lowered) {
                normalized.push(lowered);
            }
        }
        Self { phrases: normalized }
    }

    /// True iff some phrase occurs in `text`, ignoring case
    ///
    /// Empty text never matches.
    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// The first phrase (in construction order) found in `text`
    pub fn first_match(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        self.phrases
            .iter()
            .find(|phrase| lowered.contains(phrase.as_str()))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
