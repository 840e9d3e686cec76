//! Prompt classification: decides which provider class answers a prompt.
//!
//! Pure and total: no I/O, no side effects, and every input maps to a route
//! (the default branch always applies).

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;

/// The binary routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Text,
    Image,
}

/// Caller-supplied routing hint; `auto` defers to keyword inference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeHint {
    #[default]
    Auto,
    Text,
    Image,
}

/// Keyword-driven prompt classifier.
///
/// Keywords are injected at construction (see [`ClassifierConfig`]), stored
/// lowercase, and matched case-insensitively at word boundaries: "image"
/// matches in "an image of a cat" but not in "imagery". Single-word keywords
/// go through a hash set per prompt token; keywords containing whitespace or
/// punctuation ("ultra hd", "c++") fall back to a boundary-checked substring
/// scan.
#[derive(Debug, Clone)]
pub struct PromptClassifier {
    image_words: AHashSet<String>,
    image_phrases: Vec<String>,
    code_words: AHashSet<String>,
    code_phrases: Vec<String>,
}

impl PromptClassifier {
    pub fn new(cfg: &ClassifierConfig) -> Self {
        let (image_words, image_phrases) = split_keywords(&cfg.image_keywords);
        let (code_words, code_phrases) = split_keywords(&cfg.code_keywords);
        Self {
            image_words,
            image_phrases,
            code_words,
            code_phrases,
        }
    }

    /// Maps (prompt, hint) to a route. First matching rule wins:
    /// explicit hint, code-indicator override, image-indicator, text default.
    pub fn classify(&self, prompt: &str, hint: ModeHint) -> Route {
        match hint {
            ModeHint::Text => return Route::Text,
            ModeHint::Image => return Route::Image,
            ModeHint::Auto => {}
        }

        let lowered = prompt.to_lowercase();
        // Code indicators beat image indicators: "explain this function that
        // renders an image" stays on the text route.
        if self.matches(&lowered, &self.code_words, &self.code_phrases) {
            return Route::Text;
        }
        if self.matches(&lowered, &self.image_words, &self.image_phrases) {
            return Route::Image;
        }
        Route::Text
    }

    fn matches(&self, lowered: &str, words: &AHashSet<String>, phrases: &[String]) -> bool {
        let word_hit = lowered
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| !token.is_empty() && words.contains(token));

        word_hit || phrases.iter().any(|p| contains_word(lowered, p))
    }
}

/// Partitions configured keywords into single alphanumeric words (hash set
/// lookup) and everything else (boundary-checked scan).
fn split_keywords(keywords: &[String]) -> (AHashSet<String>, Vec<String>) {
    let mut words = AHashSet::new();
    let mut phrases = Vec::new();
    for keyword in keywords {
        let lowered = keyword.to_lowercase();
        if lowered.is_empty() {
            continue;
        }
        if lowered.chars().all(char::is_alphanumeric) {
            words.insert(lowered);
        } else {
            phrases.push(lowered);
        }
    }
    (words, phrases)
}

/// Substring match that only counts when the needle is not embedded inside a
/// longer alphanumeric word on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[start + matched.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PromptClassifier {
        PromptClassifier::new(&ClassifierConfig::default())
    }

    #[test]
    fn image_keyword_routes_to_image() {
        assert_eq!(classifier().classify("draw a cat", ModeHint::Auto), Route::Image);
    }

    #[test]
    fn code_indicator_beats_image_indicator() {
        assert_eq!(
            classifier().classify(
                "explain this function that renders an image",
                ModeHint::Auto
            ),
            Route::Text
        );
    }

    #[test]
    fn defaults_to_text_without_keywords() {
        assert_eq!(classifier().classify("hello there", ModeHint::Auto), Route::Text);
    }

    #[test]
    fn explicit_hint_overrides_keywords() {
        let c = classifier();
        assert_eq!(c.classify("write some rust code", ModeHint::Image), Route::Image);
        assert_eq!(c.classify("draw a cat", ModeHint::Text), Route::Text);
    }

    #[test]
    fn keywords_only_match_at_word_boundaries() {
        let c = classifier();
        // "imagery" embeds "image" but is not the keyword.
        assert_eq!(c.classify("discuss the imagery in this poem", ModeHint::Auto), Route::Text);
        assert_eq!(c.classify("an IMAGE of a cat, please", ModeHint::Auto), Route::Image);
    }

    #[test]
    fn multi_word_keywords_match() {
        assert_eq!(
            classifier().classify("make it ultra hd quality", ModeHint::Auto),
            Route::Image
        );
    }

    #[test]
    fn keyword_sets_are_injected_configuration() {
        let cfg = ClassifierConfig {
            image_keywords: vec!["frobnicate".to_string()],
            code_keywords: vec!["quux".to_string()],
        };
        let c = PromptClassifier::new(&cfg);
        assert_eq!(c.classify("frobnicate the logo", ModeHint::Auto), Route::Image);
        assert_eq!(c.classify("quux frobnicate", ModeHint::Auto), Route::Text);
        // Stock keywords are gone once overridden.
        assert_eq!(c.classify("draw a cat", ModeHint::Auto), Route::Text);
    }
}
