//! Approximate matching used when no catalog field relates to the input.

use std::cmp::Ordering;

use levenshtein::levenshtein;

use crate::language::{DocumentLanguage, LanguageField};
use crate::values::Language;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;

pub trait FuzzySearchStrategy: Send + Sync {
    /// Returns the matching languages, best match first.
    fn search(&self, languages: &[DocumentLanguage], term: &Language) -> Vec<DocumentLanguage>;
}

/// Weighted edit-distance search over several catalog fields.
///
/// Each field gets a distance in `[0, 1]` (0 is a perfect match) taken from
/// the better of a whole-string comparison and the best window of the
/// field with the term's length. Fields above `threshold` are ignored; an
/// entry with no field under it is dropped. The remaining field distances
/// are combined as a weighted product so strong matches on heavy fields win.
#[derive(Debug, Clone)]
pub struct WeightedFuzzySearchStrategy {
    keys: Vec<(LanguageField, f64)>,
    threshold: f64,
}

impl WeightedFuzzySearchStrategy {
    /// Creates the strategy with name, type, alias and display name weighted
    /// 0.4, 0.3, 0.2 and 0.1.
    ///
    /// # Arguments
    ///
    /// * `threshold` - maximum accepted distance per field, clamped to `[0, 1]`
    pub fn new(threshold: f64) -> Self {
        Self {
            keys: vec![
                (LanguageField::Name, 0.4),
                (LanguageField::Type, 0.3),
                (LanguageField::Alias, 0.2),
                (LanguageField::DisplayName, 0.1),
            ],
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Threshold in effect, after clamping to `[0, 1]`.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score(&self, language: &DocumentLanguage, term: &str) -> Option<f64> {
        let total_weight: f64 = self.keys.iter().map(|(_, w)| w).sum();
        let mut score = 1.0;
        let mut matched = false;

        for (field, weight) in &self.keys {
            let Some(distance) = field_distance(term, language.field(*field)) else {
                continue;
            };
            if distance > self.threshold {
                continue;
            }
            matched = true;
            score *= distance.max(f64::EPSILON).powf(weight / total_weight);
        }

        matched.then_some(score)
    }
}

impl Default for WeightedFuzzySearchStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl FuzzySearchStrategy for WeightedFuzzySearchStrategy {
    fn search(&self, languages: &[DocumentLanguage], term: &Language) -> Vec<DocumentLanguage> {
        let term = term.to_lowercase();
        let mut scored: Vec<(f64, &DocumentLanguage)> = languages
            .iter()
            .filter_map(|language| self.score(language, &term).map(|s| (s, language)))
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        tracing::debug!(term = %term, matches = scored.len(), "fuzzy search finished");
        scored.into_iter().map(|(_, language)| language.clone()).collect()
    }
}

/// Normalised edit distance of `term` against `field`, or `None` for an empty field.
fn field_distance(term: &str, field: &str) -> Option<f64> {
    let field = field.to_lowercase();
    if field.is_empty() || term.is_empty() {
        return None;
    }

    let term_len = term.chars().count();
    let field_chars: Vec<char> = field.chars().collect();
    let whole = levenshtein(term, &field) as f64 / term_len.max(field_chars.len()) as f64;
    if field_chars.len() <= term_len {
        return Some(whole);
    }

    let best_window = field_chars
        .windows(term_len)
        .map(|window| levenshtein(term, &window.iter().collect::<String>()))
        .min()
        .unwrap_or(term_len);
    Some(whole.min(best_window as f64 / term_len as f64))
}
