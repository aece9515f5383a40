//! Flag detection with configurable thresholds

use super::lexicon::Lexicon;

pub const DEFAULT_HIGH_CONTENT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_POSITIVE_SENTIMENT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_SIGNIFICANT_CONTENT_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalDetector {
    high_content_threshold: f64,
    positive_sentiment_threshold: f64,
    significant_content_threshold: f64,
}

impl SignalDetector {
    pub fn new(
        high_content_threshold: f64,
        positive_sentiment_threshold: f64,
        significant_content_threshold: f64,
    ) -> Self {
        Self {
            high_content_threshold,
            positive_sentiment_threshold,
            significant_content_threshold,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_HIGH_CONTENT_THRESHOLD,
            DEFAULT_POSITIVE_SENTIMENT_THRESHOLD,
            DEFAULT_SIGNIFICANT_CONTENT_THRESHOLD,
        )
    }

    pub fn high_content_threshold(&self) -> f64 {
        self.high_content_threshold
    }

    /// HIGH IMPACT: content at or above the threshold AND sentiment strictly
    /// above the positive threshold.
    pub fn is_high_impact(&self, content_score: f64, sentiment: f64) -> bool {
        content_score >= self.high_content_threshold
            && sentiment > self.positive_sentiment_threshold
    }

    /// OPPORTUNITY: a seeking term in the text with neutral or negative
    /// sentiment. `lowered_text` must already be lower-cased.
    pub fn is_opportunity(&self, lowered_text: &str, sentiment: f64, lexicon: &Lexicon) -> bool {
        if sentiment > 0.0 {
            return false;
        }
        lexicon
            .seeking()
            .is_some_and(|seeking| seeking.is_match(lowered_text))
    }

    /// STRONG: content strictly above the high content threshold. Used for
    /// the per-message log line only.
    pub fn is_strong(&self, content_score: f64) -> bool {
        content_score > self.high_content_threshold
    }

    /// SIGNIFICANT: content strictly above the significance threshold.
    pub fn is_significant(&self, content_score: f64) -> bool {
        content_score > self.significant_content_threshold
    }
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_core::lexicon::Category;

    #[test]
    fn test_high_impact_thresholds_inclusive_content() {
        let detector = SignalDetector::with_defaults();

        assert!(detector.is_high_impact(0.5, 0.9));
        assert!(!detector.is_high_impact(0.49, 0.9));
    }

    #[test]
    fn test_high_impact_thresholds_exclusive_sentiment() {
        let detector = SignalDetector::with_defaults();

        assert!(!detector.is_high_impact(1.0, 0.3));
        assert!(detector.is_high_impact(1.0, 0.31));
    }

    #[test]
    fn test_opportunity_requires_non_positive_sentiment() {
        let detector = SignalDetector::with_defaults();
        let lexicon = Lexicon::default();

        assert!(detector.is_opportunity("i feel lost", -0.2, &lexicon));
        assert!(detector.is_opportunity("i feel lost", 0.0, &lexicon));
        assert!(!detector.is_opportunity("i feel lost", 0.1, &lexicon));
        assert!(!detector.is_opportunity("all good here", -0.5, &lexicon));
    }

    #[test]
    fn test_no_seeking_category_means_no_opportunity() {
        let detector = SignalDetector::with_defaults();
        let lexicon = Lexicon::new(vec![Category::new("grace", ["grace"])], None).unwrap();

        assert!(!detector.is_opportunity("lost and lonely", -1.0, &lexicon));
    }

    #[test]
    fn test_strong_is_strict() {
        let detector = SignalDetector::with_defaults();
        assert!(!detector.is_strong(0.5));
        assert!(detector.is_strong(0.625));
        // High impact stays inclusive at the same threshold
        assert!(detector.is_high_impact(0.5, 0.9));
    }

    #[test]
    fn test_significance_is_strict() {
        let detector = SignalDetector::with_defaults();

        assert!(!detector.is_significant(0.3));
        assert!(detector.is_significant(0.375));
    }
}
