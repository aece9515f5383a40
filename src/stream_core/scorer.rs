//! Content and impact scoring for single events

use super::detector::SignalDetector;
use super::event::Event;
use super::lexicon::Lexicon;
use serde::Serialize;

/// Everything derived from one event. Produced in full before the
/// aggregator is touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub content_score: f64,
    pub impact_score: f64,
    pub is_high_impact: bool,
    pub is_opportunity: bool,
    pub is_significant: bool,
    pub matched_terms: Vec<String>,
}

/// Scores events against a fixed lexicon and detector configuration.
#[derive(Debug, Clone)]
pub struct EventScorer {
    lexicon: Lexicon,
    detector: SignalDetector,
}

impl EventScorer {
    pub fn new(lexicon: Lexicon, detector: SignalDetector) -> Self {
        Self { lexicon, detector }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn detector(&self) -> &SignalDetector {
        &self.detector
    }

    pub fn score(&self, event: &Event) -> ScoreResult {
        score(event, &self.lexicon, &self.detector)
    }
}

/// Score one event.
///
/// # Rules
/// - **content**: distinct matching categories / total categories
/// - **impact**: content weighted by positive sentiment only
/// - flags come from [`SignalDetector`]
pub fn score(event: &Event, lexicon: &Lexicon, detector: &SignalDetector) -> ScoreResult {
    let lowered = event.text.to_lowercase();
    let (content_score, matched_terms) = compute_content_score(&lowered, lexicon);
    let impact_score = compute_impact_score(content_score, event.positive_sentiment());

    ScoreResult {
        content_score,
        impact_score,
        is_high_impact: detector.is_high_impact(content_score, event.sentiment),
        is_opportunity: detector.is_opportunity(&lowered, event.sentiment, lexicon),
        is_significant: detector.is_significant(content_score),
        matched_terms,
    }
}

/// Fraction of lexicon categories with at least one term present in
/// `lowered_text`, along with every matching term in category order.
pub fn compute_content_score(lowered_text: &str, lexicon: &Lexicon) -> (f64, Vec<String>) {
    if lowered_text.is_empty() || lexicon.is_empty() {
        return (0.0, Vec::new());
    }

    let mut matched_categories = 0usize;
    let mut matched_terms = Vec::new();

    for category in lexicon.categories() {
        let before = matched_terms.len();
        matched_terms.extend(category.matches(lowered_text).map(str::to_string));
        if matched_terms.len() > before {
            matched_categories += 1;
        }
    }

    let score = matched_categories as f64 / lexicon.len() as f64;
    (score.clamp(0.0, 1.0), matched_terms)
}

/// `positive_sentiment` is expected to be non-negative, see
/// [`Event::positive_sentiment`].
pub fn compute_impact_score(content_score: f64, positive_sentiment: f64) -> f64 {
    (content_score * positive_sentiment).clamp(0.0, 1.0)
}
