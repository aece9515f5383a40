//! Category lexicon used for content scoring

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("lexicon has no categories")]
    Empty,

    #[error("lexicon category `{0}` has no terms")]
    EmptyCategory(String),

    #[error("failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse lexicon: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A named group of trigger terms. Terms are lower-cased and deduplicated
/// on construction, keeping first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub terms: Vec<String>,
}

impl Category {
    pub fn new<N, I, T>(name: N, terms: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !normalized.contains(&term) {
                normalized.push(term);
            }
        }
        Self {
            name: name.into(),
            terms: normalized,
        }
    }

    /// Terms of this category found in already lower-cased text.
    pub fn matches<'a>(&'a self, lowered_text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.terms
            .iter()
            .map(String::as_str)
            .filter(move |term| lowered_text.contains(term))
    }

    pub fn is_match(&self, lowered_text: &str) -> bool {
        self.matches(lowered_text).next().is_some()
    }
}

/// On-disk shape of a lexicon file.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    categories: Vec<Category>,
    #[serde(default)]
    seeking: Option<Category>,
}

/// Immutable mapping from content category to trigger terms, plus an
/// optional seeking category that feeds opportunity detection only.
#[derive(Debug, Clone)]
pub struct Lexicon {
    categories: Vec<Category>,
    seeking: Option<Category>,
}

impl Lexicon {
    pub fn new(categories: Vec<Category>, seeking: Option<Category>) -> Result<Self, LexiconError> {
        if categories.is_empty() {
            return Err(LexiconError::Empty);
        }
        for category in categories.iter().chain(seeking.iter()) {
            if category.terms.is_empty() {
                return Err(LexiconError::EmptyCategory(category.name.clone()));
            }
        }
        Ok(Self { categories, seeking })
    }

    /// Parse a lexicon from its JSON representation.
    ///
    /// ```json
    /// {"categories": [{"name": "grace", "terms": ["grace", "mercy"]}],
    ///  "seeking": {"name": "seeking", "terms": ["lost"]}}
    /// ```
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(json)?;
        // Re-run through Category::new so file terms get the same normalization.
        let categories = file
            .categories
            .into_iter()
            .map(|c| Category::new(c.name, c.terms))
            .collect();
        let seeking = file.seeking.map(|c| Category::new(c.name, c.terms));
        Self::new(categories, seeking)
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path)?;
        let lexicon = Self::from_json(&json)?;
        log::info!(
            "📚 Loaded lexicon from {} ({} categories)",
            path.display(),
            lexicon.len()
        );
        Ok(lexicon)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn seeking(&self) -> Option<&Category> {
        self.seeking.as_ref()
    }

    /// Number of content categories (the seeking category is not counted).
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let categories = vec![
            Category::new(
                "salvation",
                ["salvation", "saved", "born again", "redeemed", "forgiven"],
            ),
            Category::new(
                "jesus",
                ["jesus", "christ", "lord", "savior", "messiah", "god"],
            ),
            Category::new(
                "faith",
                ["faith", "believe", "trust", "christian", "prayer"],
            ),
            Category::new(
                "scripture",
                ["bible", "scripture", "word", "psalm", "verse", "biblical"],
            ),
            Category::new(
                "grace",
                ["grace", "mercy", "forgiveness", "love", "blessed"],
            ),
            Category::new(
                "witness",
                ["testimony", "witness", "share", "proclaim", "preach"],
            ),
            Category::new(
                "truth",
                ["truth", "righteousness", "holy", "pure", "righteous"],
            ),
            Category::new(
                "eternity",
                ["heaven", "eternal", "soul", "spirit", "heavenly"],
            ),
        ];
        let seeking = Category::new(
            "seeking",
            [
                "what is the point",
                "feeling lost",
                "lost",
                "searching",
                "seeking",
                "need hope",
                "struggling",
                "what happens when",
                "life is hard",
                "need help",
                "depressed",
                "lonely",
                "purpose",
                "meaning",
                "why am i here",
            ],
        );
        Self {
            categories,
            seeking: Some(seeking),
        }
    }
}
