//! Per-language scoring facade over the two [`NgramModel`]s.

use std::path::Path;

use crate::layout::LanguageCode;

use super::config::NgramConfig;
use super::model::{NgramError, NgramModel};

/// Frequency tables shipped with the crate, built by
/// `scripts/generate_ngrams.py` from common-word frequency lists.
const EMBEDDED_RU: &str = include_str!("../../data/ngram_ru.json");
const EMBEDDED_EN: &str = include_str!("../../data/ngram_en.json");

/// Language-likelihood scorer holding one model per supported language.
#[derive(Debug, Clone)]
pub struct NgramScorer {
    ru: NgramModel,
    en: NgramModel,
    config: NgramConfig,
}

impl NgramScorer {
    pub fn new(ru: NgramModel, en: NgramModel) -> Self {
        Self::with_config(ru, en, NgramConfig::default())
    }

    pub fn with_config(ru: NgramModel, en: NgramModel, config: NgramConfig) -> Self {
        Self { ru, en, config }
    }

    /// Scorer backed by the tables embedded in the binary.
    pub fn embedded() -> Result<Self, NgramError> {
        Ok(Self::new(
            NgramModel::from_json(EMBEDDED_RU)?,
            NgramModel::from_json(EMBEDDED_EN)?,
        ))
    }

    /// Load both models from JSON files.
    pub fn load(ru_path: impl AsRef<Path>, en_path: impl AsRef<Path>) -> Result<Self, NgramError> {
        Ok(Self::new(
            NgramModel::load(ru_path)?,
            NgramModel::load(en_path)?,
        ))
    }

    /// Scorer with empty models: every ratio becomes exactly 1.0, which
    /// parks the cascade's statistical layers in their ambiguous band.
    pub fn neutral() -> Self {
        Self::new(NgramModel::empty(), NgramModel::empty())
    }

    /// Average log-probability of `text` under the model for `language`.
    pub fn score(&self, text: &str, language: LanguageCode) -> f64 {
        let model = match language {
            LanguageCode::Ru => &self.ru,
            LanguageCode::En => &self.en,
        };
        model.score_with_config(text, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_models_load() {
        let scorer = NgramScorer::embedded().unwrap();
        // Native words score above their wrong-layout garble.
        assert!(scorer.score("привет", LanguageCode::Ru) > scorer.score("ghbdtn", LanguageCode::En));
        assert!(scorer.score("hello", LanguageCode::En) > scorer.score("руддщ", LanguageCode::Ru));
    }

    #[test]
    fn test_neutral_ratio_is_one() {
        let scorer = NgramScorer::neutral();
        let a = scorer.score("слово", LanguageCode::Ru);
        let b = scorer.score("ckjdj", LanguageCode::En);
        assert!(((b - a).exp() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_language_selection() {
        let ru = NgramModel::from_json(
            r#"{ "unigrams": {"а": 10}, "bigrams": {"аб": 5}, "trigrams": {"абв": 3} }"#,
        )
        .unwrap();
        let scorer = NgramScorer::new(ru, NgramModel::empty());
        assert!(scorer.score("абв", LanguageCode::Ru) > scorer.score("абв", LanguageCode::En));
    }
}
