//! N-gram model loading and scoring.
//!
//! Models are JSON files with unigram, bigram and trigram frequency tables,
//! prepared offline (see `scripts/generate_ngrams.py`). Scoring is pure:
//! the tables are never mutated after load.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::config::NgramConfig;

/// Model load/parse error.
#[derive(Debug)]
pub enum NgramError {
    /// File could not be read.
    Io(std::io::Error),
    /// Not valid JSON.
    Parse(String),
    /// Valid JSON but wrong shape (e.g. a bigram key that is not
    /// exactly two characters).
    Format(String),
}

impl std::fmt::Display for NgramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NgramError::Io(e) => write!(f, "model file read error: {}", e),
            NgramError::Parse(s) => write!(f, "model JSON parse error: {}", s),
            NgramError::Format(s) => write!(f, "model format error: {}", s),
        }
    }
}

impl std::error::Error for NgramError {}

impl From<std::io::Error> for NgramError {
    fn from(e: std::io::Error) -> Self {
        NgramError::Io(e)
    }
}

#[derive(Deserialize)]
struct RawModel {
    #[serde(default)]
    unigrams: HashMap<String, u64>,
    #[serde(default)]
    bigrams: HashMap<String, u64>,
    #[serde(default)]
    trigrams: HashMap<String, u64>,
}

/// Character n-gram frequency model for one language.
#[derive(Debug, Clone, Default)]
pub struct NgramModel {
    unigrams: HashMap<char, u64>,
    bigrams: HashMap<(char, char), u64>,
    trigrams: HashMap<(char, char, char), u64>,
    total_unigrams: u64,
}

impl NgramModel {
    /// Load a model from a JSON file.
    ///
    /// # File format
    /// ```json
    /// {
    ///   "unigrams": { "п": 12345, "р": 6789 },
    ///   "bigrams":  { "пр": 4567 },
    ///   "trigrams": { "при": 2345 }
    /// }
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NgramError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let raw: RawModel =
            serde_json::from_reader(reader).map_err(|e| NgramError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Load a model from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, NgramError> {
        let raw: RawModel =
            serde_json::from_str(json).map_err(|e| NgramError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawModel) -> Result<Self, NgramError> {
        let mut unigrams = HashMap::new();
        let mut total_unigrams = 0u64;
        for (key, count) in raw.unigrams {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    unigrams.insert(c, count);
                    total_unigrams += count;
                }
                _ => return Err(NgramError::Format(format!("bad unigram key: {:?}", key))),
            }
        }

        let mut bigrams = HashMap::new();
        for (key, count) in raw.bigrams {
            let mut chars = key.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(a), Some(b), None) => {
                    bigrams.insert((a, b), count);
                }
                _ => return Err(NgramError::Format(format!("bad bigram key: {:?}", key))),
            }
        }

        let mut trigrams = HashMap::new();
        for (key, count) in raw.trigrams {
            let chars: Vec<char> = key.chars().collect();
            match chars[..] {
                [a, b, c] => {
                    trigrams.insert((a, b, c), count);
                }
                _ => return Err(NgramError::Format(format!("bad trigram key: {:?}", key))),
            }
        }

        Ok(Self {
            unigrams,
            bigrams,
            trigrams,
            total_unigrams,
        })
    }

    /// Empty model. Every string scores the uniform smoothing floor, so the
    /// cascade's likelihood ratio is exactly 1.0 — useful in tests that
    /// want the statistical layers neutralised.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.unigrams.is_empty() && self.bigrams.is_empty() && self.trigrams.is_empty()
    }

    pub fn unigram_count(&self, c: char) -> u64 {
        self.unigrams.get(&c).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, a: char, b: char) -> u64 {
        self.bigrams.get(&(a, b)).copied().unwrap_or(0)
    }

    pub fn trigram_count(&self, a: char, b: char, c: char) -> u64 {
        self.trigrams.get(&(a, b, c)).copied().unwrap_or(0)
    }

    /// Average log-probability of `text` under this model.
    ///
    /// Lowercases the input, slides a window of 3 and averages the smoothed
    /// conditional log-probabilities `P(c3 | c1 c2)`. Strings shorter than
    /// the window fall back to bigram/unigram probabilities. Empty input
    /// scores `-inf`.
    pub fn score(&self, text: &str) -> f64 {
        self.score_with_config(text, &NgramConfig::default())
    }

    /// [`score`](Self::score) with explicit smoothing parameters.
    pub fn score_with_config(&self, text: &str, config: &NgramConfig) -> f64 {
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        let k = config.smoothing_k;
        let v = config.vocab_size as f64;

        match chars.len() {
            0 => f64::NEG_INFINITY,
            1 => {
                let count = self.unigram_count(chars[0]) as f64;
                let total = self.total_unigrams as f64;
                ((count + k) / (total + k * v)).ln()
            }
            2 => {
                let bigram = self.bigram_count(chars[0], chars[1]) as f64;
                let context = self.unigram_count(chars[0]) as f64;
                ((bigram + k) / (context + k * v)).ln()
            }
            _ => {
                let mut sum = 0.0;
                let mut windows = 0;
                for w in chars.windows(3) {
                    let trigram = self.trigram_count(w[0], w[1], w[2]) as f64;
                    let context = self.bigram_count(w[0], w[1]) as f64;
                    sum += ((trigram + k) / (context + k * v)).ln();
                    windows += 1;
                }
                sum / windows as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model_json() -> &'static str {
        r#"{
            "unigrams": { "п": 100, "р": 90, "и": 120, "в": 70, "е": 110, "т": 80 },
            "bigrams":  { "пр": 60, "ри": 55, "ив": 40, "ве": 45, "ет": 50 },
            "trigrams": { "при": 50, "рив": 35, "иве": 30, "вет": 40 }
        }"#
    }

    #[test]
    fn test_load_from_json() {
        let model = NgramModel::from_json(sample_model_json()).unwrap();
        assert_eq!(model.unigram_count('п'), 100);
        assert_eq!(model.unigram_count('ю'), 0);
        assert_eq!(model.bigram_count('п', 'р'), 60);
        assert_eq!(model.trigram_count('п', 'р', 'и'), 50);
        assert_eq!(model.trigram_count('а', 'б', 'в'), 0);
    }

    #[test]
    fn test_score_prefers_trained_text() {
        let model = NgramModel::from_json(sample_model_json()).unwrap();
        let known = model.score("привет");
        let garbled = model.score("ghbdtn");
        assert!(known > garbled);
        assert!(known > f64::NEG_INFINITY);
    }

    #[test]
    fn test_score_is_case_insensitive() {
        let model = NgramModel::from_json(sample_model_json()).unwrap();
        assert_eq!(model.score("Привет"), model.score("привет"));
    }

    #[test]
    fn test_short_string_fallbacks() {
        let model = NgramModel::from_json(sample_model_json()).unwrap();
        assert_eq!(model.score(""), f64::NEG_INFINITY);
        assert!(model.score("п") > f64::NEG_INFINITY);
        assert!(model.score("пр") > model.score("пю"));
    }

    #[test]
    fn test_empty_model_is_uniform() {
        let model = NgramModel::empty();
        assert!(model.is_empty());
        // Every window hits the smoothing floor k / (k * V) = 1 / V.
        let expected = (1.0 / 40.0f64).ln();
        assert!((model.score("абв") - expected).abs() < 1e-9);
        assert!((model.score("xyz") - expected).abs() < 1e-9);
    }

    #[test]
    fn test_bad_key_shapes() {
        let bad_bigram = r#"{ "unigrams": {}, "bigrams": { "абв": 5 } }"#;
        assert!(matches!(
            NgramModel::from_json(bad_bigram),
            Err(NgramError::Format(_))
        ));

        let bad_unigram = r#"{ "unigrams": { "": 5 } }"#;
        assert!(matches!(
            NgramModel::from_json(bad_unigram),
            Err(NgramError::Format(_))
        ));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            NgramModel::from_json("not json at all"),
            Err(NgramError::Parse(_))
        ));
    }
}
