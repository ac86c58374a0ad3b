//! Character n-gram language models.
//!
//! Each supported language carries a statistical model of character
//! trigram frequencies prepared offline from corpora. At runtime the model
//! answers one question: how plausible is this string as text of the target
//! language? The score is a smoothed average log-probability, so
//! `exp(score_b - score_a)` is a per-character likelihood ratio — the
//! primary decision statistic of the validation cascade.
//!
//! # Usage
//!
//! ```no_run
//! use relayout::layout::LanguageCode;
//! use relayout::ngram::NgramScorer;
//!
//! let scorer = NgramScorer::embedded().unwrap();
//! let ru = scorer.score("привет", LanguageCode::Ru);
//! let en = scorer.score("ghbdtn", LanguageCode::En);
//! assert!(ru > en);
//! ```

mod config;
mod model;
mod scorer;

pub use config::NgramConfig;
pub use model::{NgramError, NgramModel};
pub use scorer::NgramScorer;
