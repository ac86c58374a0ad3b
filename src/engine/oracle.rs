//! External classifier adapters consulted in the ambiguous band.
//!
//! Both oracles may be backed by synchronous OS services with real latency,
//! so the cascade only queries them when the n-gram ratio is genuinely
//! ambiguous. They fail soft: `None` means "no signal", and the consuming
//! layer is skipped rather than aborting the cascade.

use crate::layout::LanguageCode;

/// Spell-checker adapter: is this token a valid word of the language?
///
/// Stateless by contract — the language is a call parameter, never shared
/// mutable oracle state.
pub trait DictionaryOracle: Send + Sync {
    fn is_valid_word(&self, word: &str, language: LanguageCode) -> Option<bool>;
}

/// Language-detection adapter: confidence in 0.0–1.0 that the text belongs
/// to the language.
pub trait LanguageIdentifier: Send + Sync {
    fn confidence(&self, text: &str, language: LanguageCode) -> Option<f64>;
}

/// Dictionary that never has a signal. Default when no spell-checker is
/// wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDictionary;

impl DictionaryOracle for NullDictionary {
    fn is_valid_word(&self, _word: &str, _language: LanguageCode) -> Option<bool> {
        None
    }
}

/// Language identifier that never has a signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLanguageIdentifier;

impl LanguageIdentifier for NullLanguageIdentifier {
    fn confidence(&self, _text: &str, _language: LanguageCode) -> Option<f64> {
        None
    }
}
