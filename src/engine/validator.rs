//! The cascade orchestrator.

use std::cell::OnceCell;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::detection::patterns;
use crate::detection::Word;
use crate::layout::{convert, KeyboardLayout};
use crate::ngram::NgramScorer;
use crate::store::UserStores;

use super::oracle::{DictionaryOracle, LanguageIdentifier, NullDictionary, NullLanguageIdentifier};

/// Which cascade layer produced the decision. Diagnostic metadata with a
/// fixed string vocabulary; it never affects behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    SensitivePattern,
    FileExtension,
    CliCommand,
    ShortBrand,
    /// Carries the reconstructed buzzword, e.g. `mixed_buzzword:c++`.
    MixedBuzzword(String),
    SingleLetterWhitelist,
    SingleLetterWithContext,
    TooShort,
    StartsWithSoftSign,
    TechBuzzword,
    CommonShortWord,
    ForcedConversion,
    UserException,
    SwappedIsBuzzword,
    NgramPrimary,
    ContextBias,
    NgramConfidentKeep,
    DictionaryTiebreaker,
    LanguageIdentifier,
    LayoutBiasFallback,
    NoConfidentSignal,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::SensitivePattern => write!(f, "sensitive_pattern"),
            Reason::FileExtension => write!(f, "file_extension"),
            Reason::CliCommand => write!(f, "cli_command"),
            Reason::ShortBrand => write!(f, "short_brand"),
            Reason::MixedBuzzword(w) => write!(f, "mixed_buzzword:{}", w),
            Reason::SingleLetterWhitelist => write!(f, "single_letter_whitelist"),
            Reason::SingleLetterWithContext => write!(f, "single_letter_with_context"),
            Reason::TooShort => write!(f, "too_short"),
            Reason::StartsWithSoftSign => write!(f, "starts_with_soft_sign"),
            Reason::TechBuzzword => write!(f, "tech_buzzword"),
            Reason::CommonShortWord => write!(f, "common_short_word"),
            Reason::ForcedConversion => write!(f, "forced_conversion"),
            Reason::UserException => write!(f, "user_exception"),
            Reason::SwappedIsBuzzword => write!(f, "swapped_is_buzzword"),
            Reason::NgramPrimary => write!(f, "ngram_primary"),
            Reason::ContextBias => write!(f, "context_bias"),
            Reason::NgramConfidentKeep => write!(f, "ngram_confident_keep"),
            Reason::DictionaryTiebreaker => write!(f, "dictionary_tiebreaker"),
            Reason::LanguageIdentifier => write!(f, "language_identifier"),
            Reason::LayoutBiasFallback => write!(f, "layout_bias_fallback"),
            Reason::NoConfidentSignal => write!(f, "no_confident_signal"),
        }
    }
}

/// Final verdict for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Leave the word as typed.
    Keep { reason: Reason },
    /// The word was typed in the wrong layout; `converted` is the text the
    /// user actually meant.
    Switch {
        target: KeyboardLayout,
        converted: String,
        reason: Reason,
    },
}

impl ValidationResult {
    pub fn is_switch(&self) -> bool {
        matches!(self, ValidationResult::Switch { .. })
    }

    pub fn reason(&self) -> &Reason {
        match self {
            ValidationResult::Keep { reason } => reason,
            ValidationResult::Switch { reason, .. } => reason,
        }
    }

    pub fn converted(&self) -> Option<&str> {
        match self {
            ValidationResult::Keep { .. } => None,
            ValidationResult::Switch { converted, .. } => Some(converted),
        }
    }
}

/// Per-call state shared by the layers. The statistical quantities are
/// computed lazily so the cheap guards never pay for scoring.
pub(super) struct WordContext {
    pub(super) word: Word,
    pub(super) current: KeyboardLayout,
    pub(super) opposite: KeyboardLayout,
    pub(super) bias: Option<KeyboardLayout>,
    swapped: OnceCell<String>,
    ratio: OnceCell<f64>,
}

impl WordContext {
    pub(super) fn new(word: &str, current: KeyboardLayout, bias: Option<KeyboardLayout>) -> Self {
        Self {
            word: Word::new(word),
            current,
            opposite: current.opposite(),
            bias,
            swapped: OnceCell::new(),
            ratio: OnceCell::new(),
        }
    }

    /// Full opposite-layout remap, symbols included.
    pub(super) fn swapped(&self) -> &str {
        self.swapped
            .get_or_init(|| convert(self.word.raw(), self.current, self.opposite, true))
    }

    /// `exp(score(swapped, opposite) - score(word, current))` — how many
    /// times more likely the swapped form is under its language model.
    pub(super) fn ratio(&self, scorer: &NgramScorer) -> f64 {
        *self.ratio.get_or_init(|| {
            let original = scorer.score(self.word.raw(), self.current.language_code());
            let swapped = scorer.score(self.swapped(), self.opposite.language_code());
            (swapped - original).exp()
        })
    }

    pub(super) fn scores(&self, scorer: &NgramScorer) -> (f64, f64) {
        (
            scorer.score(self.word.raw(), self.current.language_code()),
            scorer.score(self.swapped(), self.opposite.language_code()),
        )
    }
}

type Layer = fn(&ValidationEngine, &WordContext) -> Option<ValidationResult>;

/// The cascade, in priority order. Order is load-bearing: re-ordering
/// changes observable behavior.
pub(super) const LAYERS: &[(&str, Layer)] = &[
    ("sensitive_pattern", ValidationEngine::layer_sensitive),
    ("file_extension", ValidationEngine::layer_file_extension),
    ("cli_command", ValidationEngine::layer_cli_command),
    ("short_brand", ValidationEngine::layer_short_brand),
    ("mixed_buzzword", ValidationEngine::layer_mixed_buzzword),
    ("single_letter", ValidationEngine::layer_single_letter),
    ("min_length", ValidationEngine::layer_min_length),
    ("soft_sign", ValidationEngine::layer_soft_sign),
    ("tech_buzzword", ValidationEngine::layer_tech_buzzword),
    ("common_short_word", ValidationEngine::layer_common_short_word),
    ("forced_conversion", ValidationEngine::layer_forced_conversion),
    ("user_exception", ValidationEngine::layer_user_exception),
    ("swapped_is_buzzword", ValidationEngine::layer_swapped_is_buzzword),
    ("ngram_primary", ValidationEngine::layer_ngram_primary),
    ("context_bias", ValidationEngine::layer_context_bias),
    ("ngram_confident_keep", ValidationEngine::layer_ngram_confident_keep),
    ("dictionary_tiebreaker", ValidationEngine::layer_dictionary_tiebreaker),
    ("language_identifier", ValidationEngine::layer_language_identifier),
    ("layout_bias_fallback", ValidationEngine::layer_layout_bias_fallback),
    ("default", ValidationEngine::layer_default),
];

/// The cascade orchestrator. Stateless per call apart from read access to
/// the injected user stores; safe to share across threads.
pub struct ValidationEngine {
    scorer: NgramScorer,
    stores: Arc<UserStores>,
    dictionary: Box<dyn DictionaryOracle>,
    language_id: Box<dyn LanguageIdentifier>,
    config: EngineConfig,
}

impl ValidationEngine {
    /// Engine with null oracles and default configuration.
    pub fn new(scorer: NgramScorer, stores: Arc<UserStores>) -> Self {
        Self {
            scorer,
            stores,
            dictionary: Box::new(NullDictionary),
            language_id: Box::new(NullLanguageIdentifier),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Box<dyn DictionaryOracle>) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn with_language_identifier(mut self, language_id: Box<dyn LanguageIdentifier>) -> Self {
        self.language_id = language_id;
        self
    }

    pub(super) fn scorer(&self) -> &NgramScorer {
        &self.scorer
    }

    /// Decide whether `word` was typed in the wrong layout.
    ///
    /// `current` is the layout the user believes is active; `bias` is the
    /// layout most recently and deliberately switched to, if any.
    pub fn validate(
        &self,
        word: &str,
        current: KeyboardLayout,
        bias: Option<KeyboardLayout>,
    ) -> ValidationResult {
        let ctx = WordContext::new(word, current, bias);
        for &(name, layer) in LAYERS {
            if let Some(result) = layer(self, &ctx) {
                log::debug!("{:?} [{}]: {} -> {}", word, current, name, result.reason());
                return result;
            }
        }
        // The default layer always answers; this is unreachable.
        ValidationResult::Keep {
            reason: Reason::NoConfidentSignal,
        }
    }

    /// Cheap pre-filter for callers: worth running the full cascade?
    pub fn should_analyze(&self, word: &str) -> bool {
        let word = Word::new(word);
        word.char_count() >= self.config.min_word_length
            && word.has_letters()
            && !self.stores.is_exception(word.lower())
    }

    /// True when the first whitespace-delimited token is a known shell
    /// command. Exposed so the caller can enter its own command mode.
    pub fn is_cli_command(&self, text: &str) -> bool {
        patterns::is_cli_command(text)
    }

    fn is_buzzword(&self, word: &str) -> bool {
        patterns::is_builtin_buzzword(word) || self.stores.is_buzzword(word)
    }

    // --- cascade layers, in priority order ---

    fn layer_sensitive(&self, ctx: &WordContext) -> Option<ValidationResult> {
        patterns::is_sensitive(ctx.word.raw()).then(|| ValidationResult::Keep {
            reason: Reason::SensitivePattern,
        })
    }

    fn layer_file_extension(&self, ctx: &WordContext) -> Option<ValidationResult> {
        patterns::has_file_extension(ctx.word.raw()).then(|| ValidationResult::Keep {
            reason: Reason::FileExtension,
        })
    }

    fn layer_cli_command(&self, ctx: &WordContext) -> Option<ValidationResult> {
        patterns::is_cli_command(ctx.word.raw()).then(|| ValidationResult::Keep {
            reason: Reason::CliCommand,
        })
    }

    fn layer_short_brand(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let word = &ctx.word;
        (word.char_count() <= 4
            && word.is_all_uppercase()
            && word.raw().chars().all(|c| c.is_alphanumeric())
            && patterns::is_short_brand(word.raw()))
        .then(|| ValidationResult::Keep {
            reason: Reason::ShortBrand,
        })
    }

    /// Short tokens like `c++` / `с#` typed half in the wrong layout: keep
    /// known buzzwords, and remap just the letters when the reconstruction
    /// is itself a known buzzword.
    fn layer_mixed_buzzword(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let word = &ctx.word;
        if word.char_count() > 3 || !word.has_symbols() {
            return None;
        }
        if !word.raw().contains(['#', '+']) {
            return None;
        }
        if self.is_buzzword(word.lower()) {
            return Some(ValidationResult::Keep {
                reason: Reason::TechBuzzword,
            });
        }
        // Letters-only remap keeps the original symbols in place.
        let reconstructed = convert(word.raw(), ctx.current, ctx.opposite, false);
        let lower = reconstructed.to_lowercase();
        self.is_buzzword(&lower).then(|| ValidationResult::Switch {
            target: ctx.opposite,
            converted: reconstructed,
            reason: Reason::MixedBuzzword(lower.clone()),
        })
    }

    fn layer_single_letter(&self, ctx: &WordContext) -> Option<ValidationResult> {
        if ctx.word.char_count() != 1 {
            return None;
        }
        let c = ctx.word.first_char()?;
        let (target, replacement) = patterns::single_letter_conversion(c)?;
        if target != ctx.opposite {
            return None; // table entry points the other way
        }

        if ctx.bias == Some(target) {
            return Some(ValidationResult::Switch {
                target,
                converted: replacement.to_string(),
                reason: Reason::SingleLetterWithContext,
            });
        }
        if ctx.bias == Some(ctx.current) {
            return Some(ValidationResult::Keep {
                reason: Reason::SingleLetterWithContext,
            });
        }
        let lower = c.to_lowercase().next().unwrap_or(c);
        if patterns::is_single_letter_buzzword(lower) || self.stores.is_buzzword(ctx.word.lower()) {
            return Some(ValidationResult::Keep {
                reason: Reason::TechBuzzword,
            });
        }
        Some(ValidationResult::Switch {
            target,
            converted: replacement.to_string(),
            reason: Reason::SingleLetterWhitelist,
        })
    }

    fn layer_min_length(&self, ctx: &WordContext) -> Option<ValidationResult> {
        (ctx.word.char_count() < self.config.min_word_length).then(|| ValidationResult::Keep {
            reason: Reason::TooShort,
        })
    }

    /// No Russian word starts with ь/ъ, so a word-initial one under the
    /// Cyrillic layout is English with certainty.
    fn layer_soft_sign(&self, ctx: &WordContext) -> Option<ValidationResult> {
        if ctx.current != KeyboardLayout::Cyrillic {
            return None;
        }
        let first = ctx.word.first_char()?;
        patterns::is_forbidden_initial(first).then(|| ValidationResult::Switch {
            target: ctx.opposite,
            converted: convert(ctx.word.raw(), ctx.current, ctx.opposite, false),
            reason: Reason::StartsWithSoftSign,
        })
    }

    fn layer_tech_buzzword(&self, ctx: &WordContext) -> Option<ValidationResult> {
        self.is_buzzword(ctx.word.lower())
            .then(|| ValidationResult::Keep {
                reason: Reason::TechBuzzword,
            })
    }

    fn layer_common_short_word(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let word = &ctx.word;
        if word.char_count() > 3 {
            return None;
        }
        if patterns::is_common_short_word(word.lower(), ctx.current) {
            return Some(ValidationResult::Keep {
                reason: Reason::CommonShortWord,
            });
        }
        let converted = convert(word.raw(), ctx.current, ctx.opposite, false);
        patterns::is_common_short_word(&converted.to_lowercase(), ctx.opposite).then(|| {
            ValidationResult::Switch {
                target: ctx.opposite,
                converted,
                reason: Reason::CommonShortWord,
            }
        })
    }

    fn layer_forced_conversion(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let replacement = self.stores.forced_conversion(ctx.word.lower())?;
        Some(ValidationResult::Switch {
            target: ctx.opposite,
            converted: replacement,
            reason: Reason::ForcedConversion,
        })
    }

    fn layer_user_exception(&self, ctx: &WordContext) -> Option<ValidationResult> {
        self.stores
            .is_exception(ctx.word.lower())
            .then(|| ValidationResult::Keep {
                reason: Reason::UserException,
            })
    }

    /// A correctly-known term typed on the wrong layout looks like garbage
    /// until swapped — e.g. `фзш` is `api`.
    fn layer_swapped_is_buzzword(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let swapped = ctx.swapped();
        self.is_buzzword(&swapped.to_lowercase())
            .then(|| ValidationResult::Switch {
                target: ctx.opposite,
                converted: swapped.to_string(),
                reason: Reason::SwappedIsBuzzword,
            })
    }

    fn layer_ngram_primary(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let ratio = ctx.ratio(&self.scorer);
        let threshold = self.config.ngram_ratio_threshold(ctx.word.char_count());
        (ratio > threshold).then(|| ValidationResult::Switch {
            target: ctx.opposite,
            converted: ctx.swapped().to_string(),
            reason: Reason::NgramPrimary,
        })
    }

    /// A recent deliberate layout switch outweighs marginal statistics for
    /// short ambiguous tokens.
    fn layer_context_bias(&self, ctx: &WordContext) -> Option<ValidationResult> {
        (ctx.bias == Some(ctx.opposite)
            && ctx.word.char_count() <= self.config.context_bias_max_length
            && ctx.ratio(&self.scorer) > self.config.context_bias_min_ratio)
            .then(|| ValidationResult::Switch {
                target: ctx.opposite,
                converted: ctx.swapped().to_string(),
                reason: Reason::ContextBias,
            })
    }

    fn layer_ngram_confident_keep(&self, ctx: &WordContext) -> Option<ValidationResult> {
        (ctx.ratio(&self.scorer) < self.config.confident_keep_ratio).then(|| {
            ValidationResult::Keep {
                reason: Reason::NgramConfidentKeep,
            }
        })
    }

    /// Reached only in the genuinely ambiguous band. Acts only when both
    /// oracle queries answered; anything less is "no signal".
    fn layer_dictionary_tiebreaker(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let original = self
            .dictionary
            .is_valid_word(ctx.word.lower(), ctx.current.language_code())?;
        let swapped_lower = ctx.swapped().to_lowercase();
        let swapped = self
            .dictionary
            .is_valid_word(&swapped_lower, ctx.opposite.language_code())?;

        match (original, swapped) {
            (false, true) => Some(ValidationResult::Switch {
                target: ctx.opposite,
                converted: ctx.swapped().to_string(),
                reason: Reason::DictionaryTiebreaker,
            }),
            (true, false) => Some(ValidationResult::Keep {
                reason: Reason::DictionaryTiebreaker,
            }),
            _ => None, // both or neither valid: no tiebreak
        }
    }

    fn layer_language_identifier(&self, ctx: &WordContext) -> Option<ValidationResult> {
        let original = self
            .language_id
            .confidence(ctx.word.raw(), ctx.current.language_code())?;
        let swapped = self
            .language_id
            .confidence(ctx.swapped(), ctx.opposite.language_code())?;
        let threshold = self.config.language_id_threshold(ctx.word.char_count());

        (swapped - original > threshold).then(|| ValidationResult::Switch {
            target: ctx.opposite,
            converted: ctx.swapped().to_string(),
            reason: Reason::LanguageIdentifier,
        })
    }

    fn layer_layout_bias_fallback(&self, ctx: &WordContext) -> Option<ValidationResult> {
        (ctx.bias == Some(ctx.opposite)).then(|| ValidationResult::Switch {
            target: ctx.opposite,
            converted: ctx.swapped().to_string(),
            reason: Reason::LayoutBiasFallback,
        })
    }

    fn layer_default(&self, _ctx: &WordContext) -> Option<ValidationResult> {
        Some(ValidationResult::Keep {
            reason: Reason::NoConfidentSignal,
        })
    }
}
