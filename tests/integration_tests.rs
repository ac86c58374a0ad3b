//! End-to-end tests against the public crate surface: the key map, the
//! embedded n-gram tables and the full validation cascade.

use std::sync::Arc;

use relayout::engine::{
    DictionaryOracle, LanguageIdentifier, Reason, ValidationEngine, ValidationResult,
};
use relayout::layout::{convert, KeyboardLayout, LanguageCode};
use relayout::ngram::NgramScorer;
use relayout::store::UserStores;

use KeyboardLayout::{Cyrillic, Latin};

fn engine_with_embedded_tables() -> ValidationEngine {
    ValidationEngine::new(
        NgramScorer::embedded().expect("embedded tables"),
        Arc::new(UserStores::in_memory()),
    )
}

fn engine_with_neutral_tables() -> ValidationEngine {
    ValidationEngine::new(NgramScorer::neutral(), Arc::new(UserStores::in_memory()))
}

// --- key map ---

#[test]
fn conversion_is_reversible() {
    for text in ["ghbdtn", "hello", "Ghbdtn123", "пример"] {
        for from in [Cyrillic, Latin] {
            let to = from.opposite();
            let there = convert(text, from, to, true);
            let back = convert(&there, to, from, true);
            assert_eq!(back, text, "round trip must restore {:?}", text);
        }
    }
}

#[test]
fn conversion_preserves_length_and_unmapped_chars() {
    let input = "ghbdtn, vbh! 123";
    let output = convert(input, Latin, Cyrillic, true);
    assert_eq!(input.chars().count(), output.chars().count());
    // digits have no layout mapping
    assert!(output.ends_with("123"));
}

#[test]
fn conversion_maps_known_pairs() {
    assert_eq!(convert("ghbdtn", Latin, Cyrillic, true), "привет");
    assert_eq!(convert("руддщ", Cyrillic, Latin, true), "hello");
    assert_eq!(convert("Ghbdtn", Latin, Cyrillic, true), "Привет");
}

#[test]
fn same_layout_conversion_is_identity() {
    assert_eq!(convert("anything", Latin, Latin, true), "anything");
}

// --- deterministic guards ---

#[test]
fn sensitive_identifiers_survive_any_layout_and_bias() {
    let engine = engine_with_embedded_tables();
    for word in [
        "550e8400-e29b-41d4-a716-446655440000",
        "d41d8cd98f00b204e9800998ecf8427e",
        "v2.0.1",
        "arn:aws:s3:::my-bucket/key",
    ] {
        for layout in [Cyrillic, Latin] {
            for bias in [None, Some(Cyrillic), Some(Latin)] {
                let result = engine.validate(word, layout, bias);
                assert!(
                    !result.is_switch(),
                    "{:?} must never be converted ({:?})",
                    word,
                    result
                );
            }
        }
    }
}

#[test]
fn filenames_and_shell_commands_are_kept() {
    let engine = engine_with_embedded_tables();
    assert_eq!(
        engine.validate("config.toml", Latin, None).reason(),
        &Reason::FileExtension
    );
    assert_eq!(
        engine.validate("kubectl", Latin, None).reason(),
        &Reason::CliCommand
    );
    assert!(engine.is_cli_command("git push origin main"));
    assert!(!engine.is_cli_command("привет мир"));
}

#[test]
fn short_brand_is_kept_under_both_layouts() {
    let engine = engine_with_embedded_tables();
    for layout in [Cyrillic, Latin] {
        let result = engine.validate("API", layout, None);
        assert_eq!(result.reason(), &Reason::ShortBrand);
    }
}

#[test]
fn buzzwords_are_layout_invariant() {
    let engine = engine_with_embedded_tables();
    for word in ["rust", "docker", "json", "kubernetes"] {
        for layout in [Cyrillic, Latin] {
            assert!(
                !engine.validate(word, layout, None).is_switch(),
                "{} stays as typed",
                word
            );
        }
    }
}

#[test]
fn wrong_layout_buzzword_is_reconstructed() {
    let engine = engine_with_embedded_tables();
    // "api" typed with the Cyrillic layout active
    let result = engine.validate("фзш", Cyrillic, None);
    match result {
        ValidationResult::Switch {
            target,
            converted,
            reason,
        } => {
            assert_eq!(target, Latin);
            assert_eq!(converted, "api");
            assert_eq!(reason, Reason::SwappedIsBuzzword);
        }
        other => panic!("expected switch, got {:?}", other),
    }
}

// --- single letters and short words ---

#[test]
fn cyrillic_sha_becomes_english_pronoun() {
    let engine = engine_with_embedded_tables();
    let result = engine.validate("ш", Cyrillic, None);
    assert_eq!(
        result,
        ValidationResult::Switch {
            target: Latin,
            converted: "I".to_string(),
            reason: Reason::SingleLetterWhitelist,
        }
    );
}

#[test]
fn unlisted_single_characters_are_too_short() {
    let engine = engine_with_embedded_tables();
    for word in ["q", "я", "7"] {
        assert_eq!(
            engine.validate(word, Latin, None).reason(),
            &Reason::TooShort
        );
    }
}

#[test]
fn soft_sign_start_forces_a_switch() {
    let engine = engine_with_embedded_tables();
    let result = engine.validate("ьфшд", Cyrillic, None);
    assert_eq!(result.converted(), Some("mail"));
    assert_eq!(result.reason(), &Reason::StartsWithSoftSign);
}

// --- user stores ---

#[test]
fn forced_conversion_wins_over_statistics() {
    let stores = Arc::new(UserStores::in_memory());
    stores.add_forced("ntcn", "тест").unwrap();
    let engine = ValidationEngine::new(NgramScorer::neutral(), stores);

    let result = engine.validate("ntcn", Latin, None);
    assert_eq!(result.reason(), &Reason::ForcedConversion);
    assert_eq!(result.converted(), Some("тест"));
}

#[test]
fn user_exception_blocks_a_confident_switch() {
    let stores = Arc::new(UserStores::in_memory());
    stores.add_exception("ghbdtn").unwrap();
    let engine = ValidationEngine::new(NgramScorer::embedded().unwrap(), stores);

    assert_eq!(
        engine.validate("ghbdtn", Latin, None).reason(),
        &Reason::UserException
    );
}

#[test]
fn user_stores_persist_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let stores = UserStores::load(dir.path());
        stores.add_exception("ghbdtn").unwrap();
        stores.add_buzzword("фреймворк").unwrap();
        stores.add_forced("ntcn", "тест").unwrap();
    }
    let stores = UserStores::load(dir.path());
    assert!(stores.is_exception("ghbdtn"));
    assert!(stores.is_buzzword("фреймворк"));
    assert_eq!(stores.forced_conversion("ntcn").as_deref(), Some("тест"));
}

// --- statistical layers with the shipped tables ---

#[test]
fn wrong_layout_russian_word_is_switched() {
    let engine = engine_with_embedded_tables();
    let result = engine.validate("ghbdtn", Latin, None);
    match result {
        ValidationResult::Switch {
            target,
            converted,
            reason,
        } => {
            assert_eq!(target, Cyrillic);
            assert_eq!(converted, "привет");
            assert_eq!(reason, Reason::NgramPrimary);
        }
        other => panic!("expected switch, got {:?}", other),
    }
}

#[test]
fn wrong_layout_english_word_is_switched() {
    let engine = engine_with_embedded_tables();
    let result = engine.validate("ckjdj", Latin, None);
    assert!(result.is_switch());
    assert_eq!(result.converted(), Some("слово"));
}

#[test]
fn native_words_are_confidently_kept() {
    let engine = engine_with_embedded_tables();
    assert_eq!(
        engine.validate("hello", Latin, None).reason(),
        &Reason::NgramConfidentKeep
    );
    assert_eq!(
        engine.validate("word", Latin, None).reason(),
        &Reason::NgramConfidentKeep
    );
}

#[test]
fn context_bias_converts_a_short_ambiguous_word() {
    // neutral tables pin the ratio at 1.0, inside the ambiguous band
    let engine = engine_with_neutral_tables();

    let result = engine.validate("tot", Latin, Some(Cyrillic));
    assert_eq!(result.reason(), &Reason::ContextBias);
    assert_eq!(result.converted(), Some("еще"));

    // without the recent switch the same word stays put
    let result = engine.validate("tot", Latin, None);
    assert!(!result.is_switch());
}

// --- oracle adapters ---

struct SetDictionary {
    ru: Vec<&'static str>,
    en: Vec<&'static str>,
}

impl DictionaryOracle for SetDictionary {
    fn is_valid_word(&self, word: &str, language: LanguageCode) -> Option<bool> {
        let list = match language {
            LanguageCode::Ru => &self.ru,
            LanguageCode::En => &self.en,
        };
        Some(list.contains(&word))
    }
}

struct FixedConfidence {
    ru: f64,
    en: f64,
}

impl LanguageIdentifier for FixedConfidence {
    fn confidence(&self, _text: &str, language: LanguageCode) -> Option<f64> {
        Some(match language {
            LanguageCode::Ru => self.ru,
            LanguageCode::En => self.en,
        })
    }
}

#[test]
fn dictionary_breaks_an_ambiguous_tie() {
    let engine = engine_with_neutral_tables().with_dictionary(Box::new(SetDictionary {
        ru: vec!["слово"],
        en: vec![],
    }));

    let result = engine.validate("ckjdj", Latin, None);
    assert_eq!(result.reason(), &Reason::DictionaryTiebreaker);
    assert_eq!(result.converted(), Some("слово"));
}

#[test]
fn language_identifier_decides_when_dictionary_cannot() {
    let engine = engine_with_neutral_tables()
        .with_dictionary(Box::new(SetDictionary {
            ru: vec!["слово"],
            en: vec!["ckjdj"],
        }))
        .with_language_identifier(Box::new(FixedConfidence { ru: 0.9, en: 0.2 }));

    let result = engine.validate("ckjdj", Latin, None);
    assert_eq!(result.reason(), &Reason::LanguageIdentifier);
}

#[test]
fn without_oracles_the_cascade_ends_in_a_keep() {
    let engine = engine_with_neutral_tables();
    let result = engine.validate("zanoza", Latin, None);
    assert_eq!(
        result,
        ValidationResult::Keep {
            reason: Reason::NoConfidentSignal
        }
    );
}

// --- trace parity ---

#[test]
fn explain_agrees_with_validate() {
    let engine = engine_with_embedded_tables();
    for (word, layout, bias) in [
        ("ghbdtn", Latin, None),
        ("hello", Latin, None),
        ("фзш", Cyrillic, None),
        ("ш", Cyrillic, None),
        ("tot", Latin, Some(Cyrillic)),
        ("550e8400-e29b-41d4-a716-446655440000", Latin, None),
    ] {
        let trace = engine.explain(word, layout, bias);
        assert_eq!(
            trace.result,
            engine.validate(word, layout, bias),
            "trace and validate disagree on {:?}",
            word
        );
        assert!(trace.steps.last().unwrap().decision.is_some());
    }
}
