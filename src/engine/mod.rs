//! The validation cascade: decides per word whether it was typed in the
//! wrong keyboard layout.
//!
//! # Overview
//!
//! [`ValidationEngine::validate`] runs a strictly ordered sequence of
//! layers. Each layer either returns a definitive [`ValidationResult`]
//! (short-circuit) or passes to the next. Deterministic guards (sensitive
//! identifiers, file extensions, shell commands, buzzwords, user lists)
//! come first; the statistical layers (n-gram ratio, dictionary, language
//! identification) only run when nothing cheaper answered. The terminal
//! default is always `Keep`.
//!
//! # Usage
//!
//! ```
//! use relayout::engine::ValidationEngine;
//! use relayout::layout::KeyboardLayout;
//! use relayout::ngram::NgramScorer;
//! use relayout::store::UserStores;
//! use std::sync::Arc;
//!
//! let engine = ValidationEngine::new(NgramScorer::neutral(), Arc::new(UserStores::in_memory()));
//! let result = engine.validate("550e8400-e29b-41d4-a716-446655440000", KeyboardLayout::Latin, None);
//! assert!(!result.is_switch());
//! ```

mod explain;
mod oracle;
mod validator;

pub use explain::{CascadeTrace, LayerStep};
pub use oracle::{DictionaryOracle, LanguageIdentifier, NullDictionary, NullLanguageIdentifier};
pub use validator::{Reason, ValidationEngine, ValidationResult};
