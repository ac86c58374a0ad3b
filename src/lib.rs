pub mod config;
pub mod detection;
pub mod engine;
pub mod layout;
pub mod ngram;
pub mod store;

pub use engine::{ValidationEngine, ValidationResult};
pub use layout::{convert, KeyboardLayout, LanguageCode};
