//! Static pattern data and word feature extraction.

pub mod patterns;
mod word;

pub use word::Word;
