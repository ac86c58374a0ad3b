//! Keyboard layout types and the physical-key substitution map.

mod keymap;

pub use keymap::convert;

use serde::{Deserialize, Serialize};

/// One of the two competing keyboard layouts.
///
/// The whole engine assumes exactly two layouts; every cascade layer makes a
/// binary keep/switch decision between `current` and `current.opposite()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    /// ЙЦУКЕН (Russian).
    Cyrillic,
    /// US QWERTY (English).
    Latin,
}

impl KeyboardLayout {
    /// The other layout. Fixed-point-free involution:
    /// `l.opposite().opposite() == l` for both variants.
    pub fn opposite(self) -> Self {
        match self {
            KeyboardLayout::Cyrillic => KeyboardLayout::Latin,
            KeyboardLayout::Latin => KeyboardLayout::Cyrillic,
        }
    }

    /// Language whose n-gram tables, dictionary and language-id target
    /// this layout selects.
    pub fn language_code(self) -> LanguageCode {
        match self {
            KeyboardLayout::Cyrillic => LanguageCode::Ru,
            KeyboardLayout::Latin => LanguageCode::En,
        }
    }
}

impl std::fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyboardLayout::Cyrillic => write!(f, "cyrillic"),
            KeyboardLayout::Latin => write!(f, "latin"),
        }
    }
}

/// Language selector for models and oracles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    Ru,
    En,
}

impl LanguageCode {
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCode::Ru => "ru",
            LanguageCode::En => "en",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for layout in [KeyboardLayout::Cyrillic, KeyboardLayout::Latin] {
            assert_eq!(layout.opposite().opposite(), layout);
            assert_ne!(layout.opposite(), layout); // fixed-point-free
        }
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(KeyboardLayout::Cyrillic.language_code(), LanguageCode::Ru);
        assert_eq!(KeyboardLayout::Latin.language_code(), LanguageCode::En);
        assert_eq!(LanguageCode::Ru.as_str(), "ru");
    }
}
