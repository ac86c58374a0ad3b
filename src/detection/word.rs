//! Input word with cached derived features.

/// One validation input unit: the raw text plus the features the cascade
/// layers keep asking about. Built fresh per call, never persisted.
#[derive(Debug, Clone)]
pub struct Word {
    raw: String,
    lower: String,
    char_count: usize,
    all_uppercase: bool,
    has_symbols: bool,
    has_letters: bool,
}

impl Word {
    pub fn new(raw: &str) -> Self {
        let char_count = raw.chars().count();
        let mut has_letters = false;
        let mut has_symbols = false;
        let mut has_upper = false;
        let mut has_lower = false;
        for c in raw.chars() {
            if c.is_alphabetic() {
                has_letters = true;
                if c.is_uppercase() {
                    has_upper = true;
                } else if c.is_lowercase() {
                    has_lower = true;
                }
            } else if !c.is_numeric() {
                has_symbols = true;
            }
        }

        Self {
            lower: raw.to_lowercase(),
            raw: raw.to_string(),
            char_count,
            all_uppercase: has_upper && !has_lower,
            has_symbols,
            has_letters,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized (lowercased) form used for all set lookups.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// True when the word contains at least one letter and no lowercase ones.
    pub fn is_all_uppercase(&self) -> bool {
        self.all_uppercase
    }

    /// True when the word contains non-alphanumeric characters.
    pub fn has_symbols(&self) -> bool {
        self.has_symbols
    }

    pub fn has_letters(&self) -> bool {
        self.has_letters
    }

    pub fn first_char(&self) -> Option<char> {
        self.raw.chars().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_features() {
        let w = Word::new("Привет");
        assert_eq!(w.char_count(), 6);
        assert_eq!(w.lower(), "привет");
        assert!(w.has_letters());
        assert!(!w.is_all_uppercase());
        assert!(!w.has_symbols());
    }

    #[test]
    fn test_all_uppercase() {
        assert!(Word::new("API").is_all_uppercase());
        assert!(Word::new("USB4").is_all_uppercase());
        assert!(!Word::new("Api").is_all_uppercase());
        // digits alone are not "uppercase"
        assert!(!Word::new("1234").is_all_uppercase());
    }

    #[test]
    fn test_symbols() {
        assert!(Word::new("c++").has_symbols());
        assert!(Word::new("v1.2.3").has_symbols());
        assert!(!Word::new("word42").has_symbols());
        assert!(!Word::new("слово").has_symbols());
    }

    #[test]
    fn test_letterless_input() {
        let w = Word::new("1234!");
        assert!(!w.has_letters());
        assert!(w.has_symbols());
    }
}
