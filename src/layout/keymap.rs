//! Physical-key substitution between US QWERTY and ЙЦУКЕН.
//!
//! Each table pairs characters produced by the same physical key under the
//! two layouts. Conversion is per-character, total and length-preserving in
//! character count: anything without a mapping entry passes through verbatim.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::KeyboardLayout;

// Same physical key, both shift states. The RU side of the unshifted
// punctuation keys ([ ] ; ' , . `) are letters (х ъ ж э б ю ё).
const EN_UNSHIFT: &str = "`qwertyuiop[]asdfghjkl;'zxcvbnm,./";
const RU_UNSHIFT: &str = "ёйцукенгшщзхъфывапролджэячсмитьбю.";

const EN_SHIFT: &str = "~QWERTYUIOP{}ASDFGHJKL:\"ZXCVBNM<>?";
const RU_SHIFT: &str = "ЁЙЦУКЕНГШЩЗХЪФЫВАПРОЛДЖЭЯЧСМИТЬБЮ,";

// Shift+digit row differs between the layouts.
const EN_DIGIT_SHIFT: &str = "!@#$%^&*()_+";
const RU_DIGIT_SHIFT: &str = "!\"№;%:?*()_+";

// Ambiguous characters (';' exists on both layouts at different keys) are
// resolved by insertion order: digit-shift row wins, first entry stays.
fn build_map(rows: &[(&str, &str)]) -> HashMap<char, char> {
    let mut map = HashMap::new();
    for (from, to) in rows {
        for (f, t) in from.chars().zip(to.chars()) {
            map.entry(f).or_insert(t);
        }
    }
    map
}

static EN_TO_RU: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    build_map(&[
        (EN_DIGIT_SHIFT, RU_DIGIT_SHIFT),
        (EN_SHIFT, RU_SHIFT),
        (EN_UNSHIFT, RU_UNSHIFT),
    ])
});

static RU_TO_EN: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    build_map(&[
        (RU_DIGIT_SHIFT, EN_DIGIT_SHIFT),
        (RU_SHIFT, EN_SHIFT),
        (RU_UNSHIFT, EN_UNSHIFT),
    ])
});

/// Remap `text` typed under layout `from` to what the same key presses would
/// have produced under layout `to`.
///
/// By default only alphabetic characters are substituted; punctuation,
/// digits and unmapped symbols pass through. `include_all_symbols` extends
/// the substitution to the symbol and shift-digit keys as well (needed when
/// a whole token must be reinterpreted, e.g. `хъ` → `[]`).
///
/// # Examples
/// ```
/// use relayout::layout::{convert, KeyboardLayout};
///
/// let ru = convert("ghbdtn", KeyboardLayout::Latin, KeyboardLayout::Cyrillic, false);
/// assert_eq!(ru, "привет");
///
/// let en = convert("руддщ", KeyboardLayout::Cyrillic, KeyboardLayout::Latin, false);
/// assert_eq!(en, "hello");
/// ```
pub fn convert(
    text: &str,
    from: KeyboardLayout,
    to: KeyboardLayout,
    include_all_symbols: bool,
) -> String {
    if from == to {
        return text.to_string();
    }

    let map: &HashMap<char, char> = match from {
        KeyboardLayout::Latin => &EN_TO_RU,
        KeyboardLayout::Cyrillic => &RU_TO_EN,
    };

    text.chars()
        .map(|c| match map.get(&c) {
            Some(&mapped) if include_all_symbols || c.is_alphabetic() => mapped,
            _ => c,
        })
        .collect()
}
