//! Static Morse table shared by the decoder and the text sender.
//!
//! Lookups never fail: an unrecognised symbol string decodes to
//! [`UNKNOWN_GLYPH`].

/// Character produced for a symbol string that is not in the table.
pub const UNKNOWN_GLYPH: char = 'Ø';

/// Table section, used when listing the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Letters,
    Numbers,
    Punctuation,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Letters => "Letters",
            Category::Numbers => "Numbers",
            Category::Punctuation => "Punctuation",
        }
    }

    pub const ALL: [Category; 3] = [Category::Letters, Category::Numbers, Category::Punctuation];
}

/// One table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MorseEntry {
    pub character: char,
    pub symbols: &'static str,
    pub category: Category,
}

const fn entry(character: char, symbols: &'static str, category: Category) -> MorseEntry {
    MorseEntry { character, symbols, category }
}

use Category::{Letters as L, Numbers as N, Punctuation as P};

/// All known characters.
pub static MORSE_TABLE: &[MorseEntry] = &[
    entry('A', ".-", L),
    entry('B', "-...", L),
    entry('C', "-.-.", L),
    entry('D', "-..", L),
    entry('E', ".", L),
    entry('F', "..-.", L),
    entry('G', "--.", L),
    entry('H', "....", L),
    entry('I', "..", L),
    entry('J', ".---", L),
    entry('K', "-.-", L),
    entry('L', ".-..", L),
    entry('M', "--", L),
    entry('N', "-.", L),
    entry('O', "---", L),
    entry('P', ".--.", L),
    entry('Q', "--.-", L),
    entry('R', ".-.", L),
    entry('S', "...", L),
    entry('T', "-", L),
    entry('U', "..-", L),
    entry('V', "...-", L),
    entry('W', ".--", L),
    entry('X', "-..-", L),
    entry('Y', "-.--", L),
    entry('Z', "--..", L),
    entry('0', "-----", N),
    entry('1', ".----", N),
    entry('2', "..---", N),
    entry('3', "...--", N),
    entry('4', "....-", N),
    entry('5', ".....", N),
    entry('6', "-....", N),
    entry('7', "--...", N),
    entry('8', "---..", N),
    entry('9', "----.", N),
    entry('.', ".-.-.-", P),
    entry(',', "--..--", P),
    entry('?', "..--..", P),
    entry('\'', ".----.", P),
    entry('!', "-.-.--", P),
    entry('/', "-..-.", P),
    entry('(', "-.--.", P),
    entry(')', "-.--.-", P),
    entry('&', ".-...", P),
    entry(':', "---...", P),
    entry(';', "-.-.-.", P),
    entry('=', "-...-", P),
    entry('+', ".-.-.", P),
    entry('-', "-....-", P),
    entry('_', "..--.-", P),
    entry('"', ".-..-.", P),
    entry('$', "...-..-", P),
    entry('@', ".--.-.", P),
];

/// Decode a `.`/`-` string into its character.
pub fn decode(symbols: &str) -> char {
    MORSE_TABLE
        .iter()
        .find(|e| e.symbols == symbols)
        .map(|e| e.character)
        .unwrap_or(UNKNOWN_GLYPH)
}

/// Symbols for `character` (case-insensitive), if it is in the table.
pub fn encode(character: char) -> Option<&'static str> {
    let upper = character.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find(|e| e.character == upper)
        .map(|e| e.symbols)
}

/// Entries of one category, in table order.
pub fn entries(category: Category) -> impl Iterator<Item = &'static MorseEntry> {
    MORSE_TABLE.iter().filter(move |e| e.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_bijective() {
        for (i, a) in MORSE_TABLE.iter().enumerate() {
            for b in &MORSE_TABLE[i + 1..] {
                assert_ne!(a.symbols, b.symbols, "{} and {}", a.character, b.character);
                assert_ne!(a.character, b.character);
            }
        }
    }

    #[test]
    fn test_decode_known_and_unknown() {
        assert_eq!(decode("..-."), 'F');
        assert_eq!(decode("......"), UNKNOWN_GLYPH);
        assert_eq!(decode(""), UNKNOWN_GLYPH);
    }

    #[test]
    fn test_encode_is_case_insensitive() {
        assert_eq!(encode('q'), Some("--.-"));
        assert_eq!(encode('#'), None);
    }

    #[test]
    fn test_categories_cover_table() {
        let total: usize = Category::ALL.iter().map(|c| entries(*c).count()).sum();
        assert_eq!(total, MORSE_TABLE.len());
        assert_eq!(entries(Category::Numbers).count(), 10);
    }
}
