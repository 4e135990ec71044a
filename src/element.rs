//! Keying elements.

use core::fmt;
use core::str::FromStr;

/// Keying element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Dit,
    Dah,
}

impl Element {
    /// Get the opposite element.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Element::Dit => Element::Dah,
            Element::Dah => Element::Dit,
        }
    }

    /// Symbol appended to the Morse buffer (`.` or `-`).
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Element::Dit => '.',
            Element::Dah => '-',
        }
    }

    /// Element for a `.`/`-` symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Element::Dit),
            '-' => Some(Element::Dah),
            _ => None,
        }
    }

    /// Lower-case name used by the console.
    pub fn name(self) -> &'static str {
        match self {
            Element::Dit => "dit",
            Element::Dah => "dah",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a paddle name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dit" | "dot" | "." => Ok(Element::Dit),
            "dah" | "dash" | "-" => Ok(Element::Dah),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}
