//! SAS missing value codes.

use std::fmt;

/// One of the 28 SAS numeric missing value codes.
///
/// | Code | First byte |
/// |------|------------|
/// | `.`  | `0x2E`     |
/// | `._` | `0x5F`     |
/// | `.A`–`.Z` | `0x41`–`0x5A` |
///
/// The remaining seven bytes of a missing value are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissingValue {
    /// Standard missing (`.`).
    #[default]
    Standard,
    /// Underscore missing (`._`).
    Underscore,
    /// Special missing `.A` through `.Z`.
    Special(char),
}

impl MissingValue {
    /// First byte of the encoded value.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Standard => b'.',
            Self::Underscore => b'_',
            Self::Special(c) if c.is_ascii_uppercase() => c as u8,
            Self::Special(_) => b'.',
        }
    }

    /// Decode the first byte of a missing value.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'.' => Some(Self::Standard),
            b'_' => Some(Self::Underscore),
            b'A'..=b'Z' => Some(Self::Special(byte as char)),
            _ => None,
        }
    }
}

impl fmt::Display for MissingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "."),
            Self::Underscore => write!(f, "._"),
            Self::Special(c) => write!(f, ".{c}"),
        }
    }
}
