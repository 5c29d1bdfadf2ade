//! Variable (column) definitions.

/// Storage class of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XptType {
    /// Numeric, stored as IBM floating point.
    Num,
    /// Character, fixed width.
    Char,
}

impl XptType {
    /// Decode the NAMESTR `ntype` field.
    #[must_use]
    pub fn from_ntype(ntype: i16) -> Option<Self> {
        match ntype {
            1 => Some(Self::Num),
            2 => Some(Self::Char),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_ntype(self) -> i16 {
        match self {
            Self::Num => 1,
            Self::Char => 2,
        }
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Num)
    }

    #[must_use]
    pub fn is_character(self) -> bool {
        matches!(self, Self::Char)
    }
}

/// Format justification (NAMESTR `nfj`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Right,
}

impl Justification {
    #[must_use]
    pub fn from_nfj(nfj: i16) -> Self {
        if nfj == 1 { Self::Right } else { Self::Left }
    }

    #[must_use]
    pub fn to_nfj(self) -> i16 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// A variable definition as stored in a NAMESTR record.
#[derive(Debug, Clone, PartialEq)]
pub struct XptColumn {
    pub name: String,
    pub label: Option<String>,
    pub data_type: XptType,
    /// Width in bytes within an observation.
    pub length: u16,
    pub format: Option<String>,
    pub format_length: u16,
    pub format_decimals: u16,
    pub informat: Option<String>,
    pub informat_length: u16,
    pub informat_decimals: u16,
    pub justification: Justification,
}

impl XptColumn {
    /// Numeric variable with the standard 8-byte width.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, XptType::Num, 8)
    }

    pub fn character(name: impl Into<String>, length: u16) -> Self {
        Self::new(name, XptType::Char, length)
    }

    pub fn new(name: impl Into<String>, data_type: XptType, length: u16) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type,
            length,
            format: None,
            format_length: 0,
            format_decimals: 0,
            informat: None,
            informat_length: 0,
            informat_decimals: 0,
            justification: Justification::Left,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: u16) -> Self {
        self.length = length;
        self
    }

    #[must_use]
    pub fn with_format(mut self, name: impl Into<String>, length: u16, decimals: u16) -> Self {
        self.format = Some(name.into());
        self.format_length = length;
        self.format_decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_informat(mut self, name: impl Into<String>, length: u16, decimals: u16) -> Self {
        self.informat = Some(name.into());
        self.informat_length = length;
        self.informat_decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = justification;
        self
    }

    /// Label, or an empty string.
    #[must_use]
    pub fn label_or_empty(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}
