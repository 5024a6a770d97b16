//! Ordinal accident severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity rank of an incident, ordered `I < II < ... < VI`.
///
/// Stored values carry a textual suffix (`"IV - High"`); only the leading
/// roman token takes part in ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 6] = [
        Self::I,
        Self::II,
        Self::III,
        Self::IV,
        Self::V,
        Self::VI,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
            Self::V => "V",
            Self::VI => "VI",
        }
    }

    /// Parse the leading roman token of a stored severity label.
    pub fn from_label(label: &str) -> Option<Self> {
        let code = label.split_whitespace().next()?;
        Self::ALL.iter().copied().find(|level| level.code() == code)
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SeverityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown severity level '{s}'"))
    }
}
