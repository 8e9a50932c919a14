//! Self-reported recall quality for a reviewed card.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Easy,
    Hard,
    Wrong,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Wrong, Quality::Hard, Quality::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Hard => "hard",
            Self::Wrong => "wrong",
        }
    }

    /// Button caption used by the review screen
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Hard => "Hard",
            Self::Wrong => "Wrong",
        }
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "hard" => Ok(Self::Hard),
            "wrong" => Ok(Self::Wrong),
            other => Err(Error::invalid(format!("unknown quality '{}'", other))),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
