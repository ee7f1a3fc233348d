//! AI provider identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Third-party AI vendors the coach can route requests to
///
/// Tokens are parsed case-insensitively, so `"groq"`, `"Groq"` and `"GROQ"`
/// all resolve to [`AiProvider::Groq`]. Serialized form is upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum AiProvider {
    /// Groq cloud (OpenAI-compatible API)
    Groq,
    /// OpenAI
    OpenAi,
}

impl AiProvider {
    /// All known providers, in declaration order
    pub const ALL: [Self; 2] = [Self::Groq, Self::OpenAi];

    /// Lower-case key used in configuration sections
    #[must_use]
    pub const fn config_key(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
        }
    }

    /// Human-readable vendor name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::OpenAi => "OpenAI",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AiProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            _ => Err(DomainError::UnknownProvider(s.to_string())),
        }
    }
}

impl TryFrom<String> for AiProvider {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
