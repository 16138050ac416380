//! LLM provider value object

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backend LLM service used for a voice session (Value Object)
///
/// The set is closed: anything read back from storage or the command line
/// that is not one of these identifiers is rejected, so callers decide
/// explicitly how to fall back. [`FromStr`](std::str::FromStr) forgives case and
/// surrounding whitespace for typed input; [`LlmProvider::from_id`] does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LlmProvider {
    /// ByteDance Doubao
    #[default]
    Doubao,
    /// Zhipu GLM (OpenAI-compatible endpoint)
    Glm,
}

impl LlmProvider {
    /// Every supported provider, in display order
    pub const ALL: [LlmProvider; 2] = [LlmProvider::Doubao, LlmProvider::Glm];

    /// Stable identifier used for persistence and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Doubao => "doubao",
            LlmProvider::Glm => "glm",
        }
    }

    /// Exact stable identifier only: no trimming or case folding.
    ///
    /// Used for persisted values, which are always written by [`as_str`](Self::as_str).
    pub fn from_id(id: &str) -> Result<Self, DomainError> {
        LlmProvider::ALL
            .into_iter()
            .find(|provider| provider.as_str() == id)
            .ok_or_else(|| DomainError::UnrecognizedProvider(id.to_string()))
    }

    /// Bilingual label shown in provider pickers
    pub fn label(&self) -> &'static str {
        match self {
            LlmProvider::Doubao => "豆包 | Doubao",
            LlmProvider::Glm => "智谱 GLM | Zhipu GLM",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doubao" => Ok(LlmProvider::Doubao),
            "glm" => Ok(LlmProvider::Glm),
            _ => Err(DomainError::UnrecognizedProvider(s.to_string())),
        }
    }
}

impl Serialize for LlmProvider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LlmProvider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
