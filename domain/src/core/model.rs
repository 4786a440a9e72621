//! Model value object representing the LLM a role is bound to

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Known LLM models (Value Object)
///
/// A role's `modelId` resolves to one of these. Anything not in the
/// known list is carried through verbatim as [`Model::Custom`] so the
/// provider adapter can decide whether it understands it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Claude models
    ClaudeSonnet45,
    ClaudeHaiku45,
    ClaudeOpus45,
    // GPT models
    Gpt52,
    Gpt51,
    Gpt5Mini,
    Gpt41,
    Gpt4oMini,
    // Gemini models
    Gemini3Pro,
    // Custom
    Custom(String),
}

/// Wire ids of the known models; anything else becomes [`Model::Custom`]
const KNOWN: &[(Model, &str)] = &[
    (Model::ClaudeSonnet45, "claude-sonnet-4.5"),
    (Model::ClaudeHaiku45, "claude-haiku-4.5"),
    (Model::ClaudeOpus45, "claude-opus-4.5"),
    (Model::Gpt52, "gpt-5.2"),
    (Model::Gpt51, "gpt-5.1"),
    (Model::Gpt5Mini, "gpt-5-mini"),
    (Model::Gpt41, "gpt-4.1"),
    (Model::Gpt4oMini, "gpt-4o-mini"),
    (Model::Gemini3Pro, "gemini-3-pro-preview"),
];

impl Model {
    /// The id sent to the model service
    pub fn as_str(&self) -> &str {
        if let Model::Custom(id) = self {
            return id;
        }
        KNOWN
            .iter()
            .find(|(model, _)| model == self)
            .map(|(_, id)| *id)
            .unwrap_or_default()
    }
}

impl Default for Model {
    /// Returns the default model used for roles without an explicit `modelId`
    fn default() -> Self {
        Model::Gpt4oMini
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let id = s.trim();
        Ok(KNOWN
            .iter()
            .find(|(_, known)| *known == id)
            .map(|(model, _)| model.clone())
            .unwrap_or_else(|| Model::Custom(id.to_string())))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
