//! Role entities: the raw configured record and the validated role.

use super::stance::Stance;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a role, unique within one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A `#rrggbb` display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayColor(String);

impl DisplayColor {
    /// Parse a `#rrggbb` (or `rrggbb`) hex color; normalized to lowercase with `#`.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("#{}", hex.to_ascii_lowercase())))
    }

    /// Palette default for a stance
    pub fn for_stance(stance: Stance) -> Self {
        Self(stance.default_color().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green, blue components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or_default()
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A role as it appears in configuration, before validation.
///
/// Field names follow the external `DebateConfig` data contract
/// (`systemPrompt`, `modelId`, ...). Every field is optional here so the
/// registry can report precisely what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub stance: Option<String>,
    pub system_prompt: Option<String>,
    pub model_id: Option<String>,
    pub color: Option<String>,
}

impl RoleSpec {
    pub fn new(stance: Stance, system_prompt: impl Into<String>) -> Self {
        Self {
            stance: Some(stance.as_str().to_string()),
            system_prompt: Some(system_prompt.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Human-readable label for error messages (id, then name, then position)
    pub fn label(&self, index: usize) -> String {
        non_blank(&self.id)
            .or_else(|| non_blank(&self.name))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index + 1))
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A validated debate role (Entity)
///
/// Immutable once the session starts; owned by the session's
/// [`RoleRegistry`](super::registry::RoleRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    id: RoleId,
    name: String,
    stance: Stance,
    system_prompt: String,
    model: Model,
    color: DisplayColor,
}

impl Role {
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        stance: Stance,
        system_prompt: impl Into<String>,
        model: Model,
        color: DisplayColor,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            stance,
            system_prompt: system_prompt.into(),
            model,
            color,
        }
    }

    pub fn id(&self) -> &RoleId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn color(&self) -> &DisplayColor {
        &self.color
    }
}
