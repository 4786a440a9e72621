//! Debate stance definitions.
//!
//! A [`Stance`] is the position a role takes in the debate. Three of the
//! stances argue (`pro`, `con`, `neutral`); the other two are structural
//! (`moderator` closes each round, `summary` writes the final synthesis).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role's debate position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// Argues in favour of the question
    Pro,
    /// Argues against the question
    Con,
    /// Weighs both sides without committing
    Neutral,
    /// Synthesizes or redirects at the end of each round
    Moderator,
    /// Produces the post-debate synthesis
    Summary,
}

impl Stance {
    /// Whether this stance takes debater turns (pro, con, neutral).
    pub fn is_debater(&self) -> bool {
        matches!(self, Stance::Pro | Stance::Con | Stance::Neutral)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Pro => "pro",
            Stance::Con => "con",
            Stance::Neutral => "neutral",
            Stance::Moderator => "moderator",
            Stance::Summary => "summary",
        }
    }

    /// Name used when a role is configured without one
    pub fn display_name(&self) -> &'static str {
        match self {
            Stance::Pro => "Proponent",
            Stance::Con => "Opponent",
            Stance::Neutral => "Analyst",
            Stance::Moderator => "Moderator",
            Stance::Summary => "Summarizer",
        }
    }

    /// Palette color assigned when a role has no (valid) `color`
    pub fn default_color(&self) -> &'static str {
        match self {
            Stance::Pro => "#22c55e",
            Stance::Con => "#ef4444",
            Stance::Neutral => "#3b82f6",
            Stance::Moderator => "#a855f7",
            Stance::Summary => "#f59e0b",
        }
    }

    /// All accepted stance names, for error messages
    pub fn valid_values() -> Vec<String> {
        ["pro", "con", "neutral", "moderator", "summary"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro" | "for" => Ok(Stance::Pro),
            "con" | "against" => Ok(Stance::Con),
            "neutral" => Ok(Stance::Neutral),
            "moderator" | "mod" => Ok(Stance::Moderator),
            "summary" | "summarizer" => Ok(Stance::Summary),
            _ => Err(format!("Invalid stance: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debater_stances() {
        assert!(Stance::Pro.is_debater());
        assert!(Stance::Con.is_debater());
        assert!(Stance::Neutral.is_debater());
        assert!(!Stance::Moderator.is_debater());
        assert!(!Stance::Summary.is_debater());
    }

    #[test]
    fn test_parse_with_aliases() {
        assert_eq!("PRO".parse::<Stance>(), Ok(Stance::Pro));
        assert_eq!("against".parse::<Stance>(), Ok(Stance::Con));
        assert_eq!("summarizer".parse::<Stance>(), Ok(Stance::Summary));
        assert!("judge".parse::<Stance>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Stance::Moderator).unwrap(),
            "\"moderator\""
        );
        let stance: Stance = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(stance, Stance::Neutral);
    }
}
