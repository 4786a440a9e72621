//! Deterministic per-round ordering of role invocations.
//!
//! ```text
//! round 0:  pro(opening) → con(opening) → … → moderator(moderation)?
//! round n:  pro(rebuttal) → con(rebuttal) → … → moderator(moderation)?
//! ```

use crate::role::{Role, RoleRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a scheduled invocation is for; selects the prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// A debater's first statement (round 0)
    Opening,
    /// A debater's reply in a later round
    Rebuttal,
    /// The moderator closing a round
    Moderation,
    /// The post-debate synthesis
    Summary,
}

impl TurnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnKind::Opening => "opening",
            TurnKind::Rebuttal => "rebuttal",
            TurnKind::Moderation => "moderation",
            TurnKind::Summary => "summary",
        }
    }
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTurn {
    pub role: Role,
    pub kind: TurnKind,
}

/// Ordered turns for one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPlan {
    pub round_index: u32,
    pub turns: Vec<ScheduledTurn>,
}

impl RoundPlan {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Produces [`RoundPlan`]s from a validated registry.
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    debaters: Vec<Role>,
    moderator: Option<Role>,
}

impl TurnScheduler {
    /// The moderator is scheduled only if the registry exposes one
    /// (configured and enabled).
    pub fn new(registry: &RoleRegistry) -> Self {
        Self {
            debaters: registry.debaters().to_vec(),
            moderator: registry.moderator().cloned(),
        }
    }

    pub fn turns_per_round(&self) -> usize {
        self.debaters.len() + usize::from(self.moderator.is_some())
    }

    pub fn plan(&self, round_index: u32) -> RoundPlan {
        let kind = if round_index == 0 {
            TurnKind::Opening
        } else {
            TurnKind::Rebuttal
        };
        let mut turns: Vec<ScheduledTurn> = self
            .debaters
            .iter()
            .map(|role| ScheduledTurn {
                role: role.clone(),
                kind,
            })
            .collect();
        if let Some(moderator) = &self.moderator {
            turns.push(ScheduledTurn {
                role: moderator.clone(),
                kind: TurnKind::Moderation,
            });
        }
        RoundPlan { round_index, turns }
    }
}
