//! Role Registry: validation and partitioning of configured roles.
//!
//! ```text
//! [RoleSpec] ──validate──▶ RoleRegistry
//!                           ├─ debaters   (pro/con/neutral, config order)
//!                           ├─ moderator  (0..=1)
//!                           └─ summarizer (0..=1)
//! ```
//!
//! Fatal problems surface as [`ValidationError`]; fixable ones (bad colors,
//! duplicate ids, roles that are configured but switched off) are repaired
//! and recorded as [`ConfigIssue`] warnings.

use super::entities::{DisplayColor, Role, RoleId, RoleSpec, non_blank};
use super::stance::Stance;
use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use crate::core::error::ValidationError;
use crate::core::model::Model;
use std::collections::{HashMap, HashSet};

/// Settings from the debate config that affect partitioning.
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    pub moderator_enabled: bool,
    pub summary_enabled: bool,
    /// Model for roles configured without a `modelId`
    pub default_model: Model,
}

/// Validated, partitioned set of roles for one session.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    debaters: Vec<Role>,
    moderator: Option<Role>,
    summarizer: Option<Role>,
    moderator_enabled: bool,
    summary_enabled: bool,
    issues: Vec<ConfigIssue>,
}

impl RoleRegistry {
    /// Validate `specs` and partition them.
    pub fn build(specs: &[RoleSpec], options: &RegistryOptions) -> Result<Self, ValidationError> {
        let stances = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| resolve_stance(spec, index))
            .collect::<Result<Vec<_>, _>>()?;

        let count = |pred: fn(&Stance) -> bool| stances.iter().filter(|s| pred(s)).count();
        let debater_count = count(Stance::is_debater);
        let moderator_count = count(|s| *s == Stance::Moderator);
        let summary_count = count(|s| *s == Stance::Summary);

        if debater_count < 2 {
            return Err(ValidationError::TooFewDebaters {
                found: debater_count,
            });
        }
        if moderator_count > 1 {
            return Err(ValidationError::TooManyModerators {
                found: moderator_count,
            });
        }
        if summary_count > 1 {
            return Err(ValidationError::TooManySummarizers {
                found: summary_count,
            });
        }
        if options.moderator_enabled && moderator_count == 0 {
            return Err(ValidationError::MissingModerator);
        }

        let mut issues = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();
        let mut ordinals: HashMap<Stance, usize> = HashMap::new();
        let mut debaters = Vec::with_capacity(debater_count);
        let mut moderator = None;
        let mut summarizer = None;

        for (spec, stance) in specs.iter().zip(stances) {
            let ordinal = ordinals.entry(stance).or_default();
            *ordinal += 1;

            let explicit_id = non_blank(&spec.id);
            let base = explicit_id
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}-{}", stance, ordinal));
            let id = unique_id(&base, &taken);
            if id != base {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::DuplicateRoleId {
                        id: base.clone(),
                        renamed_to: id.clone(),
                    },
                    format!("role id '{}' is used more than once; renamed to '{}'", base, id),
                ));
            }
            taken.insert(id.clone());

            let color = match non_blank(&spec.color) {
                None => DisplayColor::for_stance(stance),
                Some(raw) => DisplayColor::parse(raw).unwrap_or_else(|| {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::InvalidColor {
                            role: id.clone(),
                            value: raw.to_string(),
                        },
                        format!(
                            "role '{}': color '{}' is not #rrggbb, using {}",
                            id,
                            raw,
                            stance.default_color()
                        ),
                    ));
                    DisplayColor::for_stance(stance)
                }),
            };

            let model = non_blank(&spec.model_id)
                .map(Model::from)
                .unwrap_or_else(|| options.default_model.clone());
            let name = non_blank(&spec.name).unwrap_or(stance.display_name());
            let system_prompt = non_blank(&spec.system_prompt).unwrap_or_default();

            let role = Role::new(RoleId::new(id), name, stance, system_prompt, model, color);
            match stance {
                Stance::Moderator => moderator = Some(role),
                Stance::Summary => summarizer = Some(role),
                _ => debaters.push(role),
            }
        }

        if moderator.is_some() && !options.moderator_enabled {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnusedModerator,
                "a moderator role is configured but moderatorEnabled is false; it will not speak",
            ));
        }
        match (&summarizer, options.summary_enabled) {
            (Some(_), false) => issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnusedSummarizer,
                "a summary role is configured but summaryEnabled is false; no summary will be written",
            )),
            (None, true) => issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingSummarizer,
                "summaryEnabled is true but no summary role is configured; no summary will be written",
            )),
            _ => {}
        }

        Ok(Self {
            debaters,
            moderator,
            summarizer,
            moderator_enabled: options.moderator_enabled,
            summary_enabled: options.summary_enabled,
            issues,
        })
    }

    /// Debater roles in configured order
    pub fn debaters(&self) -> &[Role] {
        &self.debaters
    }

    /// The moderator, if one is configured and enabled
    pub fn moderator(&self) -> Option<&Role> {
        self.moderator.as_ref().filter(|_| self.moderator_enabled)
    }

    /// The summarizer, if one is configured and enabled
    pub fn summarizer(&self) -> Option<&Role> {
        self.summarizer.as_ref().filter(|_| self.summary_enabled)
    }

    /// Every configured role, enabled or not
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.debaters
            .iter()
            .chain(self.moderator.iter())
            .chain(self.summarizer.iter())
    }

    /// Warnings produced while validating
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }
}

fn resolve_stance(spec: &RoleSpec, index: usize) -> Result<Stance, ValidationError> {
    let label = spec.label(index);
    let raw = non_blank(&spec.stance).ok_or_else(|| ValidationError::MissingStance {
        role: label.clone(),
    })?;
    let stance = raw
        .parse::<Stance>()
        .map_err(|_| ValidationError::UnknownStance {
            role: label.clone(),
            stance: raw.to_string(),
        })?;
    if non_blank(&spec.system_prompt).is_none() {
        return Err(ValidationError::MissingSystemPrompt { role: label });
    }
    Ok(stance)
}

fn unique_id(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
