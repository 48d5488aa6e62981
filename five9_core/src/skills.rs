//! Bulk user skill assignment.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::de::{boolean, number};
use crate::service::{ConfigService, Pacing, ServiceError};

/// Level given to skills assigned in bulk. 1 is the highest priority.
pub const DEFAULT_SKILL_LEVEL: u32 = 1;

/// A skill as returned by `getSkill`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(deserialize_with = "number")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "boolean")]
    pub route_voice_mails: bool,
}

/// The assignment of a skill to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkill {
    pub id: u64,
    pub level: u32,
    pub skill_name: String,
    pub user_name: String,
}

impl UserSkill {
    pub fn new(skill: &Skill, user_name: &str) -> Self {
        Self {
            id: skill.id,
            level: DEFAULT_SKILL_LEVEL,
            skill_name: skill.name.clone(),
            user_name: user_name.to_string(),
        }
    }
}

/// Skill names to add to and remove from every user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillChanges {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl SkillChanges {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Result of applying skill changes to a set of users.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillOutcome {
    pub updated: Vec<String>,
    pub failed: Vec<(String, ServiceError)>,
    /// Skills that could not be looked up. They are left out of every update.
    pub unknown_skills: Vec<(String, ServiceError)>,
}

/// Adds and removes skills for each user.
///
/// Skills are looked up once up front. A user whose first failing call
/// faults is recorded as failed and the remaining users are still updated.
pub fn apply_user_skills<S: ConfigService + ?Sized>(
    service: &mut S,
    user_names: &[String],
    changes: &SkillChanges,
    pacing: &Pacing,
    mut on_progress: impl FnMut(&str),
) -> SkillOutcome {
    let mut outcome = SkillOutcome::default();

    let to_add = resolve_skills(service, &changes.add, pacing, &mut outcome);
    let to_remove = resolve_skills(service, &changes.remove, pacing, &mut outcome);
    if to_add.is_empty() && to_remove.is_empty() {
        warn!("No skills to change");
        return outcome;
    }

    for user_name in user_names {
        match update_user_skills(service, user_name, &to_add, &to_remove, pacing) {
            Ok(()) => {
                info!("Updated skills of {}", user_name);
                outcome.updated.push(user_name.clone());
            }
            Err(error) => {
                warn!("Failed to update skills of {}: {}", user_name, error);
                outcome.failed.push((user_name.clone(), error));
            }
        }
        on_progress(user_name);
    }

    outcome
}

fn resolve_skills<S: ConfigService + ?Sized>(
    service: &mut S,
    names: &[String],
    pacing: &Pacing,
    outcome: &mut SkillOutcome,
) -> Vec<Skill> {
    let mut skills = Vec::new();
    for name in names {
        match service.skill(name) {
            Ok(skill) => skills.push(skill),
            Err(error) => {
                warn!("Could not find skill '{}': {}", name, error);
                outcome.unknown_skills.push((name.clone(), error));
            }
        }
        pacing.pause();
    }
    skills
}

fn update_user_skills<S: ConfigService + ?Sized>(
    service: &mut S,
    user_name: &str,
    to_add: &[Skill],
    to_remove: &[Skill],
    pacing: &Pacing,
) -> Result<(), ServiceError> {
    for skill in to_add {
        service.user_skill_add(&UserSkill::new(skill, user_name))?;
        pacing.pause();
    }
    for skill in to_remove {
        service.user_skill_remove(&UserSkill::new(skill, user_name))?;
        pacing.pause();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skill_from_string_encoded_reply() {
        let skill: Skill = serde_json::from_value(json!({
            "id": "266",
            "name": "omni",
            "description": "Omnichannel",
            "routeVoiceMails": "true"
        }))
        .unwrap();

        assert_eq!(skill.id, 266);
        assert_eq!(skill.name, "omni");
        assert!(skill.route_voice_mails);
    }

    #[test]
    fn test_skill_without_voice_mail_flag() {
        let skill: Skill = serde_json::from_value(json!({"id": 7, "name": "sales"})).unwrap();
        assert!(!skill.route_voice_mails);
        assert_eq!(skill.description, None);
    }

    #[test]
    fn test_skill_with_bad_flag_is_rejected() {
        let result: Result<Skill, _> = serde_json::from_value(json!({
            "id": 7,
            "name": "sales",
            "routeVoiceMails": "sometimes"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_user_skill_uses_default_level() {
        let skill = Skill {
            id: 9,
            name: "billing".to_string(),
            ..Skill::default()
        };
        let user_skill = UserSkill::new(&skill, "jdoe@acme");

        assert_eq!(user_skill.level, DEFAULT_SKILL_LEVEL);
        assert_eq!(
            serde_json::to_value(&user_skill).unwrap(),
            json!({"id": 9, "level": 1, "skillName": "billing", "userName": "jdoe@acme"})
        );
    }
}
