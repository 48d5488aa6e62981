use serde_json::json;

use five9_core::skills::{SkillChanges, apply_user_skills};
use five9_session::SessionType;

use crate::errors::CliError;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Adds and removes skills for each of the given users.
pub fn update_user_skills(
    connection: &ConnectionArgs,
    users: &[String],
    add: &[String],
    remove: &[String],
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Updating user skills");
    let changes = SkillChanges {
        add: add.to_vec(),
        remove: remove.to_vec(),
    };
    if changes.is_empty() {
        ui::error("Nothing to do, pass --add or --remove");
        return Err(CliError::InputError);
    }

    let mut session = connection.connect(SessionType::Admin)?;
    let bar = ui::progress_bar(users.len() as u64, "Updating user skills");
    let outcome = apply_user_skills(&mut session, users, &changes, &connection.pacing, |_| {
        bar.inc(1)
    });
    bar.finish_and_clear();

    for (skill_name, error) in &outcome.unknown_skills {
        ui::warning(&format!("Skipped skill '{}': {}", skill_name, error));
    }

    match output_format {
        OutputFormat::Pretty => {
            ui::success(&format!("Updated {} user(s)", outcome.updated.len()));
            for (user_name, error) in &outcome.failed {
                ui::error_with_details(
                    &format!("Failed to update {}", user_name),
                    &error.to_string(),
                );
            }
        }
        OutputFormat::Json => {
            let failed: Vec<_> = outcome
                .failed
                .iter()
                .map(|(user, error)| json!({ "userName": user, "error": error.to_string() }))
                .collect();
            let unknown: Vec<&String> = outcome.unknown_skills.iter().map(|(name, _)| name).collect();
            ui::json_output(&json!({
                "updated": outcome.updated,
                "failed": failed,
                "unknownSkills": unknown,
            }));
        }
    }

    if !outcome.failed.is_empty() || outcome.updated.is_empty() {
        return Err(CliError::RemoteError);
    }
    Ok(())
}
