use std::path::{Path, PathBuf};

use serde_json::json;

use five9_core::ConfigService;
use five9_core::users::{
    CaptureSpec, UpdatePlan, apply_user_updates, capture_user_rows, plan_user_updates,
};
use five9_session::SessionType;

use crate::errors::CliError;
use crate::files;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Writes the selected user fields and permissions to a CSV file.
pub fn capture_users(
    connection: &ConnectionArgs,
    output: Option<PathBuf>,
    fields: &[String],
    permissions: &[String],
) -> Result<(), CliError> {
    ui::header("Capturing user details");
    let spec = capture_spec(fields, permissions)?;

    let mut session = connection.connect(SessionType::Admin)?;
    let spinner = ui::spinner("Fetching users");
    let users = session.users_info();
    spinner.finish_and_clear();
    let users = users.map_err(|e| {
        ui::error_with_details("Couldn't fetch users", &e.to_string());
        CliError::RemoteError
    })?;

    let rows = capture_user_rows(&users, &spec);
    let path = output.unwrap_or_else(|| files::dated_file_name("users", "csv"));
    files::write_csv(&path, &spec.headers(), &rows)?;

    ui::success(&format!("Wrote {} user(s) to {}", rows.len(), path.display()));
    Ok(())
}

fn capture_spec(fields: &[String], permissions: &[String]) -> Result<CaptureSpec, CliError> {
    let mut spec = CaptureSpec::default();
    if !fields.is_empty() {
        spec.fields = fields.to_vec();
    }
    for permission in permissions {
        let Some((role, kind)) = permission.split_once(':') else {
            ui::error(&format!(
                "Invalid permission '{}', expected <role>:<type>",
                permission
            ));
            return Err(CliError::InputError);
        };
        spec.permissions
            .entry(role.trim().to_string())
            .or_default()
            .push(kind.trim().to_string());
    }
    Ok(spec)
}

/// Applies the differences between a CSV file and the domain's users.
pub fn update_users(
    connection: &ConnectionArgs,
    input: &Path,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Updating users from CSV");
    let (headers, rows) = files::read_csv(input)?;

    let mut session = connection.connect(SessionType::Admin)?;
    let spinner = ui::spinner("Fetching users");
    let vcc_users = session.users_general_info();
    spinner.finish_and_clear();
    let vcc_users = vcc_users.map_err(|e| {
        ui::error_with_details("Couldn't fetch users", &e.to_string());
        CliError::RemoteError
    })?;

    let plan = plan_user_updates(vcc_users, &headers, rows).map_err(|e| {
        ui::error(&e.to_string());
        CliError::InputError
    })?;
    report_plan(&plan, output_format);

    if plan.updates.is_empty() {
        ui::success("All users already match the file");
        return Ok(());
    }
    if dry_run {
        ui::info(&format!(
            "Dry run: {} user(s) would be updated",
            plan.updates.len()
        ));
        return Ok(());
    }

    let bar = ui::progress_bar(plan.updates.len() as u64, "Updating users");
    let outcome = apply_user_updates(&mut session, &plan, &connection.pacing, |_| bar.inc(1));
    bar.finish_and_clear();

    ui::success(&format!("Updated {} user(s)", outcome.updated.len()));
    for (user_name, error) in &outcome.failed {
        ui::error_with_details(&format!("Failed to update {}", user_name), &error.to_string());
    }
    if !outcome.failed.is_empty() {
        return Err(CliError::RemoteError);
    }
    Ok(())
}

fn report_plan(plan: &UpdatePlan, output_format: OutputFormat) {
    for user_name in &plan.unmatched {
        ui::warning(&format!("{} is not a user in the domain", user_name));
    }
    ui::info(&format!(
        "{} of {} user(s) differ from the file",
        plan.updates.len(),
        plan.total_users
    ));

    match output_format {
        OutputFormat::Pretty => {
            let pairs: Vec<(String, String)> = plan
                .updates
                .iter()
                .map(|u| (u.user_name.clone(), u.changed.join(", ")))
                .collect();
            ui::pretty_output_pairs(&pairs);
        }
        OutputFormat::Json => {
            let changes: Vec<_> = plan
                .updates
                .iter()
                .map(|u| json!({ "userName": u.user_name, "changed": u.changed }))
                .collect();
            ui::json_output(&changes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_capture_spec_groups_permissions_by_role() {
        let spec = capture_spec(
            &[],
            &[
                "admin:ManageUsers".to_string(),
                "agent:ReceiveTransfer".to_string(),
                "admin:EditCampaigns".to_string(),
            ],
        )
        .unwrap();

        assert_eq!(spec.fields, CaptureSpec::default().fields);
        assert_eq!(spec.permissions["admin"], vec!["ManageUsers", "EditCampaigns"]);
        assert_eq!(spec.permissions["agent"], vec!["ReceiveTransfer"]);
    }

    #[test]
    fn test_capture_spec_rejects_malformed_permission() {
        assert_matches!(
            capture_spec(&[], &["ManageUsers".to_string()]),
            Err(CliError::InputError)
        );
    }
}
