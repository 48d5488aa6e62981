use std::path::Path;

use serde_json::json;

use five9_core::lists::{
    ListDeleteSettings, ListOutcome, ListUpdateSettings, add_records_to_list,
    delete_records_from_list, fields_mapping,
};
use five9_core::FieldMapping;
use five9_session::SessionType;

use crate::errors::CliError;
use crate::files;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Adds every row of a CSV file to a contact list.
pub fn add_list_records(
    connection: &ConnectionArgs,
    list_name: &str,
    input: &Path,
    keys: &[String],
    call_now: bool,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header(&format!("Adding records to list '{}'", list_name));
    let (headers, rows) = files::read_csv(input)?;
    let mut settings = ListUpdateSettings::new(mapping(&headers, keys)?);
    settings.call_now_mode = call_now;

    let mut session = connection.connect(SessionType::Admin)?;
    let bar = ui::progress_bar(rows.len() as u64, "Adding records");
    let outcome = add_records_to_list(
        &mut session,
        list_name,
        &settings,
        &headers,
        &rows,
        &connection.pacing,
        |_| bar.inc(1),
    );
    bar.finish_and_clear();

    report_outcome("Added", &outcome, output_format)
}

/// Removes every row of a CSV file from a contact list.
///
/// Without `keys` every column is used to match records.
pub fn delete_list_records(
    connection: &ConnectionArgs,
    list_name: &str,
    input: &Path,
    keys: &[String],
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header(&format!("Deleting records from list '{}'", list_name));
    let (headers, rows) = files::read_csv(input)?;
    let keys = if keys.is_empty() { &headers[..] } else { keys };
    let settings = ListDeleteSettings::new(mapping(&headers, keys)?);

    let mut session = connection.connect(SessionType::Admin)?;
    let bar = ui::progress_bar(rows.len() as u64, "Deleting records");
    let outcome = delete_records_from_list(
        &mut session,
        list_name,
        &settings,
        &headers,
        &rows,
        &connection.pacing,
        |_| bar.inc(1),
    );
    bar.finish_and_clear();

    report_outcome("Deleted", &outcome, output_format)
}

fn mapping(headers: &[String], keys: &[String]) -> Result<Vec<FieldMapping>, CliError> {
    fields_mapping(headers, keys).map_err(|e| {
        ui::error(&e.to_string());
        CliError::InputError
    })
}

fn report_outcome(
    verb: &str,
    outcome: &ListOutcome,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    match output_format {
        OutputFormat::Pretty => {
            ui::success(&format!("{} {} record(s)", verb, outcome.submitted.len()));
            for (row, error) in &outcome.failed {
                ui::error_with_details(&format!("Row {} was rejected", row), &error.to_string());
            }
        }
        OutputFormat::Json => {
            let submitted: Vec<_> = outcome
                .submitted
                .iter()
                .map(|(row, identifier)| json!({ "row": row, "identifier": identifier }))
                .collect();
            let failed: Vec<_> = outcome
                .failed
                .iter()
                .map(|(row, error)| json!({ "row": row, "error": error.to_string() }))
                .collect();
            ui::json_output(&json!({ "submitted": submitted, "failed": failed }));
        }
    }

    if !outcome.failed.is_empty() {
        return Err(CliError::RemoteError);
    }
    Ok(())
}
