use std::path::PathBuf;

use chrono::NaiveDate;

use five9_core::ReportCriteria;
use five9_core::reporting::{self, PollSettings, ReportRequest};
use five9_session::SessionType;

use crate::errors::CliError;
use crate::files;
use crate::session::ConnectionArgs;
use crate::ui;

/// Runs a report for one day and saves the CSV result.
pub fn run_report(
    connection: &ConnectionArgs,
    folder: &str,
    name: &str,
    date: Option<&str>,
    output: Option<PathBuf>,
    max_polls: Option<u32>,
) -> Result<(), CliError> {
    ui::header(&format!("Running report '{}/{}'", folder, name));

    let criteria = match date {
        Some(date) => {
            let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                ui::error_with_details(&format!("Invalid date '{}'", date), &e.to_string());
                CliError::InputError
            })?;
            ReportCriteria::for_day(day)
        }
        None => ReportCriteria::today(),
    };
    let request = ReportRequest {
        folder_name: folder.to_string(),
        report_name: name.to_string(),
        criteria,
    };
    let poll = PollSettings {
        max_polls,
        ..PollSettings::default()
    };

    let mut session = connection.connect(SessionType::Admin)?;
    let spinner = ui::spinner("Waiting for report");
    let result = reporting::run_report(&mut session, &request, &poll, |polls| {
        spinner.set_message(format!("Waiting for report ({} checks)", polls));
    });
    spinner.finish_and_clear();
    let result = result.map_err(|e| {
        ui::error(&e.to_string());
        CliError::RemoteError
    })?;

    let path = output.unwrap_or_else(|| files::dated_file_name(name, "csv"));
    files::write_text(&path, &result.csv)?;
    ui::success(&format!(
        "Saved {} row(s) to {}",
        result.row_count(),
        path.display()
    ));
    Ok(())
}
