use chrono::{Local, Offset};
use serde_json::{Value, json};

use five9_core::de::into_list;
use five9_core::record_text;
use five9_session::SessionType;

use crate::errors::CliError;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Fetches one supervisor statistics table for the current day.
pub fn show_statistics(
    connection: &ConnectionArgs,
    statistic_type: &str,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header(&format!("Fetching {} statistics", statistic_type));
    let mut session = connection.connect(SessionType::Statistics)?;

    session
        .set_session_parameters(view_settings())
        .map_err(|e| {
            ui::error_with_details("Couldn't set the statistics view", &e.to_string());
            CliError::RemoteError
        })?;
    let statistics = session.statistics(statistic_type).map_err(|e| {
        ui::error_with_details("Couldn't fetch statistics", &e.to_string());
        CliError::RemoteError
    })?;

    match output_format {
        OutputFormat::Pretty => {
            let (columns, rows) = statistics_table(&statistics);
            ui::raw_output(&columns.join("\t"));
            for row in &rows {
                ui::raw_output(&row.join("\t"));
            }
            ui::success(&format!("{} row(s)", rows.len()));
        }
        OutputFormat::Json => ui::json_output(&statistics),
    }
    Ok(())
}

/// Current-day view in the local time zone.
fn view_settings() -> Value {
    let offset_ms = i64::from(Local::now().offset().fix().local_minus_utc()) * 1000;
    json!({
        "rollingPeriod": "Minutes30",
        "shiftStart": 0,
        "statisticsRange": "CurrentDay",
        "timeZone": offset_ms,
    })
}

/// Column names and row values of a statistics table.
fn statistics_table(statistics: &Value) -> (Vec<String>, Vec<Vec<String>>) {
    let columns: Vec<String> = into_list(statistics["columns"]["values"].clone())
        .iter()
        .map(|v| record_text(Some(v)))
        .collect();
    let rows: Vec<Vec<String>> = into_list(statistics["rows"].clone())
        .iter()
        .map(|row| {
            into_list(row["values"]["data"].clone())
                .iter()
                .map(|v| record_text(Some(v)))
                .collect()
        })
        .collect();
    (columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_table() {
        let statistics = json!({
            "type": "AgentState",
            "columns": {"values": ["Username", "State"]},
            "rows": [
                {"values": {"data": ["jdoe", "Ready"]}},
                {"values": {"data": ["asmith", null]}}
            ]
        });
        let (columns, rows) = statistics_table(&statistics);
        assert_eq!(columns, vec!["Username", "State"]);
        assert_eq!(rows[0], vec!["jdoe", "Ready"]);
        assert_eq!(rows[1], vec!["asmith", ""]);
    }

    #[test]
    fn test_statistics_table_single_row() {
        let statistics = json!({
            "columns": {"values": "Username"},
            "rows": {"values": {"data": "jdoe"}}
        });
        let (columns, rows) = statistics_table(&statistics);
        assert_eq!(columns, vec!["Username"]);
        assert_eq!(rows, vec![vec!["jdoe".to_string()]]);
    }
}
