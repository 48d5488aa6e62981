use five9_session::SessionType;

use crate::errors::CliError;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Shows API usage per operation type against each rate-limit window.
pub fn show_rate_limits(
    connection: &ConnectionArgs,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Checking API rate limits");
    let mut session = connection.connect(SessionType::Admin)?;

    let usage = session.current_api_usage_formatted().map_err(|e| {
        ui::error_with_details("Couldn't fetch call counters", &e.to_string());
        CliError::RemoteError
    })?;

    match output_format {
        OutputFormat::Pretty => ui::raw_output(&usage),
        OutputFormat::Json => ui::json_output(session.call_counters()),
    }
    Ok(())
}
