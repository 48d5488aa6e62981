use five9_session::SessionType;

use crate::errors::CliError;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Lists the operations declared by the service WSDL.
pub fn list_methods(
    connection: &ConnectionArgs,
    statistics: bool,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Listing available methods");
    let session_type = if statistics {
        SessionType::Statistics
    } else {
        SessionType::Admin
    };
    let mut session = connection.connect(session_type)?;

    let operations = session.operations().map_err(|e| {
        ui::error_with_details("Couldn't read the service definition", &e.to_string());
        CliError::RemoteError
    })?;

    match output_format {
        OutputFormat::Pretty => {
            for operation in operations {
                ui::raw_output(&format!("\t{}", operation));
            }
            ui::success(&format!("{} methods available", operations.len()));
        }
        OutputFormat::Json => ui::json_output(operations),
    }
    Ok(())
}
