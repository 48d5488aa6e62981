use std::path::Path;

use serde_json::json;

use five9_core::capture::{self, DEFAULT_METHODS, with_dependencies};
use five9_lang::demystify_filter;
use five9_session::SessionType;

use crate::errors::CliError;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Captures domain configuration into `<output_dir>/<domain name>/`.
pub fn capture_domain(
    connection: &ConnectionArgs,
    output_dir: &Path,
    methods: &[String],
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Capturing domain configuration");

    let requested: Vec<String> = if methods.is_empty() {
        DEFAULT_METHODS.iter().map(|m| m.to_string()).collect()
    } else {
        methods.to_vec()
    };
    let methods = with_dependencies(&requested);
    ui::debug(&format!("Capturing {}", methods.join(", ")));

    let mut session = connection.connect(SessionType::Admin)?;
    let spinner = ui::spinner(&format!("Fetching {} method(s)", methods.len()));
    let snapshot = capture::capture_domain(&mut session, &methods, &connection.pacing, demystify_filter);
    spinner.finish_and_clear();
    let snapshot = snapshot.map_err(|e| {
        ui::error(&e.to_string());
        CliError::RemoteError
    })?;

    let domain_path = snapshot.write_to(output_dir).map_err(|e| {
        ui::error(&e.to_string());
        CliError::FileError
    })?;

    for (method, error) in &snapshot.failures {
        ui::warning(&format!("Skipped {}: {}", method, error));
    }

    match output_format {
        OutputFormat::Pretty => ui::success(&format!(
            "Captured {} document(s) to {}",
            snapshot.documents.len(),
            domain_path.display()
        )),
        OutputFormat::Json => {
            let failures: Vec<_> = snapshot
                .failures
                .iter()
                .map(|(method, error)| json!({ "method": method, "error": error.to_string() }))
                .collect();
            ui::json_output(&json!({
                "domain": snapshot.domain_name,
                "path": domain_path.display().to_string(),
                "documents": snapshot.documents.len(),
                "failures": failures,
            }));
        }
    }
    Ok(())
}
