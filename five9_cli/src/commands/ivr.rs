use std::path::Path;

use serde_json::{Map, Value, json};

use five9_core::{ConfigService, IvrScript};
use five9_lang::{IvrFunction, extract_functions, variable_usage};
use five9_session::SessionType;

use crate::errors::CliError;
use crate::files;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Extracts the JavaScript functions from one or more IVR scripts.
pub fn extract_ivr_functions(
    connection: &ConnectionArgs,
    file: Option<&Path>,
    ivr: Option<&str>,
    output_dir: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Extracting IVR functions");

    let scripts: Vec<(String, String)> = match file {
        Some(path) => vec![(files::file_stem(path), files::read_text(path)?)],
        None => fetch_scripts(connection)?
            .into_iter()
            .filter(|script| ivr.is_none_or(|wanted| wanted == script.name))
            .map(|script| (script.name, script.xml_definition))
            .collect(),
    };
    if let (Some(wanted), true) = (ivr, scripts.is_empty()) {
        ui::error(&format!("IVR script '{}' not found", wanted));
        return Err(CliError::InputError);
    }

    let mut extracted: Vec<(String, Vec<IvrFunction>)> = Vec::new();
    let mut failed = 0;
    for (name, xml) in scripts {
        match extract_functions(&xml) {
            Ok(functions) => extracted.push((name, functions)),
            Err(e) => {
                ui::error_with_details(&format!("Couldn't read IVR '{}'", name), &e.to_string());
                failed += 1;
            }
        }
    }
    let total: usize = extracted.iter().map(|(_, functions)| functions.len()).sum();

    match output_dir {
        Some(dir) => {
            for (name, functions) in &extracted {
                let ivr_dir = dir.join(files::safe_file_name(name));
                for function in functions {
                    let path = ivr_dir.join(format!("{}.js", files::safe_file_name(&function.name)));
                    files::write_text(&path, &function.to_javascript())?;
                }
            }
            ui::success(&format!("Wrote {} function(s) to {}", total, dir.display()));
        }
        None => match output_format {
            OutputFormat::Pretty => {
                for (name, functions) in &extracted {
                    ui::header(name);
                    for function in functions {
                        ui::raw_output(&function.to_javascript());
                    }
                }
                ui::success(&format!("Extracted {} function(s)", total));
            }
            OutputFormat::Json => {
                let output: Map<String, Value> = extracted
                    .iter()
                    .map(|(name, functions)| {
                        let functions: Vec<Value> = functions
                            .iter()
                            .map(|f| {
                                json!({
                                    "name": f.name,
                                    "arguments": f.arguments,
                                    "javascript": f.to_javascript(),
                                })
                            })
                            .collect();
                        (name.clone(), Value::Array(functions))
                    })
                    .collect();
                ui::json_output(&output);
            }
        },
    }

    if failed > 0 {
        return Err(CliError::TransformError);
    }
    Ok(())
}

/// Lists the dotted script variables each IVR uses.
pub fn ivr_variables(
    connection: &ConnectionArgs,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Collecting IVR variable usage");
    let scripts = fetch_scripts(connection)?;
    let usage = variable_usage(&scripts);

    match output_format {
        OutputFormat::Pretty => {
            for (variable, ivrs) in &usage {
                ui::raw_output(variable);
                for ivr in ivrs {
                    ui::raw_output(&format!("\t{}", ivr));
                }
            }
            ui::success(&format!(
                "Found {} variable(s) across {} IVR script(s)",
                usage.len(),
                scripts.len()
            ));
        }
        OutputFormat::Json => ui::json_output(&usage),
    }
    Ok(())
}

fn fetch_scripts(connection: &ConnectionArgs) -> Result<Vec<IvrScript>, CliError> {
    let mut session = connection.connect(SessionType::Admin)?;
    let spinner = ui::spinner("Fetching IVR scripts");
    let result = session.ivr_scripts();
    spinner.finish_and_clear();
    result.map_err(|e| {
        ui::error_with_details("Couldn't fetch IVR scripts", &e.to_string());
        CliError::RemoteError
    })
}
