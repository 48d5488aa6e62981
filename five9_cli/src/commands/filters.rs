use std::path::Path;

use serde_json::{Map, Value, json};

use five9_core::{CampaignProfileFilter, ConfigService, Pacing, record_text};
use five9_lang::filter::render::render_condition;
use five9_lang::filter::InlineCondition;
use five9_lang::{demystify_filter, flatten};
use five9_session::{Five9Session, SessionType};

use crate::errors::CliError;
use crate::files;
use crate::session::ConnectionArgs;
use crate::ui::{self, OutputFormat};

/// Prints or writes the readable form of campaign profile filters.
pub fn demystify_filters(
    connection: &ConnectionArgs,
    file: Option<&Path>,
    profile: Option<&str>,
    output_dir: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Demystifying campaign profile filters");

    let filters = match file {
        Some(path) => vec![(files::file_stem(path), read_filter(path)?)],
        None => {
            let mut session = connection.connect(SessionType::Admin)?;
            fetch_filters(&mut session, profile, &connection.pacing)?
        }
    };

    let mut rendered: Vec<(String, String)> = Vec::new();
    let mut failed = 0;
    for (name, filter) in &filters {
        if !filter.has_custom_expression() {
            ui::debug(&format!("Skipping '{}': no custom expression", name));
            continue;
        }
        match demystify_filter(filter) {
            Ok(text) => rendered.push((name.clone(), text)),
            Err(e) => {
                ui::error_with_details(&format!("Couldn't demystify '{}'", name), &e.to_string());
                failed += 1;
            }
        }
    }

    match output_dir {
        Some(dir) => {
            for (name, text) in &rendered {
                let path = dir.join(format!("{}.txt", files::safe_file_name(name)));
                files::write_text(&path, text)?;
            }
            ui::success(&format!(
                "Wrote {} filter(s) to {}",
                rendered.len(),
                dir.display()
            ));
        }
        None => match output_format {
            OutputFormat::Pretty => {
                for (name, text) in &rendered {
                    ui::header(name);
                    ui::raw_output(text);
                }
                ui::success(&format!("Demystified {} filter(s)", rendered.len()));
            }
            OutputFormat::Json => {
                let output: Map<String, Value> = rendered
                    .into_iter()
                    .map(|(name, text)| (name, Value::String(text)))
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

/// Converts readable filter text back into the stored form.
pub fn remystify_filter(
    input: &Path,
    keep_numbers: bool,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header("Remystifying campaign profile filter");
    let text = files::read_text(input)?;

    if keep_numbers {
        let expression = flatten(&text).map_err(|e| {
            ui::error_with_details("Couldn't parse filter text", &e.to_string());
            CliError::TransformError
        })?;
        match output_format {
            OutputFormat::Pretty => ui::raw_output(&expression),
            OutputFormat::Json => ui::json_output(&json!({ "expression": expression })),
        }
        return Ok(());
    }

    let filter = five9_lang::remystify_filter(&text).map_err(|e| {
        ui::error_with_details("Couldn't parse filter text", &e.to_string());
        CliError::TransformError
    })?;

    match output_format {
        OutputFormat::Pretty => {
            ui::success(&format!(
                "Expression with {} condition(s)",
                filter.crm_criteria.len()
            ));
            ui::raw_output(filter.expression());
            for (position, condition) in filter.crm_criteria.iter().enumerate() {
                ui::raw_output(&render_condition(&InlineCondition {
                    condition: condition.clone(),
                    index: position + 1,
                }));
            }
        }
        OutputFormat::Json => ui::json_output(&filter),
    }
    Ok(())
}

fn read_filter(path: &Path) -> Result<CampaignProfileFilter, CliError> {
    let json = files::read_text(path)?;
    serde_json::from_str(&json).map_err(|e| {
        ui::error_with_details(
            &format!("{} is not a campaign profile filter", path.display()),
            &e.to_string(),
        );
        CliError::InputError
    })
}

fn fetch_filters(
    session: &mut Five9Session,
    profile: Option<&str>,
    pacing: &Pacing,
) -> Result<Vec<(String, CampaignProfileFilter)>, CliError> {
    let profiles = session.campaign_profiles().map_err(|e| {
        ui::error_with_details("Couldn't list campaign profiles", &e.to_string());
        CliError::RemoteError
    })?;

    let names: Vec<String> = profiles
        .iter()
        .map(|p| record_text(p.get("name")))
        .filter(|name| profile.is_none_or(|wanted| wanted == name))
        .collect();
    if let (Some(wanted), true) = (profile, names.is_empty()) {
        ui::error(&format!("Campaign profile '{}' not found", wanted));
        return Err(CliError::InputError);
    }

    let bar = ui::progress_bar(names.len() as u64, "Fetching filters");
    let mut filters = Vec::with_capacity(names.len());
    for name in names {
        pacing.pause();
        let filter = session.campaign_profile_filter(&name).map_err(|e| {
            bar.finish_and_clear();
            ui::error_with_details(&format!("Couldn't fetch filter of '{}'", name), &e.to_string());
            CliError::RemoteError
        })?;
        filters.push((name, filter));
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(filters)
}
