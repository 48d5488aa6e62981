mod cli;
mod commands;
mod errors;
mod files;
mod session;
mod ui;

use std::process::ExitCode;

use clap::Parser;
use indicatif_log_bridge::LogWrapper;

use cli::{Five9Cli, Five9CliCommand};
use errors::CliError;
use session::ConnectionArgs;

fn main() -> ExitCode {
    let cli = Five9Cli::parse();
    initialize_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Command failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Five9Cli) -> Result<(), CliError> {
    let connection = ConnectionArgs::from_cli(cli);
    let format = cli.format;

    match &cli.command {
        Five9CliCommand::Demystify {
            file,
            profile,
            output_dir,
        } => commands::demystify_filters(
            &connection,
            file.as_deref(),
            profile.as_deref(),
            output_dir.as_deref(),
            format,
        ),
        Five9CliCommand::Remystify { input, flatten } => {
            commands::remystify_filter(input, *flatten, format)
        }
        Five9CliCommand::IvrFunctions {
            file,
            ivr,
            output_dir,
        } => commands::extract_ivr_functions(
            &connection,
            file.as_deref(),
            ivr.as_deref(),
            output_dir.as_deref(),
            format,
        ),
        Five9CliCommand::IvrVariables => commands::ivr_variables(&connection, format),
        Five9CliCommand::UsersCapture {
            output,
            fields,
            permissions,
        } => commands::capture_users(&connection, output.clone(), fields, permissions),
        Five9CliCommand::UsersUpdate { input, dry_run } => {
            commands::update_users(&connection, input, *dry_run, format)
        }
        Five9CliCommand::UserSkills { users, add, remove } => {
            commands::update_user_skills(&connection, users, add, remove, format)
        }
        Five9CliCommand::ListAdd {
            list,
            input,
            keys,
            call_now,
        } => commands::add_list_records(&connection, list, input, keys, *call_now, format),
        Five9CliCommand::ListDelete { list, input, keys } => {
            commands::delete_list_records(&connection, list, input, keys, format)
        }
        Five9CliCommand::RateLimits => commands::show_rate_limits(&connection, format),
        Five9CliCommand::Report {
            folder,
            name,
            date,
            output,
            max_polls,
        } => commands::run_report(
            &connection,
            folder,
            name,
            date.as_deref(),
            output.clone(),
            *max_polls,
        ),
        Five9CliCommand::Capture {
            output_dir,
            methods,
        } => commands::capture_domain(&connection, output_dir, methods, format),
        Five9CliCommand::Methods { statistics } => {
            commands::list_methods(&connection, *statistics, format)
        }
        Five9CliCommand::Statistics { statistic_type } => {
            commands::show_statistics(&connection, statistic_type, format)
        }
    }
}

/// Logs go to stderr through the progress area so they don't tear spinners.
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn initialize_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    if atty::is(atty::Stream::Stderr) {
        builder.format_timestamp(None).format_target(false);
    } else {
        builder.format_timestamp_millis();
    }

    let logger = builder.build();
    let max_level = logger.filter();
    if LogWrapper::new(ui::progress().clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(max_level);
    }
}
