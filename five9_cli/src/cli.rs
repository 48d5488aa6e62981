use clap::{Parser, Subcommand};
use std::path::PathBuf;

use five9_session::HostAlias;

use super::ui::OutputFormat;

/// Defines the top-level interface for the Five9 CLI with clap.
#[derive(Parser, Debug)]
#[command(name = "five9")]
#[command(version, about = "Five9 CLI: Administer contact-center domains in the terminal.")]
pub struct Five9Cli {
    /// Five9 username. Prompts for the password if it is not given.
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Five9 password.
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Alias of an account in the credential store.
    #[arg(short, long, global = true)]
    pub account: Option<String>,

    /// Path to the JSON credential store.
    #[arg(
        long,
        global = true,
        env = "FIVE9_CREDENTIALS",
        default_value = "private/credentials.json"
    )]
    pub credentials: PathBuf,

    /// Regional API host (us, ca, eu, frk or in).
    #[arg(long, global = true, conflicts_with = "hostname")]
    pub host_alias: Option<HostAlias>,

    /// API hostname, e.g. api.five9.com
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    /// API version to target.
    #[arg(long, global = true, default_value = "v13")]
    pub api_version: String,

    /// Delay between remote calls, in milliseconds.
    #[arg(long, global = true, default_value_t = 300)]
    pub delay_ms: u64,

    /// Enable verbose output?
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Five9CliCommand,
}

/// Defines the available subcommands of the Five9 CLI.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Five9CliCommand {
    /// Print campaign profile filters in readable form.
    Demystify {
        /// Local filter JSON file. Reads from the domain if not given.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Only this campaign profile.
        #[arg(long, conflicts_with = "file")]
        profile: Option<String>,
        /// Write one text file per profile into this directory.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Convert readable filter text back into an expression and conditions.
    Remystify {
        /// Text file produced by demystify.
        input: PathBuf,
        /// Keep the condition numbers as written instead of renumbering.
        #[arg(long)]
        flatten: bool,
    },
    /// Extract the JavaScript functions of IVR scripts.
    IvrFunctions {
        /// Local IVR script XML file. Reads from the domain if not given.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Only this IVR script.
        #[arg(long, conflicts_with = "file")]
        ivr: Option<String>,
        /// Write one .js file per function into this directory.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// List the script variables used by each IVR.
    IvrVariables,
    /// Write user details and permissions to a CSV file.
    UsersCapture {
        /// Target CSV file. Defaults to users_<date>.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// General info field to capture (can be repeated).
        #[arg(long = "field")]
        fields: Vec<String>,
        /// Permission to capture (can be repeated). Format: --permission <role>:<type>
        #[arg(long = "permission", value_name = "ROLE:TYPE")]
        permissions: Vec<String>,
    },
    /// Update users from a CSV file keyed by userName.
    UsersUpdate {
        /// CSV file with a userName column.
        input: PathBuf,
        /// Show what would change without submitting anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Add or remove skills for a set of users.
    UserSkills {
        /// User names to update.
        #[arg(required = true)]
        users: Vec<String>,
        /// Skill to add (can be repeated).
        #[arg(long)]
        add: Vec<String>,
        /// Skill to remove (can be repeated).
        #[arg(long)]
        remove: Vec<String>,
    },
    /// Add the records of a CSV file to a contact list.
    ListAdd {
        /// Contact list name.
        list: String,
        /// CSV file whose headers are contact field names.
        input: PathBuf,
        /// Contact field that identifies a record (can be repeated).
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
        /// Put the new records in the ASAP queue.
        #[arg(long)]
        call_now: bool,
    },
    /// Remove the records of a CSV file from a contact list.
    ListDelete {
        /// Contact list name.
        list: String,
        /// CSV file whose headers are contact field names.
        input: PathBuf,
        /// Contact field that identifies a record (can be repeated). Defaults to every column.
        #[arg(long = "key")]
        keys: Vec<String>,
    },
    /// Show current API usage against the rate limits.
    RateLimits,
    /// Run a report and save its CSV result.
    Report {
        /// Report folder name.
        #[arg(long)]
        folder: String,
        /// Report name.
        #[arg(long)]
        name: String,
        /// Day to report on (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,
        /// Target CSV file. Defaults to <name>_<date>.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Give up after this many checks.
        #[arg(long)]
        max_polls: Option<u32>,
    },
    /// Capture domain configuration into a directory of JSON files.
    Capture {
        /// Snapshot root directory.
        #[arg(short, long, default_value = "domain_snapshots")]
        output_dir: PathBuf,
        /// List operation to capture (can be repeated). Defaults to the standard set.
        #[arg(long = "method")]
        methods: Vec<String>,
    },
    /// List the operations the web service supports.
    Methods {
        /// Use the supervisor service instead of the admin service.
        #[arg(long)]
        statistics: bool,
    },
    /// Fetch a supervisor statistics table.
    Statistics {
        /// Statistic type, e.g. AgentState or ACDStatus.
        statistic_type: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Five9Cli::try_parse_from(["five9", "rate-limits", "--host-alias", "eu", "-v"]).unwrap();
        assert_eq!(cli.command, Five9CliCommand::RateLimits);
        assert_eq!(cli.host_alias, Some(HostAlias::Eu));
        assert!(cli.verbose);
        assert_eq!(cli.api_version, "v13");
        assert_eq!(cli.delay_ms, 300);
    }

    #[test]
    fn test_host_alias_conflicts_with_hostname() {
        let result = Five9Cli::try_parse_from([
            "five9",
            "methods",
            "--host-alias",
            "ca",
            "--hostname",
            "api.example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_host_alias_is_rejected() {
        assert!(Five9Cli::try_parse_from(["five9", "rate-limits", "--host-alias", "mars"]).is_err());
    }

    #[test]
    fn test_users_capture_repeated_options() {
        let cli = Five9Cli::try_parse_from([
            "five9",
            "users-capture",
            "--field",
            "userName",
            "--field",
            "federationId",
            "--permission",
            "admin:ManageUsers",
        ])
        .unwrap();
        if let Five9CliCommand::UsersCapture {
            fields,
            permissions,
            output,
        } = cli.command
        {
            assert_eq!(fields, vec!["userName", "federationId"]);
            assert_eq!(permissions, vec!["admin:ManageUsers"]);
            assert_eq!(output, None);
        } else {
            panic!("Expected UsersCapture command");
        }
    }

    #[test]
    fn test_list_add_requires_a_key() {
        assert!(Five9Cli::try_parse_from(["five9", "list-add", "outreach", "rows.csv"]).is_err());

        let cli = Five9Cli::try_parse_from([
            "five9", "list-add", "outreach", "rows.csv", "--key", "uuid", "--call-now",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Five9CliCommand::ListAdd {
                list: "outreach".to_string(),
                input: PathBuf::from("rows.csv"),
                keys: vec!["uuid".to_string()],
                call_now: true,
            }
        );
    }

    #[test]
    fn test_user_skills_arguments() {
        let cli = Five9Cli::try_parse_from([
            "five9", "user-skills", "ann", "bob", "--add", "omni", "--remove", "legacy",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Five9CliCommand::UserSkills {
                users: vec!["ann".to_string(), "bob".to_string()],
                add: vec!["omni".to_string()],
                remove: vec!["legacy".to_string()],
            }
        );
        assert!(Five9Cli::try_parse_from(["five9", "user-skills", "--add", "omni"]).is_err());
    }

    #[test]
    fn test_json_format() {
        let cli = Five9Cli::try_parse_from(["five9", "remystify", "filter.txt", "--format", "json"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
