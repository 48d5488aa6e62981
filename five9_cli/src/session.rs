//! Credential resolution and session setup for remote commands.

use std::time::Duration;

use inquire::{Password, Text};

use five9_core::Pacing;
use five9_session::{CredentialStore, Credentials, Five9Session, SessionConfig, SessionType};

use crate::cli::Five9Cli;
use crate::errors::CliError;
use crate::ui;

/// Connection settings shared by every remote command.
#[derive(Debug, Clone)]
pub struct ConnectionArgs {
    pub username: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
    pub credentials: std::path::PathBuf,
    pub config: SessionConfig,
    pub pacing: Pacing,
}

impl ConnectionArgs {
    pub fn from_cli(cli: &Five9Cli) -> Self {
        let mut config = SessionConfig::default().with_api_version(&cli.api_version);
        if let Some(alias) = cli.host_alias {
            config = config.with_host_alias(alias);
        }
        if let Some(hostname) = &cli.hostname {
            config = config.with_hostname(hostname);
        }

        Self {
            username: cli.username.clone(),
            password: cli.password.clone(),
            account: cli.account.clone(),
            credentials: cli.credentials.clone(),
            config,
            pacing: Pacing::new(Duration::from_millis(cli.delay_ms)),
        }
    }

    /// Opens a session of the given type, prompting for anything missing.
    pub fn connect(&self, session_type: SessionType) -> Result<Five9Session, CliError> {
        let credentials = self.resolve_credentials()?;
        let config = SessionConfig {
            session_type,
            ..self.config.clone()
        };

        let spinner = ui::spinner(&format!(
            "Connecting to {} as {}",
            config.hostname, credentials.username
        ));
        match Five9Session::connect(config, credentials) {
            Ok(session) => {
                spinner.finish_and_clear();
                match session.domain_name() {
                    Some(domain) => ui::success(&format!("Connected to domain '{}'", domain)),
                    None => ui::success(&format!("Connected as {}", session.username())),
                }
                Ok(session)
            }
            Err(e) => {
                spinner.finish_and_clear();
                ui::error_with_details("Failed to create session", &e.to_string());
                Err(CliError::SessionError)
            }
        }
    }

    fn resolve_credentials(&self) -> Result<Credentials, CliError> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
            (Some(username), None) => Ok(Credentials::new(username, &prompt_password()?)),
            (None, password) => {
                let store = CredentialStore::load(&self.credentials).map_err(|e| {
                    ui::error_with_details("Couldn't load credential store", &e.to_string());
                    CliError::FileError
                })?;
                if let Some(stored) = store.lookup(self.account.as_deref()) {
                    ui::debug(&format!(
                        "Using stored credentials for {}",
                        self.account.as_deref().unwrap_or("default account")
                    ));
                    return Ok(stored.clone());
                }

                let username = prompt_username()?;
                let password = match password {
                    Some(password) => password.clone(),
                    None => prompt_password()?,
                };
                Ok(Credentials::new(&username, &password))
            }
        }
    }
}

fn prompt_username() -> Result<String, CliError> {
    Text::new("Five9 Username:")
        .prompt()
        .map_err(|_| CliError::InputError)
}

fn prompt_password() -> Result<String, CliError> {
    Password::new("Five9 Password:")
        .without_confirmation()
        .prompt()
        .map_err(|_| CliError::InputError)
}
