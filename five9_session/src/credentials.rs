//! Account credentials and the JSON credential store.
//!
//! The store maps an alias to a username/password pair:
//!
//! ```json
//! { "default_account": { "username": "admin@example.com", "password": "..." } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::SessionError;

pub const DEFAULT_ACCOUNT: &str = "default_account";

/// Username shipped in the credential template; treated as unset.
pub const PLACEHOLDER_USERNAME: &str = "apiUserUsername";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Value of an HTTP basic `Authorization` header.
    pub fn basic_auth(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialStore {
    accounts: BTreeMap<String, Credentials>,
}

impl CredentialStore {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let accounts = serde_json::from_str(json)
            .map_err(|e| SessionError::Credentials(format!("Invalid credential store: {}", e)))?;
        Ok(Self { accounts })
    }

    /// Loads the store, treating a missing file as an empty store.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            debug!("No credential store at {}", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).map_err(|e| {
            SessionError::Credentials(format!("Could not read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Credentials for `alias`, or the default account when no alias is given.
    ///
    /// Entries still carrying the template username are reported as missing.
    pub fn lookup(&self, alias: Option<&str>) -> Option<&Credentials> {
        let alias = alias.unwrap_or(DEFAULT_ACCOUNT);
        self.accounts
            .get(alias)
            .filter(|credentials| credentials.username != PLACEHOLDER_USERNAME)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }
}
