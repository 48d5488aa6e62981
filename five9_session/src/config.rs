//! Where a session connects to.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HOSTNAME: &str = "api.five9.com";
pub const DEFAULT_API_VERSION: &str = "v13";

/// Short names for the regional API hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAlias {
    Us,
    Ca,
    Eu,
    Frk,
    In,
}

impl HostAlias {
    pub const ALL: [HostAlias; 5] = [
        HostAlias::Us,
        HostAlias::Ca,
        HostAlias::Eu,
        HostAlias::Frk,
        HostAlias::In,
    ];

    pub fn alias(&self) -> &'static str {
        match self {
            HostAlias::Us => "us",
            HostAlias::Ca => "ca",
            HostAlias::Eu => "eu",
            HostAlias::Frk => "frk",
            HostAlias::In => "in",
        }
    }

    pub fn hostname(&self) -> &'static str {
        match self {
            HostAlias::Us => "api.five9.com",
            HostAlias::Ca => "api.five9.ca",
            HostAlias::Eu => "api.five9.eu",
            HostAlias::Frk => "api.eu.five9.com",
            HostAlias::In => "api.in.five9.com",
        }
    }
}

impl fmt::Display for HostAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alias())
    }
}

impl FromStr for HostAlias {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HostAlias::ALL
            .into_iter()
            .find(|alias| alias.alias() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = HostAlias::ALL.iter().map(|a| a.alias()).collect();
                format!("Unknown host alias '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Which web service a session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionType {
    #[default]
    Admin,
    Statistics,
}

impl SessionType {
    pub fn path(&self) -> &'static str {
        match self {
            SessionType::Admin => "wsadmin",
            SessionType::Statistics => "wssupervisor",
        }
    }

    pub fn service(&self) -> &'static str {
        match self {
            SessionType::Admin => "AdminWebService",
            SessionType::Statistics => "SupervisorWebService",
        }
    }

    /// Target namespace of the service operations.
    pub fn namespace(&self) -> &'static str {
        match self {
            SessionType::Admin => "http://service.admin.ws.five9.com/",
            SessionType::Statistics => "http://service.supervisor.ws.five9.com/",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Admin => write!(f, "admin"),
            SessionType::Statistics => write!(f, "statistics"),
        }
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(SessionType::Admin),
            "statistics" | "supervisor" => Ok(SessionType::Statistics),
            _ => Err(format!(
                "Unknown session type '{}' (expected admin or statistics)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub hostname: String,
    pub session_type: SessionType,
    pub api_version: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            session_type: SessionType::Admin,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new(session_type: SessionType) -> Self {
        Self {
            session_type,
            ..Self::default()
        }
    }

    pub fn with_hostname(mut self, hostname: &str) -> Self {
        self.hostname = hostname.to_string();
        self
    }

    pub fn with_host_alias(mut self, alias: HostAlias) -> Self {
        self.hostname = alias.hostname().to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    /// The SOAP endpoint: `https://{host}/{path}/{version}/{service}`.
    pub fn endpoint_url(&self) -> String {
        format!(
            "https://{}/{}/{}/{}",
            self.hostname,
            self.session_type.path(),
            self.api_version,
            self.session_type.service()
        )
    }

    pub fn wsdl_url(&self, username: &str) -> String {
        format!("{}?wsdl&user={}", self.endpoint_url(), username)
    }
}
