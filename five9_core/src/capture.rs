//! Domain configuration snapshots.
//!
//! A snapshot is a set of JSON documents keyed by a path relative to the
//! domain's snapshot directory. Capturing talks to the service; writing is a
//! separate step so snapshots can be inspected before they touch the disk.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{Map, Value, json};

use crate::de::into_list;
use crate::filter::CampaignProfileFilter;
use crate::service::{ConfigService, Pacing, ServiceError};

/// List operations captured by default. Order matters when syncing domains.
pub const DEFAULT_METHODS: &[&str] = &[
    "getAvailableLocales",
    "getDialingRules",
    "getSkills",
    "getPrompts",
    "getDispositions",
    "getWebConnectors",
    "getCallVariableGroups",
    "getCallVariables",
    "getContactFields",
    "getAgentGroups",
    "getCampaignProfiles",
    "getCampaigns",
    "getIVRScripts",
    "getSpeedDialNumbers",
    "getUserProfiles",
];

/// Entries kept when a snapshot directory is cleared.
const PRESERVED_ENTRIES: &[&str] = &[".git", ".gitignore"];

/// Operations that need another operation captured alongside them.
fn dependencies(method: &str) -> &'static [&'static str] {
    match method {
        "getCampaignProfiles" => &["getCampaigns"],
        _ => &[],
    }
}

/// Parameters some list operations require.
fn default_params(method: &str) -> Value {
    match method {
        "getAgentGroups" => json!({ "agentGroupNamePattern": ".*" }),
        _ => Value::Null,
    }
}

/// Appends the dependencies of the requested methods, keeping the requested order.
pub fn with_dependencies(methods: &[String]) -> Vec<String> {
    let mut resolved: Vec<String> = methods.to_vec();
    for method in methods {
        for dependency in dependencies(method) {
            if !resolved.iter().any(|m| m == dependency) {
                resolved.push(dependency.to_string());
            }
        }
    }
    resolved
}

#[derive(Debug)]
pub enum CaptureError {
    /// The domain identity could not be fetched, so there is nowhere to write.
    Configuration(ServiceError),
    /// The domain name does not name a directory below the snapshot root.
    InvalidDomainName(String),
    Io(io::Error),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Configuration(error) => {
                write!(f, "Could not read the domain configuration: {}", error)
            }
            CaptureError::InvalidDomainName(name) => {
                write!(f, "Domain name '{}' cannot be used as a snapshot directory", name)
            }
            CaptureError::Io(error) => write!(f, "Could not write the snapshot: {}", error),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<io::Error> for CaptureError {
    fn from(error: io::Error) -> Self {
        CaptureError::Io(error)
    }
}

/// Captured documents for one domain.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub domain_name: String,
    pub documents: BTreeMap<PathBuf, String>,
    /// Operations that faulted, with the error. They are skipped, not fatal.
    pub failures: Vec<(String, ServiceError)>,
}

impl Snapshot {
    fn add_json(&mut self, path: PathBuf, value: &Value) {
        self.documents.insert(path, canonical_json(value));
    }

    /// Writes the snapshot under `root/<domain name>`, replacing earlier contents.
    ///
    /// Returns the domain directory.
    pub fn write_to(&self, root: &Path) -> Result<PathBuf, CaptureError> {
        let domain_path = root.join(domain_directory_name(&self.domain_name)?);
        clear_directory(&domain_path)?;

        for (relative, contents) in &self.documents {
            let target = domain_path.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, contents)?;
        }

        Ok(domain_path)
    }
}

/// Directory name of a domain's snapshot. It must name a child of the root.
fn domain_directory_name(domain_name: &str) -> Result<String, CaptureError> {
    let name = file_name(domain_name);
    match name.trim() {
        "" | "." | ".." => Err(CaptureError::InvalidDomainName(domain_name.to_string())),
        _ => Ok(name),
    }
}

/// Removes everything in `path` except VCS metadata, creating it if missing.
fn clear_directory(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return fs::create_dir_all(path);
    }

    info!("Deleting existing snapshot data in {}", path.display());
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name();
        if PRESERVED_ENTRIES.iter().any(|keep| name == *keep) {
            continue;
        }
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Pretty JSON with object keys sorted, so snapshots diff cleanly.
pub fn canonical_json(value: &Value) -> String {
    let sorted = sort_keys(value);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| sorted.to_string())
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, item) in entries {
                sorted.insert(key.clone(), sort_keys(item));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Makes an object name usable as a file name.
fn file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

fn single_param(name: &str, value: &str) -> Value {
    let mut params = Map::new();
    params.insert(name.to_string(), Value::String(value.to_string()));
    Value::Object(params)
}

fn object_name(item: &Value) -> Option<&str> {
    item.get("name").and_then(Value::as_str)
}

/// Captures the given list operations into a snapshot.
///
/// `render_filter` turns a custom campaign profile filter into readable
/// text; rendered filters land in `campaign_profile_filters_demystified/`.
pub fn capture_domain<S, F, E>(
    service: &mut S,
    methods: &[String],
    pacing: &Pacing,
    render_filter: F,
) -> Result<Snapshot, CaptureError>
where
    S: ConfigService + ?Sized,
    F: Fn(&CampaignProfileFilter) -> Result<String, E>,
    E: fmt::Display,
{
    let configuration = service
        .vcc_configuration()
        .map_err(CaptureError::Configuration)?;
    domain_directory_name(&configuration.domain_name)?;
    let mut snapshot = Snapshot {
        domain_name: configuration.domain_name,
        ..Snapshot::default()
    };
    info!("Capturing domain {}", snapshot.domain_name);

    let mut capture = Capture {
        service,
        pacing,
        snapshot: &mut snapshot,
    };

    for method in with_dependencies(methods) {
        info!("\t{}", method);
        let result = match method.as_str() {
            "getIVRScripts" => capture.list_items(&method, "ivrs"),
            "getCampaigns" => capture.campaigns(&method),
            "getCampaignProfiles" => capture.campaign_profiles(&method, &render_filter),
            "getSkills" => capture.skills(&method),
            _ => capture.whole_list(&method).map(|_| ()),
        };
        if let Err(error) = result {
            warn!("{} failed: {}", method, error);
            capture.snapshot.failures.push((method, error));
        }
        capture.pacing.pause();
    }

    Ok(snapshot)
}

struct Capture<'a, S: ?Sized> {
    service: &'a mut S,
    pacing: &'a Pacing,
    snapshot: &'a mut Snapshot,
}

impl<S: ConfigService + ?Sized> Capture<'_, S> {
    /// Fetches a list operation and stores it as `<method>.json`.
    fn whole_list(&mut self, method: &str) -> Result<Vec<Value>, ServiceError> {
        let response = self.service.fetch(method, default_params(method))?;
        let items = into_list(response);
        self.snapshot.add_json(
            PathBuf::from(format!("{}.json", method)),
            &Value::Array(items.clone()),
        );
        Ok(items)
    }

    /// Stores every item of a list operation as its own document.
    fn list_items(&mut self, method: &str, folder: &str) -> Result<(), ServiceError> {
        let items = into_list(self.service.fetch(method, default_params(method))?);
        for item in &items {
            if let Some(name) = object_name(item) {
                debug!("\t\t{}", name);
                self.snapshot
                    .add_json(Path::new(folder).join(format!("{}.json", file_name(name))), item);
            }
        }
        Ok(())
    }

    /// Calls `detail_method` for each named item and stores each response.
    fn item_details(
        &mut self,
        items: &[Value],
        folder: &str,
        detail_method: &str,
        param_name: &str,
    ) -> Result<(), ServiceError> {
        for item in items {
            let Some(name) = object_name(item) else {
                continue;
            };
            debug!("\t\t{}", name);
            self.pacing.pause();
            let detail = self
                .service
                .fetch(detail_method, single_param(param_name, name))?;
            self.snapshot
                .add_json(Path::new(folder).join(format!("{}.json", file_name(name))), &detail);
        }
        Ok(())
    }

    fn campaigns(&mut self, method: &str) -> Result<(), ServiceError> {
        self.whole_list(method)?;

        for (campaign_type, folder, detail_method) in [
            ("OUTBOUND", "campaigns_outbound", "getOutboundCampaign"),
            ("INBOUND", "campaigns_inbound", "getInboundCampaign"),
        ] {
            self.pacing.pause();
            let items = into_list(
                self.service
                    .fetch(method, json!({ "campaignType": campaign_type }))?,
            );
            self.item_details(&items, folder, detail_method, "campaignName")?;
        }
        Ok(())
    }

    fn skills(&mut self, method: &str) -> Result<(), ServiceError> {
        let items = self.whole_list(method)?;
        self.item_details(&items, "skills_info", "getSkillsInfo", "skillNamePattern")
    }

    fn campaign_profiles<F, E>(&mut self, method: &str, render_filter: &F) -> Result<(), ServiceError>
    where
        F: Fn(&CampaignProfileFilter) -> Result<String, E>,
        E: fmt::Display,
    {
        let items = self.whole_list(method)?;

        for item in &items {
            let Some(name) = object_name(item) else {
                continue;
            };
            self.pacing.pause();
            let filter = self.service.campaign_profile_filter(name)?;
            let value = serde_json::to_value(&filter)?;
            self.snapshot.add_json(
                Path::new("campaign_profile_filters").join(format!("{}.json", file_name(name))),
                &value,
            );

            if filter.has_custom_expression() {
                match render_filter(&filter) {
                    Ok(text) => {
                        self.snapshot.documents.insert(
                            Path::new("campaign_profile_filters_demystified")
                                .join(format!("{}.txt", file_name(name))),
                            text,
                        );
                    }
                    Err(error) => warn!("Could not demystify filter of '{}': {}", name, error),
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_with_dependencies_appends_missing() {
        let methods = vec!["getSkills".to_string(), "getCampaignProfiles".to_string()];
        assert_eq!(
            with_dependencies(&methods),
            vec!["getSkills", "getCampaignProfiles", "getCampaigns"]
        );

        let methods = vec!["getCampaigns".to_string(), "getCampaignProfiles".to_string()];
        assert_eq!(with_dependencies(&methods), methods);
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let value = json!({"b": 1, "a": {"d": 2, "c": [ {"z": 0, "y": 1} ]}});
        let text = canonical_json(&value);
        let a = text.find("\"a\"").unwrap();
        let b = text.find("\"b\"").unwrap();
        let y = text.find("\"y\"").unwrap();
        let z = text.find("\"z\"").unwrap();
        assert!(a < b);
        assert!(y < z);
    }

    #[test]
    fn test_domain_directory_name_rejects_root_and_parent() {
        for name in ["", "  ", ".", ".."] {
            assert_matches!(
                domain_directory_name(name),
                Err(CaptureError::InvalidDomainName(_))
            );
        }
        assert_eq!(domain_directory_name("Acme/West").unwrap(), "Acme_West");
        assert_eq!(domain_directory_name("...").unwrap(), "...");
    }

    #[test]
    fn test_file_name_replaces_separators() {
        assert_eq!(file_name("Sales/West: Main"), "Sales_West_ Main");
    }
}
