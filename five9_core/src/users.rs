//! User capture and bulk update.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::{debug, info, warn};
use serde_json::Value;

use crate::records::{Record, UserInfo, record_text};
use crate::service::{ConfigService, Pacing, ServiceError};

pub const USER_NAME_FIELD: &str = "userName";

/// Which columns to capture for each user.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSpec {
    /// General info fields, in column order.
    pub fields: Vec<String>,
    /// Role name to permission types.
    pub permissions: BTreeMap<String, Vec<String>>,
}

impl Default for CaptureSpec {
    fn default() -> Self {
        Self {
            fields: ["userName", "EMail", "fullName", "active"]
                .into_iter()
                .map(String::from)
                .collect(),
            permissions: BTreeMap::new(),
        }
    }
}

impl CaptureSpec {
    /// Column headers for the captured rows.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = self.fields.clone();
        for types in self.permissions.values() {
            for kind in types {
                if !headers.contains(kind) {
                    headers.push(kind.clone());
                }
            }
        }
        headers
    }
}

/// Flattens users into rows of the requested fields and permissions.
pub fn capture_user_rows(users: &[UserInfo], spec: &CaptureSpec) -> Vec<Record> {
    users
        .iter()
        .map(|user| {
            let mut row = Record::new();
            for field in &spec.fields {
                let text = record_text(user.general_info.get(field));
                row.insert(field.clone(), Value::String(text));
            }
            for (role, types) in &spec.permissions {
                for (kind, value) in user.permissions(role) {
                    if types.contains(&kind) {
                        row.insert(kind, Value::String(value));
                    }
                }
            }
            row
        })
        .collect()
}

/// Errors validating an update file against the domain's users.
#[derive(Debug, Clone, PartialEq)]
pub enum UserSyncError {
    /// The domain returned no users, so there is nothing to validate headers against.
    NoUsers,
    /// The update file has no `userName` column.
    MissingUserName,
    /// Some columns are not user fields.
    DisallowedFields {
        disallowed: Vec<String>,
        allowed: Vec<String>,
    },
}

impl fmt::Display for UserSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSyncError::NoUsers => write!(f, "The domain returned no users"),
            UserSyncError::MissingUserName => {
                write!(f, "The update file must have a '{}' column", USER_NAME_FIELD)
            }
            UserSyncError::DisallowedFields {
                disallowed,
                allowed,
            } => write!(
                f,
                "These headers in the csv file:\n\t{}\n\nare not in the allowed fields list:\n\t{}",
                disallowed.join(", "),
                allowed.join("\n\t")
            ),
        }
    }
}

impl std::error::Error for UserSyncError {}

/// A user whose record differs from the update file.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub user_name: String,
    /// The full general info with the new values applied.
    pub record: Record,
    /// Names of the fields that changed.
    pub changed: Vec<String>,
}

/// The users to submit and some bookkeeping for reporting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdatePlan {
    pub total_users: usize,
    pub updates: Vec<UserUpdate>,
    /// Rows whose `userName` does not exist in the domain.
    pub unmatched: Vec<String>,
}

/// Compares the domain's users against update rows and collects the differences.
///
/// Headers must be a subset of the fields of the first domain user. Rows
/// are matched on `userName`; only fields whose text differs are applied.
pub fn plan_user_updates(
    vcc_users: Vec<Record>,
    headers: &[String],
    rows: Vec<Record>,
) -> Result<UpdatePlan, UserSyncError> {
    let first = vcc_users.first().ok_or(UserSyncError::NoUsers)?;

    let mut disallowed: Vec<String> = headers
        .iter()
        .filter(|header| !first.contains_key(header.as_str()))
        .cloned()
        .collect();
    if !disallowed.is_empty() {
        disallowed.sort();
        return Err(UserSyncError::DisallowedFields {
            disallowed,
            allowed: first.keys().cloned().collect(),
        });
    }
    if !headers.iter().any(|header| header == USER_NAME_FIELD) {
        return Err(UserSyncError::MissingUserName);
    }

    let mut targets: HashMap<String, Record> = HashMap::new();
    let mut row_order = Vec::new();
    for row in rows {
        let user_name = record_text(row.get(USER_NAME_FIELD));
        if user_name.is_empty() {
            warn!("Skipping update row without a user name");
            continue;
        }
        row_order.push(user_name.clone());
        targets.insert(user_name, row);
    }

    let total_users = vcc_users.len();
    let mut updates = Vec::new();
    for mut vcc_user in vcc_users {
        let user_name = record_text(vcc_user.get(USER_NAME_FIELD));
        let Some(target) = targets.remove(&user_name) else {
            continue;
        };

        let mut changed = Vec::new();
        for (field, value) in target {
            let new_text = record_text(Some(&value));
            if record_text(vcc_user.get(&field)) != new_text {
                debug!("{}: {} changes", user_name, field);
                vcc_user.insert(field.clone(), Value::String(new_text));
                changed.push(field);
            }
        }

        if !changed.is_empty() {
            updates.push(UserUpdate {
                user_name,
                record: vcc_user,
                changed,
            });
        }
    }

    let unmatched = row_order
        .into_iter()
        .filter(|user_name| targets.contains_key(user_name))
        .collect();

    Ok(UpdatePlan {
        total_users,
        updates,
        unmatched,
    })
}

/// Result of submitting an update plan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateOutcome {
    pub updated: Vec<String>,
    pub failed: Vec<(String, ServiceError)>,
}

/// Submits every planned update. A failing user is recorded and the batch continues.
pub fn apply_user_updates<S: ConfigService + ?Sized>(
    service: &mut S,
    plan: &UpdatePlan,
    pacing: &Pacing,
    mut on_progress: impl FnMut(&UserUpdate),
) -> UpdateOutcome {
    let mut outcome = UpdateOutcome::default();

    for (position, update) in plan.updates.iter().enumerate() {
        if position > 0 {
            pacing.pause();
        }
        match service.modify_user(&update.record) {
            Ok(()) => {
                info!("Updated {} ({})", update.user_name, update.changed.join(", "));
                outcome.updated.push(update.user_name.clone());
            }
            Err(error) => {
                warn!("Failed to update {}: {}", update.user_name, error);
                outcome.failed.push((update.user_name.clone(), error));
            }
        }
        on_progress(update);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_capture_spec_headers_dedupe_permissions() {
        let mut spec = CaptureSpec::default();
        spec.permissions
            .insert("agent".to_string(), vec!["CallForwarding".to_string()]);
        spec.permissions
            .insert("supervisor".to_string(), vec!["CallForwarding".to_string()]);

        assert_eq!(
            spec.headers(),
            vec!["userName", "EMail", "fullName", "active", "CallForwarding"]
        );
    }

    #[test]
    fn test_plan_only_changed_users() {
        let vcc_users = vec![
            record(json!({"userName": "a", "firstName": "Ann", "active": true})),
            record(json!({"userName": "b", "firstName": "Bob", "active": true})),
        ];
        let headers = vec!["userName".to_string(), "active".to_string()];
        let rows = vec![
            record(json!({"userName": "a", "active": "true"})),
            record(json!({"userName": "b", "active": "false"})),
            record(json!({"userName": "ghost", "active": "false"})),
        ];

        let plan = plan_user_updates(vcc_users, &headers, rows).unwrap();
        assert_eq!(plan.total_users, 2);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].user_name, "b");
        assert_eq!(plan.updates[0].changed, vec!["active".to_string()]);
        assert_eq!(plan.updates[0].record["active"], json!("false"));
        assert_eq!(plan.updates[0].record["firstName"], json!("Bob"));
        assert_eq!(plan.unmatched, vec!["ghost".to_string()]);
    }

    #[test]
    fn test_plan_rejects_unknown_headers() {
        let vcc_users = vec![record(json!({"userName": "a", "active": true}))];
        let headers = vec!["userName".to_string(), "shoeSize".to_string()];

        let error = plan_user_updates(vcc_users, &headers, Vec::new()).unwrap_err();
        assert_eq!(
            error,
            UserSyncError::DisallowedFields {
                disallowed: vec!["shoeSize".to_string()],
                allowed: vec!["userName".to_string(), "active".to_string()],
            }
        );
    }

    #[test]
    fn test_plan_requires_user_name_and_users() {
        let headers = vec!["active".to_string()];
        assert_eq!(
            plan_user_updates(Vec::new(), &headers, Vec::new()).unwrap_err(),
            UserSyncError::NoUsers
        );

        let vcc_users = vec![record(json!({"userName": "a", "active": true}))];
        assert_eq!(
            plan_user_updates(vcc_users, &headers, Vec::new()).unwrap_err(),
            UserSyncError::MissingUserName
        );
    }
}
