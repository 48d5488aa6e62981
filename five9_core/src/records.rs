//! Open-shaped vendor records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de::into_list;

/// An order-preserving vendor object, e.g. a user's general info.
pub type Record = Map<String, Value>;

/// Renders a record field the way it would appear in a CSV cell.
pub fn record_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Detailed user information: general info plus role permissions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub general_info: Record,
    #[serde(default)]
    pub roles: Value,
}

impl UserInfo {
    pub fn user_name(&self) -> Option<&str> {
        self.general_info.get("userName").and_then(Value::as_str)
    }

    /// Permissions of a role as `(type, value)` pairs. Missing roles have none.
    pub fn permissions(&self, role: &str) -> Vec<(String, String)> {
        let Some(role_value) = self.roles.get(role) else {
            return Vec::new();
        };
        let Some(permissions) = role_value.get("permissions") else {
            return Vec::new();
        };

        into_list(permissions.clone())
            .into_iter()
            .filter_map(|permission| {
                let kind = permission.get("type")?.as_str()?.to_string();
                let value = record_text(permission.get("value"));
                Some((kind, value))
            })
            .collect()
    }
}
