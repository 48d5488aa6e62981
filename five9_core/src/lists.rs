//! Contact list record management.
//!
//! Rows come from a CSV file whose headers are contact field names. Each
//! row is submitted on its own so one rejected record does not stop the
//! rest of the file.

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::records::{Record, record_text};
use crate::service::{ConfigService, Pacing, ServiceError};

/// Maps a data column (1-based) to a contact field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub column_number: u32,
    pub field_name: String,
    /// Key fields together identify the contact record to match.
    pub key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrmAddMode {
    #[default]
    AddNew,
    DontAdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrmUpdateMode {
    DontUpdate,
    #[default]
    UpdateFirst,
    UpdateAll,
    UpdateSoleMatches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListAddMode {
    #[default]
    AddFirst,
    AddAll,
    AddIfSoleCrmMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListDeleteMode {
    #[default]
    DeleteAll,
    DeleteSoleMatches,
    DeleteExceptFirst,
}

/// Settings for `addRecordToList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpdateSettings {
    pub fields_mapping: Vec<FieldMapping>,
    pub skip_header_line: bool,
    /// Put new records in the ASAP queue.
    pub call_now_mode: bool,
    pub allow_data_cleanup: bool,
    pub clean_list_before_update: bool,
    pub crm_add_mode: CrmAddMode,
    pub crm_update_mode: CrmUpdateMode,
    pub list_add_mode: ListAddMode,
}

impl ListUpdateSettings {
    pub fn new(fields_mapping: Vec<FieldMapping>) -> Self {
        Self {
            fields_mapping,
            skip_header_line: false,
            call_now_mode: false,
            allow_data_cleanup: true,
            clean_list_before_update: false,
            crm_add_mode: CrmAddMode::default(),
            crm_update_mode: CrmUpdateMode::default(),
            list_add_mode: ListAddMode::default(),
        }
    }
}

/// Settings for `deleteRecordFromList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDeleteSettings {
    pub fields_mapping: Vec<FieldMapping>,
    pub skip_header_line: bool,
    pub list_delete_mode: ListDeleteMode,
}

impl ListDeleteSettings {
    pub fn new(fields_mapping: Vec<FieldMapping>) -> Self {
        Self {
            fields_mapping,
            skip_header_line: false,
            list_delete_mode: ListDeleteMode::default(),
        }
    }
}

/// Errors building a field mapping from a records file.
#[derive(Debug, Clone, PartialEq)]
pub enum ListError {
    /// The records file has no columns.
    NoColumns,
    /// No column is marked as a key.
    NoKeyFields,
    /// Key fields that are not columns of the file.
    UnknownKeyFields(Vec<String>),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::NoColumns => write!(f, "The records file has no columns"),
            ListError::NoKeyFields => {
                write!(f, "At least one column must be a key field")
            }
            ListError::UnknownKeyFields(fields) => write!(
                f,
                "Key fields are not columns of the records file: {}",
                fields.join(", ")
            ),
        }
    }
}

impl std::error::Error for ListError {}

/// Maps every header to the contact field of the same name, in column order.
pub fn fields_mapping(
    headers: &[String],
    key_fields: &[String],
) -> Result<Vec<FieldMapping>, ListError> {
    if headers.is_empty() {
        return Err(ListError::NoColumns);
    }
    if key_fields.is_empty() {
        return Err(ListError::NoKeyFields);
    }

    let unknown: Vec<String> = key_fields
        .iter()
        .filter(|key| !headers.contains(key))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ListError::UnknownKeyFields(unknown));
    }

    Ok(headers
        .iter()
        .zip(1..)
        .map(|(header, column_number)| FieldMapping {
            column_number,
            field_name: header.clone(),
            key: key_fields.contains(header),
        })
        .collect())
}

/// Values of a row in column order. Missing cells are empty.
pub fn row_values(headers: &[String], row: &Record) -> Vec<String> {
    headers
        .iter()
        .map(|header| record_text(row.get(header)))
        .collect()
}

/// Result of submitting records to a list. Rows are numbered from 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListOutcome {
    /// Row number and import identifier of each accepted record.
    pub submitted: Vec<(usize, String)>,
    pub failed: Vec<(usize, ServiceError)>,
}

/// Adds every row to a list. A rejected row is recorded and the batch continues.
pub fn add_records_to_list<S: ConfigService + ?Sized>(
    service: &mut S,
    list_name: &str,
    settings: &ListUpdateSettings,
    headers: &[String],
    rows: &[Record],
    pacing: &Pacing,
    on_progress: impl FnMut(usize),
) -> ListOutcome {
    info!("Adding {} record(s) to list {}", rows.len(), list_name);
    submit_rows(headers, rows, pacing, on_progress, |values| {
        service.add_record_to_list(list_name, settings, values)
    })
}

/// Removes every row from a list. A rejected row is recorded and the batch continues.
pub fn delete_records_from_list<S: ConfigService + ?Sized>(
    service: &mut S,
    list_name: &str,
    settings: &ListDeleteSettings,
    headers: &[String],
    rows: &[Record],
    pacing: &Pacing,
    on_progress: impl FnMut(usize),
) -> ListOutcome {
    info!("Deleting {} record(s) from list {}", rows.len(), list_name);
    submit_rows(headers, rows, pacing, on_progress, |values| {
        service.delete_record_from_list(list_name, settings, values)
    })
}

fn submit_rows(
    headers: &[String],
    rows: &[Record],
    pacing: &Pacing,
    mut on_progress: impl FnMut(usize),
    mut submit: impl FnMut(&[String]) -> Result<String, ServiceError>,
) -> ListOutcome {
    let mut outcome = ListOutcome::default();

    for (position, row) in rows.iter().enumerate() {
        let row_number = position + 1;
        if position > 0 {
            pacing.pause();
        }
        match submit(&row_values(headers, row)) {
            Ok(identifier) => outcome.submitted.push((row_number, identifier)),
            Err(error) => {
                warn!("Row {} was rejected: {}", row_number, error);
                outcome.failed.push((row_number, error));
            }
        }
        on_progress(row_number);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_fields_mapping_marks_keys_in_column_order() {
        let mapping =
            fields_mapping(&headers(&["number1", "uuid", "email"]), &headers(&["uuid"])).unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping[0].column_number, 1);
        assert_eq!(mapping[0].field_name, "number1");
        assert!(!mapping[0].key);
        assert!(mapping[1].key);
        assert_eq!(mapping[2].column_number, 3);
    }

    #[test]
    fn test_fields_mapping_rejects_missing_and_unknown_keys() {
        let columns = headers(&["number1", "email"]);
        assert_eq!(fields_mapping(&columns, &[]), Err(ListError::NoKeyFields));
        assert_eq!(
            fields_mapping(&columns, &headers(&["uuid", "number1"])),
            Err(ListError::UnknownKeyFields(vec!["uuid".to_string()]))
        );
        assert_eq!(
            fields_mapping(&[], &headers(&["uuid"])),
            Err(ListError::NoColumns)
        );
    }

    #[test]
    fn test_update_settings_serialize_as_vendor_names() {
        let settings = ListUpdateSettings::new(vec![FieldMapping {
            column_number: 1,
            field_name: "number1".to_string(),
            key: true,
        }]);
        let value = serde_json::to_value(&settings).unwrap();

        assert_eq!(value["fieldsMapping"][0]["columnNumber"], json!(1));
        assert_eq!(value["crmAddMode"], json!("ADD_NEW"));
        assert_eq!(value["crmUpdateMode"], json!("UPDATE_FIRST"));
        assert_eq!(value["listAddMode"], json!("ADD_FIRST"));
        assert_eq!(value["callNowMode"], json!(false));

        let value = serde_json::to_value(ListDeleteSettings::new(Vec::new())).unwrap();
        assert_eq!(value["listDeleteMode"], json!("DELETE_ALL"));
    }

    #[test]
    fn test_row_values_follow_headers() {
        let row = match json!({"email": "a@example.com", "number1": "5551234"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(
            row_values(&headers(&["number1", "uuid", "email"]), &row),
            vec!["5551234", "", "a@example.com"]
        );
    }
}
