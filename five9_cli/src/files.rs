//! Local file input and output for commands.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use five9_core::{Record, record_text};

use crate::errors::CliError;
use crate::ui;

pub fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| {
        ui::error_with_details(&format!("Couldn't read {}", path.display()), &e.to_string());
        CliError::FileError
    })
}

pub fn write_text(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ui::error_with_details(
                &format!("Couldn't create directory {}", parent.display()),
                &e.to_string(),
            );
            CliError::FileError
        })?;
    }
    fs::write(path, contents).map_err(|e| {
        ui::error_with_details(&format!("Couldn't write {}", path.display()), &e.to_string());
        CliError::FileError
    })
}

/// Reads a CSV file with a header row into string records.
pub fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Record>), CliError> {
    let contents = read_text(path)?;
    parse_csv(&contents).map_err(|e| {
        ui::error_with_details(&format!("Couldn't parse {}", path.display()), &e.to_string());
        CliError::FileError
    })
}

pub fn parse_csv(contents: &str) -> Result<(Vec<String>, Vec<Record>), csv::Error> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), Value::String(value.to_string())))
            .collect();
        rows.push(row);
    }
    Ok((headers, rows))
}

pub fn write_csv(path: &Path, headers: &[String], rows: &[Record]) -> Result<(), CliError> {
    let contents = format_csv(headers, rows).map_err(|e| {
        ui::error_with_details("Couldn't format CSV", &e.to_string());
        CliError::FileError
    })?;
    write_text(path, &contents)
}

pub fn format_csv(headers: &[String], rows: &[Record]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(headers.iter().map(|h| record_text(row.get(h))))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Makes a name safe to use as a file name.
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<stem>_<YYYY-MM-DD>.<extension>` in the current directory.
pub fn dated_file_name(stem: &str, extension: &str) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    PathBuf::from(format!("{}_{}.{}", safe_file_name(stem), today, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_round_trip() {
        let csv = "userName,EMail\njdoe,jdoe@example.com\n\"smith, j\",\n";
        let (headers, rows) = parse_csv(csv).unwrap();
        assert_eq!(headers, vec!["userName", "EMail"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(record_text(rows[1].get("userName")), "smith, j");

        assert_eq!(format_csv(&headers, &rows).unwrap(), csv);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.txt");
        write_text(&path, "hello").unwrap();
        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("Sales/West: Main"), "Sales_West_ Main");
    }
}
