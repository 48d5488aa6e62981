//! Running reports and polling for their completion.

use std::fmt;
use std::thread;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::service::{ConfigService, ServiceError};

const CRITERIA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Reporting time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTime {
    pub start: String,
    pub end: String,
}

/// Optional narrowing of a report to named objects of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportObjects {
    pub object_names: Vec<String>,
    /// e.g. `Skill`, `Campaign`, `AgentGroup`.
    pub object_type: String,
}

/// Criteria passed to `runReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCriteria {
    pub time: ReportTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_objects: Option<ReportObjects>,
}

impl ReportCriteria {
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            time: ReportTime {
                start: start.format(CRITERIA_TIME_FORMAT).to_string(),
                end: end.format(CRITERIA_TIME_FORMAT).to_string(),
            },
            report_objects: None,
        }
    }

    /// From midnight of `day` to midnight of the following day.
    pub fn for_day(day: NaiveDate) -> Self {
        let start = day.and_hms_opt(0, 0, 0).unwrap_or_default();
        Self::between(start, start + ChronoDuration::days(1))
    }

    pub fn today() -> Self {
        Self::for_day(Local::now().date_naive())
    }

    pub fn with_objects(mut self, object_type: &str, object_names: Vec<String>) -> Self {
        self.report_objects = Some(ReportObjects {
            object_names,
            object_type: object_type.to_string(),
        });
        self
    }
}

/// A report to run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub folder_name: String,
    pub report_name: String,
    pub criteria: ReportCriteria,
}

/// How to wait for a report.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    /// Delay between `isReportRunning` checks. Polling too often burns rate limits.
    pub interval: Duration,
    /// Long-poll timeout passed to the service on each check.
    pub timeout_secs: u32,
    /// Give up after this many checks.
    pub max_polls: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout_secs: 10,
            max_polls: None,
        }
    }
}

/// A finished report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResult {
    pub identifier: String,
    pub csv: String,
}

impl ReportResult {
    /// Data rows in the CSV result, excluding the header.
    pub fn row_count(&self) -> usize {
        self.csv
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
            .saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    Service(ServiceError),
    StillRunning { identifier: String, polls: u32 },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Service(error) => write!(f, "Report request failed: {}", error),
            ReportError::StillRunning { identifier, polls } => write!(
                f,
                "Report {} was still running after {} checks",
                identifier, polls
            ),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<ServiceError> for ReportError {
    fn from(error: ServiceError) -> Self {
        ReportError::Service(error)
    }
}

/// Runs a report, waits for it to finish, and fetches the CSV result.
///
/// `on_poll` is called with the number of checks made so far each time the
/// report is found still running.
pub fn run_report<S: ConfigService + ?Sized>(
    service: &mut S,
    request: &ReportRequest,
    poll: &PollSettings,
    mut on_poll: impl FnMut(u32),
) -> Result<ReportResult, ReportError> {
    let identifier = service.run_report(
        &request.folder_name,
        &request.report_name,
        &request.criteria,
    )?;
    info!(
        "Requested report '{}/{}' as {}",
        request.folder_name, request.report_name, identifier
    );

    let mut polls = 0;
    while service.is_report_running(&identifier, poll.timeout_secs)? {
        polls += 1;
        debug!("Report {} still running ({})", identifier, polls);
        on_poll(polls);

        if poll.max_polls.is_some_and(|max| polls >= max) {
            return Err(ReportError::StillRunning { identifier, polls });
        }
        if !poll.interval.is_zero() {
            thread::sleep(poll.interval);
        }
    }

    let csv = service.report_result_csv(&identifier)?;
    Ok(ReportResult { identifier, csv })
}
