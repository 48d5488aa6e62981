//! The remote configuration service seam.

use std::fmt;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::counters::CallCounterState;
use crate::filter::CampaignProfileFilter;
use crate::ivr::IvrScript;
use crate::lists::{ListDeleteSettings, ListUpdateSettings};
use crate::records::{Record, UserInfo};
use crate::reporting::ReportCriteria;
use crate::skills::{Skill, UserSkill};

/// Errors surfaced by a [`ConfigService`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The service answered with a SOAP fault.
    Fault { code: String, message: String },
    /// The request could not be delivered or the reply could not be read.
    Transport(String),
    /// The reply did not have the expected shape.
    Decode(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Fault { code, message } => {
                write!(f, "Service fault ({}): {}", code, message)
            }
            ServiceError::Transport(message) => write!(f, "Transport error: {}", message),
            ServiceError::Decode(message) => write!(f, "Unexpected response: {}", message),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Decode(error.to_string())
    }
}

/// Domain identity from `getVCCConfiguration`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VccConfiguration {
    pub domain_name: String,
    #[serde(default)]
    pub domain_id: String,
}

/// The remote operations the admin tools invoke.
pub trait ConfigService {
    fn vcc_configuration(&mut self) -> Result<VccConfiguration, ServiceError>;

    fn call_counters_state(&mut self) -> Result<Vec<CallCounterState>, ServiceError>;

    /// General info of every user in the domain.
    fn users_general_info(&mut self) -> Result<Vec<Record>, ServiceError>;

    /// General info plus roles of every user in the domain.
    fn users_info(&mut self) -> Result<Vec<UserInfo>, ServiceError>;

    fn modify_user(&mut self, general_info: &Record) -> Result<(), ServiceError>;

    fn campaign_profiles(&mut self) -> Result<Vec<Record>, ServiceError>;

    fn campaign_profile_filter(
        &mut self,
        profile_name: &str,
    ) -> Result<CampaignProfileFilter, ServiceError>;

    fn ivr_scripts(&mut self) -> Result<Vec<IvrScript>, ServiceError>;

    /// Starts a report and returns its run identifier.
    fn run_report(
        &mut self,
        folder_name: &str,
        report_name: &str,
        criteria: &ReportCriteria,
    ) -> Result<String, ServiceError>;

    fn is_report_running(&mut self, identifier: &str, timeout_secs: u32)
    -> Result<bool, ServiceError>;

    fn report_result_csv(&mut self, identifier: &str) -> Result<String, ServiceError>;

    /// Adds one record to a contact list and returns the import identifier.
    fn add_record_to_list(
        &mut self,
        list_name: &str,
        settings: &ListUpdateSettings,
        values: &[String],
    ) -> Result<String, ServiceError>;

    /// Removes one record from a contact list and returns the import identifier.
    fn delete_record_from_list(
        &mut self,
        list_name: &str,
        settings: &ListDeleteSettings,
        values: &[String],
    ) -> Result<String, ServiceError>;

    fn skill(&mut self, skill_name: &str) -> Result<Skill, ServiceError>;

    fn user_skill_add(&mut self, user_skill: &UserSkill) -> Result<(), ServiceError>;

    fn user_skill_remove(&mut self, user_skill: &UserSkill) -> Result<(), ServiceError>;

    /// Invokes an arbitrary operation with named parameters.
    fn fetch(&mut self, operation: &str, params: Value) -> Result<Value, ServiceError>;
}

/// Fixed delay inserted between remote calls to stay under rate limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    pub delay: Duration,
}

impl Pacing {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
