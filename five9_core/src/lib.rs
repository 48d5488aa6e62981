//! Core domain types and administrative workflows for Five9 domains.
//!
//! The vendor API is reached through the [`ConfigService`] trait. Everything
//! in this crate works against that trait, so workflows can be driven by a
//! live SOAP session or by an in-memory fake.

pub mod capture;
pub mod counters;
pub mod de;
pub mod filter;
pub mod ivr;
pub mod lists;
pub mod records;
pub mod reporting;
pub mod service;
pub mod skills;
pub mod users;

pub use counters::{CallCounterState, CounterState, format_api_usage};
pub use filter::{CampaignProfileFilter, CompareOperator, Condition, Grouping, GroupingType};
pub use ivr::IvrScript;
pub use lists::{FieldMapping, ListDeleteSettings, ListUpdateSettings};
pub use records::{Record, UserInfo, record_text};
pub use reporting::{ReportCriteria, ReportTime};
pub use service::{ConfigService, Pacing, ServiceError, VccConfiguration};
pub use skills::{Skill, UserSkill};
