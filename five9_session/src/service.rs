//! The admin web service operations behind [`ConfigService`].

use serde_json::{Value, json};

use five9_core::de::{into_list, list_from_value};
use five9_core::records::record_text;
use five9_core::{
    CallCounterState, CampaignProfileFilter, ConfigService, IvrScript, ListDeleteSettings,
    ListUpdateSettings, Record, ReportCriteria, ServiceError, Skill, UserInfo, UserSkill,
    VccConfiguration,
};

use crate::errors::SessionError;
use crate::session::Five9Session;
use crate::transport::Transport;

impl<T: Transport> ConfigService for Five9Session<T> {
    fn vcc_configuration(&mut self) -> Result<VccConfiguration, ServiceError> {
        let value = self.call("getVCCConfiguration", Value::Null)?;
        Ok(serde_json::from_value(value)?)
    }

    fn call_counters_state(&mut self) -> Result<Vec<CallCounterState>, ServiceError> {
        Ok(self.refresh_call_counters()?.to_vec())
    }

    fn users_general_info(&mut self) -> Result<Vec<Record>, ServiceError> {
        let value = self.call("getUsersGeneralInfo", Value::Null)?;
        Ok(records(value)?)
    }

    fn users_info(&mut self) -> Result<Vec<UserInfo>, ServiceError> {
        let value = self.call("getUsersInfo", Value::Null)?;
        Ok(list_from_value(value)?)
    }

    fn modify_user(&mut self, general_info: &Record) -> Result<(), ServiceError> {
        self.call("modifyUser", json!({ "userGeneralInfo": general_info }))?;
        Ok(())
    }

    fn campaign_profiles(&mut self) -> Result<Vec<Record>, ServiceError> {
        let value = self.call("getCampaignProfiles", Value::Null)?;
        Ok(records(value)?)
    }

    fn campaign_profile_filter(
        &mut self,
        profile_name: &str,
    ) -> Result<CampaignProfileFilter, ServiceError> {
        let value = self.call("getCampaignProfileFilter", json!({ "profileName": profile_name }))?;
        match value {
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            _ => Ok(CampaignProfileFilter::default()),
        }
    }

    fn ivr_scripts(&mut self) -> Result<Vec<IvrScript>, ServiceError> {
        let value = self.call("getIvrScripts", Value::Null)?;
        Ok(list_from_value(value)?)
    }

    fn run_report(
        &mut self,
        folder_name: &str,
        report_name: &str,
        criteria: &ReportCriteria,
    ) -> Result<String, ServiceError> {
        let params = json!({
            "folderName": folder_name,
            "reportName": report_name,
            "criteria": serde_json::to_value(criteria)?,
        });
        let value = self.call("runReport", params)?;
        Ok(record_text(Some(&value)))
    }

    fn is_report_running(
        &mut self,
        identifier: &str,
        timeout_secs: u32,
    ) -> Result<bool, ServiceError> {
        let params = json!({ "identifier": identifier, "timeout": timeout_secs });
        let value = self.call("isReportRunning", params)?;
        match value {
            Value::Bool(running) => Ok(running),
            Value::String(text) => text.trim().parse::<bool>().map_err(|_| {
                ServiceError::Decode(format!("isReportRunning returned '{}'", text))
            }),
            other => Err(ServiceError::Decode(format!(
                "isReportRunning returned {}",
                other
            ))),
        }
    }

    fn report_result_csv(&mut self, identifier: &str) -> Result<String, ServiceError> {
        let value = self.call("getReportResultCsv", json!({ "identifier": identifier }))?;
        Ok(record_text(Some(&value)))
    }

    fn add_record_to_list(
        &mut self,
        list_name: &str,
        settings: &ListUpdateSettings,
        values: &[String],
    ) -> Result<String, ServiceError> {
        let params = json!({
            "listName": list_name,
            "listUpdateSettings": serde_json::to_value(settings)?,
            "importData": { "values": { "item": values } },
        });
        let value = self.call("addRecordToList", params)?;
        Ok(import_identifier(&value))
    }

    fn delete_record_from_list(
        &mut self,
        list_name: &str,
        settings: &ListDeleteSettings,
        values: &[String],
    ) -> Result<String, ServiceError> {
        let params = json!({
            "listName": list_name,
            "listDeleteSettings": serde_json::to_value(settings)?,
            "record": { "fields": values },
        });
        let value = self.call("deleteRecordFromList", params)?;
        Ok(import_identifier(&value))
    }

    fn skill(&mut self, skill_name: &str) -> Result<Skill, ServiceError> {
        let value = self.call("getSkill", json!({ "skillName": skill_name }))?;
        Ok(serde_json::from_value(value)?)
    }

    fn user_skill_add(&mut self, user_skill: &UserSkill) -> Result<(), ServiceError> {
        self.call("userSkillAdd", json!({ "userSkill": user_skill }))?;
        Ok(())
    }

    fn user_skill_remove(&mut self, user_skill: &UserSkill) -> Result<(), ServiceError> {
        self.call("userSkillRemove", json!({ "userSkill": user_skill }))?;
        Ok(())
    }

    fn fetch(&mut self, operation: &str, params: Value) -> Result<Value, ServiceError> {
        Ok(self.call(operation, params)?)
    }
}

/// The identifier of an import, which arrives wrapped or bare.
fn import_identifier(value: &Value) -> String {
    match value.get("identifier") {
        Some(identifier) => record_text(Some(identifier)),
        None => record_text(Some(value)),
    }
}

fn records(value: Value) -> Result<Vec<Record>, SessionError> {
    into_list(value)
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(SessionError::Decode(format!(
                "Expected an object, got {}",
                other
            ))),
        })
        .collect()
}
