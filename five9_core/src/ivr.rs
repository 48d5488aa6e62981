use serde::{Deserialize, Serialize};

/// An IVR script as returned by the configuration service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvrScript {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub xml_definition: String,
}
