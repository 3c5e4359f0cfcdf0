use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiTool {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

/// A diagnosis produced by one of the AI tools for an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiDiagnosis {
    pub id: u64,
    #[serde(default)]
    pub evaluation_id: Option<u64>,
    #[serde(default)]
    pub ai_tool: Option<AiTool>,
    #[serde(default)]
    pub response_text: Option<String>,
    #[serde(default, deserialize_with = "crate::de::bool_or_false")]
    pub selected_by_doctor: bool,
}

impl AiDiagnosis {
    pub fn tool_name(&self) -> Option<&str> {
        self.ai_tool.as_ref().map(|t| t.name.as_str())
    }

    /// Whether the tool name contains `needle`, ignoring case.
    pub fn is_from_tool(&self, needle: &str) -> bool {
        self.tool_name()
            .map(|name| name.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Body of a manual AI diagnosis create or update.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiDiagnosisPayload {
    #[serde(default)]
    pub ai_tool_id: Option<u64>,
    pub response_text: String,
}
