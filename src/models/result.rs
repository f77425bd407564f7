use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{
    error::DispatchError,
    models::{
        gateway::Outcome,
        status::{CampaignMode, DispatchStatus},
    },
};

pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of one send attempt for one contact. Never mutated once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    pub recipient: String,
    pub name: String,
    pub status: DispatchStatus,
    pub response: Option<JsonValue>,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl DispatchResult {
    pub fn from_outcome(recipient: String, name: String, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(response) => Self {
                recipient,
                name,
                status: DispatchStatus::Success,
                response: Some(response),
                error_message: None,
                timestamp: Local::now(),
            },
            Outcome::Failure(error) => Self::failed(recipient, name, &error),
        }
    }

    pub fn failed(recipient: String, name: String, error: &DispatchError) -> Self {
        Self {
            recipient,
            name,
            status: DispatchStatus::Failure,
            response: None,
            error_message: Some(error.detail()),
            timestamp: Local::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Success
    }

    /// Gateway response on success, error text on failure.
    pub fn detail(&self) -> String {
        match (&self.response, &self.error_message) {
            (_, Some(error)) => error.clone(),
            (Some(response), None) => response.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Flat row used for tabular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub recipient: String,
    pub name: String,
    pub status: String,
    pub detail: String,
    pub timestamp: String,
}

impl From<&DispatchResult> for ReportRow {
    fn from(result: &DispatchResult) -> Self {
        Self {
            recipient: result.recipient.clone(),
            name: result.name.clone(),
            status: result.status.to_string(),
            detail: result.detail(),
            timestamp: result.timestamp.format(REPORT_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// One complete run of the dispatch loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub mode: CampaignMode,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub results: Vec<DispatchResult>,
}

impl Campaign {
    pub fn report_rows(&self) -> Vec<ReportRow> {
        crate::report::export_rows(&self.results)
    }

    pub fn default_report_name(&self) -> String {
        format!(
            "dispatch_report_{}.csv",
            self.finished_at.format("%Y%m%d_%H%M%S")
        )
    }
}
