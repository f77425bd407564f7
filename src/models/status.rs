use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignMode {
    Text,
    Image,
}

impl Display for DispatchStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            DispatchStatus::Success => write!(f, "success"),
            DispatchStatus::Failure => write!(f, "failure"),
        }
    }
}

impl Display for CampaignMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CampaignMode::Text => write!(f, "text"),
            CampaignMode::Image => write!(f, "image"),
        }
    }
}
