use std::fmt::{Display, Formatter, Result};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// `None` when there were no results.
    pub success_rate_percent: Option<f64>,
}

impl Display for CampaignSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let rate = match self.success_rate_percent {
            Some(rate) => format!("{:.1}%", rate),
            None => "n/a".to_string(),
        };

        write!(
            f,
            "total: {}, successes: {}, failures: {}, success rate: {}",
            self.total, self.success_count, self.failure_count, rate
        )
    }
}
