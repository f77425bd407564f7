use crate::models::{
    result::{DispatchResult, ReportRow},
    summary::CampaignSummary,
};

pub fn summarize(results: &[DispatchResult]) -> CampaignSummary {
    let total = results.len();
    let success_count = results.iter().filter(|r| r.is_success()).count();
    let failure_count = total - success_count;

    let success_rate_percent = if total == 0 {
        None
    } else {
        Some(success_count as f64 / total as f64 * 100.0)
    };

    CampaignSummary {
        total,
        success_count,
        failure_count,
        success_rate_percent,
    }
}

pub fn export_rows(results: &[DispatchResult]) -> Vec<ReportRow> {
    results.iter().map(ReportRow::from).collect()
}
