use bulk_sender::{
    error::DispatchError,
    models::{
        gateway::Outcome,
        result::{DispatchResult, ReportRow},
    },
    report::{export_rows, summarize},
};
use serde_json::json;

fn success(recipient: &str) -> DispatchResult {
    DispatchResult::from_outcome(
        recipient.to_string(),
        "Ana".to_string(),
        Outcome::Success(json!({ "id": "abc" })),
    )
}

fn failure(recipient: &str) -> DispatchResult {
    DispatchResult::failed(
        recipient.to_string(),
        "N/A".to_string(),
        &DispatchError::GatewayTransport("connection reset".to_string()),
    )
}

/// Test: Counts and success rate add up
#[test]
fn test_summary_counts() {
    let results = vec![success("1"), failure("2"), success("3"), success("4")];

    let summary = summarize(&results);

    assert_eq!(summary.total, 4);
    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.success_count + summary.failure_count, summary.total);
    assert_eq!(summary.success_rate_percent, Some(75.0));
}

/// Test: An empty run has no success rate
#[test]
fn test_empty_summary_has_no_rate() {
    let summary = summarize(&[]);

    assert_eq!(summary.total, 0);
    assert_eq!(summary.success_rate_percent, None);
    assert_eq!(
        summary.to_string(),
        "total: 0, successes: 0, failures: 0, success rate: n/a"
    );
}

/// Test: Success rate stays within bounds
#[test]
fn test_rate_bounds() {
    let all_failed = summarize(&[failure("1"), failure("2")]);
    let all_ok = summarize(&[success("1"), success("2"), success("3")]);

    assert_eq!(all_failed.success_rate_percent, Some(0.0));
    assert_eq!(all_ok.success_rate_percent, Some(100.0));
    assert_eq!(
        all_ok.to_string(),
        "total: 3, successes: 3, failures: 0, success rate: 100.0%"
    );
}

/// Test: Summarizing twice gives the same answer
#[test]
fn test_summary_is_repeatable() {
    let results = vec![success("1"), failure("2"), success("3")];

    assert_eq!(summarize(&results), summarize(&results));
}

/// Test: Export rows keep order and carry response or error text
#[test]
fn test_export_rows() {
    let results = vec![success("5521999999999"), failure("5521988888888")];

    let rows: Vec<ReportRow> = export_rows(&results);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].recipient, "5521999999999");
    assert_eq!(rows[0].name, "Ana");
    assert_eq!(rows[0].status, "success");
    assert_eq!(rows[0].detail, r#"{"id":"abc"}"#);
    assert_eq!(rows[1].status, "failure");
    assert_eq!(rows[1].detail, "Gateway request failed: connection reset");
    assert_eq!(rows[1].timestamp.len(), "2024-01-01 00:00:00".len());
}
