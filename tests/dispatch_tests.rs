use std::time::Duration;

use anyhow::Result;
use bulk_sender::{
    dispatch::{Payload, run_campaign, run_rows},
    error::DispatchError,
    models::{
        status::{CampaignMode, DispatchStatus},
        template::MessageTemplate,
    },
    pacing::FixedDelay,
    report::summarize,
    sheet::read_contacts,
};
use tokio::time::Instant;
use tokio_test::assert_err;

use crate::common::{RecordingGateway, RecordingPacing, SentMessage, contact};

fn text(template: &str) -> Payload {
    Payload::Text(MessageTemplate::parse(template).unwrap())
}

/// Test: Every contact gets exactly one result, in input order
#[tokio::test]
async fn test_results_follow_input_order() -> Result<()> {
    let contacts = vec![
        contact("5521999999999", Some("Ana")),
        contact("5521988888888", Some("Bruno")),
    ];
    let gateway = RecordingGateway::default();
    let pacing = RecordingPacing::default();

    let campaign = run_campaign(&contacts, &text("Hi {name}"), &pacing, &gateway).await?;

    assert_eq!(campaign.mode, CampaignMode::Text);
    assert_eq!(campaign.results.len(), 2);
    assert_eq!(campaign.results[0].name, "Ana");
    assert_eq!(campaign.results[0].recipient, "5521999999999");
    assert_eq!(campaign.results[1].name, "Bruno");
    assert_eq!(campaign.results[1].recipient, "5521988888888");
    assert!(campaign.results.iter().all(|r| r.is_success()));

    assert_eq!(
        gateway.calls(),
        vec![
            SentMessage::Text {
                recipient: "5521999999999".to_string(),
                message: "Hi Ana".to_string()
            },
            SentMessage::Text {
                recipient: "5521988888888".to_string(),
                message: "Hi Bruno".to_string()
            },
        ]
    );

    Ok(())
}

/// Test: A contact with a missing field fails alone and is never sent
#[tokio::test]
async fn test_missing_field_is_contained_per_row() -> Result<()> {
    let contacts = vec![
        contact("5521999999999", Some("Ana")),
        contact("5521977777777", None),
        contact("5521988888888", Some("Bruno")),
    ];
    let gateway = RecordingGateway::default();
    let pacing = RecordingPacing::default();

    let campaign = run_campaign(&contacts, &text("Hi {name}"), &pacing, &gateway).await?;

    assert_eq!(campaign.results.len(), 3);

    let skipped = &campaign.results[1];
    assert_eq!(skipped.status, DispatchStatus::Failure);
    assert_eq!(skipped.name, "N/A");
    assert_eq!(skipped.recipient, "5521977777777");
    assert_eq!(
        skipped.error_message.as_deref(),
        Some(
            DispatchError::MissingField {
                field: "name".to_string()
            }
            .to_string()
            .as_str()
        )
    );

    assert!(campaign.results[2].is_success());

    let recipients: Vec<String> = gateway
        .calls()
        .into_iter()
        .map(|call| match call {
            SentMessage::Text { recipient, .. } => recipient,
            SentMessage::Image { recipient, .. } => recipient,
        })
        .collect();
    assert_eq!(recipients, vec!["5521999999999", "5521988888888"]);

    Ok(())
}

/// Test: Gateway failures are recorded and the run continues
#[tokio::test]
async fn test_gateway_failure_does_not_abort() -> Result<()> {
    let contacts = vec![
        contact("111", Some("Ana")),
        contact("222", Some("Bruno")),
        contact("333", Some("Carla")),
    ];
    let gateway = RecordingGateway::rejecting(&["111"]);
    let pacing = RecordingPacing::default();

    let campaign = run_campaign(&contacts, &text("Hi {name}"), &pacing, &gateway).await?;

    assert_eq!(gateway.calls().len(), 3);
    assert_eq!(campaign.results[0].status, DispatchStatus::Failure);
    assert_eq!(campaign.results[0].detail(), "bad number");
    assert!(campaign.results[1].is_success());
    assert!(campaign.results[2].is_success());

    let summary = summarize(&campaign.results);
    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.failure_count, 1);

    Ok(())
}

/// Test: Pacing is consulted between messages but not after the last one
#[tokio::test]
async fn test_pacing_between_messages_only() -> Result<()> {
    let contacts: Vec<_> = (0..4)
        .map(|i| contact(&format!("55219{}", i), Some("X")))
        .collect();
    let gateway = RecordingGateway::default();
    let pacing = RecordingPacing::default();

    run_campaign(&contacts, &text("Hi"), &pacing, &gateway).await?;

    let requests = pacing.requests.lock().unwrap().clone();
    assert_eq!(requests, vec![(0, 4), (1, 4), (2, 4)]);

    Ok(())
}

/// Test: A single contact never waits
#[tokio::test]
async fn test_single_contact_skips_delay() -> Result<()> {
    let contacts = vec![contact("5521999999999", Some("Ana"))];
    let gateway = RecordingGateway::default();
    let pacing = FixedDelay::from_secs(60);

    let start = Instant::now();
    run_campaign(&contacts, &text("Hi {name}"), &pacing, &gateway).await?;

    assert!(start.elapsed() < Duration::from_secs(5));

    Ok(())
}

/// Test: Fixed delays pause between sends
#[tokio::test]
async fn test_fixed_delay_is_applied() -> Result<()> {
    let contacts = vec![
        contact("111", Some("Ana")),
        contact("222", Some("Bruno")),
        contact("333", Some("Carla")),
    ];
    let gateway = RecordingGateway::default();
    let pacing = FixedDelay::new(Duration::from_millis(50));

    let start = Instant::now();
    run_campaign(&contacts, &text("Hi {name}"), &pacing, &gateway).await?;

    assert!(
        start.elapsed() >= Duration::from_millis(100),
        "Two pauses of 50ms expected, took {:?}",
        start.elapsed()
    );

    Ok(())
}

/// Test: Image campaigns send the same image and caption to everyone
#[tokio::test]
async fn test_image_campaign() -> Result<()> {
    let contacts = vec![contact("111", Some("Ana")), contact("222", None)];
    let gateway = RecordingGateway::default();
    let pacing = RecordingPacing::default();
    let payload = Payload::Image {
        image_url: "https://example.com/a.jpg".to_string(),
        caption: "Hi {name}".to_string(),
    };

    let campaign = run_campaign(&contacts, &payload, &pacing, &gateway).await?;

    assert_eq!(campaign.mode, CampaignMode::Image);
    assert_eq!(campaign.results[1].name, "N/A");
    assert!(campaign.results.iter().all(|r| r.is_success()));
    assert_eq!(
        gateway.calls()[1],
        SentMessage::Image {
            recipient: "222".to_string(),
            image_url: "https://example.com/a.jpg".to_string(),
            caption: "Hi {name}".to_string(),
        }
    );

    Ok(())
}

/// Test: Configuration problems are raised before anything is sent
#[tokio::test]
async fn test_configuration_errors_surface_before_sending() {
    let gateway = RecordingGateway::default();
    let pacing = RecordingPacing::default();

    let empty = run_campaign(&[], &text("Hi"), &pacing, &gateway).await;
    assert!(matches!(empty, Err(DispatchError::Config(_))));

    let contacts = vec![contact("111", Some("Ana"))];
    let no_image = Payload::Image {
        image_url: "  ".to_string(),
        caption: String::new(),
    };
    let result = run_campaign(&contacts, &no_image, &pacing, &gateway).await;
    assert_err!(result);

    assert!(gateway.calls().is_empty());
}

/// Test: Each run produces a separate campaign
#[tokio::test]
async fn test_campaigns_are_independent() -> Result<()> {
    let contacts = vec![contact("111", Some("Ana"))];
    let gateway = RecordingGateway::default();
    let pacing = RecordingPacing::default();

    let first = run_campaign(&contacts, &text("Hi {name}"), &pacing, &gateway).await?;
    let second = run_campaign(&contacts, &text("Bye {name}"), &pacing, &gateway).await?;

    assert_ne!(first.id, second.id);
    assert_eq!(first.results.len(), 1);
    assert_eq!(second.results.len(), 1);
    assert!(second.started_at >= first.finished_at);

    Ok(())
}

/// Test: A sheet row without a phone fails on its own while its neighbours are sent
#[tokio::test]
async fn test_invalid_sheet_row_is_reported_in_place() -> Result<()> {
    let sheet = read_contacts("phone,name\n111,Ana\n,Bruno\n333,Carla\n".as_bytes())?;
    let gateway = RecordingGateway::default();
    let pacing = RecordingPacing::default();

    let campaign = run_rows(&sheet.rows, &text("Hi {name}"), &pacing, &gateway).await?;

    assert_eq!(campaign.results.len(), 3);
    let names: Vec<&str> = campaign.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);

    let skipped = &campaign.results[1];
    assert_eq!(skipped.status, DispatchStatus::Failure);
    assert_eq!(skipped.recipient, "N/A");
    assert!(skipped.detail().contains("missing 'phone' field"));

    let recipients: Vec<String> = gateway
        .calls()
        .into_iter()
        .map(|call| match call {
            SentMessage::Text { recipient, .. } => recipient,
            SentMessage::Image { recipient, .. } => recipient,
        })
        .collect();
    assert_eq!(recipients, vec!["111", "333"]);
    assert_eq!(*pacing.requests.lock().unwrap(), vec![(0, 3), (1, 3)]);

    let summary = summarize(&campaign.results);
    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.failure_count, 1);

    Ok(())
}
