use chrono::Local;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    clients::gateway::Gateway,
    error::DispatchError,
    models::{
        contact::{Contact, ContactRow, NOT_AVAILABLE},
        result::{Campaign, DispatchResult},
        status::CampaignMode,
        template::MessageTemplate,
        validation::validate_image_url,
    },
    pacing::PacingPolicy,
};

/// What every contact in a campaign receives.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A personalized text message.
    Text(MessageTemplate),
    /// The same image and caption for everyone.
    Image { image_url: String, caption: String },
}

impl Payload {
    pub fn mode(&self) -> CampaignMode {
        match self {
            Payload::Text(_) => CampaignMode::Text,
            Payload::Image { .. } => CampaignMode::Image,
        }
    }
}

/// Sends `payload` to every contact, one at a time and in order.
///
/// Per-row problems (missing template fields, gateway failures) become failed
/// results and never stop the run. Only configuration problems, checked before
/// the first send, are returned as errors.
pub async fn run_campaign(
    contacts: &[Contact],
    payload: &Payload,
    pacing: &dyn PacingPolicy,
    gateway: &dyn Gateway,
) -> Result<Campaign, DispatchError> {
    let rows: Vec<ContactRow> = contacts.iter().cloned().map(ContactRow::from).collect();
    run_rows(&rows, payload, pacing, gateway).await
}

/// Same as [`run_campaign`] for rows straight from a sheet. Rows that could
/// not become contacts are recorded as failures without calling the gateway.
pub async fn run_rows(
    rows: &[ContactRow],
    payload: &Payload,
    pacing: &dyn PacingPolicy,
    gateway: &dyn Gateway,
) -> Result<Campaign, DispatchError> {
    if rows.is_empty() {
        return Err(DispatchError::Config("contact list is empty".to_string()));
    }
    if let Payload::Image { image_url, .. } = payload {
        validate_image_url(image_url).map_err(|e| DispatchError::Config(e.to_string()))?;
    }

    let campaign_id = Uuid::new_v4();
    let started_at = Local::now();
    let total = rows.len();
    let mut results = Vec::with_capacity(total);

    info!(
        campaign_id = %campaign_id,
        mode = %payload.mode(),
        total,
        "Starting campaign"
    );

    for (index, row) in rows.iter().enumerate() {
        let contact = match row {
            ContactRow::Valid(contact) => contact,
            ContactRow::Invalid { row, name, error } => {
                warn!(
                    campaign_id = %campaign_id,
                    row,
                    error = %error,
                    "Skipping row without a usable contact"
                );
                results.push(DispatchResult::failed(
                    NOT_AVAILABLE.to_string(),
                    name.clone(),
                    error,
                ));
                pace(pacing, index, total).await;
                continue;
            }
        };

        let recipient = contact.phone();
        let name = contact.display_name();

        info!(
            campaign_id = %campaign_id,
            row = index + 1,
            total,
            recipient = %recipient,
            "Sending {}/{}",
            index + 1,
            total
        );

        let result = match payload {
            Payload::Text(template) => match template.render(contact) {
                Ok(message) => {
                    let outcome = gateway.send_text(&recipient, &message).await;
                    DispatchResult::from_outcome(recipient, name, outcome)
                }
                Err(e) => {
                    warn!(
                        campaign_id = %campaign_id,
                        row = index + 1,
                        error = %e,
                        "Skipping contact, template could not be rendered"
                    );
                    DispatchResult::failed(recipient, name, &e)
                }
            },
            Payload::Image { image_url, caption } => {
                let outcome = gateway.send_image(&recipient, image_url, caption).await;
                DispatchResult::from_outcome(recipient, name, outcome)
            }
        };

        if !result.is_success() {
            warn!(
                campaign_id = %campaign_id,
                row = index + 1,
                recipient = %result.recipient,
                detail = %result.detail(),
                "Message not delivered"
            );
        }
        results.push(result);
        pace(pacing, index, total).await;
    }

    let finished_at = Local::now();
    info!(campaign_id = %campaign_id, total, "Campaign finished");

    Ok(Campaign {
        id: campaign_id,
        mode: payload.mode(),
        started_at,
        finished_at,
        results,
    })
}

async fn pace(pacing: &dyn PacingPolicy, index: usize, total: usize) {
    if index + 1 >= total {
        return;
    }

    let delay = pacing.next_delay(index, total);
    if !delay.is_zero() {
        debug!(delay = ?delay, "Pacing before next message");
        sleep(delay).await;
    }
}
