use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use bulk_sender::{
    clients::gateway::Gateway,
    error::DispatchError,
    models::{contact::Contact, gateway::Outcome},
    pacing::PacingPolicy,
};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    Text { recipient: String, message: String },
    Image { recipient: String, image_url: String, caption: String },
}

/// In-memory gateway that records every call. Recipients listed in
/// `rejected` get an HTTP 400 back.
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<SentMessage>>,
    pub rejected: Vec<String>,
}

impl RecordingGateway {
    pub fn rejecting(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            rejected: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    fn outcome(&self, recipient: &str) -> Outcome {
        if self.rejected.iter().any(|r| r == recipient) {
            Outcome::Failure(DispatchError::GatewayHttp {
                status: 400,
                body: "bad number".to_string(),
            })
        } else {
            Outcome::Success(json!({ "id": format!("msg-{}", recipient) }))
        }
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn send_text(&self, recipient: &str, message: &str) -> Outcome {
        self.sent.lock().unwrap().push(SentMessage::Text {
            recipient: recipient.to_string(),
            message: message.to_string(),
        });
        self.outcome(recipient)
    }

    async fn send_image(&self, recipient: &str, image_url: &str, caption: &str) -> Outcome {
        self.sent.lock().unwrap().push(SentMessage::Image {
            recipient: recipient.to_string(),
            image_url: image_url.to_string(),
            caption: caption.to_string(),
        });
        self.outcome(recipient)
    }
}

/// Pacing policy that never waits and remembers each request.
#[derive(Default)]
pub struct RecordingPacing {
    pub requests: Mutex<Vec<(usize, usize)>>,
}

impl PacingPolicy for RecordingPacing {
    fn next_delay(&self, index: usize, total: usize) -> Duration {
        self.requests.lock().unwrap().push((index, total));
        Duration::ZERO
    }
}

pub fn contact(phone: &str, name: Option<&str>) -> Contact {
    let mut pairs = vec![("phone", phone.to_string())];
    if let Some(name) = name {
        pairs.push(("name", name.to_string()));
    }
    Contact::from_pairs(pairs).unwrap()
}
