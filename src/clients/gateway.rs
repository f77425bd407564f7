use async_trait::async_trait;

use crate::models::gateway::Outcome;

/// A messaging gateway that delivers one message per call.
///
/// Implementations must never return transport errors to the caller: every
/// problem is folded into [`Outcome::Failure`].
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_text(&self, recipient: &str, message: &str) -> Outcome;

    async fn send_image(&self, recipient: &str, image_url: &str, caption: &str) -> Outcome;
}
