use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DispatchError;

/// Operator-supplied gateway access. The two secrets are opaque and only ever
/// used to build the per-instance base URL.
#[derive(Clone)]
pub struct GatewayCredentials {
    pub instance_id: String,
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayCredentials {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/instances/{}/token/{}",
            self.base_url.trim_end_matches('/'),
            self.instance_id,
            self.token
        )
    }
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("instance_id", &"***")
            .field("token", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendTextRequest {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendImageRequest {
    pub phone: String,
    pub image: String,
    pub caption: String,
}

/// Normalized result of one gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure(DispatchError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}
