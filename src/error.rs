use thiserror::Error;

/// Everything that can go wrong while dispatching a campaign.
///
/// Row-level variants (template and gateway problems) are recorded as failed
/// results and never abort a campaign. `Config` and `InvalidContact` are
/// raised before the loop starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Missing field in contact: {field}")]
    MissingField { field: String },

    #[error("Malformed template at position {position}: {reason}")]
    MalformedTemplate { position: usize, reason: String },

    #[error("Gateway returned status {status}: {body}")]
    GatewayHttp { status: u16, body: String },

    #[error("Gateway request failed: {0}")]
    GatewayTransport(String),

    #[error("Gateway response is not valid JSON: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid contact at row {row}: {reason}")]
    InvalidContact { row: usize, reason: String },
}

impl DispatchError {
    /// Text recorded in the report for a failed row. HTTP failures keep the
    /// raw gateway body so it can be diagnosed as-is.
    pub fn detail(&self) -> String {
        match self {
            DispatchError::GatewayHttp { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}
