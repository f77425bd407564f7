use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    clients::gateway::Gateway,
    error::DispatchError,
    models::gateway::{GatewayCredentials, Outcome, SendImageRequest, SendTextRequest},
};

/// Z-API client. Sends exactly one POST per message; no retries.
pub struct ZapiClient {
    http_client: Client,
    endpoint: String,
}

impl ZapiClient {
    pub fn new(credentials: &GatewayCredentials) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(credentials.timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        info!(base_url = %credentials.base_url, "Gateway client initialized");

        Ok(Self {
            http_client,
            endpoint: credentials.endpoint(),
        })
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, payload: &T) -> Outcome {
        let url = format!("{}/{}", self.endpoint, path);

        let response = match self.http_client.post(&url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, "Gateway request failed");
                return Outcome::Failure(DispatchError::GatewayTransport(e.to_string()));
            }
        };

        let status = response.status();

        // Only an exact 200 counts as delivered.
        if status == StatusCode::OK {
            match response.json::<serde_json::Value>().await {
                Ok(body) => {
                    debug!(path, "Gateway accepted message");
                    Outcome::Success(body)
                }
                Err(e) => Outcome::Failure(DispatchError::InvalidResponse(e.to_string())),
            }
        } else {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    return Outcome::Failure(DispatchError::GatewayTransport(e.to_string()));
                }
            };

            warn!(path, status = status.as_u16(), "Gateway rejected message");
            Outcome::Failure(DispatchError::GatewayHttp {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl Gateway for ZapiClient {
    async fn send_text(&self, recipient: &str, message: &str) -> Outcome {
        debug!(recipient, "Sending text message");

        let request = SendTextRequest {
            phone: recipient.to_string(),
            message: message.to_string(),
        };

        self.post("send-text", &request).await
    }

    async fn send_image(&self, recipient: &str, image_url: &str, caption: &str) -> Outcome {
        debug!(recipient, image_url, "Sending image message");

        let request = SendImageRequest {
            phone: recipient.to_string(),
            image: image_url.to_string(),
            caption: caption.to_string(),
        };

        self.post("send-image", &request).await
    }
}
