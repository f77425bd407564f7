use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::{
    models::gateway::GatewayCredentials,
    pacing::{FixedDelay, JitteredDelay, PacingPolicy},
};

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.z-api.io";
pub const RECOMMENDED_MIN_DELAY_SECONDS: u64 = 3;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub zapi_instance_id: String,
    pub zapi_token: String,

    #[serde(default = "default_gateway_base_url")]
    pub gateway_base_url: String,
    #[serde(default = "default_gateway_timeout_seconds")]
    pub gateway_timeout_seconds: u64,

    #[serde(default = "default_send_delay_seconds")]
    pub send_delay_seconds: u64,
    #[serde(default)]
    pub pacing_jitter_ratio: f64,

    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_gateway_base_url() -> String {
    DEFAULT_GATEWAY_BASE_URL.to_string()
}

fn default_gateway_timeout_seconds() -> u64 {
    30
}

fn default_send_delay_seconds() -> u64 {
    5
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.zapi_instance_id.trim().is_empty() || self.zapi_token.trim().is_empty() {
            return Err(anyhow!("ZAPI_INSTANCE_ID and ZAPI_TOKEN must both be set"));
        }
        if self.gateway_timeout_seconds == 0 {
            return Err(anyhow!("GATEWAY_TIMEOUT_SECONDS must be greater than zero"));
        }
        Ok(())
    }

    pub fn credentials(&self) -> GatewayCredentials {
        GatewayCredentials {
            instance_id: self.zapi_instance_id.clone(),
            token: self.zapi_token.clone(),
            base_url: self.gateway_base_url.clone(),
            timeout: Duration::from_secs(self.gateway_timeout_seconds),
        }
    }

    /// Builds the pacing policy for a run. `delay_override` comes from the
    /// command line and wins over `SEND_DELAY_SECONDS`.
    pub fn pacing(&self, delay_override: Option<u64>) -> Box<dyn PacingPolicy> {
        let delay = Duration::from_secs(delay_override.unwrap_or(self.send_delay_seconds));

        if self.pacing_jitter_ratio > 0.0 {
            Box::new(JitteredDelay::new(delay, self.pacing_jitter_ratio))
        } else {
            Box::new(FixedDelay::new(delay))
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
