use std::time::Duration;

use reqwest::blocking::Client;

use solar_roi_core::lead::{DeliveryError, LeadPayload, LeadSink};

/// Posts lead payloads as JSON to an intake URL. One attempt per lead.
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, DeliveryError> {
        let url = url.into();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(DeliveryError::Configuration(format!(
                "webhook url must be http(s): {url}"
            )));
        }

        let timeout = Duration::from_secs(timeout_secs.max(1));
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(concat!("solar-roi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeliveryError::Configuration(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LeadSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
