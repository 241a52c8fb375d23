//! Webhook transport — POSTs each segment as JSON to an outbound URL.
//!
//! Useful for bridging to gateways that own the real chat connection
//! (WhatsApp bridges, n8n, custom APIs).

use async_trait::async_trait;
use courier_core::config::WebhookConfig;
use courier_core::error::{CourierError, Result};
use courier_core::traits::Transport;
use courier_core::types::{DeliveryReceipt, OutgoingText, SendOptions};
use serde::Serialize;

/// Header carrying the payload signature when a secret is configured.
pub const SIGNATURE_HEADER: &str = "X-Courier-Signature";

/// Body sent for every segment.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    recipient: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quoted: Option<&'a str>,
}

/// Webhook transport.
pub struct WebhookTransport {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookTransport {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Courier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CourierError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Serialize the JSON body for one segment.
    fn build_body(recipient: &str, payload: &OutgoingText, options: &SendOptions) -> Result<String> {
        let body = WebhookPayload {
            recipient,
            text: &payload.text,
            quoted: options.quoted.as_ref().map(|q| q.as_str()),
        };
        Ok(serde_json::to_string(&body)?)
    }
}

/// Hex SHA-256 of `secret + body`.
pub fn sign(secret: &str, body: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl Transport for WebhookTransport {
    fn name(&self) -> &str { "webhook" }

    async fn send(
        &self,
        recipient: &str,
        payload: &OutgoingText,
        options: &SendOptions,
    ) -> Result<DeliveryReceipt> {
        let body = Self::build_body(recipient, payload, options)?;

        let mut request = self.client
            .post(&self.config.outbound_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(secret) = &self.config.secret {
            request = request.header(SIGNATURE_HEADER, sign(secret, &body));
        }

        let response = request.body(body).send().await.map_err(|e| {
            if e.is_timeout() {
                CourierError::Timeout(format!("Webhook send timed out: {e}"))
            } else {
                CourierError::Transport(format!("Webhook send failed: {e}"))
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CourierError::RateLimited(format!("Webhook {status}")));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CourierError::TransportRejected { status: status.as_u16(), body: text });
        }

        // Gateways that don't echo an id still get a local one.
        let text = response.text().await.unwrap_or_default();
        let id = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v["id"].as_str().map(String::from))
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        tracing::trace!("Webhook accepted message {id} for {recipient}");
        Ok(DeliveryReceipt::new(id))
    }
}
