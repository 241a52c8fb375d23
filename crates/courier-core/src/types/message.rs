//! Outgoing payloads, receipts, and the delivery policy.

use serde::{Deserialize, Serialize};

/// Opaque reference to a message being replied to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct QuotedRef(pub String);

impl QuotedRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuotedRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text payload handed to a transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutgoingText {
    pub text: String,
}

impl OutgoingText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Per-send options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted: Option<QuotedRef>,
}

impl SendOptions {
    pub fn quoting(quoted: QuotedRef) -> Self {
        Self { quoted: Some(quoted) }
    }
}

/// Acknowledgement returned by a transport for one accepted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: String,
    pub accepted_at: chrono::DateTime<chrono::Utc>,
}

impl DeliveryReceipt {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            accepted_at: chrono::Utc::now(),
        }
    }
}

/// Pacing and quoting rules applied while dispatching a segment sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Pause between consecutive sends. Never applied after the last one.
    pub inter_segment_delay_ms: u64,
    /// Attach the quoted reference to the first send only.
    pub quote_first_only: bool,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            inter_segment_delay_ms: 1000,
            quote_first_only: true,
        }
    }
}

impl DeliveryPolicy {
    pub fn inter_segment_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.inter_segment_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_options_skip_empty_quote() {
        let json = serde_json::to_string(&SendOptions::default()).unwrap();
        assert_eq!(json, "{}");

        let json = serde_json::to_string(&SendOptions::quoting(QuotedRef::new("msg-1"))).unwrap();
        assert_eq!(json, r#"{"quoted":"msg-1"}"#);
    }

    #[test]
    fn test_policy_defaults() {
        let policy = DeliveryPolicy::default();
        assert_eq!(policy.inter_segment_delay_ms, 1000);
        assert!(policy.quote_first_only);
        assert_eq!(policy.inter_segment_delay(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_receipt_is_stamped_on_creation() {
        let before = chrono::Utc::now();
        let receipt = DeliveryReceipt::new("m-1");
        assert_eq!(receipt.id, "m-1");
        assert!(receipt.accepted_at >= before);
        assert!(receipt.accepted_at <= chrono::Utc::now());
    }

    #[test]
    fn test_quoted_ref_display() {
        assert_eq!(QuotedRef::new("abc").to_string(), "abc");
    }
}
