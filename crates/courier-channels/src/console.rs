//! Console transport — prints segments to stdout instead of sending them.

use async_trait::async_trait;
use courier_core::error::Result;
use courier_core::traits::Transport;
use courier_core::types::{DeliveryReceipt, OutgoingText, SendOptions};
use tokio::io::AsyncWriteExt;

/// Dry-run transport used by `courier send --dry-run`.
#[derive(Debug, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self { Self }

    fn render(recipient: &str, payload: &OutgoingText, options: &SendOptions) -> String {
        let mut out = format!("── to {recipient}");
        if let Some(quoted) = &options.quoted {
            out.push_str(&format!(" (replying to {quoted})"));
        }
        out.push_str(" ──\n");
        out.push_str(&payload.text);
        out.push_str("\n\n");
        out
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn name(&self) -> &str { "console" }

    async fn send(
        &self,
        recipient: &str,
        payload: &OutgoingText,
        options: &SendOptions,
    ) -> Result<DeliveryReceipt> {
        let rendered = Self::render(recipient, payload, options);
        let mut stdout = tokio::io::stdout();
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.flush().await?;
        Ok(DeliveryReceipt::new(uuid::Uuid::new_v4().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::types::QuotedRef;

    #[test]
    fn test_render() {
        let out = ConsoleTransport::render(
            "alice",
            &OutgoingText::new("hello\n\n[1/2]"),
            &SendOptions::quoting(QuotedRef::new("m-7")),
        );
        assert!(out.starts_with("── to alice (replying to m-7) ──\n"));
        assert!(out.contains("hello\n\n[1/2]"));
    }

    #[tokio::test]
    async fn test_send_returns_unique_receipts() {
        let transport = ConsoleTransport::new();
        let payload = OutgoingText::new("x");
        let a = transport.send("bob", &payload, &SendOptions::default()).await.unwrap();
        let b = transport.send("bob", &payload, &SendOptions::default()).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
