//! Transport trait — the capability that actually delivers one segment.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DeliveryReceipt, OutgoingText, SendOptions};

/// Delivers a single text payload to a single recipient.
///
/// Implementations own their own timeouts. Callers await each `send`
/// before issuing the next one, so ordering on the wire matches call order.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short identifier used in logs (e.g. "webhook", "console").
    fn name(&self) -> &str;

    /// Send one payload and return the receipt assigned by the far side.
    async fn send(
        &self,
        recipient: &str,
        payload: &OutgoingText,
        options: &SendOptions,
    ) -> Result<DeliveryReceipt>;
}
