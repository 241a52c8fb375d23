//! # Courier Channels
//! Long-message segmentation, paced delivery, and the transports it runs over.
//!
//! ```text
//! text ──► segmenter::segment ──► [seg 1, seg 2, ...] ──► dispatcher::deliver_sequence
//!                                                            │  send, wait, send, ...
//!                                                            ▼
//!                                                      dyn Transport
//!                                                  (webhook | console | ...)
//! ```

pub mod console;
pub mod dispatcher;
pub mod segmenter;
pub mod webhook;

pub use console::ConsoleTransport;
pub use dispatcher::{deliver, deliver_sequence, DeliverOptions};
pub use segmenter::{segment, DEFAULT_MAX_LENGTH};
pub use webhook::WebhookTransport;

use courier_core::config::CourierConfig;
use courier_core::error::Result;
use courier_core::traits::Transport;

/// Pick the transport for a configuration: the webhook when one is
/// configured and `dry_run` is off, otherwise the console.
pub fn create_transport(config: &CourierConfig, dry_run: bool) -> Result<Box<dyn Transport>> {
    match (&config.webhook, dry_run) {
        (Some(webhook), false) => Ok(Box::new(WebhookTransport::new(webhook.clone())?)),
        _ => Ok(Box::new(ConsoleTransport::new())),
    }
}
