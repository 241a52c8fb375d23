//! Message and delivery types shared across crates.

pub mod message;

pub use message::{DeliveryPolicy, DeliveryReceipt, OutgoingText, QuotedRef, SendOptions};
