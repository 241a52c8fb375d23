//! Ordered, paced delivery of a segment sequence over a [`Transport`].
//!
//! Segments go out one at a time and each send is awaited before the next,
//! so wire order matches sequence order. The first transport error aborts
//! the rest of the sequence and is returned unchanged.

use courier_core::error::Result;
use courier_core::traits::Transport;
use courier_core::types::{DeliveryPolicy, OutgoingText, QuotedRef, SendOptions};

use crate::segmenter::{self, DEFAULT_MAX_LENGTH};

/// Caller overrides for [`deliver`]. Unset fields use the defaults.
#[derive(Debug, Clone, Default)]
pub struct DeliverOptions {
    pub quoted: Option<QuotedRef>,
    pub inter_segment_delay_ms: Option<u64>,
    pub quote_first_only: Option<bool>,
    pub max_length: Option<usize>,
}

impl DeliverOptions {
    /// Options seeded from a configured policy and segment budget.
    pub fn from_policy(policy: DeliveryPolicy, max_length: usize) -> Self {
        Self {
            quoted: None,
            inter_segment_delay_ms: Some(policy.inter_segment_delay_ms),
            quote_first_only: Some(policy.quote_first_only),
            max_length: Some(max_length),
        }
    }

    pub fn with_quote(mut self, quoted: QuotedRef) -> Self {
        self.quoted = Some(quoted);
        self
    }

    pub fn policy(&self) -> DeliveryPolicy {
        let defaults = DeliveryPolicy::default();
        DeliveryPolicy {
            inter_segment_delay_ms: self
                .inter_segment_delay_ms
                .unwrap_or(defaults.inter_segment_delay_ms),
            quote_first_only: self.quote_first_only.unwrap_or(defaults.quote_first_only),
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length.unwrap_or(DEFAULT_MAX_LENGTH)
    }
}

/// Append the `[i/N]` part indicator. `index` is zero-based.
pub fn annotate(segment: &str, index: usize, total: usize) -> String {
    format!("{segment}\n\n[{}/{total}]", index + 1)
}

/// Segment `text` and deliver the result to `recipient`.
pub async fn deliver(
    transport: &dyn Transport,
    recipient: &str,
    text: &str,
    options: &DeliverOptions,
) -> Result<()> {
    let segments = segmenter::segment(text, options.max_length());
    deliver_sequence(
        transport,
        recipient,
        &segments,
        &options.policy(),
        options.quoted.as_ref(),
    )
    .await
}

/// Send `segments` in order, pausing between sends.
///
/// Multi-part sequences carry a part indicator on every segment. The quoted
/// reference goes on the first send only when `policy.quote_first_only` is
/// set, otherwise on every send.
pub async fn deliver_sequence(
    transport: &dyn Transport,
    recipient: &str,
    segments: &[String],
    policy: &DeliveryPolicy,
    quoted: Option<&QuotedRef>,
) -> Result<()> {
    let total = segments.len();
    if total == 0 {
        tracing::debug!("Nothing to deliver to {recipient}");
        return Ok(());
    }
    if total > 1 {
        tracing::info!(
            "Delivering {total} segments to {recipient} via {}",
            transport.name()
        );
    }

    for (index, segment) in segments.iter().enumerate() {
        let payload = if total > 1 {
            OutgoingText::new(annotate(segment, index, total))
        } else {
            OutgoingText::new(segment.as_str())
        };

        let options = match quoted {
            Some(q) if index == 0 || !policy.quote_first_only => SendOptions::quoting(q.clone()),
            _ => SendOptions::default(),
        };

        match transport.send(recipient, &payload, &options).await {
            Ok(receipt) => {
                tracing::debug!(
                    "Sent segment {}/{total} to {recipient} ({} chars)",
                    index + 1,
                    payload.text.chars().count()
                );
                tracing::trace!(
                    "Receipt {} for segment {}/{total} accepted at {}",
                    receipt.id,
                    index + 1,
                    receipt.accepted_at.to_rfc3339()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Delivery to {recipient} failed at segment {}/{total}: {e}",
                    index + 1
                );
                return Err(e);
            }
        }

        if index + 1 < total && policy.inter_segment_delay_ms > 0 {
            tokio::time::sleep(policy.inter_segment_delay()).await;
        }
    }

    if total > 1 {
        tracing::info!("Delivered all {total} segments to {recipient}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_core::error::CourierError;
    use courier_core::types::DeliveryReceipt;
    use std::sync::Mutex;
    use tokio::time::{Duration, Instant};

    #[derive(Debug, Clone)]
    struct Sent {
        recipient: String,
        text: String,
        quoted: Option<QuotedRef>,
        at: Instant,
    }

    /// Records every send; optionally fails on the given 1-based call.
    struct RecordingTransport {
        sent: Mutex<Vec<Sent>>,
        calls: Mutex<usize>,
        fail_on: Option<usize>,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self { sent: Mutex::new(vec![]), calls: Mutex::new(0), fail_on: None }
        }

        fn failing_on(call: usize) -> Self {
            Self { fail_on: Some(call), ..Self::new() }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        fn name(&self) -> &str { "recording" }

        async fn send(
            &self,
            recipient: &str,
            payload: &OutgoingText,
            options: &SendOptions,
        ) -> Result<DeliveryReceipt> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if self.fail_on == Some(call) {
                return Err(CourierError::transport("socket closed"));
            }
            self.sent.lock().unwrap().push(Sent {
                recipient: recipient.to_string(),
                text: payload.text.clone(),
                quoted: options.quoted.clone(),
                at: Instant::now(),
            });
            Ok(DeliveryReceipt::new(format!("m{call}")))
        }
    }

    fn three() -> Vec<String> {
        vec!["one".into(), "two".into(), "three".into()]
    }

    fn policy(delay_ms: u64, quote_first_only: bool) -> DeliveryPolicy {
        DeliveryPolicy { inter_segment_delay_ms: delay_ms, quote_first_only }
    }

    #[test]
    fn test_annotate() {
        assert_eq!(annotate("hello", 1, 5), "hello\n\n[2/5]");
    }

    #[test]
    fn test_options_fall_back_to_defaults() {
        let options = DeliverOptions::default();
        assert_eq!(options.policy(), DeliveryPolicy::default());
        assert_eq!(options.max_length(), DEFAULT_MAX_LENGTH);

        let options = DeliverOptions::from_policy(policy(10, false), 50);
        assert_eq!(options.policy(), policy(10, false));
        assert_eq!(options.max_length(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_in_order_with_indicators() {
        let transport = RecordingTransport::new();
        deliver_sequence(&transport, "alice", &three(), &policy(500, true), None)
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].text, "one\n\n[1/3]");
        assert_eq!(sent[1].text, "two\n\n[2/3]");
        assert_eq!(sent[2].text, "three\n\n[3/3]");
        assert!(sent.iter().all(|s| s.recipient == "alice"));

        for gap in [sent[1].at - sent[0].at, sent[2].at - sent[1].at] {
            assert!(gap >= Duration::from_millis(500), "gap too short: {gap:?}");
            assert!(gap < Duration::from_millis(550), "gap too long: {gap:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_last_segment() {
        let transport = RecordingTransport::new();
        let start = Instant::now();
        deliver_sequence(&transport, "bob", &three(), &policy(500, true), None)
            .await
            .unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1100), "slept after the last segment: {elapsed:?}");
    }

    #[tokio::test]
    async fn test_single_segment_has_no_indicator() {
        let transport = RecordingTransport::new();
        deliver_sequence(&transport, "bob", &["only".to_string()], &policy(500, true), None)
            .await
            .unwrap();
        assert_eq!(transport.sent()[0].text, "only");
    }

    #[tokio::test]
    async fn test_empty_sequence_sends_nothing() {
        let transport = RecordingTransport::new();
        deliver_sequence(&transport, "bob", &[], &policy(0, true), None).await.unwrap();
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_fast_on_second_send() {
        let transport = RecordingTransport::failing_on(2);
        let err = deliver_sequence(&transport, "carol", &three(), &policy(500, true), None)
            .await
            .unwrap_err();

        assert!(matches!(err, CourierError::Transport(ref m) if m == "socket closed"));
        assert_eq!(transport.calls(), 2);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_quote_first_only() {
        let transport = RecordingTransport::new();
        let quoted = QuotedRef::new("orig-42");
        deliver_sequence(&transport, "dave", &three(), &policy(0, true), Some(&quoted))
            .await
            .unwrap();

        let quotes: Vec<_> = transport.sent().into_iter().map(|s| s.quoted).collect();
        assert_eq!(quotes, vec![Some(quoted), None, None]);
    }

    #[tokio::test]
    async fn test_quote_every_send_when_not_first_only() {
        let transport = RecordingTransport::new();
        let quoted = QuotedRef::new("orig-42");
        deliver_sequence(&transport, "dave", &three(), &policy(0, false), Some(&quoted))
            .await
            .unwrap();
        assert!(transport.sent().iter().all(|s| s.quoted.as_ref() == Some(&quoted)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deliver_composes_segmenter() {
        let transport = RecordingTransport::new();
        let options = DeliverOptions {
            max_length: Some(15),
            inter_segment_delay_ms: Some(200),
            ..Default::default()
        };
        deliver(&transport, "erin", "Para one.\n\nPara two.", &options).await.unwrap();

        let texts: Vec<_> = transport.sent().into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["Para one.\n\n[1/2]", "Para two.\n\n[2/2]"]);
    }
}
