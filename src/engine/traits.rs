use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// Decides whether a user utterance is a content-free filler
/// ("うん", "なるほど") rather than a real question. Implementations
/// must not fail: a backend error is reported as `false` so the engine
/// still tries to answer the input.
#[async_trait]
pub trait AckClassifier {
    async fn is_acknowledgement(&self, utterance: &str) -> bool;
}

/// Generates a fresh answer when no planned question is close enough.
/// `context` is the current turn's utterance.
#[async_trait]
pub trait FallbackAnswerer {
    async fn answer(&self, context: &str, question: &str) -> Result<String>;
}

/// Bounded source of user input lines. Returns `None` when nothing
/// arrives within `timeout`; must not block past it.
#[async_trait]
pub trait InputSource {
    async fn read_line(&mut self, timeout: Duration) -> Option<String>;
}

/// Append-only display. Writes appear in exactly the order the engine
/// produces them.
pub trait OutputSink {
    fn line(&mut self, text: &str);
    /// Inline prompt, no trailing newline.
    fn prompt(&mut self, text: &str);
}
