use crate::models::{DirectMessage, NotificationRecord};
use crate::storage::ChatStorage;
use std::sync::Arc;

/// Maximum notification body length before the preview is cut.
const PREVIEW_MAX_CHARS: usize = 50;

/// Fire-and-forget creation of user-facing notification records.
///
/// Every write here is best-effort: a failure is logged and swallowed so it
/// can never fail the message send it is attached to.
pub struct NotificationSink {
    storage: Arc<dyn ChatStorage>,
}

impl NotificationSink {
    pub fn new(storage: Arc<dyn ChatStorage>) -> Self {
        Self { storage }
    }

    /// Record a "New Message" notification for the receiver.
    pub async fn message_received(&self, message: &DirectMessage) {
        let record =
            NotificationRecord::new_message(&message.receiver_id, truncate_preview(&message.text));

        if let Err(e) = self.storage.append_notification(&record).await {
            tracing::warn!(
                error = %e,
                receiver_id = %message.receiver_id,
                "notification write failed"
            );
        }
    }
}

/// First 50 characters plus an ellipsis when the text is longer; the full
/// text otherwise.
fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_MAX_CHARS {
        text.to_string()
    } else {
        let mut preview: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
        preview.push_str("...");
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_preview("hello"), "hello");
    }

    #[test]
    fn exactly_fifty_chars_gets_no_ellipsis() {
        let text = "a".repeat(50);
        assert_eq!(truncate_preview(&text), text);
    }

    #[test]
    fn fifty_one_chars_is_cut_with_ellipsis() {
        let text = "a".repeat(51);
        let expected = format!("{}...", "a".repeat(50));
        assert_eq!(truncate_preview(&text), expected);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = "é".repeat(60);
        let expected = format!("{}...", "é".repeat(50));
        assert_eq!(truncate_preview(&text), expected);
    }
}
