use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-facing notification row, written opportunistically by the chat
/// service. Creation is best-effort: a failed write is logged and dropped,
/// never surfaced to the sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new_message(user_id: &str, body: String) -> Self {
        Self {
            id: compose_id(),
            user_id: user_id.to_string(),
            kind: "message".to_string(),
            title: "New Message".to_string(),
            body,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Time + random composite id. Collision-tolerant, not collision-proof: two
/// writes in the same millisecond still differ in the random suffix.
fn compose_id() -> String {
    format!(
        "{}-{:08x}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_defaults() {
        let record = NotificationRecord::new_message("user-1", "hi".into());
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.kind, "message");
        assert_eq!(record.title, "New Message");
        assert!(!record.read);
    }

    #[test]
    fn composite_ids_differ() {
        let a = compose_id();
        let b = compose_id();
        assert_ne!(a, b);
    }
}
