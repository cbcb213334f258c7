use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One direct message between two users.
///
/// Immutable once written except for `read`, which only ever transitions
/// false -> true. `text` is stored trimmed of surrounding whitespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: Uuid,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: String,
    pub text: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-user view of one conversation, reconstructed from stored messages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub chat_id: String,
    pub peer_id: String,
    pub peer_name: String,
    pub last_text: String,
    pub last_sender_id: String,
    pub last_created_at: DateTime<Utc>,
    pub unread: bool,
}
