use crate::error::AppError;
use crate::models::{DirectMessage, ThreadSummary};
use crate::services::notification_sink::NotificationSink;
use crate::storage::ChatStorage;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Deterministic, order-independent chat identifier for a user pair:
/// the lexicographically smaller id, a colon, the larger id.
pub fn chat_id_for(user_a: &str, user_b: &str) -> String {
    if user_a <= user_b {
        format!("{user_a}:{user_b}")
    } else {
        format!("{user_b}:{user_a}")
    }
}

/// Input for a message send. Names are optional hints used for the thread
/// display-name overrides and the notification title context.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: String,
    pub sender_name: Option<String>,
    pub receiver_id: String,
    pub receiver_name: Option<String>,
    pub text: String,
}

/// CRUD + derived-query layer over the message store. Stateless apart from
/// the injected storage handle; every operation maps to one or two store
/// round trips.
pub struct ChatService {
    storage: Arc<dyn ChatStorage>,
    notifications: NotificationSink,
}

impl ChatService {
    pub fn new(storage: Arc<dyn ChatStorage>) -> Self {
        let notifications = NotificationSink::new(storage.clone());
        Self {
            storage,
            notifications,
        }
    }

    /// Full message history of a thread, creation time ascending.
    pub async fn messages(&self, chat_id: &str) -> Result<Vec<DirectMessage>, AppError> {
        self.storage.read_messages(chat_id).await
    }

    /// Persist one message and fan out the best-effort side effects:
    /// a notification for the receiver and display-name upserts for both
    /// participants. Only the message write can fail the operation.
    pub async fn send(&self, new: NewMessage) -> Result<DirectMessage, AppError> {
        if new.sender_id.is_empty() || new.receiver_id.is_empty() {
            return Err(AppError::BadRequest(
                "senderId, receiverId and text are required".into(),
            ));
        }
        let text = new.text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest(
                "senderId, receiverId and text are required".into(),
            ));
        }

        let chat_id = chat_id_for(&new.sender_id, &new.receiver_id);
        let sender_name = new
            .sender_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| new.sender_id.clone());

        let message = DirectMessage {
            id: Uuid::new_v4(),
            chat_id: chat_id.clone(),
            sender_id: new.sender_id.clone(),
            sender_name,
            receiver_id: new.receiver_id.clone(),
            text: text.to_string(),
            read: false,
            created_at: Utc::now(),
        };

        self.storage.append_message(&message).await?;

        self.notifications.message_received(&message).await;

        if let Some(name) = new.receiver_name.as_deref().filter(|n| !n.is_empty()) {
            self.update_display_name(&chat_id, &new.sender_id, name)
                .await;
        }
        if let Some(name) = new.sender_name.as_deref().filter(|n| !n.is_empty()) {
            self.update_display_name(&chat_id, &new.receiver_id, name)
                .await;
        }

        Ok(message)
    }

    /// Mark every unread message addressed to `user_id` in the thread as
    /// read. Idempotent: a second call finds nothing unread and succeeds.
    pub async fn mark_read(&self, chat_id: &str, user_id: &str) -> Result<(), AppError> {
        let touched = self.storage.update_message_flags(chat_id, user_id).await?;
        tracing::debug!(%chat_id, %user_id, touched, "marked messages read");
        Ok(())
    }

    /// Thread summaries for a user, most recent activity first.
    pub async fn threads_for(&self, user_id: &str) -> Result<Vec<ThreadSummary>, AppError> {
        let entries = self.storage.read_thread_index(user_id).await?;

        let mut threads: Vec<ThreadSummary> = entries
            .into_iter()
            .map(|entry| {
                let last = entry.last_message;
                let (peer_id, fallback_name) = if last.sender_id == user_id {
                    // Latest message is the user's own; only the peer id is
                    // known from it.
                    (last.receiver_id.clone(), last.receiver_id.clone())
                } else {
                    (last.sender_id.clone(), last.sender_name.clone())
                };

                ThreadSummary {
                    chat_id: entry.chat_id,
                    peer_name: entry.display_name.unwrap_or(fallback_name),
                    peer_id,
                    last_text: last.text,
                    last_sender_id: last.sender_id,
                    last_created_at: last.created_at,
                    unread: entry.has_unread,
                }
            })
            .collect();

        threads.sort_by(|a, b| b.last_created_at.cmp(&a.last_created_at));
        Ok(threads)
    }

    pub async fn unread_count_for(&self, user_id: &str) -> Result<i64, AppError> {
        self.storage.unread_count(user_id).await
    }

    /// Best-effort display-name override for one participant's view of a
    /// thread. A failed write is logged and dropped.
    pub async fn update_display_name(&self, chat_id: &str, user_id: &str, name: &str) {
        if let Err(e) = self
            .storage
            .upsert_display_name(chat_id, user_id, name)
            .await
        {
            tracing::warn!(error = %e, %chat_id, %user_id, "display name update failed");
        }
    }
}
