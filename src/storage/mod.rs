pub mod memory;
pub mod postgres;

use crate::error::AppError;
use crate::models::{DirectMessage, NotificationRecord};
use async_trait::async_trait;

/// One row of a user's thread index: the latest message of a chat they
/// participate in, plus the bookkeeping needed for the summary view.
#[derive(Debug, Clone)]
pub struct ThreadIndexEntry {
    pub chat_id: String,
    pub last_message: DirectMessage,
    /// This user's display-name override for the thread, if any.
    pub display_name: Option<String>,
    pub has_unread: bool,
}

/// Storage seam for the chat service. Injected at construction so the
/// backing store is swappable; `memory::MemoryChatStorage` is the fake used
/// by the test suite, `postgres::PgChatStorage` the production backend.
#[async_trait]
pub trait ChatStorage: Send + Sync {
    /// All messages of a chat, ordered by creation time ascending.
    async fn read_messages(&self, chat_id: &str) -> Result<Vec<DirectMessage>, AppError>;

    /// Append one message. No deduplication: calling twice stores two rows.
    async fn append_message(&self, message: &DirectMessage) -> Result<(), AppError>;

    /// Flip every unread message addressed to `receiver_id` in `chat_id` to
    /// read. Returns the number of rows touched; zero is not an error.
    async fn update_message_flags(
        &self,
        chat_id: &str,
        receiver_id: &str,
    ) -> Result<u64, AppError>;

    /// Latest message per chat involving `user_id`, with unread flag and
    /// display-name override.
    async fn read_thread_index(&self, user_id: &str) -> Result<Vec<ThreadIndexEntry>, AppError>;

    /// Unread messages addressed to `user_id` across all threads.
    async fn unread_count(&self, user_id: &str) -> Result<i64, AppError>;

    async fn upsert_display_name(
        &self,
        chat_id: &str,
        user_id: &str,
        name: &str,
    ) -> Result<(), AppError>;

    async fn append_notification(&self, record: &NotificationRecord) -> Result<(), AppError>;
}
