use crate::error::AppError;
use crate::models::{DirectMessage, NotificationRecord};
use crate::storage::{ChatStorage, ThreadIndexEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

/// PostgreSQL-backed chat storage.
pub struct PgChatStorage {
    db: Pool,
}

impl PgChatStorage {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }
}

fn row_to_message(row: &Row) -> DirectMessage {
    let id: Uuid = row.get("id");
    let chat_id: String = row.get("chat_id");
    let sender_id: String = row.get("sender_id");
    let sender_name: String = row.get("sender_name");
    let receiver_id: String = row.get("receiver_id");
    let text: String = row.get("content");
    let read: bool = row.get("read");
    let created_at: DateTime<Utc> = row.get("created_at");

    DirectMessage {
        id,
        chat_id,
        sender_id,
        sender_name,
        receiver_id,
        text,
        read,
        created_at,
    }
}

#[async_trait]
impl ChatStorage for PgChatStorage {
    async fn read_messages(&self, chat_id: &str) -> Result<Vec<DirectMessage>, AppError> {
        let client = self.db.get().await?;

        let rows = client
            .query(
                r#"SELECT id, chat_id, sender_id, sender_name, receiver_id, content, read, created_at
                   FROM messages
                   WHERE chat_id = $1
                   ORDER BY created_at ASC
                   LIMIT 500"#,
                &[&chat_id],
            )
            .await?;

        Ok(rows.iter().map(row_to_message).collect())
    }

    async fn append_message(&self, message: &DirectMessage) -> Result<(), AppError> {
        let client = self.db.get().await?;

        client
            .execute(
                r#"INSERT INTO messages (id, chat_id, sender_id, sender_name, receiver_id, content, read, created_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
                &[
                    &message.id,
                    &message.chat_id,
                    &message.sender_id,
                    &message.sender_name,
                    &message.receiver_id,
                    &message.text,
                    &message.read,
                    &message.created_at,
                ],
            )
            .await?;

        Ok(())
    }

    async fn update_message_flags(
        &self,
        chat_id: &str,
        receiver_id: &str,
    ) -> Result<u64, AppError> {
        let client = self.db.get().await?;

        let touched = client
            .execute(
                "UPDATE messages SET read = TRUE
                 WHERE chat_id = $1 AND receiver_id = $2 AND read = FALSE",
                &[&chat_id, &receiver_id],
            )
            .await?;

        Ok(touched)
    }

    async fn read_thread_index(&self, user_id: &str) -> Result<Vec<ThreadIndexEntry>, AppError> {
        let client = self.db.get().await?;

        let rows = client
            .query(
                r#"
                SELECT DISTINCT ON (m.chat_id)
                    m.id, m.chat_id, m.sender_id, m.sender_name, m.receiver_id,
                    m.content, m.read, m.created_at,
                    ct.display_name,
                    EXISTS (
                        SELECT 1 FROM messages u
                        WHERE u.chat_id = m.chat_id AND u.receiver_id = $1 AND u.read = FALSE
                    ) AS has_unread
                FROM messages m
                LEFT JOIN chat_threads ct
                  ON ct.chat_id = m.chat_id AND ct.user_id = $1
                WHERE m.sender_id = $1 OR m.receiver_id = $1
                ORDER BY m.chat_id, m.created_at DESC
                "#,
                &[&user_id],
            )
            .await?;

        let entries = rows
            .iter()
            .map(|row| {
                let display_name: Option<String> = row.get("display_name");
                let has_unread: bool = row.get("has_unread");
                ThreadIndexEntry {
                    chat_id: row.get("chat_id"),
                    last_message: row_to_message(row),
                    display_name,
                    has_unread,
                }
            })
            .collect();

        Ok(entries)
    }

    async fn unread_count(&self, user_id: &str) -> Result<i64, AppError> {
        let client = self.db.get().await?;

        let row = client
            .query_one(
                "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND read = FALSE",
                &[&user_id],
            )
            .await?;

        Ok(row.get(0))
    }

    async fn upsert_display_name(
        &self,
        chat_id: &str,
        user_id: &str,
        name: &str,
    ) -> Result<(), AppError> {
        let client = self.db.get().await?;

        client
            .execute(
                r#"INSERT INTO chat_threads (chat_id, user_id, display_name)
                   VALUES ($1, $2, $3)
                   ON CONFLICT (chat_id, user_id)
                   DO UPDATE SET display_name = EXCLUDED.display_name"#,
                &[&chat_id, &user_id, &name],
            )
            .await?;

        Ok(())
    }

    async fn append_notification(&self, record: &NotificationRecord) -> Result<(), AppError> {
        let client = self.db.get().await?;

        client
            .execute(
                r#"INSERT INTO notifications (id, user_id, kind, title, body, read, created_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
                &[
                    &record.id,
                    &record.user_id,
                    &record.kind,
                    &record.title,
                    &record.body,
                    &record.read,
                    &record.created_at,
                ],
            )
            .await?;

        Ok(())
    }
}
