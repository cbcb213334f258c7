use crate::error::AppError;
use crate::models::{DirectMessage, NotificationRecord};
use crate::storage::{ChatStorage, ThreadIndexEntry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory chat storage. A drop-in stand-in for the PostgreSQL backend,
/// used throughout the test suite.
#[derive(Default)]
pub struct MemoryChatStorage {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    messages: Vec<DirectMessage>,
    display_names: HashMap<(String, String), String>,
    notifications: Vec<NotificationRecord>,
}

impl MemoryChatStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self) -> usize {
        self.inner.lock().unwrap().messages.len()
    }

    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.inner.lock().unwrap().notifications.clone()
    }

    pub fn display_name(&self, chat_id: &str, user_id: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .display_names
            .get(&(chat_id.to_string(), user_id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ChatStorage for MemoryChatStorage {
    async fn read_messages(&self, chat_id: &str) -> Result<Vec<DirectMessage>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut messages: Vec<DirectMessage> = inner
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn append_message(&self, message: &DirectMessage) -> Result<(), AppError> {
        self.inner.lock().unwrap().messages.push(message.clone());
        Ok(())
    }

    async fn update_message_flags(
        &self,
        chat_id: &str,
        receiver_id: &str,
    ) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let mut touched = 0;
        for message in inner
            .messages
            .iter_mut()
            .filter(|m| m.chat_id == chat_id && m.receiver_id == receiver_id && !m.read)
        {
            message.read = true;
            touched += 1;
        }
        Ok(touched)
    }

    async fn read_thread_index(&self, user_id: &str) -> Result<Vec<ThreadIndexEntry>, AppError> {
        let inner = self.inner.lock().unwrap();

        let mut latest: HashMap<String, DirectMessage> = HashMap::new();
        let mut unread: HashMap<String, bool> = HashMap::new();
        for message in inner
            .messages
            .iter()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
        {
            let entry = latest.entry(message.chat_id.clone());
            entry
                .and_modify(|current| {
                    if message.created_at >= current.created_at {
                        *current = message.clone();
                    }
                })
                .or_insert_with(|| message.clone());

            if message.receiver_id == user_id && !message.read {
                unread.insert(message.chat_id.clone(), true);
            }
        }

        let entries = latest
            .into_iter()
            .map(|(chat_id, last_message)| ThreadIndexEntry {
                display_name: inner
                    .display_names
                    .get(&(chat_id.clone(), user_id.to_string()))
                    .cloned(),
                has_unread: unread.get(&chat_id).copied().unwrap_or(false),
                chat_id,
                last_message,
            })
            .collect();

        Ok(entries)
    }

    async fn unread_count(&self, user_id: &str) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.receiver_id == user_id && !m.read)
            .count() as i64)
    }

    async fn upsert_display_name(
        &self,
        chat_id: &str,
        user_id: &str,
        name: &str,
    ) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .display_names
            .insert((chat_id.to_string(), user_id.to_string()), name.to_string());
        Ok(())
    }

    async fn append_notification(&self, record: &NotificationRecord) -> Result<(), AppError> {
        self.inner.lock().unwrap().notifications.push(record.clone());
        Ok(())
    }
}
