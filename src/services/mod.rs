pub mod chat_service;
pub mod notification_sink;
pub mod turn_client;

pub use chat_service::{chat_id_for, ChatService, NewMessage};
pub use notification_sink::NotificationSink;
pub use turn_client::TurnClient;
