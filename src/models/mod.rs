pub mod message;
pub mod notification;

pub use message::{DirectMessage, ThreadSummary};
pub use notification::NotificationRecord;
