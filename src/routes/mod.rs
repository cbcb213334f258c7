pub mod chat;
pub mod rtc;
