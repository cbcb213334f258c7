use crate::{config::Config, services::chat_service::ChatService, services::turn_client::TurnClient};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub turn: Arc<TurnClient>,
    pub config: Arc<Config>,
}
