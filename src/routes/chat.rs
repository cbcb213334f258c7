use crate::{error::AppError, services::chat_service::NewMessage, state::AppState};
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatQuery {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub chat_id: Option<String>,
}

/// Tagged action body for `POST /api/chat`. Adding an action means adding a
/// variant here and a match arm below.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChatAction {
    Send(SendMessageRequest),
    Read(MarkReadRequest),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    pub receiver_id: String,
    #[serde(default)]
    pub receiver_name: Option<String>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub chat_id: String,
    pub user_id: String,
}

fn decode_action(body: &[u8]) -> Result<ChatAction, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))?;

    match value.get("action").and_then(|v| v.as_str()) {
        Some("send") | Some("read") => serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("invalid request: {e}"))),
        _ => Err(AppError::BadRequest("Unknown action".into())),
    }
}

/// GET /api/chat
///
/// `?userId=` is required. `&action=unread` returns the unread counter,
/// `&chatId=` the message history of one thread, otherwise the user's
/// thread summaries.
#[get("/api/chat")]
pub async fn get_chat(
    state: web::Data<AppState>,
    query: web::Query<ChatQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let user_id = query
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("userId required".into()))?;

    if query.action.as_deref() == Some("unread") {
        let unread_count = state.chat.unread_count_for(&user_id).await?;
        return Ok(HttpResponse::Ok().json(json!({ "unreadCount": unread_count })));
    }

    if let Some(chat_id) = query.chat_id.filter(|v| !v.is_empty()) {
        let messages = state.chat.messages(&chat_id).await?;
        return Ok(HttpResponse::Ok().json(json!({ "messages": messages })));
    }

    let threads = state.chat.threads_for(&user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "threads": threads })))
}

/// POST /api/chat
#[post("/api/chat")]
pub async fn post_chat(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    match decode_action(&body)? {
        ChatAction::Send(req) => {
            let message = state
                .chat
                .send(NewMessage {
                    sender_id: req.sender_id,
                    sender_name: req.sender_name,
                    receiver_id: req.receiver_id,
                    receiver_name: req.receiver_name,
                    text: req.text,
                })
                .await?;
            Ok(HttpResponse::Ok().json(json!({ "message": message })))
        }
        ChatAction::Read(req) => {
            if req.chat_id.is_empty() || req.user_id.is_empty() {
                return Err(AppError::BadRequest("chatId and userId are required".into()));
            }
            state.chat.mark_read(&req.chat_id, &req.user_id).await?;
            Ok(HttpResponse::Ok().json(json!({ "success": true })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_send_action() {
        let body = br#"{"action":"send","senderId":"a","receiverId":"b","text":"hi"}"#;
        match decode_action(body).unwrap() {
            ChatAction::Send(req) => {
                assert_eq!(req.sender_id, "a");
                assert_eq!(req.receiver_id, "b");
                assert_eq!(req.text, "hi");
                assert!(req.sender_name.is_none());
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn decode_read_action() {
        let body = br#"{"action":"read","chatId":"a:b","userId":"b"}"#;
        assert!(matches!(
            decode_action(body).unwrap(),
            ChatAction::Read(_)
        ));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = decode_action(br#"{"action":"archive"}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Unknown action"));

        let err = decode_action(br#"{"text":"hi"}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Unknown action"));
    }

    #[test]
    fn send_with_missing_field_is_rejected() {
        let err = decode_action(br#"{"action":"send","senderId":"a"}"#).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
