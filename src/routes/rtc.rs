use crate::state::AppState;
use actix_web::{get, http::header, web, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
pub struct TurnCredentialsResponse {
    pub servers: Vec<serde_json::Value>,
}

/// GET /api/turn
///
/// Proxy for the vendor's short-lived relay credentials. Always answers 200:
/// real credentials with a cache directive, or an empty list on any failure.
#[get("/api/turn")]
pub async fn get_turn_credentials(state: web::Data<AppState>) -> HttpResponse {
    let servers = state.turn.fetch_ice_servers().await;

    if servers.is_empty() {
        return HttpResponse::Ok().json(TurnCredentialsResponse { servers });
    }

    HttpResponse::Ok()
        .insert_header((
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.config.turn_cache_max_age),
        ))
        .json(TurnCredentialsResponse { servers })
}
