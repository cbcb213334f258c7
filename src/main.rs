use actix_web::{web, App, HttpServer};
use mitra_chat_service::{
    config, db, error, logging, routes,
    services::{chat_service::ChatService, turn_client::TurnClient},
    state::AppState,
    storage::postgres::PgChatStorage,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    let pool = db::init_pool(&cfg.database_url).await?;
    db::ensure_schema(&pool)
        .await
        .map_err(|e| error::AppError::StartServer(format!("schema: {e}")))?;

    let storage = Arc::new(PgChatStorage::new(pool));
    let chat = Arc::new(ChatService::new(storage));
    let turn = Arc::new(TurnClient::from_config(&cfg));

    let state = AppState {
        chat,
        turn,
        config: cfg.clone(),
    };

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(%bind_addr, "starting mitra-chat-service");

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .service(routes::chat::get_chat)
            .service(routes::chat::post_chat)
            .service(routes::rtc::get_turn_credentials)
            .route("/health", web::get().to(|| async { "OK" }))
    })
    .bind(&bind_addr)
    .map_err(|e| error::AppError::StartServer(format!("bind: {e}")))?
    .run()
    .await
    .map_err(|e| error::AppError::StartServer(format!("run server: {e}")))
}
