// TURN credential proxy tests, using raw TCP listeners as vendor stand-ins.
// The proxy must answer 200 on every path: real credentials, vendor errors,
// and a vendor that never responds.

use actix_web::{test, web, App};
use mitra_chat_service::{
    config::Config,
    routes,
    services::{chat_service::ChatService, turn_client::TurnClient},
    state::AppState,
    storage::memory::MemoryChatStorage,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Vendor stand-in serving a fixed HTTP response; `None` accepts connections
/// and then goes silent forever.
async fn spawn_vendor(response: Option<String>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let response = response.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                match response {
                    Some(payload) => {
                        let _ = socket.write_all(payload.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    None => std::future::pending::<()>().await,
                }
            });
        }
    });

    addr
}

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn state_for(endpoint: String, timeout: Duration) -> AppState {
    AppState {
        chat: Arc::new(ChatService::new(Arc::new(MemoryChatStorage::new()))),
        turn: Arc::new(TurnClient::new(Some(endpoint), timeout)),
        config: Arc::new(Config {
            database_url: String::new(),
            port: 0,
            turn_api_url: None,
            turn_api_key: None,
            turn_fetch_timeout: timeout,
            turn_cache_max_age: 300,
        }),
    }
}

macro_rules! turn_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .service(routes::rtc::get_turn_credentials),
        )
        .await
    };
}

#[actix_web::test]
async fn forwards_credentials_with_cache_directive() {
    let body = r#"[{"urls":"turn:relay.example.com:3478","username":"u","credential":"c"}]"#;
    let addr = spawn_vendor(Some(http_response("200 OK", body))).await;

    let state = state_for(format!("http://{addr}/credentials"), Duration::from_secs(5));
    let app = turn_app!(state);

    let req = test::TestRequest::get().uri("/api/turn").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get("Cache-Control").unwrap(),
        "public, max-age=300"
    );

    let body: Value = test::read_body_json(resp).await;
    let servers = body["servers"].as_array().unwrap();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0]["username"], "u");
}

#[actix_web::test]
async fn vendor_500_fails_open_to_empty_list() {
    let addr = spawn_vendor(Some(http_response(
        "500 Internal Server Error",
        r#"{"error":"upstream broken"}"#,
    )))
    .await;

    let state = state_for(format!("http://{addr}/credentials"), Duration::from_secs(5));
    let app = turn_app!(state);

    let req = test::TestRequest::get().uri("/api/turn").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().get("Cache-Control").is_none());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["servers"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn unparsable_vendor_body_fails_open() {
    let addr = spawn_vendor(Some(http_response("200 OK", "not json"))).await;

    let state = state_for(format!("http://{addr}/credentials"), Duration::from_secs(5));
    let app = turn_app!(state);

    let req = test::TestRequest::get().uri("/api/turn").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["servers"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn hung_vendor_is_cut_off_at_the_timeout() {
    let addr = spawn_vendor(None).await;

    // Short bound so the test stays fast; production default is 5s.
    let state = state_for(
        format!("http://{addr}/credentials"),
        Duration::from_millis(300),
    );
    let app = turn_app!(state);

    let started = Instant::now();
    let req = test::TestRequest::get().uri("/api/turn").to_request();
    let resp = test::call_service(&app, req).await;
    let elapsed = started.elapsed();

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["servers"].as_array().unwrap().len(), 0);
    assert!(
        elapsed < Duration::from_secs(3),
        "proxy hung for {elapsed:?} instead of aborting at the bound"
    );
}
