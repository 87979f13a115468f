use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{any, get};
use tokio::net::TcpListener;

use linkcheckr_server::config::ServerConfig;
use linkcheckr_server::routes;
use linkcheckr_server::state::AppState;

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Serve a small site on 127.0.0.1 and return its base URL.
///
/// `/` links to a working page, a missing page, a page that refuses HEAD,
/// a duplicate and a mailto link. `/moved` redirects to `/section/`, whose
/// link is relative. `/not-here` is a 404 page that still has a link.
pub async fn spawn_site() -> String {
    let app = Router::new()
        .route(
            "/",
            get(|| async {
                Html(
                    r#"<html><body>
                        <a href="/ok">ok</a>
                        <a href="/missing">missing</a>
                        <a href="/no-head">no head</a>
                        <a href="/ok">ok again</a>
                        <a href="mailto:someone@example.test">mail</a>
                        <a>no href</a>
                    </body></html>"#,
                )
            }),
        )
        .route("/ok", get(|| async { "fine" }))
        .route("/moved", get(|| async { Redirect::temporary("/section/") }))
        .route(
            "/section/",
            get(|| async { Html(r#"<a href="page">page</a>"#) }),
        )
        .route("/section/page", get(|| async { "in section" }))
        .route(
            "/not-here",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Html(r#"<a href="/ok">back home</a>"#),
                )
            }),
        )
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/no-head",
            any(|method: Method| async move {
                if method == Method::GET {
                    "only GET".into_response()
                } else {
                    StatusCode::METHOD_NOT_ALLOWED.into_response()
                }
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// The server router wired with the static renderer, private targets allowed,
/// and the production CORS layer.
pub async fn setup_test_app() -> Router {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("LINKCHECKR_RENDERER", "http"),
        ("LINKCHECKR_ALLOW_PRIVATE", "true"),
        ("LINKCHECKR_PROBE_TIMEOUT_SECS", "2"),
        ("LINKCHECKR_CORS_ORIGINS", ALLOWED_ORIGIN),
    ]);
    let config = ServerConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

    let state = Arc::new(AppState::from_config(&config).await.unwrap());
    routes::router(state).layer(routes::cors_layer(&config.cors_origins).unwrap())
}
