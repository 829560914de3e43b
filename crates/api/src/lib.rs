pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod ws;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    // Auth routes
    let auth_routes = Router::new()
        .route("/session", post(routes::auth::session))
        .route("/logout", post(routes::auth::logout));

    // Member routes
    let member_routes = Router::new()
        .route("/", get(routes::member::list))
        .route("/me", get(routes::member::me))
        .route("/me/status", put(routes::member::set_status))
        .route("/me/custom-status", put(routes::member::set_custom_status))
        .route("/me/meeting", post(routes::member::join_meeting));

    // Chat routes
    let chat_routes = Router::new().route(
        "/",
        get(routes::chat::list).post(routes::chat::create),
    );

    // Announcement routes
    let announcement_routes = Router::new()
        .route(
            "/",
            get(routes::announcement::list).post(routes::announcement::create),
        )
        .route(
            "/{announcement_id}",
            axum::routing::delete(routes::announcement::delete),
        )
        .route(
            "/{announcement_id}/pin",
            put(routes::announcement::toggle_pin),
        );

    // Compose API
    let api = Router::new()
        .route("/config", get(routes::client_config::get))
        .route("/status-preset", get(routes::status_preset::list))
        .route("/dashboard", get(routes::dashboard::get))
        .route("/drive/files", get(routes::drive::list_files))
        .nest("/auth", auth_routes)
        .nest("/member", member_routes)
        .nest("/chat", chat_routes)
        .nest("/announcement", announcement_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .route("/ws", get(ws::handler::ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
