use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use training_backend::{
    config::{get_config, init_config},
    middleware::cors::permissive_cors,
    routes,
    services::content_service::ContentService,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let content_service = ContentService::load_from_dir(Path::new(&config.content_dir))?;
    let app_state = AppState::new(content_service);

    {
        let state = app_state.clone();
        tokio::spawn(async move {
            loop {
                let removed = state.session_service.sweep_expired().await;
                if removed > 0 {
                    info!(removed, "Expired quiz attempts swept");
                }
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        });
    }

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route(
            "/api/public/sections",
            get(routes::catalogue::list_sections),
        )
        .route(
            "/api/public/sections/:slug",
            get(routes::catalogue::get_section),
        )
        .route(
            "/api/public/sections/:slug/checks/:check_id/answer",
            post(routes::checks::answer_check),
        )
        .route(
            "/api/public/sections/:slug/quiz/start",
            post(routes::quiz::start_quiz),
        )
        .route(
            "/api/public/attempts/:token",
            get(routes::quiz::get_status),
        )
        .route(
            "/api/public/attempts/:token/answer",
            post(routes::quiz::submit_answer),
        )
        .route(
            "/api/public/attempts/:token/next",
            post(routes::quiz::advance_question),
        )
        .route(
            "/api/public/attempts/:token/result",
            get(routes::quiz::get_result),
        )
        .layer(axum::middleware::from_fn_with_state(
            training_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            training_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(public_api)
        .with_state(app_state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
