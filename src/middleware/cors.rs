use tower_http::cors::{Any, CorsLayer};

/// The quiz API is embedded by course pages served from other origins.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
