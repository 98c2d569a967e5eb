use std::sync::Arc;

use http::{HeaderName, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};

use crate::middleware::trace::X_TRACE_ID;
use crate::state::AppState;

pub fn cors_layer(state: Arc<AppState>) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = CorsLayer::new().expose_headers([HeaderName::from_static(X_TRACE_ID)]);
    if origins.is_empty() {
        // Wildcard: credentials cannot be combined with `*`.
        cors.allow_origin(Any).allow_headers(Any).allow_methods(Any)
    } else {
        cors.allow_origin(origins)
            .allow_headers(AllowHeaders::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_credentials(true)
    }
}
