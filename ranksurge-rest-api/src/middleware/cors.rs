use axum::http::{HeaderName, HeaderValue, Method};
use ranksurge_config::CorsConfig;
use tower_http::cors::{Any, CorsLayer};

/// Create CORS layer from configuration.
///
/// Entries that do not parse as methods, header names or origins are logged
/// and skipped.
pub fn cors_layer_with_config(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid origin '{}' in CORS configuration: {}", origin, e);
                    None
                }
            })
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| method.to_uppercase().parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    // Configure headers
    cors = cors.allow_headers(header_names(&config.allowed_headers));
    cors = cors.expose_headers(header_names(&config.exposed_headers));

    if let Some(max_age) = config.max_age {
        cors = cors.max_age(max_age);
    }

    cors
}

fn header_names(names: &[String]) -> Vec<HeaderName> {
    names
        .iter()
        .filter_map(|name| match name.parse::<HeaderName>() {
            Ok(header) => Some(header),
            Err(e) => {
                tracing::warn!("Ignoring invalid header name '{}' in CORS configuration: {}", name, e);
                None
            }
        })
        .collect()
}
