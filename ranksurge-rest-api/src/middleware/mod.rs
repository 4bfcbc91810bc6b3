//! Middleware layers

pub mod cors;

pub use cors::cors_layer_with_config;
