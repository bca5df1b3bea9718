// Adapters layer: concrete implementations for external systems (http, lookup services).

pub mod http;
pub mod providers;

pub use http::HttpFetcher;
pub use providers::{provider_for, BrasilApiProvider, ViaCepProvider};
