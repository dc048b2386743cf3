//! HTTP server: shared state, router and lifecycle

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::{AppState, StoreFor};
