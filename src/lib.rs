//! University course-catalog HTTP API.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
