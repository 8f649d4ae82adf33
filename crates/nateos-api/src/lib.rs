// nateos-api: Async HTTP client for the NateOS remote configuration API

pub mod client;
pub mod error;
pub mod health;
pub mod transport;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use health::HealthStatus;
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};
