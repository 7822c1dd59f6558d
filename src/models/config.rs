//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings read from `config/*.yaml` and `APP_*` environment variables.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Deployment name reported by the health check.
    pub environment: String,
    /// Origin allowed by CORS; `*` allows any origin.
    pub cors_origin: String,
}
