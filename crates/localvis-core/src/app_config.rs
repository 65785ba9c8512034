use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings shared by the CLI and the HTTP server.
///
/// Scoring behaviour lives in [`crate::EngineConfig`]; this only says where to
/// find it and how the hosting process should run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub engine_config_path: PathBuf,
    /// Overrides `default_weight_table` from the engine config when set.
    pub default_weight_table: Option<String>,
    pub rate_limit_per_minute: usize,
    /// Key the rate limiter on `x-forwarded-for`. Only safe behind a proxy
    /// that overwrites the header.
    pub trust_forwarded_for: bool,
}
