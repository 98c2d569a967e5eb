//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for tasklist-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`, or `0.0.0.0:$PORT`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://tasklist.db?mode=rwc"`).
    pub database_url: String,

    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins; `"*"` allows any origin.
    pub cors_allowed_origins: String,

    /// Serve the generated OpenAPI document at `/api-docs/openapi.json`.
    pub enable_openapi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_owned(),
            database_url: "sqlite://tasklist.db?mode=rwc".to_owned(),
            db_max_connections: 5,
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: "http://localhost:4200".to_owned(),
            enable_openapi: true,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_fallback = match std::env::var("PORT") {
            Ok(port) if !port.trim().is_empty() => format!("0.0.0.0:{}", port.trim()),
            _ => defaults.bind_address,
        };
        Self {
            bind_address: env_or("TASKLIST_BIND", &bind_fallback),
            database_url: env_or("TASKLIST_DATABASE_URL", &defaults.database_url),
            db_max_connections: parse_env("TASKLIST_DB_MAX_CONNECTIONS", defaults.db_max_connections),
            log_level: env_or("TASKLIST_LOG", &defaults.log_level),
            log_json: bool_env("TASKLIST_LOG_JSON", defaults.log_json),
            cors_allowed_origins: env_or("TASKLIST_CORS_ORIGINS", &defaults.cors_allowed_origins),
            enable_openapi: bool_env("TASKLIST_ENABLE_OPENAPI", defaults.enable_openapi),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn bool_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
