use anyhow::{Context, bail};

const DEFAULT_MAIL_DOMAIN: &str = "tempmail.local";
const DEFAULT_API_PORT: u16 = 3114;

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing both user-session and admin tokens.
    pub jwt_secret: String,
    pub admin_username: String,
    /// bcrypt hash of the admin password. Env var: `ADMIN_PASSWORD_HASH`.
    pub admin_password_hash: String,
    /// Domain for generated addresses (default `tempmail.local`).
    pub mail_domain: String,
    /// TCP port to listen on (default 3114). Env var: `API_PORT`.
    pub api_port: u16,
    /// Allowed browser origins. Env var: `CORS_ORIGINS`, comma-separated.
    pub cors_origins: Vec<String>,
    /// Take the client IP from `x-forwarded-for` instead of the peer address.
    pub trust_forwarded_for: bool,
    /// Mount `POST /api/mock-email`.
    pub mock_ingest_enabled: bool,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} is not set"));

        let api_port = match lookup("API_PORT") {
            Some(v) => v.parse().with_context(|| format!("invalid API_PORT: {v}"))?,
            None => DEFAULT_API_PORT,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_owned())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            admin_username: required("ADMIN_USERNAME")?,
            admin_password_hash: required("ADMIN_PASSWORD_HASH")?,
            mail_domain: lookup("MAIL_DOMAIN").unwrap_or_else(|| DEFAULT_MAIL_DOMAIN.to_owned()),
            api_port,
            cors_origins,
            trust_forwarded_for: parse_flag(&lookup, "TRUST_FORWARDED_FOR")?,
            mock_ingest_enabled: parse_flag(&lookup, "MOCK_INGEST_ENABLED")?,
        })
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<bool> {
    let Some(value) = lookup(key) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("invalid {key}: {other}"),
    }
}
