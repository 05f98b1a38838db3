use anyhow::Context;
use serde::Deserialize;

/// Ten years; keeps `exp` far inside the range a timestamp can hold.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 366 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let db_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "authgate".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authgate-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok())?,
        };
        Ok(Self {
            database_url,
            db_max_connections,
            jwt,
        })
    }
}

fn parse_ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(60);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("JWT_TTL_MINUTES is not an integer: {raw:?}"))?;
    match minutes.checked_mul(60) {
        Some(_) if (1..=MAX_TTL_MINUTES).contains(&minutes) => Ok(minutes),
        _ => anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}"),
    }
}
