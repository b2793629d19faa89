use std::{net::SocketAddr, time::Duration};

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::{ExposeSecret, SecretString};

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Full connection string, including the password.
    pub database_url: SecretString,
    pub db_max_connections: u32,
    /// Upper bound for handling one request, repository calls included.
    pub request_timeout: Duration,
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)));
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);
        let request_timeout_secs: u64 = get_env_default("REQUEST_TIMEOUT_SECS", 30);
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        Self {
            bind_addr,
            database_url: database_url_from_env(),
            db_max_connections,
            request_timeout: Duration::from_secs(request_timeout_secs),
            cors_origin,
        }
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the `POSTGRES_*` parts.
fn database_url_from_env() -> SecretString {
    if let Ok(url) = std::env::var("DATABASE_URL")
        && !url.trim().is_empty()
    {
        return SecretString::new(url.into());
    }

    let user: String = get_env("POSTGRES_USER");
    let password = SecretString::new(get_env::<String>("POSTGRES_PASSWORD").into());
    let host: String = get_env_default("POSTGRES_HOST", "localhost".to_string());
    let port: u16 = get_env_default("POSTGRES_PORT", 5432);
    let db: String = get_env("POSTGRES_DB");

    postgres_url(&user, &password, &host, port, &db)
}

pub fn postgres_url(
    user: &str,
    password: &SecretString,
    host: &str,
    port: u16,
    db: &str,
) -> SecretString {
    SecretString::new(
        format!(
            "postgres://{user}:{}@{host}:{port}/{db}?sslmode=disable",
            password.expose_secret()
        )
        .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_url_is_assembled_from_parts() {
        let password = SecretString::new("s3cret".into());
        let url = postgres_url("postgres", &password, "db", 5433, "subscriptions");
        assert_eq!(
            url.expose_secret(),
            "postgres://postgres:s3cret@db:5433/subscriptions?sslmode=disable"
        );
    }

    #[test]
    fn secret_url_is_redacted_in_debug_output() {
        let password = SecretString::new("s3cret".into());
        let url = postgres_url("postgres", &password, "db", 5432, "subscriptions");
        assert!(!format!("{url:?}").contains("s3cret"));
    }
}
