use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// URL for accessing the PostgreSQL database
pub const DB_URL: &str = "DATABASE_URL";
/// Log level configuration for the application. For formatting info, see
/// [EnvFilter's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Address the HTTP server binds to, such as `0.0.0.0:8080`
pub const LISTEN_ADDR: &str = "LISTEN_ADDR";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

/// Schema qualifier for the `users` table. Deployments of the legacy user service use "public".
pub const USER_SCHEMA: &str = "USER_SCHEMA";
/// Schema qualifier for the `todo_lists` and `todo_items` tables
pub const TODO_SCHEMA: &str = "TODO_SCHEMA";

/// Username accepted by the Basic Authentication layer
pub const BASIC_AUTH_USERNAME: &str = "BASIC_AUTH_USERNAME";
/// Password accepted by the Basic Authentication layer
pub const BASIC_AUTH_PASSWORD: &str = "BASIC_AUTH_PASSWORD";
/// When "true", the user routes sit behind Basic Authentication as well as the todo list routes
pub const PROTECT_USER_ROUTES: &str = "PROTECT_USER_ROUTES";

/// Number of seconds a request may run before the server gives up on it
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
/// Maximum number of pooled database connections
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// Number of seconds a request waits for a free pooled connection before failing with a 500
pub const DB_ACQUIRE_TIMEOUT_SECS: &str = "DB_ACQUIRE_TIMEOUT_SECS";
/// When "true", missing schemas and tables are created on startup
pub const INIT_SCHEMA: &str = "INIT_SCHEMA";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_USER_SCHEMA: &str = "user_management";
const DEFAULT_TODO_SCHEMA: &str = "todolist_management";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} was not set")]
    Missing(&'static str),
    #[error("environment variable {var} was invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// The credential pair accepted by the Basic Authentication layer
#[derive(Clone)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// OpenTelemetry collector endpoints. Only present when both endpoints are configured.
#[derive(Debug, Clone)]
pub struct OtelEndpoints {
    pub span_url: String,
    pub metric_url: String,
}

/// Typed application configuration, read from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub otel: Option<OtelEndpoints>,
    pub user_schema: String,
    pub todo_schema: String,
    pub credentials: BasicAuthCredentials,
    pub protect_user_routes: bool,
    pub request_timeout: Duration,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub init_schema: bool,
}

impl AppConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup, which lets tests avoid
    /// touching the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let listen_addr = lookup(LISTEN_ADDR)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                var: LISTEN_ADDR,
                reason: err.to_string(),
            })?;

        let otel = match (lookup(OTEL_SPAN_EXPORT_URL), lookup(OTEL_METRIC_EXPORT_URL)) {
            (Some(span_url), Some(metric_url)) => Some(OtelEndpoints {
                span_url,
                metric_url,
            }),
            _ => None,
        };

        let user_schema = schema_name(
            USER_SCHEMA,
            lookup(USER_SCHEMA).unwrap_or_else(|| DEFAULT_USER_SCHEMA.to_owned()),
        )?;
        let todo_schema = schema_name(
            TODO_SCHEMA,
            lookup(TODO_SCHEMA).unwrap_or_else(|| DEFAULT_TODO_SCHEMA.to_owned()),
        )?;

        let credentials = BasicAuthCredentials {
            username: required(BASIC_AUTH_USERNAME)?,
            password: required(BASIC_AUTH_PASSWORD)?,
        };

        let request_timeout = Duration::from_secs(parse_or(
            REQUEST_TIMEOUT_SECS,
            lookup(REQUEST_TIMEOUT_SECS),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        let db_acquire_timeout = Duration::from_secs(parse_or(
            DB_ACQUIRE_TIMEOUT_SECS,
            lookup(DB_ACQUIRE_TIMEOUT_SECS),
            DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
        )?);

        Ok(AppConfig {
            database_url: required(DB_URL)?,
            listen_addr,
            otel,
            user_schema,
            todo_schema,
            credentials,
            protect_user_routes: parse_or(PROTECT_USER_ROUTES, lookup(PROTECT_USER_ROUTES), false)?,
            request_timeout,
            db_max_connections: parse_or(
                DB_MAX_CONNECTIONS,
                lookup(DB_MAX_CONNECTIONS),
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            db_acquire_timeout,
            init_schema: parse_or(INIT_SCHEMA, lookup(INIT_SCHEMA), true)?,
        })
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            var,
            reason: err.to_string(),
        }),
    }
}

/// Schema names are interpolated into SQL, so only plain identifiers are accepted
fn schema_name(var: &'static str, name: String) -> Result<String, ConfigError> {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if starts_ok && rest_ok && name.len() <= 63 {
        Ok(name)
    } else {
        Err(ConfigError::Invalid {
            var,
            reason: format!("\"{name}\" is not a valid schema name"),
        })
    }
}
