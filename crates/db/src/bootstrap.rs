//! Startup sequence for the database connection.
//!
//! The service cannot run without its database, so startup blocks until
//! the Postgres TCP endpoint accepts connections, then opens the session
//! with exponential backoff. Every failure here is fatal to the caller.
//!
//! ```text
//! wait_for_endpoint -> connect_with_backoff -> run_migrations -> health_check
//! ```

use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::time::{Duration, Instant};

use sqlx::postgres::PgConnectOptions;
use tokio::net::TcpStream;

use crate::DbPool;

/// Upper bound on a single TCP probe while waiting for the endpoint.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Backoff delays grow up to this and no further.
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(300);

/// Errors raised while bringing up the database connection.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Invalid value for {var}: {message}")]
    InvalidConfig { var: &'static str, message: String },

    #[error("Timed out after {waited:?} waiting for {host}:{port}")]
    EndpointTimeout {
        host: String,
        port: u16,
        waited: Duration,
    },

    #[error("Failed to connect to database after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Database health check failed: {0}")]
    HealthCheck(#[source] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Backoff
// ---------------------------------------------------------------------------

/// Exponential backoff parameters for the initial connection.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each further failure.
    pub multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl BackoffPolicy {
    /// Number of attempts actually made (at least one).
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay that follows `current`, capped at [`MAX_BACKOFF_DELAY`].
    pub fn next_delay(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .map_or(MAX_BACKOFF_DELAY, |next| next.min(MAX_BACKOFF_DELAY))
    }

    /// The sleeps between consecutive attempts, in order.
    pub fn delays(&self) -> Vec<Duration> {
        let mut delays = Vec::new();
        let mut delay = self.initial_delay;
        for _ in 1..self.attempts() {
            delays.push(delay);
            delay = self.next_delay(delay);
        }
        delays
    }
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// There is no delay before the first attempt. On exhaustion the last
/// error is returned.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &BackoffPolicy,
    what: &str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts();
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "{what} succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt >= attempts => {
                tracing::error!(attempt, error = %e, "{what} failed, giving up");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "{what} failed, retrying",
                );
            }
        }

        tokio::time::sleep(delay).await;
        delay = policy.next_delay(delay);
        attempt += 1;
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Database bootstrap configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection parameters handed to sqlx.
    pub connect_options: PgConnectOptions,
    /// Host probed before connecting.
    pub host: String,
    /// Port probed before connecting.
    pub port: u16,
    /// Pause between TCP probes.
    pub wait_poll_interval: Duration,
    /// Give up waiting after this long. `None` waits forever.
    pub wait_timeout: Option<Duration>,
    /// Retry policy for opening the session.
    pub backoff: BackoffPolicy,
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Connection parameters come from `DATABASE_URL` when set, otherwise
    /// from the standard libpq variables (`PGHOST`, `PGPORT`, `PGUSER`,
    /// `PGPASSWORD`, `PGDATABASE`, `PGSSLMODE`, ...).
    ///
    /// | Env Var                         | Default |
    /// |---------------------------------|---------|
    /// | `DB_CONNECT_ATTEMPTS`           | `5`     |
    /// | `DB_CONNECT_INITIAL_DELAY_MS`   | `1000`  |
    /// | `DB_CONNECT_BACKOFF_MULTIPLIER` | `2`     |
    /// | `DB_WAIT_POLL_MS`               | `250`   |
    /// | `DB_WAIT_TIMEOUT_SECS`          | unset   |
    pub fn from_env() -> Result<Self, BootstrapError> {
        let connect_options = match std::env::var("DATABASE_URL") {
            Ok(url) => PgConnectOptions::from_str(&url).map_err(|e| {
                BootstrapError::InvalidConfig {
                    var: "DATABASE_URL",
                    message: e.to_string(),
                }
            })?,
            Err(_) => PgConnectOptions::new(),
        };

        let multiplier: f64 = env_or("DB_CONNECT_BACKOFF_MULTIPLIER", 2.0)?;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(BootstrapError::InvalidConfig {
                var: "DB_CONNECT_BACKOFF_MULTIPLIER",
                message: format!("must be a number >= 1, got {multiplier}"),
            });
        }

        let backoff = BackoffPolicy {
            max_attempts: env_or("DB_CONNECT_ATTEMPTS", 5)?,
            initial_delay: Duration::from_millis(env_or("DB_CONNECT_INITIAL_DELAY_MS", 1000)?),
            multiplier,
        };

        let wait_timeout = match std::env::var("DB_WAIT_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(parse_var("DB_WAIT_TIMEOUT_SECS", &raw)?)),
            Err(_) => None,
        };

        Ok(Self {
            host: connect_options.get_host().to_string(),
            port: connect_options.get_port(),
            connect_options,
            wait_poll_interval: Duration::from_millis(env_or("DB_WAIT_POLL_MS", 250)?),
            wait_timeout,
            backoff,
        })
    }
}

fn env_or<T>(var: &'static str, default: T) -> Result<T, BootstrapError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(var) {
        Ok(raw) => parse_var(var, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, BootstrapError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| BootstrapError::InvalidConfig {
            var,
            message: format!("'{raw}': {e}"),
        })
}

// ---------------------------------------------------------------------------
// Startup steps
// ---------------------------------------------------------------------------

/// Block until `host:port` accepts TCP connections.
pub async fn wait_for_endpoint(
    host: &str,
    port: u16,
    poll_interval: Duration,
    timeout: Option<Duration>,
) -> Result<(), BootstrapError> {
    let started = Instant::now();
    tracing::info!(host, port, "Waiting for database endpoint");

    loop {
        match tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await {
            Ok(Ok(_)) => {
                tracing::info!(
                    host,
                    port,
                    waited_ms = started.elapsed().as_millis() as u64,
                    "Database endpoint is reachable",
                );
                return Ok(());
            }
            Ok(Err(e)) => tracing::debug!(host, port, error = %e, "Endpoint not reachable yet"),
            Err(_) => tracing::debug!(host, port, "Endpoint probe timed out"),
        }

        if let Some(limit) = timeout {
            let waited = started.elapsed();
            if waited >= limit {
                return Err(BootstrapError::EndpointTimeout {
                    host: host.to_string(),
                    port,
                    waited,
                });
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Open the database session, retrying per `policy`.
pub async fn connect_with_backoff(
    options: &PgConnectOptions,
    policy: &BackoffPolicy,
) -> Result<DbPool, BootstrapError> {
    retry_with_backoff(policy, "Database connection", || crate::connect(options))
        .await
        .map_err(|source| BootstrapError::RetriesExhausted {
            attempts: policy.attempts(),
            source,
        })
}

/// Run the full startup sequence and hand back the owned connection.
pub async fn bootstrap(config: &DatabaseConfig) -> Result<DbPool, BootstrapError> {
    // Unix socket hosts have no TCP endpoint to probe.
    if config.host.starts_with('/') {
        tracing::info!(socket_dir = %config.host, "Skipping TCP wait for socket connection");
    } else {
        wait_for_endpoint(
            &config.host,
            config.port,
            config.wait_poll_interval,
            config.wait_timeout,
        )
        .await?;
    }

    let pool = connect_with_backoff(&config.connect_options, &config.backoff).await?;
    tracing::info!("Connected to database");

    crate::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    crate::health_check(&pool)
        .await
        .map_err(BootstrapError::HealthCheck)?;
    tracing::info!("Database health check passed");

    Ok(pool)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
