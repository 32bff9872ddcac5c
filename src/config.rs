//! Process configuration loaded from the environment.
//!
//! The configuration is read once at startup and never mutated afterwards.
//! Loading fails on the first required variable that is absent or empty, so
//! the server never binds a listener with a partial configuration.

use std::{
    error::Error,
    fmt::{self, Display},
    time::Duration,
};

use url::Url;

/// Storage service endpoint url.
pub const ENV_ENDPOINT: &str = "S3_ENDPOINT";
/// Storage region identifier.
pub const ENV_REGION: &str = "S3_REGION";
/// Storage credential id.
pub const ENV_ACCESS_KEY: &str = "S3_ACCESS_KEY";
/// Storage credential secret.
pub const ENV_SECRET_KEY: &str = "S3_SECRET_KEY";
/// Bucket holding the objects.
pub const ENV_BUCKET: &str = "S3_BUCKET";
/// Use path-style instead of virtual-host style addressing.
pub const ENV_FORCE_PATH_STYLE: &str = "S3_FORCE_PATH_STYLE";
/// Lifetime of signed urls, in seconds.
pub const ENV_EXPIRES_SECONDS: &str = "PRESIGN_EXPIRES_SECONDS";
/// Shared secret expected in the `x-api-key` header.
pub const ENV_API_KEY: &str = "PRESIGN_API_KEY";
/// Listening TCP port.
pub const ENV_PORT: &str = "PORT";

const DEFAULT_REGION: &str = "hel1";
const DEFAULT_PORT: u16 = 3000;

/// Expiry used when the configured value is unusable.
pub const DEFAULT_EXPIRES_SECONDS: u64 = 900;
/// Lower bound of the effective expiry.
pub const MIN_EXPIRES_SECONDS: u64 = 60;

/// Immutable server configuration.
#[derive(Clone)]
pub struct PresignConfig {
    endpoint: Url,
    region: String,
    access_key: String,
    secret_key: String,
    bucket: String,
    force_path_style: bool,
    expires_in: Duration,
    api_key: String,
    port: u16,
}

impl PresignConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through `lookup`, which returns the value of a
    /// variable by name.
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let endpoint = require(ENV_ENDPOINT)?;
        let access_key = require(ENV_ACCESS_KEY)?;
        let secret_key = require(ENV_SECRET_KEY)?;
        let bucket = require(ENV_BUCKET)?;
        let api_key = require(ENV_API_KEY)?;

        let endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::InvalidVar {
            name: ENV_ENDPOINT,
            reason: e.to_string(),
        })?;

        let region = get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_owned());

        let force_path_style = get(ENV_FORCE_PATH_STYLE)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let expires_in = Duration::from_secs(effective_expiry(
            get(ENV_EXPIRES_SECONDS).as_deref().unwrap_or("900"),
        ));

        let port = match get(ENV_PORT) {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: ENV_PORT,
                reason: format!("`{p}` is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            endpoint,
            region,
            access_key,
            secret_key,
            bucket,
            force_path_style,
            expires_in,
            api_key,
            port,
        })
    }

    /// Storage service endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Storage region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Storage credential id.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Storage credential secret.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Bucket the signed urls point into.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Whether path-style addressing is used.
    pub fn force_path_style(&self) -> bool {
        self.force_path_style
    }

    /// Effective lifetime of the signed urls, never below one minute.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// The shared api key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Listening port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Debug for PresignConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresignConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("force_path_style", &self.force_path_style)
            .field("expires_in", &self.expires_in)
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

/// Compute the signed url lifetime in seconds from the raw configured value.
///
/// Unparseable and non-positive values fall back to 900, the result is never
/// below 60.
pub fn effective_expiry(raw: &str) -> u64 {
    let seconds = match parse_leading_int(raw) {
        Some(n) if n > 0 => n as u64,
        _ => DEFAULT_EXPIRES_SECONDS,
    };
    seconds.max(MIN_EXPIRES_SECONDS)
}

/// Parse the integer at the start of `raw`.
///
/// Leading whitespace and a sign are accepted, everything after the last
/// leading digit is ignored. Returns `None` if there are no digits.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    // saturate instead of failing on absurdly long numbers
    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Startup configuration failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    MissingVar(&'static str),
    /// A variable is present but cannot be used.
    InvalidVar {
        /// Name of the variable.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Name of the offending variable.
    pub fn var_name(&self) -> &'static str {
        match self {
            Self::MissingVar(name) => name,
            Self::InvalidVar { name, .. } => name,
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "Missing required env var: {name}"),
            Self::InvalidVar { name, reason } => write!(f, "Invalid env var {name}: {reason}"),
        }
    }
}

impl Error for ConfigError {}
