use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default origin of the WorkAI backend. Every API path in this client is
/// relative to a single origin.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Default location of the durable credential store.
pub const DEFAULT_CREDENTIALS_FILE: &str = ".workai/credentials.json";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Origin of the WorkAI backend that serves every API endpoint.
    #[arg(short, long, env, default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Path of the durable credential store (JSON key-value file).
    #[arg(long, env, default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials_file: PathBuf,

    /// Hex-encoded 32-byte AES-256-GCM key used to seal stored tokens.
    /// When absent, tokens are persisted in the clear.
    #[arg(long, env)]
    token_encryption_key: Option<String>,

    /// Timeout in seconds applied to every outbound HTTP request.
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Maximum number of transient (network/5xx) retries per request.
    /// Token-refresh retries are bounded separately, at one per call.
    #[arg(long, env, default_value_t = 3)]
    pub http_max_retries: u32,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Backend origin with any trailing slash removed, so endpoint paths
    /// can be appended verbatim.
    pub fn backend_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    pub fn set_backend_url(mut self, backend_url: String) -> Self {
        self.backend_url = backend_url;
        self
    }

    pub fn token_encryption_key(&self) -> Option<String> {
        self.token_encryption_key.clone()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
