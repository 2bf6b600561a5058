//! CLI argument parsing and startup helpers for the demo server.

use clap::Parser;
use rand::distr::{Alphanumeric, SampleString};
use tracing::error;

use crate::directory::{Identity, MemoryDirectory};
use crate::jwt::{DEFAULT_EXPIRATION_SECS, DEFAULT_REFRESH_EXPIRATION_SECS};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "tokengate", about = "Bearer-token authentication demo server")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8300")]
    pub port: u16,

    /// Path to file containing the JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Access-token lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_EXPIRATION_SECS)]
    pub expiration: u64,

    /// Refresh window in seconds, measured from original issuance
    #[arg(long, default_value_t = DEFAULT_REFRESH_EXPIRATION_SECS)]
    pub refresh_expiration: u64,

    /// Disable token refresh; issued tokens then carry no lineage anchor
    #[arg(long)]
    pub no_refresh: bool,

    /// Scheme prefix expected in the Authorization header
    #[arg(long, default_value = "Bearer")]
    pub auth_prefix: String,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Seed the demo directory with one active user and print its credentials.
pub fn seed_demo_directory() -> MemoryDirectory {
    let password = Alphanumeric.sample_string(&mut rand::rng(), 24);
    let directory = MemoryDirectory::new();
    directory.insert(
        Identity {
            id: 1,
            username: "demo".to_string(),
            active: true,
        },
        &password,
    );

    println!();
    println!("Demo user: demo");
    println!("Password:  {}", password);
    println!();

    directory
}
