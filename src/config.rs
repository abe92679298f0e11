//! Configuration management for the QR service.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables
//! - Sensible defaults for all optional settings
//!
//! # Commands
//!
//! - `serve` (default when no subcommand is given) - run the HTTP server
//! - `render` - encode a single QR code to stdout or a file
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `API_KEY` - Expected API key; unset or empty disables enforcement
//! - `QR_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 31536000)
//! - `QR_CORS_ORIGINS` - Comma-separated allowed CORS origins (default: any)
//! - `LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//!
//! Any of these may also be set in a `.env` file in the working directory.
//! Variables already present in the environment win over the file.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::qr::{EncodeOptions, ErrorCorrection, DEFAULT_MARGIN};
use crate::server::{AuthConfig, RouterConfig, DEFAULT_CACHE_MAX_AGE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Env file read at startup, relative to the working directory.
pub const ENV_FILE: &str = ".env";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// =============================================================================
// Env File
// =============================================================================

/// Load variables from an env file into the process environment.
///
/// Must run before [`Cli`] is parsed so the `env` fallbacks see the values.
/// Returns the path when a file was loaded; a missing or unreadable file is
/// not an error.
pub fn load_env_file(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    dotenvy::from_path(path).ok().map(|()| path.to_path_buf())
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// QR Service - Render text into cacheable SVG QR codes over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "qr-service")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Server options, used when no subcommand is given.
    #[command(flatten)]
    pub serve: ServeConfig,
}

impl Cli {
    /// Resolve the command to run; no subcommand means `serve`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeConfig),

    /// Render one QR code without starting the server.
    Render(RenderConfig),
}

// =============================================================================
// Serve Configuration
// =============================================================================

/// Options for the HTTP server.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Expected API key for X-API-Key / Authorization headers.
    ///
    /// When unset or empty, authentication is DISABLED: any presented key is
    /// accepted. Only run without a key in development/testing.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// HTTP Cache-Control max-age in seconds for generated images.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "QR_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "QR_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "LOG_LEVEL")]
    pub log_level: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Host is required. Set --host or HOST".to_string());
        }

        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Unknown log level '{}' (expected one of: {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Authentication settings derived from the configured API key.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::from_secret(self.api_key.as_deref())
    }

    /// Effective log level, accounting for `--verbose`.
    pub fn effective_log_level(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level.to_ascii_lowercase()
        }
    }

    /// Build the router configuration.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::with_auth(self.auth_config())
            .with_cache_max_age(self.cache_max_age)
            .with_tracing(!self.no_tracing);

        if let Some(ref origins) = self.cors_origins {
            router_config = router_config.with_cors_origins(origins.clone());
        }

        router_config
    }
}

// =============================================================================
// Render Configuration
// =============================================================================

/// Options for the `render` command.
#[derive(Args, Debug, Clone)]
pub struct RenderConfig {
    /// Text to encode.
    pub data: String,

    /// Quiet zone width in modules (0-10).
    #[arg(short, long, default_value_t = DEFAULT_MARGIN)]
    pub margin: u8,

    /// Error correction level (L, M, Q, H).
    #[arg(short, long, default_value_t = ErrorCorrection::Medium)]
    pub ecc: ErrorCorrection,

    /// Fixed symbol version (1-40). Defaults to the smallest that fits.
    #[arg(long = "symbol-version")]
    pub symbol_version: Option<u8>,

    /// Write the SVG to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also print the ETag the server would send (to stderr).
    #[arg(long, default_value_t = false)]
    pub etag: bool,
}

impl RenderConfig {
    /// Encoding options assembled from the flags.
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            margin: self.margin,
            error_correction: self.ecc,
            version: self.symbol_version,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
