//! QR Service - Render text into cacheable SVG QR codes over HTTP.
//!
//! This binary starts the HTTP server and configures all components.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qr_service::{
    config::{load_env_file, Cli, Command, RenderConfig, ServeConfig, ENV_FILE},
    qr::{CacheFingerprint, GenerationRequest, QrService, SvgQrEncoder, SymbolEncoder},
    server::create_router,
};

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = load_env_file(ENV_FILE);
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config, env_file).await,
        Command::Render(config) => run_render(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig, env_file: Option<PathBuf>) -> ExitCode {
    init_logging(&config.effective_log_level());

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    print_banner();

    let auth = config.auth_config();
    info!("Configuration:");
    if let Some(ref path) = env_file {
        info!("  Env file: {}", path.display());
    }
    if auth.is_enforced() {
        info!("  Auth: enabled (API key required)");
    } else {
        warn!("  Auth: DISABLED - any API key is accepted");
        warn!("        Enable for production: --api-key=<secret> or API_KEY=<secret>");
    }
    info!("  Cache-Control max-age: {}s", config.cache_max_age);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    let router = create_router(QrService::new(), config.router_config());

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/healthz", addr);
    info!(
        "    curl -H 'X-API-Key: <key>' 'http://{}/v1/qr?data=https://example.com'",
        addr
    );
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Print the startup banner.
fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    info!("");
    info!(" ██████╗ ██████╗      ███████╗███████╗██████╗ ██╗   ██╗██╗ ██████╗███████╗");
    info!("██╔═══██╗██╔══██╗     ██╔════╝██╔════╝██╔══██╗██║   ██║██║██╔════╝██╔════╝");
    info!("██║   ██║██████╔╝     ███████╗█████╗  ██████╔╝██║   ██║██║██║     █████╗  ");
    info!("██║▄▄ ██║██╔══██╗     ╚════██║██╔══╝  ██╔══██╗╚██╗ ██╔╝██║██║     ██╔══╝  ");
    info!("╚██████╔╝██║  ██║     ███████║███████╗██║  ██║ ╚████╔╝ ██║╚██████╗███████╗");
    info!(" ╚══▀▀═╝ ╚═╝  ╚═╝     ╚══════╝╚══════╝╚═╝  ╚═╝  ╚═══╝  ╚═╝ ╚═════╝╚══════╝");
    info!("");
    info!("                                  v{}", version);
}

/// Initialize the tracing/logging subsystem.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(level: &str) {
    let env_filter = format!("qr_service={level},tower_http={level}");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Render Command
// =============================================================================

fn run_render(config: RenderConfig) -> ExitCode {
    let request = match GenerationRequest::with_options(&config.data, config.encode_options()) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let svg = match SvgQrEncoder::new().encode(&request.text, &request.encode_options()) {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.etag {
        eprintln!("ETag: {}", CacheFingerprint::derive(&request).etag());
    }

    match config.output {
        Some(ref path) => {
            if let Err(e) = std::fs::write(path, svg) {
                eprintln!("Error: failed to write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", svg),
    }

    ExitCode::SUCCESS
}
