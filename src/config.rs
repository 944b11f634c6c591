use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: String,
    pub database_url: String,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Minimal video sharing web app")]
pub struct Args {
    /// Host to bind to (overrides VIDEO_SHARE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides VIDEO_SHARE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where uploaded media is stored and served from
    /// (overrides VIDEO_SHARE_PUBLIC_DIR)
    #[arg(long)]
    pub public_dir: Option<String>,

    /// Database URL (overrides VIDEO_SHARE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Maximum accepted upload body size in bytes
    /// (overrides VIDEO_SHARE_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("VIDEO_SHARE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("VIDEO_SHARE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing VIDEO_SHARE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading VIDEO_SHARE_PORT"),
        };
        let env_public = env::var("VIDEO_SHARE_PUBLIC_DIR").unwrap_or_else(|_| "./public".into());
        let env_db = env::var("VIDEO_SHARE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/video_share.db".into());
        let env_max_upload = match env::var("VIDEO_SHARE_MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse::<usize>().with_context(|| {
                format!("parsing VIDEO_SHARE_MAX_UPLOAD_BYTES value `{}`", value)
            })?,
            Err(env::VarError::NotPresent) => 500 * 1024 * 1024,
            Err(err) => return Err(err).context("reading VIDEO_SHARE_MAX_UPLOAD_BYTES"),
        };

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            public_dir: args.public_dir.unwrap_or(env_public),
            database_url: args.database_url.unwrap_or(env_db),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
