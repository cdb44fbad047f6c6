//! Framecast CLI — upload a media file and trigger delivery.
//!
//! Requires the WEBDAV_* variables for the upload step and SERVER_URL (or
//! --server) for the delivery request. Exits non-zero with one consolidated
//! message on failure; transport traces go to the log, not the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use framecast_cli::{
    delivery_failure_message, describe_upload, destination_name, init_tracing,
    upload_failure_message,
};
use framecast_core::Config;
use framecast_storage::{ObjectStore, WebdavStore};

#[derive(Parser)]
#[command(name = "framecast", about = "Framecast media delivery CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file to the object store and trigger processing and delivery
    Send {
        /// Path to the media file to send
        file: PathBuf,
        /// Push token of the receiving device
        #[arg(long)]
        token: Option<String>,
        /// Delivery server base URL (defaults to SERVER_URL)
        #[arg(long)]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Send {
            file,
            token,
            server,
        } => match send(file, token, server).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn send(file: PathBuf, token: Option<String>, server: Option<String>) -> Result<()> {
    let config = Config::from_env()?;
    let webdav = config.webdav.clone().context(
        "WebDAV is not configured. Set WEBDAV_HOST, WEBDAV_USERNAME, WEBDAV_PASSWORD, \
         WEBDAV_UPLOAD_PATH, and WEBDAV_PUBLIC_HOST.",
    )?;
    let server_url = server.unwrap_or_else(|| config.server_url.clone());

    let name = destination_name(chrono::Utc::now().timestamp(), &file)
        .with_context(|| format!("Invalid file path: {}", file.display()))?;

    let store = WebdavStore::new(webdav, config.probe_timeout(), config.upload_timeout())
        .map_err(|e| anyhow::anyhow!(upload_failure_message(&e)))?;

    let stored = store
        .upload(&file, &name)
        .await
        .map_err(|e| anyhow::anyhow!(upload_failure_message(&e)))?;

    let asset = describe_upload(&file, &stored.name, &stored.url);
    println!(
        "{}",
        serde_json::to_string_pretty(&asset).context("Serialize upload description")?
    );

    let client = reqwest::Client::builder()
        .timeout(config.notify_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let mut body = json!({ "videoName": stored.name });
    if let Some(token) = token {
        body["expoPushToken"] = json!(token);
    }

    let response = client
        .post(format!("{}/process-video", server_url.trim_end_matches('/')))
        .json(&body)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!(delivery_failure_message(&e.to_string())))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "no response body".to_string());
        bail!(delivery_failure_message(&format!(
            "server replied {} ({})",
            status, detail
        )));
    }

    println!("Delivery started for {}", stored.name);
    Ok(())
}
