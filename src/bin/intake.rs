//! intake CLI: run the service, or act as a client against it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use intake::adapter::memory::{MemoryQueue, MemoryStore};
use intake::api::{AppState, build_router};
use intake::client::poller::Poller;
use intake::client::{ApiClient, DEFAULT_URL};
use intake::config::Config;
use intake::config::secrets::ExposeSecret;
use intake::db::Db;
use intake::model::Request;
use intake::service::Timeouts;
use intake::telemetry::{TelemetryConfig, init_telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "intake", about = "Request admission and status tracking")]
struct Cli {
    /// TOML config file (environment variables override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Use the in-process store and queue instead of Postgres
        #[arg(long)]
        in_memory: bool,
    },
    /// Create one request
    Submit {
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// List requests, newest first
    List {
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// Refresh the request list until interrupted
    Watch {
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
        /// Refresh interval
        #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { in_memory } => {
            let config = Config::load(cli.config.as_deref())?;
            cmd_serve(config, in_memory).await
        }
        Command::Submit { url } => cmd_submit(&url).await,
        Command::List { url } => cmd_list(&url).await,
        Command::Watch { url, interval_ms } => cmd_watch(&url, interval_ms).await,
    }
}

async fn cmd_serve(config: Config, in_memory: bool) -> anyhow::Result<()> {
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "intake".to_string(),
        default_level: config.log_level.clone(),
    })?;

    let timeouts = Timeouts {
        store: config.store_timeout,
        queue: config.queue_timeout,
    };

    let state = if in_memory {
        info!("using in-memory store and queue");
        AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryQueue::new()),
            timeouts,
        )
    } else {
        let url = config.require_database_url()?;
        let db = Db::connect(url.expose_secret())
            .await?
            .with_queue(&config.queue_name);
        db.health_check().await?;
        db.migrate().await?;
        db.create_queue().await?;
        info!(queue = db.queue_name(), "database ready");

        let db = Arc::new(db);
        AppState::new(db.clone(), db, timeouts)
    };

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn cmd_submit(url: &str) -> anyhow::Result<()> {
    let created = ApiClient::new(url).create_request().await?;
    println!("{}: {}", created.message, created.request_id);
    Ok(())
}

async fn cmd_list(url: &str) -> anyhow::Result<()> {
    let requests = ApiClient::new(url).list_requests().await?;
    print_requests(&requests);
    Ok(())
}

async fn cmd_watch(url: &str, interval_ms: u64) -> anyhow::Result<()> {
    let client = Arc::new(ApiClient::new(url));
    let mut handle = Poller::new(client, Duration::from_millis(interval_ms))?.start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = handle.next() => match update {
                Some(Ok(requests)) => {
                    println!("--- {} ---", Local::now().format("%H:%M:%S"));
                    print_requests(&requests);
                }
                Some(Err(e)) => eprintln!("refresh failed: {e}"),
                None => break,
            },
        }
    }

    handle.stop().await;
    Ok(())
}

fn print_requests(requests: &[Request]) {
    if requests.is_empty() {
        println!("No requests found. Run `intake submit` to create one.");
        return;
    }

    println!("{:<8}  {:<12}  {:<10}  FINISHED", "ID", "STATUS", "STARTED");
    println!("{}", "-".repeat(44));
    for request in requests {
        println!(
            "{:<8}  {:<12}  {:<10}  {}",
            request.request_id.short(),
            request.status.as_str(),
            local_time(request.created_at),
            request
                .finished_at
                .map(local_time)
                .unwrap_or_else(|| "N/A".to_string()),
        );
    }
    println!("\n{} request(s)", requests.len());
}

fn local_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
