use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tickler_core::config::TicklerConfig;
use tickler_reminder::ReminderJob;
use tickler_scheduler::{Schedule, SchedulerEngine};
use tickler_store::TodoStore;
use tracing::{info, warn};

mod app;
mod auth;
mod http;

#[derive(Parser)]
#[command(name = "tickler-gateway", version, about = "Todo list with a daily reminder")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, short, env = "TICKLER_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // before logging init, so RUST_LOG can come from .env too
    let dotenv = tickler_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tickler_gateway=info,tickler_reminder=info,tickler_scheduler=info,tower_http=debug"
                    .into()
            }),
        )
        .init();

    match dotenv {
        Ok(Some(path)) => info!(path = %path.display(), "loaded environment from .env"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, ".env could not be read"),
    }

    // load config: --config / TICKLER_CONFIG > ./tickler.toml
    let cli = Cli::parse();
    let config = TicklerConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        TicklerConfig::default()
    });

    let db_path = config.database.path.as_str();
    let db = if db_path == ":memory:" {
        info!("using in-memory SQLite database");
        rusqlite::Connection::open_in_memory()?
    } else {
        ensure_parent_dir(db_path);
        info!(path = %db_path, "opening SQLite database");
        let db = rusqlite::Connection::open(db_path)?;
        db.execute_batch("PRAGMA journal_mode=WAL;")?;
        db
    };
    let store = Arc::new(TodoStore::new(db)?);

    let sink = tickler_notify::from_config(&config.notify);
    info!(sink = sink.name(), "notification sink selected");
    let reminder = Arc::new(ReminderJob::new(
        Arc::clone(&store),
        sink,
        &config.reminder.date_format,
    ));

    // a bad schedule is a startup error, not a silently disabled reminder
    let scheduler = if config.reminder.enabled {
        let schedule: Schedule = config.reminder.schedule.parse()?;
        let engine = SchedulerEngine::new(schedule, reminder.clone())?;
        info!(schedule = %engine.schedule(), "daily reminder scheduled");
        Some(engine.spawn())
    } else {
        info!("scheduled reminder disabled");
        None
    };

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(&config, Arc::clone(&store), reminder));
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Tickler gateway listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    if let Some(handle) = scheduler {
        handle.stop().await;
    }

    // the router and the reminder job are gone by now; the store should be ours
    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => warn!("todo store still shared at shutdown, leaving connection to drop"),
    }
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
