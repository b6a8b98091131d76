use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_portal::config::{self, Config};
use job_portal::models::application::ApplicationStatus;
use job_portal::store::memory::MemoryStore;
use job_portal::store::postgres::PgStore;
use job_portal::store::ApplicationStore;
use job_portal::{api, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load()?;

    let json_logs = cfg.json_logs;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "job_portal=debug,tower_http=debug".into()),
        ))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::Migrate) => {
            let db = connect_pg(&cfg).await?;
            db.migrate().await?;
            tracing::info!("Migrations applied");
            Ok(())
        }
        Some(cli::Commands::Review {
            application_id,
            company_id,
            status,
        }) => {
            let db = connect_pg(&cfg).await?;
            handle_review(&db, application_id, company_id, &status).await
        }
        None => run_server(cfg, None).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn connect_pg(cfg: &Config) -> anyhow::Result<PgStore> {
    let url = cfg
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for this command")?;
    PgStore::connect(url).await
}

async fn run_server(cfg: Config, port: Option<u16>) -> anyhow::Result<()> {
    let store: Arc<dyn ApplicationStore> = match cfg.database_url.as_deref() {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db = PgStore::connect(url).await?;

            tracing::info!("Running migrations...");
            db.migrate().await?;
            Arc::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let port = port.unwrap_or(cfg.port);
    let state = Arc::new(AppState { store, config: cfg });
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_review(
    db: &PgStore,
    application_id: uuid::Uuid,
    company_id: uuid::Uuid,
    status: &str,
) -> anyhow::Result<()> {
    let status: ApplicationStatus = status.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    match db.record_review(application_id, company_id, status).await? {
        Some(app) => {
            println!("Application {} is now {}", app.id, app.status);
            if app.notification_sent {
                println!("Candidate {} will see the decision in their notifications", app.candidate_id);
            }
        }
        None => {
            anyhow::bail!(
                "application {} not found, not owned by company {}, or already decided",
                application_id,
                company_id
            );
        }
    }
    Ok(())
}
