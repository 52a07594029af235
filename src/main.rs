use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use feeddeck::config::Config;
use feeddeck::scheduler::{FeedFetcher, HttpRefresher, Scheduler, WorkerPool};
use feeddeck::storage::Storage;
use feeddeck::web::WebServer;

#[tokio::main]
async fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let config = match Config::load_with_env(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = feeddeck::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        feeddeck::logging::init_console_only(&config.logging.level);
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> feeddeck::Result<()> {
    config.validate()?;

    info!("FeedDeck starting");
    let storage = Arc::new(Storage::connect(&config.database).await?);

    let scheduler = if config.scheduler.enabled {
        let fetcher = FeedFetcher::new(&config.fetcher)?;
        let refresher = Arc::new(HttpRefresher::new(storage.clone(), fetcher));
        let pool = WorkerPool::new(refresher, config.scheduler.workers);
        Some(Scheduler::new(storage.clone(), pool, &config.scheduler).spawn())
    } else {
        info!("Scheduler disabled");
        None
    };

    let server = WebServer::new(&config.server, &config.web, storage.clone())?;
    let served = server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Unable to listen for shutdown signal: {}", e);
            }
            info!("Shutdown requested");
        })
        .await;

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }
    storage.close().await;

    served
}
