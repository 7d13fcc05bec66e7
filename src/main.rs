//! itemway - item CRUD over SQLite and MongoDB with an activity log

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itemway::{
    config::Args,
    db::{DocumentStore, MemoryDocumentStore, MongoClient, MongoDocumentStore, SqliteStore},
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_tracing(&args);

    if let Err(e) = args.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  itemway {}", env!("CARGO_PKG_VERSION"));
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("SQLite: {} (pool {})", args.database_path.display(), args.sqlite_pool_size);
    match args.redacted_mongodb_uri() {
        Some(uri) => info!("MongoDB: {} (db {})", uri, args.mongodb_db),
        None => info!("MongoDB: not configured"),
    }
    info!("======================================");

    let sqlite = match SqliteStore::open(&args.database_path, args.sqlite_pool_size) {
        Ok(store) => store,
        Err(e) => {
            error!("SQLite initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    let documents: Arc<dyn DocumentStore> = match args.mongodb_uri.as_deref() {
        Some(uri) => match connect_mongo(uri, &args.mongodb_db).await {
            Ok(store) => {
                info!("MongoDB connected successfully");
                Arc::new(store)
            }
            Err(e) => {
                if args.dev_mode {
                    warn!("MongoDB connection failed (dev mode, using in-memory store): {}", e);
                    Arc::new(MemoryDocumentStore::new())
                } else {
                    error!("MongoDB connection failed: {}", e);
                    std::process::exit(1);
                }
            }
        },
        None => {
            warn!("MONGODB_URI not set (dev mode): items and logs are kept in memory");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let state = server::AppState::new(sqlite, documents);

    if let Some(path) = args.activity_fallback_path.clone() {
        if let Err(e) = state.activity.init_fallback_file(path.clone()).await {
            error!("Cannot open activity fallback file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    let activity = state.activity.clone();
    let served = server::run(args.listen, Arc::new(state)).await;

    // Queued activity writes land in the store or the fallback file first
    activity.shutdown().await;
    served?;

    info!("itemway stopped");
    Ok(())
}

fn init_tracing(args: &Args) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("itemway={},activity={},info", args.log_level, args.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if args.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_mongo(uri: &str, db_name: &str) -> itemway::Result<MongoDocumentStore> {
    let client = MongoClient::new(uri, db_name).await?;
    Ok(MongoDocumentStore::new(&client))
}
