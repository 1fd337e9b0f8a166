use clap::Parser;
use miette::{IntoDiagnostic, Result};
use orderdesk::application::service::OrderService;
use orderdesk::domain::ports::OrderStoreRef;
use orderdesk::infrastructure::in_memory::InMemoryOrderStore;
use orderdesk::interfaces::http::server;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let store: OrderStoreRef = match cli.db_path {
        Some(db_path) => open_rocksdb(db_path)?,
        None => {
            tracing::info!("using in-memory order store");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    let service = Arc::new(OrderService::new(store));

    let listener = TcpListener::bind(cli.bind).await.into_diagnostic()?;
    tracing::info!(addr = %cli.bind, "order API listening");

    server::serve(listener, service).await.into_diagnostic()?;

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_rocksdb(path: PathBuf) -> Result<OrderStoreRef> {
    use orderdesk::infrastructure::rocksdb::RocksDbOrderStore;

    let store = RocksDbOrderStore::open(&path).into_diagnostic()?;
    tracing::info!(path = %path.display(), "using RocksDB order store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_rocksdb(_path: PathBuf) -> Result<OrderStoreRef> {
    Err(miette::miette!(
        "persistent storage requires building with the `storage-rocksdb` feature"
    ))
}
