//! `sales-api`: the sales REST server
//!
//! Reads `SalesConfig` (see `config/sales.yaml`), installs logging, opens the
//! configured store and serves until SIGTERM or Ctrl+C.

use anyhow::Result;
use sales::config::{LoggingConfig, SalesConfig, StoreBackend, StoreConfig};
use sales::entities::{Customer, Order, Product};
use sales::server::ServerBuilder;
use sales::storage::InMemoryStore;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = if logging.json {
        builder.json().with_target(false).try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(feature = "mongodb_backend")]
async fn with_mongodb(builder: ServerBuilder, store: &StoreConfig) -> Result<ServerBuilder> {
    use sales::storage::{MongoStore, connect};

    let database = connect(store).await?;

    let products = MongoStore::<Product>::new(database.clone());
    let customers = MongoStore::<Customer>::new(database.clone());
    let orders = MongoStore::<Order>::new(database);

    products.ensure_indexes().await?;
    customers.ensure_indexes().await?;
    orders.ensure_indexes().await?;

    Ok(builder
        .with_products(products)
        .with_customers(customers)
        .with_orders(orders))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn with_mongodb(_builder: ServerBuilder, _store: &StoreConfig) -> Result<ServerBuilder> {
    anyhow::bail!(
        "store.backend is mongodb but this binary was built without the mongodb_backend feature"
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SalesConfig::from_env()?;
    init_tracing(&config.logging);

    let builder = ServerBuilder::new().with_permissive_cors(config.server.permissive_cors);

    let builder = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            builder
                .with_products(InMemoryStore::<Product>::new())
                .with_customers(InMemoryStore::<Customer>::new())
                .with_orders(InMemoryStore::<Order>::new())
        }
        StoreBackend::Mongodb => with_mongodb(builder, &config.store).await?,
    };

    let addr = config.server.listen_addr();
    builder.serve(&addr).await
}
