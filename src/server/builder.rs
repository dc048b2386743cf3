//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::AppState;
use crate::core::store::EntityStore;
use crate::entities::{Customer, Order, Product};
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the sales HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_products(InMemoryStore::<Product>::new())
///     .with_customers(InMemoryStore::<Customer>::new())
///     .with_orders(InMemoryStore::<Order>::new())
///     .serve("127.0.0.1:8080")
///     .await?;
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    products: Option<Arc<dyn EntityStore<Product>>>,
    customers: Option<Arc<dyn EntityStore<Customer>>>,
    orders: Option<Arc<dyn EntityStore<Order>>>,
    permissive_cors: bool,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the product store (required)
    pub fn with_products(mut self, store: impl EntityStore<Product> + 'static) -> Self {
        self.products = Some(Arc::new(store));
        self
    }

    /// Set the customer store (required)
    pub fn with_customers(mut self, store: impl EntityStore<Customer> + 'static) -> Self {
        self.customers = Some(Arc::new(store));
        self
    }

    /// Set the order store (required)
    pub fn with_orders(mut self, store: impl EntityStore<Order> + 'static) -> Self {
        self.orders = Some(Arc::new(store));
        self
    }

    /// Allow cross-origin calls from any origin
    pub fn with_permissive_cors(mut self, enabled: bool) -> Self {
        self.permissive_cors = enabled;
        self
    }

    /// Assemble the shared state
    pub fn build_state(self) -> Result<AppState> {
        let products = self
            .products
            .ok_or_else(|| anyhow!("Product store is required. Call .with_products()"))?;
        let customers = self
            .customers
            .ok_or_else(|| anyhow!("Customer store is required. Call .with_customers()"))?;
        let orders = self
            .orders
            .ok_or_else(|| anyhow!("Order store is required. Call .with_orders()"))?;

        Ok(AppState::new(products, customers, orders))
    }

    /// Build the final REST router
    pub fn build(self) -> Result<Router> {
        let permissive_cors = self.permissive_cors;
        let state = self.build_state()?;
        Ok(RestExposure::build_router(state, permissive_cors))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and serves until SIGTERM or Ctrl+C, letting in-flight
    /// requests finish.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
