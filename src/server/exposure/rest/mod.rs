//! REST API exposure
//!
//! Builds the axum `Router` over an [`AppState`]: CRUD routes for products,
//! customers and orders, the delivered-orders report and the health probe.
//! A request using the wrong method on a known path answers 405 with a
//! plain-text body.

pub mod crud;
pub mod orders;

use crate::core::error::SalesError;
use crate::entities::{Customer, Order, Product};
use crate::server::host::AppState;
use axum::Router;
use axum::http::{Method, Uri};
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from the application state
    ///
    /// With `permissive_cors` set, any origin may call the API.
    pub fn build_router(state: AppState, permissive_cors: bool) -> Router {
        let app = Self::health_routes()
            .merge(Self::product_routes())
            .merge(Self::customer_routes())
            .merge(Self::order_routes())
            .method_not_allowed_fallback(method_not_allowed)
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if permissive_cors {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }

    fn health_routes() -> Router<AppState> {
        Router::new().route("/health", get(health_check))
    }

    fn product_routes() -> Router<AppState> {
        Router::new()
            .route(
                "/products",
                get(crud::list::<Product>).post(crud::create::<Product>),
            )
            .route(
                "/products/{id}",
                get(crud::get_one::<Product>)
                    .put(crud::update::<Product>)
                    .delete(crud::delete::<Product>),
            )
    }

    fn customer_routes() -> Router<AppState> {
        Router::new()
            .route(
                "/customers",
                get(crud::list::<Customer>).post(crud::create::<Customer>),
            )
            .route(
                "/customers/{id}",
                get(crud::get_one::<Customer>)
                    .put(crud::update::<Customer>)
                    .delete(crud::delete::<Customer>),
            )
    }

    fn order_routes() -> Router<AppState> {
        Router::new()
            .route(
                "/orders",
                get(crud::list::<Order>).post(orders::create_order),
            )
            .route("/orders/delivered/sum", get(orders::delivered_sum))
            .route(
                "/orders/{id}",
                get(crud::get_one::<Order>)
                    .put(crud::update::<Order>)
                    .delete(crud::delete::<Order>),
            )
    }
}

/// Liveness probe: 200 with an empty body
async fn health_check() {}

async fn method_not_allowed(method: Method, uri: Uri) -> SalesError {
    SalesError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        RestExposure::build_router(AppState::in_memory(), false)
    }

    #[tokio::test]
    async fn test_health_is_empty_200() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let response = app()
            .oneshot(Request::patch("/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Invalid request method PATCH for /orders");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response = app()
            .oneshot(Request::get("/invoices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
