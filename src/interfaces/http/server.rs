//! HTTP server for the order API.
//!
//! Thin boundary layer: handlers deserialize requests into the domain's
//! input types, call into `OrderService` and serialize the results back to
//! JSON. All policy lives below this module.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::dto::{ErrorBody, HealthBody, OrderBody};
use crate::application::service::OrderService;
use crate::domain::order::NewOrder;
use crate::error::OrderError;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
}

/// Builds the application router with routing, CORS and request tracing.
pub fn router(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/pending", get(list_pending_orders))
        .route("/orders/{order_id}", delete(cancel_order))
        .route("/orders/{order_id}/complete", patch(complete_order))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(AppState { service })
}

/// Serves the API on an already-bound listener until the task is aborted.
pub async fn serve(listener: TcpListener, service: Arc<OrderService>) -> std::io::Result<()> {
    axum::serve(listener, router(service)).await
}

/// Maps domain errors onto HTTP responses at the boundary.
///
/// `Storage` is the only kind treated as an outage: it is logged with full
/// context here and surfaced as a generic message without internal detail.
pub struct ApiError(OrderError);

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self.0 {
            OrderError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg.clone())
            }
            OrderError::NotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND", self.0.to_string()),
            OrderError::AlreadyCancelled(_) => {
                (StatusCode::BAD_REQUEST, "ALREADY_CANCELLED", self.0.to_string())
            }
            OrderError::TerminalState(_) => {
                (StatusCode::BAD_REQUEST, "TERMINAL_STATE", self.0.to_string())
            }
            OrderError::Storage(_) => {
                tracing::error!(error = ?self.0, "storage failure at API boundary");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal storage failure".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Handles `POST /orders`.
async fn create_order(
    State(state): State<AppState>,
    Json(new_order): Json<NewOrder>,
) -> Result<(StatusCode, Json<OrderBody>), ApiError> {
    let order = state.service.create_order(new_order).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// Handles `GET /orders/pending`.
async fn list_pending_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderBody>>, ApiError> {
    let orders = state.service.pending_orders().await?;
    Ok(Json(orders.into_iter().map(OrderBody::from).collect()))
}

/// Handles `DELETE /orders/{order_id}`. Cancellation is a status change,
/// not a deletion; the order and its items remain readable.
async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderBody>, ApiError> {
    let order = state.service.cancel_order(order_id).await?;
    Ok(Json(order.into()))
}

/// Handles `PATCH /orders/{order_id}/complete`.
async fn complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderBody>, ApiError> {
    let order = state.service.complete_order(order_id).await?;
    Ok(Json(order.into()))
}

/// Handles `GET /health`.
async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        app_name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}
