use super::order::{NewOrder, Order, OrderStatus};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable storage for order aggregates.
///
/// An order and its items are written atomically; a failed write leaves the
/// stored state unchanged. Concurrent status updates on the same order are
/// serialized by the implementation (last committed wins, no torn writes).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order with status `Pending`, assigning the order id,
    /// item ids and `created_at`. Rejects empty `items` even though callers
    /// validate first.
    async fn create(&self, new_order: NewOrder) -> Result<Order>;

    /// Returns the order with its items, or `None` if the id is unknown.
    async fn get(&self, order_id: u64) -> Result<Option<Order>>;

    /// All orders in `status`, ascending by `created_at` (ties broken by id).
    /// An empty result is not an error.
    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;

    /// Unconditionally overwrites the status of an existing order and returns
    /// the refreshed order. Transition legality is the lifecycle layer's job.
    async fn update_status(&self, order_id: u64, status: OrderStatus) -> Result<Order>;
}

pub type OrderStoreRef = Arc<dyn OrderStore>;
