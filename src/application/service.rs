use crate::domain::lifecycle::{self, Transition};
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::ports::OrderStoreRef;
use crate::error::{OrderError, Result};

/// The main entry point for order operations.
///
/// `OrderService` validates input, consults the lifecycle rules and delegates
/// persistence to the configured store. A rejected transition performs no
/// store write.
pub struct OrderService {
    store: OrderStoreRef,
}

impl OrderService {
    pub fn new(store: OrderStoreRef) -> Self {
        Self { store }
    }

    /// Creates a new order in `Pending` status.
    pub async fn create_order(&self, new_order: NewOrder) -> Result<Order> {
        new_order.validate()?;
        let order = self.store.create(new_order).await?;
        tracing::info!(
            order_id = order.id,
            table_number = order.table_number,
            items = order.items.len(),
            total = %order.total(),
            "order created"
        );
        Ok(order)
    }

    /// All pending orders, oldest first.
    pub async fn pending_orders(&self) -> Result<Vec<Order>> {
        let orders = self.store.list_by_status(OrderStatus::Pending).await?;
        tracing::debug!(count = orders.len(), "listed pending orders");
        Ok(orders)
    }

    /// Cancels an order if its current status permits it.
    pub async fn cancel_order(&self, order_id: u64) -> Result<Order> {
        let order = self.load(order_id).await?;
        match lifecycle::cancel(order_id, order.status)? {
            Transition::Apply(status) => {
                let updated = self.store.update_status(order_id, status).await?;
                tracing::info!(
                    order_id,
                    old_status = order.status.as_str(),
                    new_status = updated.status.as_str(),
                    "order cancelled"
                );
                Ok(updated)
            }
            Transition::Noop => Ok(order),
        }
    }

    /// Marks an order completed. Idempotent for already-completed orders.
    pub async fn complete_order(&self, order_id: u64) -> Result<Order> {
        let order = self.load(order_id).await?;
        match lifecycle::complete(order.status)? {
            Transition::Apply(status) => {
                let updated = self.store.update_status(order_id, status).await?;
                tracing::info!(
                    order_id,
                    old_status = order.status.as_str(),
                    new_status = updated.status.as_str(),
                    "order completed"
                );
                Ok(updated)
            }
            Transition::Noop => {
                tracing::info!(order_id, "order already completed");
                Ok(order)
            }
        }
    }

    async fn load(&self, order_id: u64) -> Result<Order> {
        self.store
            .get(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }
}
