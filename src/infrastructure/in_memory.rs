use crate::domain::order::{NewOrder, Order, OrderItem, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    orders: HashMap<u64, Order>,
    next_order_id: u64,
    next_item_id: u64,
}

/// A thread-safe in-memory store for orders.
///
/// Uses `Arc<RwLock<..>>` to allow shared concurrent access; every operation
/// holds the lock for its full duration, so concurrent writes to the same
/// order cannot interleave. The default backend, and the one used in tests.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, new_order: NewOrder) -> Result<Order> {
        // Invariant: a persisted order is never empty.
        if new_order.items.is_empty() {
            return Err(OrderError::validation(
                "an order must contain at least one item",
            ));
        }

        let mut inner = self.inner.write().await;
        inner.next_order_id += 1;
        let order_id = inner.next_order_id;

        let items: Vec<OrderItem> = new_order
            .items
            .into_iter()
            .map(|item| {
                inner.next_item_id += 1;
                OrderItem {
                    id: inner.next_item_id,
                    name: item.name,
                    amount: item.amount,
                    price: item.price,
                }
            })
            .collect();

        let order = Order {
            id: order_id,
            table_number: new_order.table_number,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            items,
        };
        inner.orders.insert(order_id, order.clone());
        Ok(order)
    }

    async fn get(&self, order_id: u64) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner.orders.get(&order_id).cloned())
    }

    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|order| order.status == status)
            .cloned()
            .collect();
        orders.sort_by_key(|order| (order.created_at, order.id));
        Ok(orders)
    }

    async fn update_status(&self, order_id: u64, status: OrderStatus) -> Result<Order> {
        let mut inner = self.inner.write().await;
        match inner.orders.get_mut(&order_id) {
            Some(order) => {
                order.status = status;
                Ok(order.clone())
            }
            None => Err(OrderError::NotFound(order_id)),
        }
    }
}
