use crate::domain::order::{Order, OrderItem, OrderStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct OrderItemBody {
    pub id: u64,
    pub name: String,
    pub amount: u32,
    pub price: Decimal,
}

impl From<OrderItem> for OrderItemBody {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            amount: item.amount,
            price: item.price,
        }
    }
}

/// Wire representation of an order. `total` is computed from the items at
/// serialization time, never read from storage.
#[derive(Debug, Serialize)]
pub struct OrderBody {
    pub id: u64,
    pub table_number: u32,
    pub status: OrderStatus,
    pub items: Vec<OrderItemBody>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderBody {
    fn from(order: Order) -> Self {
        let total = order.total();
        Self {
            id: order.id,
            table_number: order.table_number,
            status: order.status,
            total,
            created_at: order.created_at,
            items: order.items.into_iter().map(OrderItemBody::from).collect(),
        }
    }
}

/// Error payload: a stable machine-readable code plus a human message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub app_name: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}
