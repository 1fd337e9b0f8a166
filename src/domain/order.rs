use crate::error::{OrderError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum length of a menu item name, in characters.
pub const MAX_ITEM_NAME_LEN: usize = 255;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A line item within an order. Items are immutable after creation and live
/// exactly as long as their owning order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderItem {
    pub id: u64,
    pub name: String,
    pub amount: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.amount) * self.price
    }
}

/// A restaurant order as persisted by a store. `id`, `created_at` and item
/// ids are assigned by the store; everything except `status` is immutable
/// afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: u64,
    pub table_number: u32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Order total, recomputed from the items on every call. Never stored,
    /// so it cannot drift from the items it is derived from.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(OrderItem::line_total)
            .sum::<Decimal>()
            .round_dp(2)
    }
}

/// Creation input for a single line item.
#[derive(Debug, Deserialize, Clone)]
pub struct NewOrderItem {
    pub name: String,
    pub amount: u32,
    pub price: Decimal,
}

impl NewOrderItem {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(OrderError::validation("item name must not be empty"));
        }
        if self.name.chars().count() > MAX_ITEM_NAME_LEN {
            return Err(OrderError::validation(format!(
                "item name must be at most {MAX_ITEM_NAME_LEN} characters"
            )));
        }
        if self.amount == 0 {
            return Err(OrderError::validation("item amount must be positive"));
        }
        if self.price <= Decimal::ZERO {
            return Err(OrderError::validation("item price must be positive"));
        }
        // Fractional cents are rejected, not rounded.
        if self.price.round_dp(2) != self.price {
            return Err(OrderError::validation(
                "item price must have at most 2 decimal places",
            ));
        }
        Ok(())
    }
}

/// Creation input for an order. Validated before it reaches a store.
#[derive(Debug, Deserialize, Clone)]
pub struct NewOrder {
    pub table_number: u32,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn validate(&self) -> Result<()> {
        if self.table_number == 0 {
            return Err(OrderError::validation("table_number must be positive"));
        }
        if self.items.is_empty() {
            return Err(OrderError::validation(
                "an order must contain at least one item",
            ));
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}
