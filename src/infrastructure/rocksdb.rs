use crate::domain::order::{NewOrder, Order, OrderItem, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing order aggregates (items embedded in the value).
pub const CF_ORDERS: &str = "orders";
/// Column Family for the id counters.
pub const CF_META: &str = "meta";

const KEY_NEXT_ORDER_ID: &[u8] = b"next_order_id";
const KEY_NEXT_ITEM_ID: &[u8] = b"next_item_id";

/// A persistent order store backed by RocksDB.
///
/// Orders are stored as JSON values keyed by the big-endian order id, so a
/// plain iteration walks them in creation order. Id counters live in the
/// `meta` column family and survive restarts. An internal mutex serializes
/// read-modify-write cycles; a single `WriteBatch` commits an order together
/// with its counters, so a failed create leaves no partial state.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbOrderStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbOrderStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            OrderError::storage(std::io::Error::other(format!(
                "{name} column family not found"
            )))
        })
    }

    /// Current value of an id counter; zero if never written.
    fn read_counter(&self, key: &[u8]) -> Result<u64> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => {
                let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    OrderError::storage(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "corrupt id counter",
                    ))
                })?;
                Ok(u64::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }

    fn read_order(&self, order_id: u64) -> Result<Option<Order>> {
        let cf = self.cf(CF_ORDERS)?;
        match self.db.get_cf(&cf, order_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode_order(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn decode_order(bytes: &[u8]) -> Result<Order> {
    serde_json::from_slice(bytes).map_err(OrderError::storage)
}

#[async_trait]
impl OrderStore for RocksDbOrderStore {
    async fn create(&self, new_order: NewOrder) -> Result<Order> {
        // Invariant: a persisted order is never empty.
        if new_order.items.is_empty() {
            return Err(OrderError::validation(
                "an order must contain at least one item",
            ));
        }

        let _guard = self.write_lock.lock().await;

        let mut next_order_id = self.read_counter(KEY_NEXT_ORDER_ID)?;
        let mut next_item_id = self.read_counter(KEY_NEXT_ITEM_ID)?;
        next_order_id += 1;

        let items: Vec<OrderItem> = new_order
            .items
            .into_iter()
            .map(|item| {
                next_item_id += 1;
                OrderItem {
                    id: next_item_id,
                    name: item.name,
                    amount: item.amount,
                    price: item.price,
                }
            })
            .collect();

        let order = Order {
            id: next_order_id,
            table_number: new_order.table_number,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            items,
        };

        let cf_orders = self.cf(CF_ORDERS)?;
        let cf_meta = self.cf(CF_META)?;
        let value = serde_json::to_vec(&order).map_err(OrderError::storage)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_orders, order.id.to_be_bytes(), value);
        batch.put_cf(&cf_meta, KEY_NEXT_ORDER_ID, next_order_id.to_be_bytes());
        batch.put_cf(&cf_meta, KEY_NEXT_ITEM_ID, next_item_id.to_be_bytes());
        self.db.write(batch)?;

        Ok(order)
    }

    async fn get(&self, order_id: u64) -> Result<Option<Order>> {
        self.read_order(order_id)
    }

    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let cf = self.cf(CF_ORDERS)?;
        let mut orders = Vec::new();
        let iter = self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item?;
            let order = decode_order(&value)?;
            if order.status == status {
                orders.push(order);
            }
        }

        orders.sort_by_key(|order| (order.created_at, order.id));
        Ok(orders)
    }

    async fn update_status(&self, order_id: u64, status: OrderStatus) -> Result<Order> {
        let _guard = self.write_lock.lock().await;

        let mut order = self
            .read_order(order_id)?
            .ok_or(OrderError::NotFound(order_id))?;
        order.status = status;

        let cf = self.cf(CF_ORDERS)?;
        let value = serde_json::to_vec(&order).map_err(OrderError::storage)?;
        self.db.put_cf(&cf, order_id.to_be_bytes(), value)?;

        Ok(order)
    }
}
