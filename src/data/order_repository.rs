use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Orders kept in insertion order, which breaks `created_at` ties.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    storage: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    #[instrument(skip(self, order), fields(order_id = %order.id, user_id = %order.user_id, lines = order.cart_items.len()))]
    async fn save_order(&self, order: Order) -> Result<()> {
        let mut storage = self.storage.write().await;
        match storage.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => storage.push(order),
        }
        debug!("Order saved to memory storage");
        Ok(())
    }

    async fn find_order_by_id(&self, id: &str) -> Result<Option<Order>> {
        let storage = self.storage.read().await;
        Ok(storage.iter().find(|o| o.id == id).cloned())
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        let storage = self.storage.read().await;
        let mut orders: Vec<Order> = storage
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
