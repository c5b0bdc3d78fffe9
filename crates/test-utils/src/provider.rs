//! # Mock Provider

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, bail};
use mototrack::EntityStore;
use mototrack::store::{Entity, Query};
use tokio::sync::RwLock;

use crate::store::Tables;

/// In-memory store shared by clones.
#[derive(Clone, Default)]
pub struct Provider {
    tables: Arc<RwLock<Tables>>,
    offline: Arc<AtomicBool>,
}

impl Provider {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, as a store would when its
    /// connection drops.
    pub fn disconnect(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            bail!("store unavailable");
        }
        Ok(())
    }
}

impl mototrack::Provider for Provider {}

impl EntityStore for Provider {
    async fn query<E: Entity>(&self, query: &Query) -> Result<(Vec<E>, u64)> {
        self.online()?;
        self.tables.read().await.query(query)
    }

    async fn get<E: Entity>(&self, id: i64) -> Result<Option<E>> {
        self.online()?;
        self.tables.read().await.get(id)
    }

    async fn put<E: Entity>(&self, entity: E) -> Result<E> {
        self.online()?;
        self.tables.write().await.put(entity)
    }

    async fn delete<E: Entity>(&self, id: i64) -> Result<()> {
        self.online()?;
        self.tables.write().await.delete::<E>(id)
    }
}
