//! # Service
//!
//! Operations shared by every entity's service: lookups that distinguish the
//! addressed entity from the entities it refers to, and filtered listing.

use crate::config::MAX_PAGE_SIZE;
use crate::page::{Page, PageRequest};
use crate::provider::EntityStore;
use crate::query::compile;
use crate::store::{Entity, execute};
use crate::{Error, Result, not_found};

/// Fetch the entity addressed by a request.
pub async fn find<E: Entity>(id: i64, store: &impl EntityStore) -> Result<E> {
    store.get::<E>(id).await?.ok_or_else(|| not_found!("{} {id} not found", E::NAME))
}

/// Fetch an entity referenced by a request.
pub async fn resolve<E: Entity>(id: i64, store: &impl EntityStore) -> Result<E> {
    store.get::<E>(id).await?.ok_or_else(|| {
        tracing::warn!(entity = E::NAME, id, "referenced entity not found");
        Error::RelatedNotFound { entity: E::NAME, id }
    })
}

/// Fail with `NotFound` unless the entity addressed by a request exists.
pub async fn ensure<E: Entity>(id: i64, store: &impl EntityStore) -> Result<()> {
    if store.exists::<E>(id).await? {
        return Ok(());
    }
    Err(not_found!("{} {id} not found", E::NAME))
}

/// List one page of entities matching a filter.
pub async fn search<E: Entity>(
    filter: Option<&E::Filter>, request: &PageRequest, store: &impl EntityStore,
) -> Result<Page<E>> {
    let predicate = compile(filter);
    execute(predicate, request, store).await
}

/// List every entity matching a filter in the entity's default order.
pub async fn collect_all<E: Entity>(
    filter: Option<&E::Filter>, store: &impl EntityStore,
) -> Result<Vec<E>> {
    let predicate = compile(filter);
    let sort = E::default_sort();

    let mut items = Vec::new();
    let mut page = 0;
    loop {
        let request = PageRequest::new(page, MAX_PAGE_SIZE, sort.clone())?;
        let result = execute::<E>(predicate.clone(), &request, store).await?;
        let fetched = result.items.len() as u64;
        items.extend(result.items);
        if fetched < MAX_PAGE_SIZE || items.len() as u64 >= result.total {
            return Ok(items);
        }
        page += 1;
    }
}
