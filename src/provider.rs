//! # Provider

use std::future::Future;

use crate::store::{Entity, Query};

/// Provider trait.
pub trait Provider: EntityStore + Clone {}

/// The `EntityStore` trait is used by implementers to provide entity storage
/// capability.
///
/// Implementations translate a [`Query`] into their native dialect, either
/// with a [`Serializer`](crate::store::Serializer) or by evaluating the
/// query's predicate in memory.
pub trait EntityStore: Send + Sync {
    /// Queries the underlying store for entities matching the query's
    /// predicate, returning one page of entities in the query's order along
    /// with the number of entities matching the predicate across all pages.
    fn query<E: Entity>(
        &self, query: &Query,
    ) -> impl Future<Output = anyhow::Result<(Vec<E>, u64)>> + Send;

    /// Fetches a single entity by id, returning `None` if no entity was
    /// found.
    fn get<E: Entity>(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<E>>> + Send;

    /// Store an entity, returning the stored entity. An entity without an id
    /// is assigned the next free id; an entity with one replaces the entity
    /// previously stored under it.
    ///
    /// Implementations refuse writes that would duplicate one of the
    /// entity's unique keys.
    fn put<E: Entity>(&self, entity: E) -> impl Future<Output = anyhow::Result<E>> + Send;

    /// Delete the entity associated with the specified id.
    ///
    /// Implementations refuse to delete an entity still referenced by
    /// another.
    fn delete<E: Entity>(&self, id: i64) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Whether an entity with the specified id exists.
    fn exists<E: Entity>(&self, id: i64) -> impl Future<Output = anyhow::Result<bool>> + Send {
        async move { Ok(self.get::<E>(id).await?.is_some()) }
    }
}
