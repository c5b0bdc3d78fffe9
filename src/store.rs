//! # Store
//!
//! Entity descriptions, the store-neutral [`Query`] and the paginated
//! execution boundary sitting between the filter compiler and an
//! [`EntityStore`].

mod serializer;

use std::fmt::Debug;

use serde::de::DeserializeOwned;

pub use self::serializer::{Clause, Serialize, Serializer, Sql};
use crate::config::TIE_BREAKER;
use crate::page::{Direction, Page, PageRequest, Sort};
use crate::provider::EntityStore;
use crate::query::{Fields, Filter, Predicate, Value};
use crate::Result;

/// An entity managed by the engine.
pub trait Entity:
    Fields + Clone + Debug + serde::Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable entity name, used in error messages.
    const NAME: &'static str;

    /// Collection (table) holding the entity.
    const COLLECTION: &'static str;

    /// Names the entity may be sorted by, as callers send them, each paired
    /// with the record field it orders by.
    const SORTABLE: &'static [(&'static str, &'static str)];

    /// The filter descriptor used to list the entity.
    type Filter: Filter;

    /// Sort applied when the caller does not ask for one.
    fn default_sort() -> Sort;

    /// The entity's id, `None` until stored.
    fn id(&self) -> Option<i64>;

    /// Set the entity's id.
    fn set_id(&mut self, id: i64);

    /// Values that must be unique across the collection, by field.
    fn unique_keys(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    /// Other entities this entity refers to.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// A reference from one entity to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Collection holding the referenced entity.
    pub collection: &'static str,

    /// Id of the referenced entity.
    pub id: i64,
}

/// A store-neutral query: a predicate over one collection with a total
/// ordering and a window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// Collection queried.
    pub collection: &'static str,

    /// Predicate entities must satisfy.
    pub predicate: Predicate,

    /// Sort keys in priority order. The last key is always the entity id so
    /// that the ordering is total.
    pub order: Vec<(&'static str, Direction)>,

    /// Number of matching entities to skip.
    pub offset: u64,

    /// Maximum number of entities to return.
    pub limit: u64,
}

impl Query {
    /// Build the query for one page of entity `E`.
    ///
    /// # Errors
    ///
    /// Returns an error when the requested sort field is not sortable for
    /// `E`.
    pub fn new<E: Entity>(predicate: Predicate, request: &PageRequest) -> Result<Self> {
        let sort = request.sort();
        let field = sort.check(E::SORTABLE)?;

        let mut order = vec![(field, sort.direction)];
        if field != TIE_BREAKER {
            order.push((TIE_BREAKER, Direction::Ascending));
        }

        Ok(Self {
            collection: E::COLLECTION,
            predicate,
            order,
            offset: request.offset(),
            limit: request.size(),
        })
    }
}

/// Execute a predicate against the store, returning one page of `E`.
///
/// The sort field is checked against `E`'s sortable fields before the store
/// is reached. Ties are broken by id so that pages are stable. The page's
/// total counts every entity matching the predicate.
///
/// # Errors
///
/// Returns an error when the sort field is not sortable for `E` or the store
/// fails.
pub async fn execute<E: Entity>(
    predicate: Predicate, request: &PageRequest, store: &impl EntityStore,
) -> Result<Page<E>> {
    let query = Query::new::<E>(predicate, request)?;
    tracing::debug!(
        collection = E::COLLECTION,
        conditions = query.predicate.len(),
        page = request.page(),
        size = request.size(),
        sort = %request.sort().field,
        "executing query"
    );

    let (items, total) = store.query::<E>(&query).await?;
    Ok(Page {
        items,
        total,
        page: request.page(),
        size: request.size(),
    })
}
