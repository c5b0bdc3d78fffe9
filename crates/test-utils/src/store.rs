//! # Store
//!
//! Collections of rows held in memory. Rows are kept as JSON, alongside the
//! unique keys and references of the entity they were written from, so that
//! integrity can be checked across collections without knowing their types.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use mototrack::Value;
use mototrack::query::compare;
use mototrack::store::{Entity, Query, Reference};

#[derive(Default)]
pub struct Tables(BTreeMap<&'static str, Collection>);

#[derive(Default)]
struct Collection {
    last_id: i64,
    rows: BTreeMap<i64, Row>,
}

struct Row {
    value: serde_json::Value,
    unique: Vec<(&'static str, Value)>,
    references: Vec<Reference>,
}

impl Tables {
    pub fn query<E: Entity>(&self, query: &Query) -> Result<(Vec<E>, u64)> {
        let Some(collection) = self.0.get(query.collection) else {
            return Ok((vec![], 0));
        };

        let mut matches = vec![];
        for row in collection.rows.values() {
            let entity: E = serde_json::from_value(row.value.clone())?;
            if query.predicate.matches(&entity) {
                matches.push(entity);
            }
        }
        matches.sort_by(|a, b| compare(a, b, &query.order));

        let total = matches.len() as u64;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let items = matches.into_iter().skip(offset).take(limit).collect();

        Ok((items, total))
    }

    pub fn get<E: Entity>(&self, id: i64) -> Result<Option<E>> {
        let Some(row) = self.0.get(E::COLLECTION).and_then(|c| c.rows.get(&id)) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(row.value.clone())?))
    }

    pub fn put<E: Entity>(&mut self, mut entity: E) -> Result<E> {
        let references = entity.references();
        for reference in &references {
            if !self.contains(reference) {
                bail!("{} {} does not exist", reference.collection, reference.id);
            }
        }

        let collection = self.0.entry(E::COLLECTION).or_default();
        let unique = entity.unique_keys();
        for (id, row) in &collection.rows {
            if Some(*id) == entity.id() {
                continue;
            }
            if let Some((field, _)) = row.unique.iter().find(|key| unique.contains(*key)) {
                bail!("duplicate key `{field}` in {}", E::COLLECTION);
            }
        }

        let id = match entity.id() {
            Some(id) => id,
            None => {
                let id = collection.last_id + 1;
                entity.set_id(id);
                id
            }
        };
        collection.last_id = collection.last_id.max(id);

        let row = Row {
            value: serde_json::to_value(&entity)?,
            unique,
            references,
        };
        collection.rows.insert(id, row);

        Ok(entity)
    }

    pub fn delete<E: Entity>(&mut self, id: i64) -> Result<()> {
        let target = Reference {
            collection: E::COLLECTION,
            id,
        };
        for (name, collection) in &self.0 {
            if collection.rows.values().any(|row| row.references.contains(&target)) {
                bail!("{} {id} is referenced by {name}", E::NAME);
            }
        }

        if let Some(collection) = self.0.get_mut(E::COLLECTION) {
            collection.rows.remove(&id);
        }
        Ok(())
    }

    fn contains(&self, reference: &Reference) -> bool {
        self.0.get(reference.collection).is_some_and(|c| c.rows.contains_key(&reference.id))
    }
}
