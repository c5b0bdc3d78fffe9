//! In-memory evaluation of predicates and sort orders.
//!
//! Stores that hold records in memory, rather than translating predicates to
//! a query language, use this module to filter and order them.

use std::cmp::Ordering;

use super::{Cmp, Condition, FieldPath, Predicate, Value};
use crate::page::Direction;

/// Read access to a record's fields by path.
pub trait Fields {
    /// The value held at `field`, or `None` when the record has no value
    /// there (including when a relationship is unset).
    fn value(&self, field: &FieldPath) -> Option<Value>;
}

impl Predicate {
    /// Whether the record satisfies every condition.
    pub fn matches(&self, record: &impl Fields) -> bool {
        self.conditions.iter().all(|condition| condition.matches(record))
    }
}

impl Condition {
    /// Whether the record satisfies this condition. A record without a value
    /// for the field never does.
    pub fn matches(&self, record: &impl Fields) -> bool {
        let Some(actual) = record.value(&self.field) else {
            return false;
        };

        match self.cmp {
            Cmp::Eq => actual == self.value,
            Cmp::EqIgnoreCase => match (actual.as_text(), self.value.as_text()) {
                (Some(actual), Some(expected)) => actual.to_lowercase() == expected,
                _ => false,
            },
            Cmp::ContainsIgnoreCase => match (actual.as_text(), self.value.as_text()) {
                (Some(actual), Some(expected)) => actual.to_lowercase().contains(expected),
                _ => false,
            },
            Cmp::Ge => actual.same_kind(&self.value) && actual >= self.value,
            Cmp::Le => actual.same_kind(&self.value) && actual <= self.value,
        }
    }
}

/// Compare two records by the given sort keys, in priority order.
///
/// Records without a value for a key sort before those with one.
pub fn compare<T: Fields>(a: &T, b: &T, order: &[(&'static str, Direction)]) -> Ordering {
    for (field, direction) in order {
        let path = FieldPath::Field(*field);
        let ordering = a.value(&path).cmp(&b.value(&path));
        let ordering = match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
