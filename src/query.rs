//! # Query
//!
//! Storage-independent predicates and the compiler that builds them from
//! filter descriptors.
//!
//! A [`Predicate`] is a conjunction of [`Condition`]s. Conditions are only
//! ever produced by the operator primitives in this module, which return
//! nothing when their input is absent. An empty predicate therefore matches
//! every record.

mod compile;
mod eval;
mod ops;

use std::fmt;

use chrono::NaiveDateTime;
use derive_more::Display;
use serde::Serialize;

pub use self::compile::{Criterion, Filter, compile, day_range, end_of_day, start_of_day};
pub use self::eval::{Fields, compare};
pub use self::ops::{contains_ignore_case, equals, equals_ignore_case, range, relation_equals};

/// The location of a field, either on the root entity or one relationship
/// hop away from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    /// A field on the root entity.
    Field(&'static str),

    /// A field on an entity reached through a single named relationship.
    Relation {
        /// The relationship followed from the root entity.
        relation: &'static str,

        /// The field on the related entity.
        field: &'static str,
    },
}

impl FieldPath {
    /// The column holding the field's value in a relational store. Relation
    /// paths map to the root entity's foreign key column, so `filial.id`
    /// becomes `filial_id`.
    #[must_use]
    pub fn column(&self) -> String {
        match self {
            Self::Field(field) => (*field).to_string(),
            Self::Relation { relation, field } => format!("{relation}_{field}"),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::Relation { relation, field } => write!(f, "{relation}.{field}"),
        }
    }
}

impl From<&'static str> for FieldPath {
    fn from(field: &'static str) -> Self {
        Self::Field(field)
    }
}

/// A value compared against a record field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Identifiers and whole numbers.
    Int(i64),

    /// Local date-times.
    Timestamp(NaiveDateTime),

    /// Text.
    Text(String),
}

impl Value {
    /// Whether both values hold the same kind of data and can be ordered
    /// against each other.
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// The text held by the value, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{int}"),
            Self::Timestamp(timestamp) => write!(f, "{timestamp}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Comparison applied by a [`Condition`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Cmp {
    /// Exact equality.
    #[display("=")]
    Eq,

    /// Equality after case folding both sides. The condition's value is
    /// already folded.
    #[display("=~")]
    EqIgnoreCase,

    /// Substring match after case folding both sides. The condition's value
    /// is already folded.
    #[display("~")]
    ContainsIgnoreCase,

    /// Greater than or equal to.
    #[display(">=")]
    Ge,

    /// Less than or equal to.
    #[display("<=")]
    Le,
}

/// A single comparison between a record field and a value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Condition {
    /// The field compared.
    pub field: FieldPath,

    /// The comparison applied.
    pub cmp: Cmp,

    /// The value the field is compared against.
    pub value: Value,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.cmp, self.value)
    }
}

/// A conjunction of conditions.
///
/// The default (empty) predicate is the identity for AND and matches every
/// record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// A predicate matching every record.
    #[must_use]
    pub const fn all() -> Self {
        Self { conditions: Vec::new() }
    }

    /// Add a condition to the conjunction.
    #[must_use]
    pub fn and(mut self, condition: impl Into<Option<Condition>>) -> Self {
        self.extend(condition.into());
        self
    }

    /// The conditions making up the conjunction.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether the predicate places no constraint on records.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The number of conditions in the conjunction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether the conjunction holds no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Extend<Condition> for Predicate {
    fn extend<I: IntoIterator<Item = Condition>>(&mut self, iter: I) {
        self.conditions.extend(iter);
    }
}

impl FromIterator<Condition> for Predicate {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "TRUE");
        }
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}
