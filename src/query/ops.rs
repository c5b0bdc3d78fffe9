//! Operator primitives.
//!
//! Each primitive turns one optional filter value into zero or more
//! conditions. Absent input, and blank input for the text operators,
//! produces no condition at all.

use super::{Cmp, Condition, FieldPath, Value};
use crate::Range;

/// Exact equality. Produces no condition when `value` is absent.
#[must_use]
pub fn equals(field: impl Into<FieldPath>, value: Option<Value>) -> Option<Condition> {
    Some(Condition {
        field: field.into(),
        cmp: Cmp::Eq,
        value: value?,
    })
}

/// Case-insensitive equality. Produces no condition when `value` is absent
/// or contains only whitespace.
///
/// The value is case folded but not trimmed: `" ativa"` does not match
/// `"ATIVA"`.
#[must_use]
pub fn equals_ignore_case(field: impl Into<FieldPath>, value: Option<&str>) -> Option<Condition> {
    Some(Condition {
        field: field.into(),
        cmp: Cmp::EqIgnoreCase,
        value: Value::Text(fold(value)?),
    })
}

/// Case-insensitive substring match. Produces no condition when `value` is
/// absent or contains only whitespace.
#[must_use]
pub fn contains_ignore_case(field: impl Into<FieldPath>, value: Option<&str>) -> Option<Condition> {
    Some(Condition {
        field: field.into(),
        cmp: Cmp::ContainsIgnoreCase,
        value: Value::Text(fold(value)?),
    })
}

/// Inclusive range. Produces one condition per present bound.
///
/// Bounds are not reordered: an inverted range yields both conditions and
/// matches nothing.
pub fn range(field: impl Into<FieldPath>, range: Range<Value>) -> impl Iterator<Item = Condition> {
    let field = field.into();
    let lower = range.min.map(|value| Condition {
        field,
        cmp: Cmp::Ge,
        value,
    });
    let upper = range.max.map(|value| Condition {
        field,
        cmp: Cmp::Le,
        value,
    });
    lower.into_iter().chain(upper)
}

/// Equality on a field of a related entity, such as `filial.id`. Produces no
/// condition when `value` is absent.
#[must_use]
pub fn relation_equals(
    relation: &'static str, field: &'static str, value: Option<Value>,
) -> Option<Condition> {
    equals(FieldPath::Relation { relation, field }, value)
}

fn fold(value: Option<&str>) -> Option<String> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    Some(value.to_lowercase())
}
