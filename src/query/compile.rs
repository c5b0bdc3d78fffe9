//! Generic filter compiler.
//!
//! Each filter type declares its criteria once as a static table. The table
//! names a field, the operator applied to it, and an accessor reading the
//! corresponding value out of the filter. Compilation walks the table and
//! conjoins whatever the operators produce.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Predicate, Value, ops};
use crate::Range;

/// One entry in a filter's criteria table.
pub enum Criterion<F> {
    /// Exact equality on a field.
    Equals(&'static str, fn(&F) -> Option<Value>),

    /// Case-insensitive equality on a text field.
    EqualsIgnoreCase(&'static str, fn(&F) -> Option<&str>),

    /// Case-insensitive substring match on a text field.
    ContainsIgnoreCase(&'static str, fn(&F) -> Option<&str>),

    /// Inclusive range on an ordered field.
    Range(&'static str, fn(&F) -> Range<Value>),

    /// Equality on a field of a related entity: relation, field, accessor.
    RelationEquals(&'static str, &'static str, fn(&F) -> Option<Value>),
}

impl<F> Criterion<F> {
    /// Conditions this criterion contributes for the given filter.
    fn apply(&self, filter: &F, predicate: &mut Predicate) {
        match self {
            Self::Equals(field, get) => predicate.extend(ops::equals(*field, get(filter))),
            Self::EqualsIgnoreCase(field, get) => {
                predicate.extend(ops::equals_ignore_case(*field, get(filter)));
            }
            Self::ContainsIgnoreCase(field, get) => {
                predicate.extend(ops::contains_ignore_case(*field, get(filter)));
            }
            Self::Range(field, get) => predicate.extend(ops::range(*field, get(filter))),
            Self::RelationEquals(relation, field, get) => {
                predicate.extend(ops::relation_equals(*relation, *field, get(filter)));
            }
        }
    }
}

/// A filter descriptor: a set of optional criteria for one entity.
pub trait Filter: Sized + 'static {
    /// The filter's criteria, in the order their conditions are emitted.
    const CRITERIA: &'static [Criterion<Self>];
}

/// Compile a filter into a predicate.
///
/// An absent filter, or one with every field absent or blank, compiles to
/// the predicate matching every record. Compilation is pure: the same filter
/// always yields the same predicate.
pub fn compile<F: Filter>(filter: Option<&F>) -> Predicate {
    let Some(filter) = filter else {
        return Predicate::all();
    };

    let mut predicate = Predicate::all();
    for criterion in F::CRITERIA {
        criterion.apply(filter, &mut predicate);
    }

    tracing::debug!(filter = std::any::type_name::<F>(), %predicate, "compiled filter");
    predicate
}

/// The first instant of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// The last representable instant of `date`.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
}

/// Expand a pair of calendar dates into a timestamp range covering both
/// days in full.
#[must_use]
pub fn day_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Range<Value> {
    Range::between(
        from.map(start_of_day).map(Value::Timestamp),
        to.and_then(end_of_day).map(Value::Timestamp),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Cmp, FieldPath};

    #[derive(Default)]
    struct Sample {
        id: Option<i64>,
        nome: Option<String>,
        cidade: Option<String>,
        filial: Option<i64>,
        de: Option<NaiveDate>,
        ate: Option<NaiveDate>,
    }

    impl Filter for Sample {
        const CRITERIA: &'static [Criterion<Self>] = &[
            Criterion::Equals("id", |f: &Self| f.id.map(Value::Int)),
            Criterion::EqualsIgnoreCase("nome", |f: &Self| f.nome.as_deref()),
            Criterion::ContainsIgnoreCase("cidade", |f: &Self| f.cidade.as_deref()),
            Criterion::RelationEquals("filial", "id", |f: &Self| f.filial.map(Value::Int)),
            Criterion::Range("data", |f: &Self| day_range(f.de, f.ate)),
        ];
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("should be a valid date")
    }

    #[test]
    fn empty_filter() {
        assert!(compile::<Sample>(None).is_all());
        assert!(compile(Some(&Sample::default())).is_all());

        let blank = Sample {
            nome: Some("  ".to_string()),
            cidade: Some(String::new()),
            ..Sample::default()
        };
        assert!(compile(Some(&blank)).is_all());
    }

    #[test]
    fn table_order() {
        let filter = Sample {
            id: Some(1),
            nome: Some("Centro".to_string()),
            cidade: Some("Paulo".to_string()),
            filial: Some(2),
            de: Some(date(2025, 5, 10)),
            ate: Some(date(2025, 5, 11)),
        };
        let predicate = compile(Some(&filter));
        let cmps: Vec<_> = predicate.conditions().iter().map(|c| c.cmp).collect();
        assert_eq!(
            cmps,
            [Cmp::Eq, Cmp::EqIgnoreCase, Cmp::ContainsIgnoreCase, Cmp::Eq, Cmp::Ge, Cmp::Le]
        );
        assert_eq!(
            predicate.conditions()[3].field,
            FieldPath::Relation {
                relation: "filial",
                field: "id"
            }
        );
    }

    #[test]
    fn deterministic() {
        let filter = Sample {
            nome: Some("Centro".to_string()),
            ..Sample::default()
        };
        assert_eq!(compile(Some(&filter)), compile(Some(&filter)));
    }

    #[test]
    fn expands_days() {
        let range = day_range(Some(date(2025, 5, 10)), Some(date(2025, 5, 10)));
        let Some(Value::Timestamp(min)) = range.min else {
            panic!("should have a lower bound");
        };
        let Some(Value::Timestamp(max)) = range.max else {
            panic!("should have an upper bound");
        };
        assert_eq!(min.to_string(), "2025-05-10 00:00:00");
        assert_eq!(max.to_string(), "2025-05-10 23:59:59.999999999");
    }

    #[test]
    fn open_day_range() {
        let range = day_range(None, Some(date(2025, 5, 11)));
        assert!(range.min.is_none());
        assert!(range.max.is_some());
        assert!(day_range(None, None).is_unbounded());
    }
}
