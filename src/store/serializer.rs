//! # Serializer
//!
//! Serializer is used by store adapters to generate queries native to their
//! database.

use anyhow::Result;

use crate::page::Direction;
use crate::query::{Cmp, Value};
use crate::store::Query;

/// Serializer is used to generate queries native to the database selected
/// when implementing an [`EntityStore`](crate::provider::EntityStore).
///
/// The `Serializer` trait is intended to be used to generate one or more
/// query clauses. In turn a clause contains one or more conditions joined by
/// an AND conjunction.
///
/// A condition consists of a column, comparison, and value.
pub trait Serializer {
    /// The type of clause used by the serializer.
    type Clause: Clause;

    /// Names the collection queried. Called once, before any clause.
    fn collection(&mut self, name: &str);

    /// Creates a new query clause that uses an AND conjunction to join
    /// clause conditions.
    fn and_clause(&mut self) -> &mut Self::Clause;

    /// Adds an ordering key. Keys are applied in the order they are added.
    fn order(&mut self, field: &str, direction: Direction);

    /// Sets a limit and offset to limit the number of results returned.
    fn limit(&mut self, limit: u64, offset: u64);
}

/// A `Clause` is used to generate a query clause containing one or more
/// conditions.
pub trait Clause: Serializer {
    /// Adds a condition to the clause.
    fn condition(&mut self, column: &str, cmp: Cmp, value: &Value);

    /// Closes the clause.
    fn close(&mut self);
}

/// `Serialize` is used to provide overridable query serialization.
pub trait Serialize {
    /// Serialize a query using the given `Serializer`.
    ///
    /// # Errors
    ///
    /// Returns an error when the serializer cannot express the query.
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<()>;
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<()> {
        serializer.collection(self.collection);

        if !self.predicate.is_all() {
            let outer_and = serializer.and_clause();
            for condition in self.predicate.conditions() {
                outer_and.condition(&condition.field.column(), condition.cmp, &condition.value);
            }
            outer_and.close();
        }

        for (field, direction) in &self.order {
            serializer.order(field, *direction);
        }
        serializer.limit(self.limit, self.offset);

        Ok(())
    }
}

/// `Sql` implements `Serializer` to generate parameterized SQL.
///
/// Every value is bound as a positional parameter (`$1`, `$2`, ...) and made
/// available through [`Sql::params`]. Column names only ever come from
/// static criteria tables and sort allow-lists.
#[derive(Debug)]
pub struct Sql {
    output: String,
    params: Vec<Value>,
    counting: bool,
    has_clause: bool,
    has_order: bool,
    clauses: Vec<bool>,
}

impl Sql {
    /// Create a serializer for a query returning matching rows. The table is
    /// the query's collection.
    #[must_use]
    pub fn select() -> Self {
        Self::with_output("SELECT *", false)
    }

    /// Create a serializer for a query counting matching rows. Ordering and
    /// limits are ignored.
    #[must_use]
    pub fn count() -> Self {
        Self::with_output("SELECT COUNT(*)", true)
    }

    fn with_output(output: &str, counting: bool) -> Self {
        Self {
            output: output.to_string(),
            params: Vec::new(),
            counting,
            has_clause: false,
            has_order: false,
            clauses: Vec::new(),
        }
    }

    /// Returns the generated SQL query.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns the parameters bound by the query, in position order.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    // only add a conjunction when the current clause already has a condition
    fn conjoin(&mut self) {
        if let Some(has_condition) = self.clauses.last_mut() {
            if *has_condition {
                self.output.push_str(" AND ");
            }
            *has_condition = true;
        }
    }
}

impl Serializer for Sql {
    type Clause = Self;

    fn collection(&mut self, name: &str) {
        self.output.push_str(&format!(" FROM {name}"));
    }

    fn and_clause(&mut self) -> &mut Self::Clause {
        // add the WHERE keyword when this is the first clause
        if !self.has_clause {
            self.output.push_str(" WHERE ");
        }
        self.has_clause = true;

        self.conjoin();
        self.output.push('(');
        self.clauses.push(false);
        self
    }

    fn order(&mut self, field: &str, direction: Direction) {
        if self.counting {
            return;
        }
        let keyword = if self.has_order { ", " } else { " ORDER BY " };
        self.has_order = true;
        let direction = match direction {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        };
        self.output.push_str(&format!("{keyword}{field} {direction}"));
    }

    fn limit(&mut self, limit: u64, offset: u64) {
        if self.counting {
            return;
        }
        let limit = self.bind(Value::Int(i64::try_from(limit).unwrap_or(i64::MAX)));
        let offset = self.bind(Value::Int(i64::try_from(offset).unwrap_or(i64::MAX)));
        self.output.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
    }
}

impl Clause for Sql {
    fn condition(&mut self, column: &str, cmp: Cmp, value: &Value) {
        self.conjoin();

        let sql = match cmp {
            Cmp::Eq => format!("{column} = {}", self.bind(value.clone())),
            Cmp::Ge => format!("{column} >= {}", self.bind(value.clone())),
            Cmp::Le => format!("{column} <= {}", self.bind(value.clone())),
            Cmp::EqIgnoreCase => format!("LOWER({column}) = {}", self.bind(value.clone())),
            Cmp::ContainsIgnoreCase => {
                let pattern = format!("%{}%", escape_like(&value.to_string()));
                format!("LOWER({column}) LIKE {} ESCAPE '\\'", self.bind(Value::Text(pattern)))
            }
        };
        self.output.push_str(&sql);
    }

    fn close(&mut self) {
        self.clauses.pop();
        self.output.push(')');
    }
}

// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
