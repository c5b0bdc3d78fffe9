//! # MotoTrack
//!
//! The data-access core of the MotoTrack fleet management application.
//!
//! Every entity managed by the application (motorcycles, branches, users,
//! movement events and maintenance schedules) is listed through the same
//! engine: a partially-populated filter is compiled into a [`Predicate`]
//! using a small, fixed vocabulary of operators, paired with a validated
//! [`PageRequest`], and executed against an [`EntityStore`] supplied by the
//! implementer.
//!
//! Filters are plain data. Absent fields never constrain a query, so an empty
//! filter lists every record.
//!
//! [`Predicate`]: crate::query::Predicate
//! [`PageRequest`]: crate::page::PageRequest
//! [`EntityStore`]: crate::provider::EntityStore

pub mod agendamentos;
pub mod config;
mod error;
pub mod eventos;
pub mod filiais;
pub mod motos;
pub mod page;
pub mod provider;
pub mod query;
mod service;
pub mod store;
pub mod usuarios;

pub use crate::error::Error;
pub use crate::page::{Direction, Page, PageParams, PageRequest, Sort};
pub use crate::query::{Predicate, Value, compile};
pub use crate::provider::{EntityStore, Provider};
pub use crate::store::Entity;

/// Result type for engine and service operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Inclusive range used by range filters. Either bound may be absent, in
/// which case only the present bound constrains the query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Range<T> {
    /// The range's inclusive lower bound.
    pub min: Option<T>,

    /// The range's inclusive upper bound.
    pub max: Option<T>,
}

impl<T> Range<T> {
    /// Create a new, unbounded range.
    #[must_use]
    pub const fn new() -> Self {
        Self { min: None, max: None }
    }

    /// Create a range from two optional bounds.
    #[must_use]
    pub const fn between(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    /// Specify a 'greater-than-or-equal' lower bound for the range.
    #[must_use]
    pub fn ge(mut self, ge: T) -> Self {
        self.min = Some(ge);
        self
    }

    /// Specify a 'less-than-or-equal' upper bound for the range.
    #[must_use]
    pub fn le(mut self, le: T) -> Self {
        self.max = Some(le);
        self
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Convert each bound with the provided function.
    pub fn map<U>(self, f: impl Fn(T) -> U) -> Range<U> {
        Range {
            min: self.min.map(&f),
            max: self.max.map(&f),
        }
    }

    /// Check if the range contains the value.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialOrd,
    {
        if let Some(min) = &self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = &self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

// Custom serialization functions.
pub(crate) mod serde {
    /// Serialize an optional local date-time using the `dd/MM/yyyy HH:mm`
    /// format used by the application's forms, accepting ISO 8601 as well.
    pub mod form_datetime {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        const FORMAT: &str = "%d/%m/%Y %H:%M";

        #[allow(clippy::ref_option)]
        pub fn serialize<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let Some(date) = date else {
                return serializer.serialize_none();
            };
            serializer.serialize_str(&date.format(FORMAT).to_string())
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let Some(text) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            NaiveDateTime::parse_from_str(text, FORMAT)
                .or_else(|_| text.parse::<NaiveDateTime>())
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}
