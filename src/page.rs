//! # Pagination
//!
//! Page requests, the sort they carry and the pages returned by queries.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SORT_SEPARATOR};
use crate::store::Entity;
use crate::{Error, Result, bad_request};

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    /// Smallest value first.
    #[default]
    #[display("asc")]
    #[serde(rename = "asc")]
    Ascending,

    /// Largest value first.
    #[display("desc")]
    #[serde(rename = "desc")]
    Descending,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(bad_request!("unknown sort direction `{s}`")),
        }
    }
}

/// A sort field and direction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Sort {
    /// Field to sort by.
    pub field: String,

    /// Direction to sort in.
    pub direction: Direction,
}

impl Sort {
    /// Sort ascending by `field`.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    /// Sort descending by `field`.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    /// Parse a `field[,direction]` sort parameter. A missing direction
    /// means ascending.
    ///
    /// # Errors
    ///
    /// Returns an error when the field is blank or the direction is not
    /// recognized.
    pub fn parse(param: &str) -> Result<Self> {
        let (field, direction) = param.split_once(SORT_SEPARATOR).unwrap_or((param, ""));
        let field = field.trim();
        let direction =
            if direction.trim().is_empty() { Direction::Ascending } else { direction.parse()? };
        if field.is_empty() {
            return Err(bad_request!("sort field is missing"));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }

    /// Check the sort field against an allow-list of `(name, field)` pairs,
    /// returning the record field the name sorts by.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is not in `allowed`.
    pub fn check(&self, allowed: &[(&'static str, &'static str)]) -> Result<&'static str> {
        allowed.iter().find(|(name, _)| *name == self.field).map(|(_, field)| *field).ok_or_else(
            || {
                tracing::warn!(field = %self.field, "rejected sort field");
                bad_request!("cannot sort by `{}`", self.field)
            },
        )
    }
}

/// A validated request for one page of results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    sort: Sort,
}

impl PageRequest {
    /// Create a page request.
    ///
    /// # Errors
    ///
    /// Returns an error when `size` is zero or larger than
    /// [`MAX_PAGE_SIZE`].
    pub fn new(page: u64, size: u64, sort: Sort) -> Result<Self> {
        if size == 0 {
            return Err(bad_request!("page size must be positive"));
        }
        if size > MAX_PAGE_SIZE {
            return Err(bad_request!("page size must not exceed {MAX_PAGE_SIZE}, got {size}"));
        }
        Ok(Self { page, size, sort })
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Maximum number of items in the page.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Requested sort.
    #[must_use]
    pub const fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Number of items preceding the page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// Pagination parameters as received from a caller, such as
/// `?page=1&size=10&sort=placa,desc`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PageParams {
    /// Zero-based page index.
    pub page: Option<i64>,

    /// Page size.
    pub size: Option<i64>,

    /// Sort as `field[,direction]`.
    pub sort: Option<String>,
}

impl PageParams {
    /// Resolve the parameters into a [`PageRequest`] for entity `E`,
    /// applying defaults for absent values.
    ///
    /// # Errors
    ///
    /// Returns an error when the page index is negative, the size is not
    /// positive or too large, or the sort names an unknown field or
    /// direction.
    pub fn resolve<E: Entity>(&self) -> Result<PageRequest> {
        let page = match self.page {
            None => DEFAULT_PAGE,
            Some(page) => u64::try_from(page)
                .map_err(|_| bad_request!("page index must not be negative, got {page}"))?,
        };
        let size = match self.size {
            None => DEFAULT_PAGE_SIZE,
            Some(size) if size <= 0 => {
                return Err(bad_request!("page size must be positive, got {size}"));
            }
            Some(size) => u64::try_from(size)
                .map_err(|_| bad_request!("page size must be positive, got {size}"))?,
        };
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => E::default_sort(),
            Some(sort) => Sort::parse(sort)?,
        };
        sort.check(E::SORTABLE)?;

        PageRequest::new(page, size, sort)
    }
}

/// One page of query results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in the page, in sort order.
    pub items: Vec<T>,

    /// Number of records matching the query across all pages.
    pub total: u64,

    /// Zero-based page index.
    pub page: u64,

    /// Requested page size.
    pub size: u64,
}

impl<T> Page<T> {
    /// Convert each item with the provided function.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }

    /// Number of pages needed to hold every matching record.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 { 0 } else { self.total.div_ceil(self.size) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sort() {
        assert_eq!(Sort::parse("placa").expect("should parse"), Sort::asc("placa"));
        assert_eq!(Sort::parse("placa,DESC").expect("should parse"), Sort::desc("placa"));
        assert_eq!(Sort::parse(" ano , asc ").expect("should parse"), Sort::asc("ano"));

        let Err(Error::BadRequest(_)) = Sort::parse("placa,sideways") else {
            panic!("should be BadRequest");
        };
        let Err(Error::BadRequest(_)) = Sort::parse(",desc") else {
            panic!("should be BadRequest");
        };
    }

    #[test]
    fn check_sort() {
        let allowed = [("id", "id"), ("placa", "placa"), ("dataCriacao", "data_criacao")];
        assert_eq!(Sort::desc("placa").check(&allowed).expect("should be allowed"), "placa");
        assert_eq!(
            Sort::asc("dataCriacao").check(&allowed).expect("should be allowed"),
            "data_criacao"
        );

        // record field names are not accepted in place of their sort names
        let Err(Error::BadRequest(_)) = Sort::asc("data_criacao").check(&allowed) else {
            panic!("should be BadRequest");
        };

        let Err(Error::BadRequest(detail)) = Sort::asc("senha").check(&allowed) else {
            panic!("should be BadRequest");
        };
        assert_eq!(detail, "cannot sort by `senha`");
    }

    #[test]
    fn page_size_limits() {
        assert!(PageRequest::new(0, 0, Sort::asc("id")).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1, Sort::asc("id")).is_err());

        let request = PageRequest::new(3, 10, Sort::asc("id")).expect("should be valid");
        assert_eq!(request.offset(), 30);
    }

    #[test]
    fn total_pages() {
        let page = Page::<u8> {
            items: vec![],
            total: 21,
            page: 0,
            size: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn page_json() {
        let page = Page {
            items: vec![1, 2],
            total: 2,
            page: 0,
            size: 20,
        };
        let json = serde_json::to_value(page.map(|n| n * 10)).expect("should serialize");
        assert_eq!(json, serde_json::json!({"items": [10, 20], "total": 2, "page": 0, "size": 20}));
    }
}
