//! Pagination defaults and limits.
//!
//! These are compile-time constants. Per-entity defaults, such as the sort
//! order applied when a caller does not ask for one, live with each entity's
//! [`Entity`](crate::store::Entity) implementation.

/// Page index used when the caller does not supply one.
pub const DEFAULT_PAGE: u64 = 0;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size a caller may request.
///
/// Larger requests are rejected rather than truncated.
pub const MAX_PAGE_SIZE: u64 = 1_000;

/// Separator between the field and direction of a `sort` parameter, as in
/// `sort=placa,desc`.
pub const SORT_SEPARATOR: char = ',';

/// Field used to break ties between records sharing the same sort value.
pub const TIE_BREAKER: &str = "id";
