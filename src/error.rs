//! # Errors

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Engine and service errors.
///
/// Each variant displays as a JSON object with a `code` and a `detail` so
/// either a REST or a UI caller can surface it without further mapping.
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be used as given: an unsupported sort field,
    /// a negative page index or a non-positive page size.
    #[error(r#"{{"code": 400, "detail": "{0}"}}"#)]
    BadRequest(String),

    /// The entity addressed by the request does not exist.
    #[error(r#"{{"code": 404, "detail": "{0}"}}"#)]
    NotFound(String),

    /// An entity referenced by the request does not exist.
    #[error(r#"{{"code": 404, "detail": "{entity} {id} not found"}}"#)]
    RelatedNotFound {
        /// Name of the missing entity.
        entity: &'static str,

        /// The identifier that could not be resolved.
        id: i64,
    },

    /// The underlying store refused or failed the operation.
    #[error(r#"{{"code": 409, "detail": "cannot complete operation: {0}"}}"#)]
    Operation(String),

    /// The engine encountered an unexpected condition.
    #[error(r#"{{"code": 500, "detail": "{0}"}}"#)]
    Server(String),
}

impl Error {
    /// The HTTP-style status code associated with the error.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) | Self::RelatedNotFound { .. } => 404,
            Self::Operation(_) => 409,
            Self::Server(_) => 500,
        }
    }

    /// A human-readable description of the error.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::BadRequest(detail) | Self::NotFound(detail) | Self::Server(detail) => {
                detail.clone()
            }
            Self::RelatedNotFound { entity, id } => format!("{entity} {id} not found"),
            Self::Operation(detail) => format!("cannot complete operation: {detail}"),
        }
    }

    /// Transform the error into a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(ErrorBody::from(self)).unwrap_or_default()
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorBody::from(self).serialize(serializer)
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Self::Operation(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Server(error.to_string())
    }
}

/// Construct an `Error::BadRequest` error from a string or existing error
/// value.
///
/// # Example
///
/// ```
/// use mototrack::{Result, bad_request};
///
/// fn check(size: i64) -> Result<()> {
///     if size <= 0 {
///         return Err(bad_request!("page size must be positive, got {size}"));
///     }
///     Ok(())
/// }
/// # assert!(check(0).is_err());
/// ```
#[macro_export]
macro_rules! bad_request {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::BadRequest(format!($fmt, $($arg)*))
    };
    ($err:expr $(,)?) => {
        $crate::Error::BadRequest(format!($err))
    };
}

/// Construct an `Error::NotFound` error from a string or existing error
/// value.
#[macro_export]
macro_rules! not_found {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::NotFound(format!($fmt, $($arg)*))
    };
    ($err:expr $(,)?) => {
        $crate::Error::NotFound(format!($err))
    };
}

// Error response for serializing errors to JSON.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Error code.
    code: u16,

    /// Error description.
    detail: String,
}

impl From<&Error> for ErrorBody {
    fn from(error: &Error) -> Self {
        Self {
            code: error.code(),
            detail: error.detail(),
        }
    }
}
