//! # Mock Provider
//!
//! An in-memory implementation of the `Provider` trait for tests.

mod provider;
mod store;

pub use self::provider::Provider;
