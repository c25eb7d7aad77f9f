//! Error types.
//!
//! The store core itself never fails. These errors only come from the
//! opt-in validating setter and from parsing configuration.

use thiserror::Error;

/// Errors from validating store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `try_set_args` was called with no arguments.
    #[error("set called with an empty payload")]
    EmptyPayload,
}

/// Errors from parsing store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The string is not one of `always`, `on-request`, `never`.
    #[error("unknown immediate policy `{0}` (expected `always`, `on-request` or `never`)")]
    UnknownImmediate(String),
}
