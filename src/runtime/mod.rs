//! Runtime support for store instances.
//!
//! This module owns the per-instance state record and the notification
//! engine that every store primitive is bound to.

mod state;

pub use state::StoreId;
pub(crate) use state::StoreState;
