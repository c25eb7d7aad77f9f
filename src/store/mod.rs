//! Store construction.
//!
//! A [`StoreFactory`] turns a setup function into a builder of independent
//! store instances. The setup function receives the instance's bound
//! [`Primitives`] and returns a constructor that decides the public shape
//! of the store, such as [`RecordStore`] or [`CallableStore`].

mod config;
mod factory;
mod object;
mod primitives;

pub use config::{Immediate, StoreConfig};
pub use factory::{create_store, StoreFactory};
pub use object::{CallableStore, RecordStore, StoreObject};
pub use primitives::{
    Get, Primitives, Set, Subscribe, SubscriberList, WeakGet, WeakSet, WeakSubscribe,
};
