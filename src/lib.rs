//! # Storekit
//!
//! A factory for observable value stores.
//!
//! Storekit separates two concerns:
//!
//! ## The substrate
//!
//! Every store instance owns one value slot and one ordered list of
//! subscribers. Four primitives are bound to that state:
//! - `Get<T>` - Reads the current value
//! - `Set<T>` - Stores a value and synchronously notifies every subscriber
//! - `Subscribe<T>` - Registers a subscriber once and hands back an `Unsubscribe`
//! - `SubscriberList<T>` - A live view of who is registered
//!
//! ## The shape
//!
//! A caller-supplied setup function receives those primitives and returns a
//! constructor that decides what the store looks like from the outside:
//! - `RecordStore<T>` - An object with `get`/`set`/`subscribe` methods
//! - `CallableStore<T>` - A single `call(args)` that reads and writes
//! - Anything else implementing `StoreObject<T>`
//!
//! ```
//! use storekit::{create_store, Primitives, RecordStore, Subscriber};
//! use std::sync::{Arc, Mutex};
//!
//! let factory = create_store(|p: Primitives<i32>| {
//!     move |initial: i32| {
//!         p.set.set(initial);
//!         RecordStore::new(&p)
//!     }
//! });
//!
//! let store = factory.build(1);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = seen.clone();
//! store.subscribe(&Subscriber::new(move |args: &[i32]| {
//!     seen_clone.lock().unwrap().extend_from_slice(args);
//! }));
//!
//! store.set(2);
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! ```

pub mod error;
pub mod runtime;
pub mod store;
pub mod subscriber;

// Re-export main types for convenience
pub use error::{ConfigError, StoreError};
pub use runtime::StoreId;
pub use store::{
    create_store, CallableStore, Get, Immediate, Primitives, RecordStore, Set, StoreConfig,
    StoreFactory, StoreObject, Subscribe, SubscriberList, WeakGet, WeakSet, WeakSubscribe,
};
pub use subscriber::{Subscriber, Unsubscribe};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let factory = create_store(|p: Primitives<i32>| move |_: ()| RecordStore::new(&p));
        let store = factory.build(());
        assert_eq!(store.get(), None);
        store.set(42);
        assert_eq!(store.get(), Some(42));
    }
}
