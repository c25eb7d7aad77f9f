use crate::store::{Get, Primitives, Set, Subscribe};
use crate::subscriber::{Subscriber, Unsubscribe};

/// The capability every store object built by a factory must expose.
///
/// A store object has a subscribe slot. A constructor may fill it (for
/// example with [`Subscribe::custom`]); if it is still empty when the
/// constructor returns, the factory fills it with the store's default
/// subscribe.
pub trait StoreObject<T> {
    /// Mutable access to the subscribe slot.
    fn subscribe_slot(&mut self) -> &mut Option<Subscribe<T>>;
}

/// A plain record store with `get`, `set` and `subscribe` methods.
///
/// # Examples
///
/// ```
/// use storekit::{create_store, Primitives, RecordStore, Subscriber};
/// use std::sync::{Arc, Mutex};
///
/// let factory = create_store(|p: Primitives<String>| move |_: ()| RecordStore::new(&p));
/// let store = factory.build(());
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_clone = seen.clone();
/// let unsubscribe = store
///     .subscribe(&Subscriber::new(move |args: &[String]| {
///         seen_clone.lock().unwrap().push(args.to_vec());
///     }))
///     .unwrap();
///
/// store.set("bar".to_string());
/// unsubscribe.unsubscribe();
/// store.set("baz".to_string());
///
/// assert_eq!(store.get().as_deref(), Some("baz"));
/// // One immediate call on the unset store, then "bar".
/// assert_eq!(*seen.lock().unwrap(), vec![vec![], vec!["bar".to_string()]]);
/// ```
pub struct RecordStore<T> {
    get: Get<T>,
    set: Set<T>,
    subscribe: Option<Subscribe<T>>,
}

impl<T: Clone + Send + Sync + 'static> RecordStore<T> {
    /// Record over the given primitives, leaving the subscribe slot empty
    /// for the factory to fill.
    pub fn new(primitives: &Primitives<T>) -> Self {
        Self {
            get: primitives.get.clone(),
            set: primitives.set.clone(),
            subscribe: None,
        }
    }

    /// Install a subscribe implementation of the constructor's choosing.
    pub fn with_subscribe(mut self, subscribe: Subscribe<T>) -> Self {
        self.subscribe = Some(subscribe);
        self
    }

    /// A clone of the current value.
    pub fn get(&self) -> Option<T> {
        self.get.get()
    }

    /// See [`Get::with`].
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.get.with(f)
    }

    /// Store `value` and notify; returns the value after the pass.
    pub fn set(&self, value: T) -> Option<T> {
        self.set.set(value)
    }

    /// See [`Set::set_args`].
    pub fn set_args(&self, args: Vec<T>) -> Option<T> {
        self.set.set_args(args)
    }

    /// See [`Set::update`].
    pub fn update<F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(Option<&T>) -> T,
    {
        self.set.update(f)
    }

    /// Subscribe through whatever occupies the subscribe slot.
    ///
    /// Returns `None` for a duplicate subscriber, or if the slot is empty.
    pub fn subscribe(&self, subscriber: &Subscriber<T>) -> Option<Unsubscribe> {
        self.subscribe.as_ref()?.subscribe(subscriber)
    }

    /// Like [`subscribe`](Self::subscribe), with the per-call immediate
    /// request used by [`Immediate::OnRequest`](crate::Immediate::OnRequest).
    pub fn subscribe_immediate(
        &self,
        subscriber: &Subscriber<T>,
        requested: bool,
    ) -> Option<Unsubscribe> {
        self.subscribe
            .as_ref()?
            .subscribe_immediate(subscriber, requested)
    }
}

impl<T> StoreObject<T> for RecordStore<T> {
    fn subscribe_slot(&mut self) -> &mut Option<Subscribe<T>> {
        &mut self.subscribe
    }
}

/// A store used as a single call: `call(args)` writes when given arguments
/// and always returns the current value.
///
/// # Examples
///
/// ```
/// use storekit::{create_store, CallableStore, Primitives};
///
/// let factory = create_store(|p: Primitives<&'static str>| move |_: ()| CallableStore::new(&p));
/// let value = factory.build(());
///
/// assert_eq!(value.call(vec![]), None);
/// assert_eq!(value.call(vec!["foo"]), Some("foo"));
/// assert_eq!(value.call(vec![]), Some("foo"));
/// ```
pub struct CallableStore<T> {
    get: Get<T>,
    set: Set<T>,
    subscribe: Option<Subscribe<T>>,
}

impl<T: Clone + Send + Sync + 'static> CallableStore<T> {
    /// Callable over the given primitives, with an empty subscribe slot.
    pub fn new(primitives: &Primitives<T>) -> Self {
        Self {
            get: primitives.get.clone(),
            set: primitives.set.clone(),
            subscribe: None,
        }
    }

    /// Install a subscribe implementation of the constructor's choosing.
    pub fn with_subscribe(mut self, subscribe: Subscribe<T>) -> Self {
        self.subscribe = Some(subscribe);
        self
    }

    /// Set from `args` if it is non-empty, then return the current value.
    pub fn call(&self, args: Vec<T>) -> Option<T> {
        if !args.is_empty() {
            self.set.set_args(args);
        }
        self.get.get()
    }

    /// Subscribe through whatever occupies the subscribe slot.
    pub fn subscribe(&self, subscriber: &Subscriber<T>) -> Option<Unsubscribe> {
        self.subscribe.as_ref()?.subscribe(subscriber)
    }

    /// Like [`subscribe`](Self::subscribe), with the per-call immediate
    /// request.
    pub fn subscribe_immediate(
        &self,
        subscriber: &Subscriber<T>,
        requested: bool,
    ) -> Option<Unsubscribe> {
        self.subscribe
            .as_ref()?
            .subscribe_immediate(subscriber, requested)
    }
}

impl<T> StoreObject<T> for CallableStore<T> {
    fn subscribe_slot(&mut self) -> &mut Option<Subscribe<T>> {
        &mut self.subscribe
    }
}
