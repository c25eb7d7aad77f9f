use crate::store::Immediate;
use crate::subscriber::Subscriber;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

/// Process-unique identifier of one store instance.
///
/// Only used to tell instances apart in log output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    /// Allocate the next unique ID.
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The private state record owned by one store instance.
///
/// Every primitive handed to a setup function holds an `Arc` to exactly one
/// of these. Nothing else ever sees the value slot or the subscriber list.
pub(crate) struct StoreState<T> {
    id: StoreId,
    immediate: Immediate,
    value: RwLock<Option<T>>,
    subscribers: RwLock<Vec<Subscriber<T>>>,
}

impl<T> StoreState<T> {
    pub(crate) fn new(immediate: Immediate) -> Self {
        Self {
            id: StoreId::next(),
            immediate,
            value: RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn id(&self) -> StoreId {
        self.id
    }

    pub(crate) fn immediate(&self) -> Immediate {
        self.immediate
    }
}

impl<T: Clone + Send + Sync + 'static> StoreState<T> {
    pub(crate) fn get(&self) -> Option<T> {
        read(&self.value).clone()
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        let value = read(&self.value);
        f(value.as_ref())
    }

    /// Store the first argument and run one notification pass with all of them.
    ///
    /// Returns the value held once the pass is over, which differs from the
    /// first argument if a subscriber set the store again.
    pub(crate) fn set(&self, args: &[T]) -> Option<T> {
        *write(&self.value) = args.first().cloned();
        trace!(store = %self.id, args = args.len(), "value set");
        self.emit(args);
        self.get()
    }

    /// Notify every subscriber registered at the moment the pass starts.
    ///
    /// The list is copied before the first callback runs and no lock is held
    /// while callbacks execute, so callbacks may subscribe, unsubscribe, or
    /// set again without affecting this pass.
    pub(crate) fn emit(&self, args: &[T]) {
        let snapshot = read(&self.subscribers).clone();
        trace!(store = %self.id, subscribers = snapshot.len(), "notifying");
        for subscriber in &snapshot {
            subscriber.notify(args);
        }
    }

    /// Append `subscriber` unless it is already registered.
    ///
    /// Returns `false` for a duplicate.
    pub(crate) fn add(&self, subscriber: &Subscriber<T>) -> bool {
        let mut subscribers = write(&self.subscribers);
        if subscribers.contains(subscriber) {
            debug!(store = %self.id, "subscriber already registered, ignoring");
            return false;
        }
        subscribers.push(subscriber.clone());
        trace!(store = %self.id, subscribers = subscribers.len(), "subscriber added");
        true
    }

    /// Remove `subscriber` by identity. Returns whether anything was removed.
    pub(crate) fn remove(&self, subscriber: &Subscriber<T>) -> bool {
        let mut subscribers = write(&self.subscribers);
        match subscribers.iter().position(|s| s == subscriber) {
            Some(index) => {
                subscribers.remove(index);
                trace!(store = %self.id, subscribers = subscribers.len(), "subscriber removed");
                true
            }
            None => {
                debug!(store = %self.id, "subscriber not registered, nothing to remove");
                false
            }
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        read(&self.subscribers).len()
    }

    pub(crate) fn contains(&self, subscriber: &Subscriber<T>) -> bool {
        read(&self.subscribers).contains(subscriber)
    }

    pub(crate) fn snapshot(&self) -> Vec<Subscriber<T>> {
        read(&self.subscribers).clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for StoreState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreState")
            .field("id", &self.id)
            .field("immediate", &self.immediate)
            .field("value", &*read(&self.value))
            .field("subscriber_count", &read(&self.subscribers).len())
            .finish()
    }
}

// A subscriber that panics never holds either lock, so poisoning can only
// come from a panicking `Clone` impl. The data is still consistent then.
fn read<L>(lock: &RwLock<L>) -> RwLockReadGuard<'_, L> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<L>(lock: &RwLock<L>) -> RwLockWriteGuard<'_, L> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
