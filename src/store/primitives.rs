use crate::error::StoreError;
use crate::runtime::{StoreId, StoreState};
use crate::subscriber::{Subscriber, Unsubscribe};
use std::fmt;
use std::sync::{Arc, Weak};

/// The four operations a setup function receives, all bound to one fresh
/// store instance.
///
/// Fields are public so setup functions can destructure what they need:
///
/// ```
/// use storekit::{create_store, Primitives, RecordStore};
///
/// let factory = create_store(|p: Primitives<i32>| {
///     let Primitives { set, .. } = p.clone();
///     move |initial: i32| {
///         set.set(initial);
///         RecordStore::new(&p)
///     }
/// });
///
/// assert_eq!(factory.build(3).get(), Some(3));
/// ```
pub struct Primitives<T> {
    /// Reads the current value.
    pub get: Get<T>,
    /// Stores a value and notifies subscribers.
    pub set: Set<T>,
    /// Registers subscribers.
    pub subscribe: Subscribe<T>,
    /// Live view of the registered subscribers.
    pub subscribers: SubscriberList<T>,
}

impl<T: Clone + Send + Sync + 'static> Primitives<T> {
    pub(crate) fn bind(state: &Arc<StoreState<T>>) -> Self {
        Self {
            get: Get {
                state: Arc::clone(state),
            },
            set: Set {
                state: Arc::clone(state),
            },
            subscribe: Subscribe::bound(state),
            subscribers: SubscriberList {
                state: Arc::clone(state),
            },
        }
    }
}

impl<T> Clone for Primitives<T> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
            subscribe: self.subscribe.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> fmt::Debug for Primitives<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitives")
            .field("store", &self.get.state.id())
            .finish_non_exhaustive()
    }
}

/// Read access to a store's value.
pub struct Get<T> {
    state: Arc<StoreState<T>>,
}

impl<T> Get<T> {
    /// The instance this handle is bound to.
    pub fn store_id(&self) -> StoreId {
        self.state.id()
    }

    /// A handle that does not keep the store alive.
    ///
    /// Capture this instead of a `Get` inside a subscriber of the same
    /// store; a strong handle there forms a cycle through the subscriber
    /// list and the store is never freed.
    pub fn downgrade(&self) -> WeakGet<T> {
        WeakGet {
            state: Arc::downgrade(&self.state),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Get<T> {
    /// A clone of the current value, or `None` if nothing has been set.
    pub fn get(&self) -> Option<T> {
        self.state.get()
    }

    /// Read the value with a function without cloning.
    ///
    /// The value stays read-locked while `f` runs, so `f` must not set
    /// this store.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.state.with(f)
    }
}

impl<T> Clone for Get<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

/// Write access to a store's value.
///
/// Every write runs one synchronous notification pass before returning.
pub struct Set<T> {
    state: Arc<StoreState<T>>,
}

impl<T: Clone + Send + Sync + 'static> Set<T> {
    /// Store `value` and notify subscribers with `[value]`.
    ///
    /// Returns the store's value after the notification pass. That is
    /// `Some(value)` unless a subscriber set the store again.
    pub fn set(&self, value: T) -> Option<T> {
        self.state.set(std::slice::from_ref(&value))
    }

    /// Store the first argument and notify subscribers with all of them.
    ///
    /// An empty list is allowed: the store becomes unset and subscribers are
    /// called with an empty slice. Use [`try_set_args`](Self::try_set_args)
    /// to reject that case instead.
    ///
    /// Returns the store's value after the notification pass.
    pub fn set_args(&self, args: Vec<T>) -> Option<T> {
        self.state.set(&args)
    }

    /// Like [`set_args`](Self::set_args), but refuses an empty payload
    /// without touching the store.
    pub fn try_set_args(&self, args: Vec<T>) -> Result<Option<T>, StoreError> {
        if args.is_empty() {
            return Err(StoreError::EmptyPayload);
        }
        Ok(self.state.set(&args))
    }

    /// Compute the next value from the current one, then set it.
    ///
    /// `f` runs under the same restriction as [`Get::with`].
    pub fn update<F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(Option<&T>) -> T,
    {
        // The read guard must be released before `set` takes the write lock.
        let next = self.state.with(f);
        self.set(next)
    }
}

impl<T> Set<T> {
    /// A handle that does not keep the store alive.
    ///
    /// Use it for subscribers that write back to their own store.
    pub fn downgrade(&self) -> WeakSet<T> {
        WeakSet {
            state: Arc::downgrade(&self.state),
        }
    }
}

impl<T> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

type CustomSubscribe<T> = dyn Fn(&Subscriber<T>, bool) -> Option<Unsubscribe> + Send + Sync;

enum SubscribeKind<T> {
    Bound(Arc<StoreState<T>>),
    Custom(Arc<CustomSubscribe<T>>),
}

/// The subscribe capability of a store.
///
/// Usually bound to a store's own subscriber list, but a constructor may
/// install a [`custom`](Self::custom) implementation on its store object to
/// replace the default.
pub struct Subscribe<T> {
    kind: SubscribeKind<T>,
}

impl<T: Clone + Send + Sync + 'static> Subscribe<T> {
    fn bound(state: &Arc<StoreState<T>>) -> Self {
        Self {
            kind: SubscribeKind::Bound(Arc::clone(state)),
        }
    }

    /// Wrap an arbitrary subscribe implementation.
    ///
    /// The function receives the subscriber and the caller's immediate
    /// request flag.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Subscriber<T>, bool) -> Option<Unsubscribe> + Send + Sync + 'static,
    {
        Self {
            kind: SubscribeKind::Custom(Arc::new(f)),
        }
    }

    /// Register `subscriber` without requesting an immediate call.
    ///
    /// Under the default [`Immediate::Always`](crate::Immediate::Always)
    /// policy the subscriber still fires once right away.
    pub fn subscribe(&self, subscriber: &Subscriber<T>) -> Option<Unsubscribe> {
        self.subscribe_immediate(subscriber, false)
    }

    /// Register `subscriber`, passing the per-call immediate request.
    ///
    /// Returns `None` if the subscriber is already registered; nothing else
    /// happens in that case.
    pub fn subscribe_immediate(
        &self,
        subscriber: &Subscriber<T>,
        requested: bool,
    ) -> Option<Unsubscribe> {
        match &self.kind {
            SubscribeKind::Bound(state) => {
                if !state.add(subscriber) {
                    return None;
                }
                if state.immediate().fires(requested) {
                    // Read the value before calling out so no lock is held.
                    let current = state.get();
                    subscriber.notify(current.as_slice());
                }
                Some(Unsubscribe::bound(state, subscriber.clone()))
            }
            SubscribeKind::Custom(f) => f(subscriber, requested),
        }
    }

    /// Whether this is a constructor-supplied implementation.
    pub fn is_custom(&self) -> bool {
        matches!(self.kind, SubscribeKind::Custom(_))
    }
}

impl<T> Subscribe<T> {
    /// A handle that does not keep a bound store alive.
    ///
    /// A custom implementation is kept as is: whatever its closure
    /// captures stays captured.
    pub fn downgrade(&self) -> WeakSubscribe<T> {
        let kind = match &self.kind {
            SubscribeKind::Bound(state) => WeakSubscribeKind::Bound(Arc::downgrade(state)),
            SubscribeKind::Custom(f) => WeakSubscribeKind::Custom(Arc::clone(f)),
        };
        WeakSubscribe { kind }
    }
}

impl<T> Clone for Subscribe<T> {
    fn clone(&self) -> Self {
        let kind = match &self.kind {
            SubscribeKind::Bound(state) => SubscribeKind::Bound(Arc::clone(state)),
            SubscribeKind::Custom(f) => SubscribeKind::Custom(Arc::clone(f)),
        };
        Self { kind }
    }
}

impl<T> fmt::Debug for Subscribe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SubscribeKind::Bound(state) => f
                .debug_tuple("Subscribe::Bound")
                .field(&state.id())
                .finish(),
            SubscribeKind::Custom(_) => f.write_str("Subscribe::Custom"),
        }
    }
}

/// Live, read-only view of a store's subscriber list.
pub struct SubscriberList<T> {
    state: Arc<StoreState<T>>,
}

impl<T: Clone + Send + Sync + 'static> SubscriberList<T> {
    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.state.subscriber_count()
    }

    /// Whether no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `subscriber` is currently registered.
    pub fn contains(&self, subscriber: &Subscriber<T>) -> bool {
        self.state.contains(subscriber)
    }

    /// The registered subscribers in notification order.
    pub fn snapshot(&self) -> Vec<Subscriber<T>> {
        self.state.snapshot()
    }
}

impl<T> Clone for SubscriberList<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

/// Non-owning counterpart of [`Get`].
pub struct WeakGet<T> {
    state: Weak<StoreState<T>>,
}

impl<T> WeakGet<T> {
    /// A strong handle, if the store still exists.
    pub fn upgrade(&self) -> Option<Get<T>> {
        self.state.upgrade().map(|state| Get { state })
    }
}

impl<T: Clone + Send + Sync + 'static> WeakGet<T> {
    /// The current value, or `None` if it is unset or the store is gone.
    pub fn get(&self) -> Option<T> {
        self.state.upgrade().and_then(|state| state.get())
    }
}

impl<T> Clone for WeakGet<T> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for WeakGet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakGet")
            .field("alive", &(self.state.strong_count() > 0))
            .finish()
    }
}

/// Non-owning counterpart of [`Set`]. Writes to a dropped store do nothing.
pub struct WeakSet<T> {
    state: Weak<StoreState<T>>,
}

impl<T> WeakSet<T> {
    /// A strong handle, if the store still exists.
    pub fn upgrade(&self) -> Option<Set<T>> {
        self.state.upgrade().map(|state| Set { state })
    }
}

impl<T: Clone + Send + Sync + 'static> WeakSet<T> {
    /// [`Set::set`] if the store still exists, `None` otherwise.
    pub fn set(&self, value: T) -> Option<T> {
        self.upgrade().and_then(|set| set.set(value))
    }

    /// [`Set::set_args`] if the store still exists, `None` otherwise.
    pub fn set_args(&self, args: Vec<T>) -> Option<T> {
        self.upgrade().and_then(|set| set.set_args(args))
    }
}

impl<T> Clone for WeakSet<T> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for WeakSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSet")
            .field("alive", &(self.state.strong_count() > 0))
            .finish()
    }
}

enum WeakSubscribeKind<T> {
    Bound(Weak<StoreState<T>>),
    Custom(Arc<CustomSubscribe<T>>),
}

/// Non-owning counterpart of [`Subscribe`].
pub struct WeakSubscribe<T> {
    kind: WeakSubscribeKind<T>,
}

impl<T> WeakSubscribe<T> {
    /// A strong handle, if a bound store still exists.
    pub fn upgrade(&self) -> Option<Subscribe<T>> {
        let kind = match &self.kind {
            WeakSubscribeKind::Bound(state) => SubscribeKind::Bound(state.upgrade()?),
            WeakSubscribeKind::Custom(f) => SubscribeKind::Custom(Arc::clone(f)),
        };
        Some(Subscribe { kind })
    }
}

impl<T: Clone + Send + Sync + 'static> WeakSubscribe<T> {
    /// [`Subscribe::subscribe`], or `None` if the bound store is gone.
    pub fn subscribe(&self, subscriber: &Subscriber<T>) -> Option<Unsubscribe> {
        self.upgrade()?.subscribe(subscriber)
    }

    /// [`Subscribe::subscribe_immediate`], or `None` if the bound store is
    /// gone.
    pub fn subscribe_immediate(
        &self,
        subscriber: &Subscriber<T>,
        requested: bool,
    ) -> Option<Unsubscribe> {
        self.upgrade()?.subscribe_immediate(subscriber, requested)
    }
}

impl<T> Clone for WeakSubscribe<T> {
    fn clone(&self) -> Self {
        let kind = match &self.kind {
            WeakSubscribeKind::Bound(state) => WeakSubscribeKind::Bound(Weak::clone(state)),
            WeakSubscribeKind::Custom(f) => WeakSubscribeKind::Custom(Arc::clone(f)),
        };
        Self { kind }
    }
}

impl<T> fmt::Debug for WeakSubscribe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WeakSubscribeKind::Bound(state) => f
                .debug_struct("WeakSubscribe::Bound")
                .field("alive", &(state.strong_count() > 0))
                .finish(),
            WeakSubscribeKind::Custom(_) => f.write_str("WeakSubscribe::Custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Immediate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn primitives<T: Clone + Send + Sync + 'static>(immediate: Immediate) -> Primitives<T> {
        Primitives::bind(&Arc::new(StoreState::new(immediate)))
    }

    fn counter() -> (Subscriber<i32>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let subscriber = Subscriber::new(move |_: &[i32]| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (subscriber, count)
    }

    #[test]
    fn handles_share_one_state() {
        let p = primitives::<i32>(Immediate::Always);
        assert_eq!(p.get.get(), None);
        assert_eq!(p.set.set(5), Some(5));
        assert_eq!(p.get.get(), Some(5));
        assert_eq!(p.clone().get.get(), Some(5));
    }

    #[test]
    fn subscribe_fires_immediately_by_default() {
        let p = primitives::<i32>(Immediate::Always);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let subscriber = Subscriber::new(move |args: &[i32]| {
            seen_clone.lock().unwrap().push(args.to_vec());
        });

        p.subscribe.subscribe(&subscriber);
        p.set.set(1);

        // Unset store fires with no arguments.
        assert_eq!(*seen.lock().unwrap(), vec![vec![], vec![1]]);
    }

    #[test]
    fn immediate_call_sees_current_value() {
        let p = primitives::<i32>(Immediate::Always);
        p.set.set(9);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        p.subscribe.subscribe(&Subscriber::new(move |args: &[i32]| {
            seen_clone.lock().unwrap().extend_from_slice(args);
        }));
        assert_eq!(*seen.lock().unwrap(), vec![9]);
    }

    #[test]
    fn on_request_policy() {
        let p = primitives::<i32>(Immediate::OnRequest);
        let (quiet, quiet_count) = counter();
        let (eager, eager_count) = counter();

        p.subscribe.subscribe(&quiet);
        p.subscribe.subscribe_immediate(&eager, true);

        assert_eq!(quiet_count.load(Ordering::SeqCst), 0);
        assert_eq!(eager_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn never_policy_ignores_request() {
        let p = primitives::<i32>(Immediate::Never);
        let (subscriber, count) = counter();
        p.subscribe.subscribe_immediate(&subscriber, true);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_subscribe_returns_none() {
        let p = primitives::<i32>(Immediate::Always);
        let (subscriber, count) = counter();

        assert!(p.subscribe.subscribe(&subscriber).is_some());
        assert!(p.subscribe.subscribe(&subscriber).is_none());
        assert_eq!(p.subscribers.len(), 1);
        // Only the first registration fired.
        assert_eq!(count.load(Ordering::SeqCst), 1);

        p.set.set(1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_twice_is_noop() {
        let p = primitives::<i32>(Immediate::Never);
        let (a, a_count) = counter();
        let (b, b_count) = counter();
        let unsubscribe_a = p.subscribe.subscribe(&a).unwrap();
        p.subscribe.subscribe(&b);

        unsubscribe_a.unsubscribe();
        unsubscribe_a.unsubscribe();
        assert_eq!(p.subscribers.len(), 1);
        assert!(p.subscribers.contains(&b));

        p.set.set(1);
        assert_eq!(a_count.load(Ordering::SeqCst), 0);
        assert_eq!(b_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resubscribe_after_unsubscribe() {
        let p = primitives::<i32>(Immediate::Never);
        let (subscriber, _) = counter();
        p.subscribe.subscribe(&subscriber).unwrap().unsubscribe();
        assert!(p.subscribe.subscribe(&subscriber).is_some());
        assert_eq!(p.subscribers.len(), 1);
    }

    #[test]
    fn empty_set_unsets_value() {
        let p = primitives::<i32>(Immediate::Never);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        p.subscribe.subscribe(&Subscriber::new(move |args: &[i32]| {
            seen_clone.lock().unwrap().push(args.len());
        }));

        p.set.set(3);
        assert_eq!(p.set.set_args(Vec::new()), None);
        assert_eq!(p.get.get(), None);
        assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
    }

    #[test]
    fn try_set_args_rejects_empty_payload() {
        let p = primitives::<i32>(Immediate::Never);
        let (subscriber, count) = counter();
        p.subscribe.subscribe(&subscriber);
        p.set.set(4);

        assert_eq!(p.set.try_set_args(Vec::new()), Err(StoreError::EmptyPayload));
        assert_eq!(p.get.get(), Some(4));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert_eq!(p.set.try_set_args(vec![5, 6]), Ok(Some(5)));
    }

    #[test]
    fn update_reads_current_value() {
        let p = primitives::<i32>(Immediate::Never);
        assert_eq!(p.set.update(|v| v.copied().unwrap_or(0) + 1), Some(1));
        assert_eq!(p.set.update(|v| v.copied().unwrap_or(0) + 1), Some(2));
        assert_eq!(p.get.with(|v| v.copied()), Some(2));
    }

    #[test]
    fn custom_subscribe_is_used() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let subscribe = Subscribe::<i32>::custom(move |_, _| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            None
        });
        let (subscriber, _) = counter();

        assert!(subscribe.is_custom());
        assert!(subscribe.subscribe(&subscriber).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_reports_value_left_by_subscribers() {
        let p = primitives::<i32>(Immediate::Never);
        let set = p.set.downgrade();
        p.subscribe.subscribe(&Subscriber::new(move |args: &[i32]| {
            if args.first().is_some_and(|&v| v < 0) {
                set.set(0);
            }
        }));

        assert_eq!(p.set.set(-4), Some(0));
        assert_eq!(p.set.try_set_args(vec![-1, 7]), Ok(Some(0)));
        assert_eq!(p.set.update(|_| 6), Some(6));
    }

    #[test]
    fn weak_handles_follow_the_store() {
        let state = Arc::new(StoreState::new(Immediate::Never));
        let p = Primitives::<i32>::bind(&state);
        let get = p.get.downgrade();
        let set = p.set.downgrade();
        let subscribe = p.subscribe.downgrade();
        let (subscriber, count) = counter();

        assert_eq!(set.set(2), Some(2));
        assert_eq!(get.get(), Some(2));
        assert!(subscribe.subscribe(&subscriber).is_some());
        assert_eq!(set.set_args(vec![3, 4]), Some(3));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        drop(p);
        drop(state);

        assert!(get.upgrade().is_none());
        assert_eq!(get.get(), None);
        assert_eq!(set.set(5), None);
        assert!(subscribe.subscribe(&subscriber).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn weak_custom_subscribe_keeps_its_closure() {
        let subscribe = Subscribe::<i32>::custom(|_, _| None).downgrade();
        assert!(subscribe.upgrade().is_some_and(|s| s.is_custom()));
    }
}
