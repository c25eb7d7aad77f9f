use crate::runtime::StoreState;
use crate::subscriber::Subscriber;
use std::fmt;
use std::sync::{Arc, Weak};

/// Token returned by a successful subscription.
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes exactly the subscriber
/// it was issued for. Calling it again, or after the store is gone, does
/// nothing. Dropping the token does **not** unsubscribe.
#[derive(Clone)]
pub struct Unsubscribe {
    run: Arc<dyn Fn() + Send + Sync>,
}

impl Unsubscribe {
    /// Build a token from an arbitrary removal function.
    ///
    /// Used by custom subscribe implementations. The function should be
    /// safe to call more than once.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self { run: Arc::new(run) }
    }

    /// Token bound to one subscriber of one store.
    ///
    /// Holds the store weakly so an outstanding token never keeps an
    /// otherwise unreachable store alive.
    pub(crate) fn bound<T>(state: &Arc<StoreState<T>>, subscriber: Subscriber<T>) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = Arc::downgrade(state);
        Self::new(move || {
            if let Some(state) = Weak::upgrade(&state) {
                state.remove(&subscriber);
            }
        })
    }

    /// Remove the subscriber.
    pub fn unsubscribe(&self) {
        (self.run)();
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").finish_non_exhaustive()
    }
}
