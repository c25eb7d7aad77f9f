use std::fmt;
use std::sync::Arc;

type Callback<T> = dyn Fn(&[T]) + Send + Sync;

/// A callback registered to receive notifications from one store.
///
/// A `Subscriber` is a shared handle: cloning it yields the *same* subscriber,
/// and equality is identity of the underlying allocation. Two subscribers
/// built from identical closures are still different subscribers.
///
/// The callback receives the full argument list of the `set` call that
/// triggered it. For the immediate call made on registration it receives
/// `[value]`, or `[]` while the store is unset.
///
/// # Examples
///
/// ```
/// use storekit::Subscriber;
///
/// let a = Subscriber::new(|args: &[i32]| println!("{args:?}"));
/// let b = a.clone();
/// let c = Subscriber::new(|args: &[i32]| println!("{args:?}"));
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
pub struct Subscriber<T> {
    callback: Arc<Callback<T>>,
}

impl<T> Subscriber<T> {
    /// Wrap a callback into a new subscriber identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback directly.
    pub fn notify(&self, args: &[T]) {
        (self.callback)(args);
    }

    /// Whether `self` and `other` are the same subscriber.
    pub fn same(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable pointers for one closure type
        // may differ across codegen units.
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> PartialEq for Subscriber<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<T> Eq for Subscriber<T> {}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("ptr", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}
