use crate::runtime::StoreState;
use crate::store::{Primitives, StoreConfig, StoreObject};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Builds independent store instances from a setup function.
///
/// Each call to [`build`](Self::build):
///
/// 1. allocates a fresh value slot and subscriber list,
/// 2. binds [`Primitives`] to them and passes those to the setup function,
///    which returns a constructor,
/// 3. calls the constructor with the init arguments,
/// 4. fills the resulting object's subscribe slot with the default
///    subscribe if the constructor left it empty.
///
/// # Examples
///
/// ```
/// use storekit::{create_store, Primitives, RecordStore};
///
/// let factory = create_store(|p: Primitives<u32>| {
///     move |initial: u32| {
///         p.set.set(initial);
///         RecordStore::new(&p)
///     }
/// });
///
/// let a = factory.build(1);
/// let b = factory.build(2);
/// a.set(10);
///
/// assert_eq!(a.get(), Some(10));
/// assert_eq!(b.get(), Some(2));
/// ```
pub struct StoreFactory<T, F> {
    setup: F,
    config: StoreConfig,
    _marker: PhantomData<fn() -> T>,
}

/// Create a store factory from a setup function.
///
/// The setup function receives the bound [`Primitives`] of a fresh store
/// and returns the constructor that shapes the store object.
pub fn create_store<T, F, C>(setup: F) -> StoreFactory<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(Primitives<T>) -> C,
{
    StoreFactory {
        setup,
        config: StoreConfig::default(),
        _marker: PhantomData,
    }
}

impl<T, F> StoreFactory<T, F>
where
    T: Clone + Send + Sync + 'static,
{
    /// Replace the configuration used for stores built from now on.
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Build one store instance.
    pub fn build<A, C, S>(&self, args: A) -> S
    where
        F: Fn(Primitives<T>) -> C,
        C: FnOnce(A) -> S,
        S: StoreObject<T>,
    {
        let state = Arc::new(StoreState::new(self.config.immediate));
        let span = tracing::debug_span!("store", store = %state.id());
        let _enter = span.enter();

        let primitives = Primitives::bind(&state);
        let default_subscribe = primitives.subscribe.clone();
        let constructor = (self.setup)(primitives);
        let mut store = constructor(args);

        let slot = store.subscribe_slot();
        if slot.is_none() {
            debug!("attaching default subscribe");
            *slot = Some(default_subscribe);
        }
        store
    }
}

impl<T, F> fmt::Debug for StoreFactory<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
