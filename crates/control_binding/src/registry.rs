//! Name-keyed store registry for late-bound control bindings.
//!
//! The registry is an injected handle rather than process-wide state: entry setup code provides
//! it through the Leptos context (or hands it to a binding spec directly), and controls look
//! stores up by name while resolving. Membership is reactive, so a store registered after a
//! control mounts is picked up on the next resolution.

use std::collections::HashMap;

use leptos::*;

use crate::BindingError;

/// A registered store handle exposing a `value` reader and an optional `set_value` sink.
pub struct NamedStore<T: 'static> {
    value: Signal<Option<T>>,
    set_value: Option<Callback<T>>,
}

impl<T: 'static> Clone for NamedStore<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for NamedStore<T> {}

impl<T> NamedStore<T>
where
    T: Clone + 'static,
{
    /// Creates a writable store holding `initial`.
    pub fn new(initial: Option<T>) -> Self {
        let value = create_rw_signal(initial);
        Self {
            value: value.into(),
            set_value: Some(Callback::new(move |next: T| value.set(Some(next)))),
        }
    }

    /// Wraps an existing reader with no write path.
    pub fn read_only(value: impl Into<Signal<Option<T>>>) -> Self {
        Self::from_parts(value, None)
    }

    /// Wraps an existing reader and sink.
    pub fn from_parts(value: impl Into<Signal<Option<T>>>, set_value: Option<Callback<T>>) -> Self {
        Self {
            value: value.into(),
            set_value,
        }
    }

    /// Reactive value reader.
    pub fn value(&self) -> Signal<Option<T>> {
        self.value
    }

    /// Update sink, when the store accepts writes.
    pub fn set_value(&self) -> Option<Callback<T>> {
        self.set_value
    }
}

/// Reactive name -> [`NamedStore`] map shared by the controls of one value type.
pub struct StoreRegistry<T: 'static> {
    entries: RwSignal<HashMap<String, NamedStore<T>>>,
    lookups: StoredValue<usize>,
}

impl<T: 'static> Clone for StoreRegistry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for StoreRegistry<T> {}

impl<T> Default for StoreRegistry<T>
where
    T: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StoreRegistry<T>
where
    T: Clone + 'static,
{
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: create_rw_signal(HashMap::new()),
            lookups: store_value(0),
        }
    }

    /// Registers `store` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, store: NamedStore<T>) {
        let name = name.into();
        self.entries.update(|entries| {
            entries.insert(name, store);
        });
    }

    /// Registers `store` under `name` unless the name is taken.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::DuplicateStoreName`] when `name` already has an entry.
    pub fn try_register(
        &self,
        name: impl Into<String>,
        store: NamedStore<T>,
    ) -> Result<(), BindingError> {
        let name = name.into();
        if self
            .entries
            .with_untracked(|entries| entries.contains_key(&name))
        {
            return Err(BindingError::DuplicateStoreName { name });
        }
        self.register(name, store);
        Ok(())
    }

    /// Removes the entry for `name`.
    pub fn unregister(&self, name: &str) -> Option<NamedStore<T>> {
        let mut removed = None;
        self.entries.update(|entries| removed = entries.remove(name));
        removed
    }

    /// Resolves `name`, subscribing the caller to registry membership changes.
    pub fn lookup(&self, name: &str) -> Option<NamedStore<T>> {
        self.lookups.update_value(|count| *count += 1);
        self.entries.with(|entries| entries.get(name).copied())
    }

    /// Number of [`StoreRegistry::lookup`] calls made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.get_value()
    }

    /// Number of registered stores.
    pub fn len(&self) -> usize {
        self.entries.with_untracked(HashMap::len)
    }

    /// Returns `true` when no store is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creates a [`StoreRegistry`] for `T` and provides it to descendant components.
pub fn provide_store_registry<T>() -> StoreRegistry<T>
where
    T: Clone + 'static,
{
    let registry = StoreRegistry::new();
    provide_context(registry);
    registry
}

/// Returns the [`StoreRegistry`] for `T` provided by an ancestor, if any.
pub fn use_store_registry<T>() -> Option<StoreRegistry<T>>
where
    T: Clone + 'static,
{
    use_context::<StoreRegistry<T>>()
}
