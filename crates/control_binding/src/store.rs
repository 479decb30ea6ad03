//! Reactive field store and the typed source handle controls bind to.
//!
//! A [`FieldStore`] keeps named fields in one reactive map. Writable fields are declared up
//! front; each declaration registers a sink under the conventional setter name (`status` ->
//! `setStatus`), so a control bound to an undeclared field resolves as read-only instead of
//! guessing at a writer.

use std::collections::BTreeMap;

use leptos::*;

use crate::BindingError;

/// Returns the conventional setter name for a store field (`status` -> `setStatus`).
pub fn setter_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

/// Reactive store of named fields with explicitly declared setters.
pub struct FieldStore<T: 'static> {
    fields: RwSignal<BTreeMap<String, T>>,
    setters: RwSignal<BTreeMap<String, Callback<T>>>,
}

impl<T: 'static> Clone for FieldStore<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for FieldStore<T> {}

impl<T> Default for FieldStore<T>
where
    T: Clone + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldStore<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            fields: create_rw_signal(BTreeMap::new()),
            setters: create_rw_signal(BTreeMap::new()),
        }
    }

    /// Adds a field without a setter. Controls bound to it render but cannot write.
    pub fn with_field(self, key: impl Into<String>, value: T) -> Self {
        let key = key.into();
        self.fields.update(|fields| {
            fields.insert(key, value);
        });
        self
    }

    /// Adds a field and declares its conventional setter.
    pub fn with_writable_field(self, key: impl Into<String>, value: T) -> Self {
        let key = key.into();
        let fields = self.fields;
        let field = key.clone();
        let setter = Callback::new(move |next: T| {
            fields.update(|fields| {
                fields.insert(field.clone(), next);
            });
        });
        self.setters.update(|setters| {
            setters.insert(setter_name(&key), setter);
        });
        self.with_field(key, value)
    }

    /// Reads a field, subscribing the caller to store changes.
    pub fn get(&self, key: &str) -> Option<T> {
        self.fields.with(|fields| fields.get(key).cloned())
    }

    /// Returns whether the field currently exists.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.with_untracked(|fields| fields.contains_key(key))
    }

    /// Updates a field from outside any bound control.
    pub fn set_field(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        self.fields.update(|fields| {
            fields.insert(key, value);
        });
    }

    /// Removes a field and returns its last value.
    pub fn remove_field(&self, key: &str) -> Option<T> {
        let mut removed = None;
        self.fields.update(|fields| removed = fields.remove(key));
        removed
    }

    /// Returns the declared setter for `key`, if any.
    pub fn setter(&self, key: &str) -> Option<Callback<T>> {
        let name = setter_name(key);
        self.setters.with_untracked(|setters| setters.get(&name).copied())
    }

    /// Writes through the declared setter for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingSetter`] when no setter was declared for the field.
    pub fn write(&self, key: &str, value: T) -> Result<(), BindingError> {
        let setter = self.setter(key).ok_or_else(|| BindingError::MissingSetter {
            field: key.to_string(),
            setter: setter_name(key),
        })?;
        setter.call(value);
        Ok(())
    }

    /// Returns the reader/writer pair for binding a control to `key`.
    ///
    /// The writer is looked up on every read, so a setter declared after the source was built
    /// is picked up by the next resolution.
    pub fn source(&self, key: impl Into<String>) -> TypedSource<T> {
        let key = key.into();
        let fields = self.fields;
        let setters = self.setters;
        let field = key.clone();
        let name = setter_name(&key);
        TypedSource {
            key,
            read: Signal::derive(move || fields.with(|fields| fields.get(&field).cloned())),
            write: Signal::derive(move || setters.with(|setters| setters.get(&name).copied())),
        }
    }
}

/// A store field reference: key, reactive reader, and optional declared writer.
pub struct TypedSource<T: 'static> {
    key: String,
    read: Signal<Option<T>>,
    write: Signal<Option<Callback<T>>>,
}

impl<T: 'static> Clone for TypedSource<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            read: self.read,
            write: self.write,
        }
    }
}

impl<T: 'static> std::fmt::Debug for TypedSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedSource")
            .field("key", &self.key)
            .field("writable", &self.write.get_untracked().is_some())
            .finish()
    }
}

impl<T: 'static> TypedSource<T> {
    /// Builds a source from signals an owner already holds.
    pub fn new(
        key: impl Into<String>,
        read: impl Into<Signal<Option<T>>>,
        write: Option<Callback<T>>,
    ) -> Self {
        Self {
            key: key.into(),
            read: read.into(),
            write: Signal::derive(move || write),
        }
    }

    /// Field key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reactive field reader.
    pub fn reader(&self) -> Signal<Option<T>> {
        self.read
    }

    /// Declared writer, if any. Subscribes the caller to setter declarations.
    pub fn writer(&self) -> Option<Callback<T>> {
        self.write.get()
    }

    /// Returns the missing-setter misconfiguration for read-only sources.
    pub fn check_writable(&self) -> Result<(), BindingError> {
        match self.write.get_untracked() {
            Some(_) => Ok(()),
            None => Err(BindingError::MissingSetter {
                field: self.key.clone(),
                setter: setter_name(&self.key),
            }),
        }
    }
}
