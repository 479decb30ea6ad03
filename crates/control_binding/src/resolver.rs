//! Value-binding resolution for bindable controls.
//!
//! Every control instance builds one [`Binding`] from a [`BindingSpec`]. Resolution picks exactly
//! one [`BindingMode`] per pass, in precedence order typed store, named store, controlled,
//! uncontrolled, and reads the value and the sink from that mode only.

use leptos::*;

use crate::{
    registry::{use_store_registry, StoreRegistry},
    store::TypedSource,
    BindingError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Source that won precedence for a control instance.
pub enum BindingMode {
    /// Bound to a typed store field.
    TypedStore,
    /// Bound to a store resolved by name through the registry.
    NamedStore,
    /// Value and callback supplied by the owner.
    Controlled,
    /// Value held privately by the control.
    Uncontrolled,
}

impl BindingMode {
    /// Returns a stable token for `data-ui-*` attributes and diagnostics.
    pub const fn token(self) -> &'static str {
        match self {
            Self::TypedStore => "typed-store",
            Self::NamedStore => "named-store",
            Self::Controlled => "controlled",
            Self::Uncontrolled => "uncontrolled",
        }
    }
}

/// Possible value sources and sinks for one control instance.
pub struct BindingSpec<T: 'static> {
    /// Typed store field reference.
    pub typed: Option<TypedSource<T>>,
    /// Registry name of a store to bind to.
    pub named: MaybeSignal<Option<String>>,
    /// Owner-supplied current value.
    pub controlled_value: Option<MaybeSignal<T>>,
    /// Owner-supplied update callback.
    pub controlled_sink: Option<Callback<T>>,
    /// Seed for the uncontrolled fallback, consumed once.
    pub initial_value: Option<T>,
    /// Registry used for named lookups; the context registry is used when absent.
    pub registry: Option<StoreRegistry<T>>,
    /// Uncontrolled state shared with sibling controls; replaces the private fallback and
    /// `initial_value` when present.
    pub fallback: Option<Fallback<T>>,
}

impl<T: Clone + 'static> Clone for BindingSpec<T> {
    fn clone(&self) -> Self {
        Self {
            typed: self.typed.clone(),
            named: self.named.clone(),
            controlled_value: self.controlled_value.clone(),
            controlled_sink: self.controlled_sink,
            initial_value: self.initial_value.clone(),
            registry: self.registry,
            fallback: self.fallback,
        }
    }
}

impl<T: 'static> Default for BindingSpec<T> {
    fn default() -> Self {
        Self {
            typed: None,
            named: MaybeSignal::Static(None),
            controlled_value: None,
            controlled_sink: None,
            initial_value: None,
            registry: None,
            fallback: None,
        }
    }
}

impl<T: Clone + 'static> BindingSpec<T> {
    /// Creates a spec with no sources, which resolves as uncontrolled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds to a typed store field.
    pub fn with_typed(mut self, source: TypedSource<T>) -> Self {
        self.typed = Some(source);
        self
    }

    /// Binds to a registry store by a fixed name.
    pub fn with_named(mut self, name: impl Into<String>) -> Self {
        self.named = MaybeSignal::Static(Some(name.into()));
        self
    }

    /// Binds to a registry store whose name may change.
    pub fn with_named_signal(mut self, name: impl Into<MaybeSignal<Option<String>>>) -> Self {
        self.named = name.into();
        self
    }

    /// Supplies the owner's current value.
    pub fn with_value(mut self, value: impl Into<MaybeSignal<T>>) -> Self {
        self.controlled_value = Some(value.into());
        self
    }

    /// Supplies the owner's update callback.
    pub fn with_on_change(mut self, sink: Callback<T>) -> Self {
        self.controlled_sink = Some(sink);
        self
    }

    /// Seeds the uncontrolled fallback.
    pub fn with_initial(mut self, value: T) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Injects the registry used for named lookups.
    pub fn with_registry(mut self, registry: StoreRegistry<T>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Shares uncontrolled state with other controls built from the same fallback.
    pub fn with_fallback(mut self, fallback: Fallback<T>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// Effective value, sink, and mode for one resolution pass.
pub struct ResolvedBinding<T: 'static> {
    /// Value the control renders; `None` when the source holds nothing.
    pub value: Option<T>,
    /// Sink for user-driven changes; `None` when the binding is read-only.
    pub sink: Option<Callback<T>>,
    /// Source that won precedence.
    pub mode: BindingMode,
}

impl<T: Clone + 'static> Clone for ResolvedBinding<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            sink: self.sink,
            mode: self.mode,
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for ResolvedBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBinding")
            .field("value", &self.value)
            .field("writable", &self.sink.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Uncontrolled value a control falls back to when no external source applies.
///
/// Owned by one control unless handed to several specs through [`BindingSpec::with_fallback`].
pub struct Fallback<T: 'static> {
    value: RwSignal<Option<T>>,
    sink: Callback<T>,
}

impl<T: 'static> Clone for Fallback<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Fallback<T> {}

impl<T> Fallback<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Creates the fallback seeded with `initial`.
    pub fn new(initial: Option<T>) -> Self {
        let value = create_rw_signal(initial);
        let sink = Callback::new(move |next: T| {
            let unchanged = value.with_untracked(|current| current.as_ref() == Some(&next));
            if !unchanged {
                value.set(Some(next));
            }
        });
        Self { value, sink }
    }
}

/// Selects the effective binding from `spec`.
///
/// Reads are tracked, so a caller running inside a reactive scope subscribes to the chosen
/// source. The named source is not evaluated at all while a typed source is present.
pub fn resolve<T>(
    spec: &BindingSpec<T>,
    registry: Option<StoreRegistry<T>>,
    fallback: &Fallback<T>,
) -> ResolvedBinding<T>
where
    T: Clone + 'static,
{
    if let Some(typed) = spec.typed.as_ref() {
        return ResolvedBinding {
            value: typed.reader().get(),
            sink: typed.writer(),
            mode: BindingMode::TypedStore,
        };
    }

    let named = registry.and_then(|registry| {
        spec.named
            .with(|name| name.as_deref().and_then(|name| registry.lookup(name)))
    });
    if let Some(store) = named {
        return ResolvedBinding {
            value: store.value().get(),
            sink: store.set_value(),
            mode: BindingMode::NamedStore,
        };
    }

    if let Some(value) = spec.controlled_value.as_ref() {
        return ResolvedBinding {
            value: Some(value.get()),
            sink: spec.controlled_sink,
            mode: BindingMode::Controlled,
        };
    }

    ResolvedBinding {
        value: fallback.value.get(),
        sink: Some(fallback.sink),
        mode: BindingMode::Uncontrolled,
    }
}

/// Reactive binding of one control instance to its value source.
pub struct Binding<T: 'static> {
    resolved: Signal<ResolvedBinding<T>>,
    typed: StoredValue<Option<TypedSource<T>>>,
}

impl<T: 'static> Clone for Binding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Binding<T> {}

impl<T> Binding<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Builds the binding for a control instance.
    ///
    /// Creates the uncontrolled fallback from `spec.initial_value` (or adopts `spec.fallback`)
    /// and reports a typed source without a setter once. Later changes to the initial value are
    /// not observed.
    pub fn new(mut spec: BindingSpec<T>) -> Self {
        let initial_value = spec.initial_value.take();
        let fallback = spec
            .fallback
            .take()
            .unwrap_or_else(|| Fallback::new(initial_value));

        if let Some(err) = spec
            .typed
            .as_ref()
            .and_then(|typed| typed.check_writable().err())
        {
            logging::warn!("control binding is read-only: {err}");
        }
        let typed = store_value(spec.typed.clone());

        if spec.typed.is_none() && spec.controlled_value.is_none() && spec.controlled_sink.is_some()
        {
            logging::debug_warn!(
                "control binding ignores an on-change callback supplied without a value"
            );
        }

        let registry = match spec.typed {
            Some(_) => None,
            None => spec.registry.or_else(use_store_registry::<T>),
        };

        let resolved = Signal::derive(move || resolve(&spec, registry, &fallback));
        Self { resolved, typed }
    }

    /// Reactive resolution result.
    pub fn resolved(&self) -> Signal<ResolvedBinding<T>> {
        self.resolved
    }

    /// Reactive effective value.
    pub fn value(&self) -> Signal<Option<T>> {
        let resolved = self.resolved;
        Signal::derive(move || resolved.with(|resolved| resolved.value.clone()))
    }

    /// Reactive active mode.
    pub fn mode(&self) -> Signal<BindingMode> {
        let resolved = self.resolved;
        Signal::derive(move || resolved.with(|resolved| resolved.mode))
    }

    /// Current effective value without subscribing.
    pub fn current(&self) -> Option<T> {
        self.resolved.with_untracked(|resolved| resolved.value.clone())
    }

    /// Returns `true` when the active mode has no sink.
    pub fn is_read_only(&self) -> bool {
        self.resolved.with(|resolved| resolved.sink.is_none())
    }

    /// Current misconfiguration of the bound source, if any.
    pub fn misconfiguration(&self) -> Option<BindingError> {
        self.typed.with_value(|typed| {
            typed
                .as_ref()
                .and_then(|typed| typed.check_writable().err())
        })
    }

    /// Routes a user-driven change to the sink of the active mode.
    ///
    /// Read-only bindings drop the write.
    pub fn on_user_change(&self, value: T) {
        let (sink, mode) = self
            .resolved
            .with_untracked(|resolved| (resolved.sink, resolved.mode));
        match sink {
            Some(sink) => sink.call(value),
            None => {
                logging::debug_warn!("dropped write to read-only {} binding", mode.token());
            }
        }
    }

    /// [`Binding::on_user_change`] packaged as a callback prop.
    pub fn on_change(&self) -> Callback<T> {
        let binding = *self;
        Callback::new(move |value: T| binding.on_user_change(value))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FieldStore, NamedStore};

    fn mode_of<T: Clone + PartialEq + 'static>(binding: &Binding<T>) -> BindingMode {
        binding.mode().get_untracked()
    }

    #[test]
    fn typed_source_with_setter_routes_to_that_setter() {
        let _ = create_runtime();
        let store = FieldStore::new().with_writable_field("status", "idle".to_string());
        let binding = Binding::new(BindingSpec::new().with_typed(store.source("status")));

        assert_eq!(mode_of(&binding), BindingMode::TypedStore);
        assert_eq!(binding.current().as_deref(), Some("idle"));
        assert_eq!(binding.misconfiguration(), None);

        binding.on_user_change("busy".to_string());

        assert_eq!(store.get("status").as_deref(), Some("busy"));
        assert_eq!(binding.current().as_deref(), Some("busy"));
    }

    #[test]
    fn typed_source_shadows_named_source_entirely() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        let named = NamedStore::new(Some(1));
        registry.register("volume", named);
        let store = FieldStore::new().with_writable_field("volume", 5);

        let binding = Binding::new(
            BindingSpec::new()
                .with_typed(store.source("volume"))
                .with_named("volume")
                .with_registry(registry),
        );
        binding.on_user_change(9);

        assert_eq!(mode_of(&binding), BindingMode::TypedStore);
        assert_eq!(binding.current(), Some(9));
        assert_eq!(named.value().get_untracked(), Some(1));
        assert_eq!(registry.lookup_count(), 0);
    }

    #[test]
    fn unresolved_name_falls_through_to_controlled() {
        let _ = create_runtime();
        let registry = StoreRegistry::<String>::new();
        let binding = Binding::new(
            BindingSpec::new()
                .with_named("theme-picker")
                .with_value("dark".to_string())
                .with_registry(registry),
        );

        assert_eq!(mode_of(&binding), BindingMode::Controlled);
        assert_eq!(binding.current().as_deref(), Some("dark"));
    }

    #[test]
    fn late_registration_takes_precedence_on_next_resolution() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        let binding = Binding::new(
            BindingSpec::new()
                .with_named("theme-picker")
                .with_value("dark".to_string())
                .with_registry(registry),
        );
        assert_eq!(mode_of(&binding), BindingMode::Controlled);

        registry.register("theme-picker", NamedStore::new(Some("light".to_string())));

        assert_eq!(mode_of(&binding), BindingMode::NamedStore);
        assert_eq!(binding.current().as_deref(), Some("light"));
    }

    #[test]
    fn named_store_reads_value_and_writes_set_value() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        let store = NamedStore::new(Some(false));
        registry.register("notifications", store);
        let owner_writes = create_rw_signal(0u32);
        let binding = Binding::new(
            BindingSpec::new()
                .with_named("notifications")
                .with_value(true)
                .with_on_change(Callback::new(move |_: bool| {
                    owner_writes.update(|count| *count += 1)
                }))
                .with_registry(registry),
        );

        binding.on_user_change(true);

        assert_eq!(store.value().get_untracked(), Some(true));
        assert_eq!(binding.current(), Some(true));
        assert_eq!(owner_writes.get_untracked(), 0);
    }

    #[test]
    fn unregistering_named_store_falls_through() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        registry.register("status", NamedStore::new(Some("online".to_string())));
        let binding = Binding::new(
            BindingSpec::new()
                .with_named("status")
                .with_initial("offline".to_string())
                .with_registry(registry),
        );
        assert_eq!(mode_of(&binding), BindingMode::NamedStore);

        registry.unregister("status");

        assert_eq!(mode_of(&binding), BindingMode::Uncontrolled);
        assert_eq!(binding.current().as_deref(), Some("offline"));
    }

    #[test]
    fn uncontrolled_writes_stay_local_and_are_idempotent() {
        let _ = create_runtime();
        let binding = Binding::new(BindingSpec::new().with_initial(1));
        let value = binding.value();
        let runs = create_rw_signal(0u32);
        let observed = create_memo(move |_| {
            runs.update_untracked(|count| *count += 1);
            value.get()
        });
        assert_eq!(observed.get_untracked(), Some(1));

        binding.on_user_change(4);
        assert_eq!(binding.current(), Some(4));
        assert_eq!(observed.get_untracked(), Some(4));
        let runs_after_first = runs.get_untracked();

        binding.on_user_change(4);
        assert_eq!(binding.current(), Some(4));
        assert_eq!(observed.get_untracked(), Some(4));
        assert_eq!(runs.get_untracked(), runs_after_first);
        assert_eq!(mode_of(&binding), BindingMode::Uncontrolled);
    }

    #[test]
    fn missing_setter_renders_value_but_drops_writes() {
        let _ = create_runtime();
        let store = FieldStore::new().with_field("volume", 50);
        let binding = Binding::new(BindingSpec::new().with_typed(store.source("volume")));

        assert_eq!(binding.current(), Some(50));
        assert!(binding.is_read_only());
        assert_eq!(
            binding.misconfiguration(),
            Some(BindingError::MissingSetter {
                field: "volume".to_string(),
                setter: "setVolume".to_string(),
            })
        );

        binding.on_user_change(70);

        assert_eq!(binding.current(), Some(50));
        assert_eq!(store.get("volume"), Some(50));
    }

    #[test]
    fn removed_field_keeps_typed_mode_with_no_value() {
        let _ = create_runtime();
        let store = FieldStore::new().with_writable_field("status", 3);
        let binding = Binding::new(
            BindingSpec::new()
                .with_typed(store.source("status"))
                .with_value(8),
        );

        store.remove_field("status");

        assert_eq!(mode_of(&binding), BindingMode::TypedStore);
        assert_eq!(binding.current(), None);

        binding.on_user_change(5);
        assert_eq!(binding.current(), Some(5));
    }

    #[test]
    fn controlled_binding_writes_only_to_owner_callback() {
        let _ = create_runtime();
        let owner_value = create_rw_signal("a".to_string());
        let binding = Binding::new(
            BindingSpec::new()
                .with_value(owner_value)
                .with_on_change(Callback::new(move |next: String| owner_value.set(next)))
                .with_initial("local".to_string()),
        );

        binding.on_change().call("b".to_string());

        assert_eq!(mode_of(&binding), BindingMode::Controlled);
        assert_eq!(owner_value.get_untracked(), "b");
        assert_eq!(binding.current().as_deref(), Some("b"));
    }

    #[test]
    fn controlled_value_without_callback_is_read_only() {
        let _ = create_runtime();
        let binding = Binding::new(BindingSpec::new().with_value(true));

        binding.on_user_change(false);

        assert!(binding.is_read_only());
        assert_eq!(binding.current(), Some(true));
    }

    #[test]
    fn callback_without_value_stays_uncontrolled() {
        let _ = create_runtime();
        let owner_writes = create_rw_signal(0u32);
        let binding = Binding::new(
            BindingSpec::new()
                .with_on_change(Callback::new(move |_: u8| {
                    owner_writes.update(|count| *count += 1)
                }))
                .with_initial(2),
        );

        binding.on_user_change(3);

        assert_eq!(mode_of(&binding), BindingMode::Uncontrolled);
        assert_eq!(binding.current(), Some(3));
        assert_eq!(owner_writes.get_untracked(), 0);
    }

    #[test]
    fn uncontrolled_without_initial_value_is_empty() {
        let _ = create_runtime();
        let binding = Binding::<String>::new(BindingSpec::new());

        assert_eq!(binding.current(), None);
        assert!(!binding.is_read_only());
    }

    #[test]
    fn resolve_is_idempotent() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        registry.register("grid", NamedStore::new(Some(12)));
        let spec = BindingSpec::new()
            .with_named("grid")
            .with_value(4)
            .with_registry(registry);
        let fallback = Fallback::new(None);

        let first = resolve(&spec, Some(registry), &fallback);
        let second = resolve(&spec, Some(registry), &fallback);

        assert_eq!(first.mode, second.mode);
        assert_eq!(first.value, second.value);
        assert_eq!(first.mode, BindingMode::NamedStore);
        assert_eq!(first.value, Some(12));
    }

    #[test]
    fn typed_subscriber_reruns_on_external_store_update() {
        let _ = create_runtime();
        let store = FieldStore::new().with_writable_field("volume", 1);
        let binding = Binding::new(BindingSpec::new().with_typed(store.source("volume")));
        let value = binding.value();
        let observed = create_memo(move |_| value.get());
        assert_eq!(observed.get_untracked(), Some(1));

        store.set_field("volume", 2);
        assert_eq!(observed.get_untracked(), Some(2));

        store.remove_field("volume");
        assert_eq!(observed.get_untracked(), None);
    }

    #[test]
    fn named_subscriber_reruns_on_external_set_value() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        let store = NamedStore::new(Some("light".to_string()));
        registry.register("theme-picker", store);
        let binding = Binding::new(
            BindingSpec::new()
                .with_named("theme-picker")
                .with_registry(registry),
        );
        let value = binding.value();
        let observed = create_memo(move |_| value.get());
        assert_eq!(observed.get_untracked().as_deref(), Some("light"));

        store.set_value().expect("writable store").call("dark".to_string());

        assert_eq!(observed.get_untracked().as_deref(), Some("dark"));
    }

    #[test]
    fn mode_subscriber_reruns_on_late_registration() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        let binding = Binding::new(
            BindingSpec::new()
                .with_named("theme-picker")
                .with_value("dark".to_string())
                .with_registry(registry),
        );
        let mode = binding.mode();
        let value = binding.value();
        let observed_mode = create_memo(move |_| mode.get());
        let observed_value = create_memo(move |_| value.get());
        assert_eq!(observed_mode.get_untracked(), BindingMode::Controlled);
        assert_eq!(observed_value.get_untracked().as_deref(), Some("dark"));

        registry.register("theme-picker", NamedStore::new(Some("light".to_string())));

        assert_eq!(observed_mode.get_untracked(), BindingMode::NamedStore);
        assert_eq!(observed_value.get_untracked().as_deref(), Some("light"));
    }

    #[test]
    fn initial_value_seeds_fallback_only_once() {
        let _ = create_runtime();
        let registry = StoreRegistry::new();
        let store = NamedStore::new(Some("remote".to_string()));
        registry.register("status", store);
        let binding = Binding::new(
            BindingSpec::new()
                .with_named("status")
                .with_initial("initial".to_string())
                .with_registry(registry),
        );
        assert_eq!(binding.current().as_deref(), Some("remote"));

        registry.unregister("status");
        assert_eq!(binding.current().as_deref(), Some("initial"));

        binding.on_user_change("local".to_string());
        registry.register("status", store);
        assert_eq!(mode_of(&binding), BindingMode::NamedStore);
        assert_eq!(binding.current().as_deref(), Some("remote"));

        registry.unregister("status");
        assert_eq!(mode_of(&binding), BindingMode::Uncontrolled);
        assert_eq!(binding.current().as_deref(), Some("local"));
    }

    #[test]
    fn shared_fallback_is_seen_by_every_binding() {
        let _ = create_runtime();
        let shared = Fallback::new(Some("a".to_string()));
        let first = Binding::new(
            BindingSpec::new()
                .with_fallback(shared)
                .with_initial("ignored".to_string()),
        );
        let second = Binding::new(BindingSpec::new().with_fallback(shared));
        let value = second.value();
        let observed = create_memo(move |_| value.get());
        assert_eq!(first.current().as_deref(), Some("a"));

        first.on_user_change("b".to_string());

        assert_eq!(observed.get_untracked().as_deref(), Some("b"));
        assert_eq!(mode_of(&second), BindingMode::Uncontrolled);
    }

    #[test]
    fn setter_declared_after_mount_makes_binding_writable() {
        let _ = create_runtime();
        let store = FieldStore::new().with_field("volume", 50);
        let binding = Binding::new(BindingSpec::new().with_typed(store.source("volume")));
        assert!(binding.is_read_only());

        let store = store.with_writable_field("volume", 50);
        binding.on_user_change(70);

        assert_eq!(binding.misconfiguration(), None);
        assert_eq!(store.get("volume"), Some(70));
        assert_eq!(binding.current(), Some(70));
    }

    #[test]
    fn mode_tokens_are_stable() {
        assert_eq!(BindingMode::TypedStore.token(), "typed-store");
        assert_eq!(BindingMode::NamedStore.token(), "named-store");
        assert_eq!(BindingMode::Controlled.token(), "controlled");
        assert_eq!(BindingMode::Uncontrolled.token(), "uncontrolled");
    }
}
