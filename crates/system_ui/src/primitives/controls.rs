use control_binding::{Fallback, TypedSource};

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One selectable entry of a [`Dropdown`].
pub struct DropdownOption {
    /// Value routed through the binding when selected.
    pub value: String,
    /// Visible label.
    pub label: String,
    /// Whether the entry can be selected.
    pub disabled: bool,
}

impl DropdownOption {
    /// Creates an enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Marks the option as not selectable.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[component]
/// Shared neumorphic switch with explicit `role="switch"` semantics.
///
/// The checked state comes from `store`, then `store_name`, then `checked`/`on_toggle`, then
/// private state seeded from `default_checked`. A binding without a write path renders
/// disabled.
pub fn Switch(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional)] store: Option<TypedSource<bool>>,
    #[prop(optional, into)] store_name: Option<String>,
    #[prop(optional, into)] checked: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_checked: bool,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_toggle: Option<Callback<bool>>,
) -> impl IntoView {
    let binding = bind_control(store, store_name, checked, on_toggle, Some(default_checked), None);
    let value = binding.value();
    let mode = binding.mode();
    let checked = Signal::derive(move || value.get().unwrap_or(false));
    let read_only = Signal::derive(move || binding.is_read_only());
    let inactive = Signal::derive(move || disabled.get() || read_only.get());

    let handle_toggle = move || {
        if inactive.get_untracked() {
            return;
        }
        binding.on_user_change(!checked.get_untracked());
    };

    view! {
        <button
            type="button"
            class=merge_layout_class("ui-switch", layout_class)
            role="switch"
            aria-label=move || aria_label.get()
            aria-checked=move || checked.get().to_string()
            aria-readonly=move || read_only.get().to_string()
            disabled=move || inactive.get()
            data-ui-primitive="true"
            data-ui-kind="switch"
            data-ui-slot=ui_slot
            data-ui-binding=move || mode.get().token()
            data-ui-selected=move || bool_token(checked.get())
            data-ui-readonly=move || bool_token(read_only.get())
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |_| handle_toggle()
            on:keydown=move |ev| match ev.key().as_str() {
                " " | "Enter" => {
                    ev.prevent_default();
                    handle_toggle();
                }
                _ => {}
            }
        >
            <span data-ui-slot="track">
                <span data-ui-slot="thumb"></span>
            </span>
        </button>
    }
}

#[component]
/// Shared dropdown (`<select>`) primitive bound to a string value.
pub fn Dropdown(
    #[prop(default = FieldVariant::Standard)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    options: Vec<DropdownOption>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional)] store: Option<TypedSource<String>>,
    #[prop(optional, into)] store_name: Option<String>,
    #[prop(optional, into)] value: Option<MaybeSignal<String>>,
    #[prop(optional, into)] default_value: Option<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<String>>,
) -> impl IntoView {
    let binding = bind_control(store, store_name, value, on_change, default_value, None);
    let current = binding.value();
    let mode = binding.mode();
    let read_only = Signal::derive(move || binding.is_read_only());
    let inactive = Signal::derive(move || disabled.get() || read_only.get());

    let options = options
        .into_iter()
        .map(|option| {
            let option_value = option.value.clone();
            view! {
                <option
                    value=option.value
                    disabled=option.disabled
                    selected=move || current.get().as_deref() == Some(option_value.as_str())
                >
                    {option.label}
                </option>
            }
        })
        .collect_view();

    view! {
        <select
            class=merge_layout_class("ui-field", layout_class)
            aria-label=aria_label
            prop:value=move || current.get().unwrap_or_default()
            disabled=move || inactive.get()
            data-ui-primitive="true"
            data-ui-kind="select"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-binding=move || mode.get().token()
            data-ui-readonly=move || bool_token(read_only.get())
            on:change=move |ev| {
                if inactive.get_untracked() {
                    return;
                }
                binding.on_user_change(event_target_value(&ev));
            }
        >
            {placeholder.map(|placeholder| view! {
                <option value="" disabled=true hidden=true>{placeholder}</option>
            })}
            {options}
        </select>
    }
}

#[derive(Clone, Copy)]
struct RadioGroupSelection(Fallback<String>);

#[component]
/// Shared radio group container with `role="radiogroup"` semantics.
///
/// Provides one uncontrolled selection, seeded from `default_value`, to the [`RadioButton`]s
/// inside it.
pub fn RadioGroup(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] default_value: Option<String>,
    children: Children,
) -> impl IntoView {
    provide_context(RadioGroupSelection(Fallback::new(default_value)));

    view! {
        <div
            class=merge_layout_class("ui-radio-group", layout_class)
            role="radiogroup"
            aria-label=move || aria_label.get()
            data-ui-primitive="true"
            data-ui-kind="radio-group"
            data-ui-slot=ui_slot
        >
            {children()}
        </div>
    }
}

#[component]
/// Shared radio button bound to the group value.
///
/// The button is checked while the bound value equals `value` and routes `value` through the
/// binding when chosen. Buttons of one group share state through a common `store`,
/// `store_name`, or controlled `selected` signal; without those they share the enclosing
/// [`RadioGroup`] selection, and `default_value` only applies outside a group.
pub fn RadioButton(
    #[prop(into)] value: String,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional)] store: Option<TypedSource<String>>,
    #[prop(optional, into)] store_name: Option<String>,
    #[prop(optional, into)] selected: Option<MaybeSignal<String>>,
    #[prop(optional, into)] default_value: Option<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_select: Option<Callback<String>>,
    children: Children,
) -> impl IntoView {
    let group =
        use_context::<RadioGroupSelection>().map(|RadioGroupSelection(selection)| selection);
    let binding = bind_control(store, store_name, selected, on_select, default_value, group);
    let current = binding.value();
    let mode = binding.mode();
    let read_only = Signal::derive(move || binding.is_read_only());
    let inactive = Signal::derive(move || disabled.get() || read_only.get());

    let own_value = store_value(value);
    let checked = Signal::derive(move || {
        current.with(|current| own_value.with_value(|own| current.as_deref() == Some(own.as_str())))
    });

    let choose = move || {
        if inactive.get_untracked() {
            return;
        }
        binding.on_user_change(own_value.get_value());
    };

    view! {
        <button
            type="button"
            class=merge_layout_class("ui-radio", layout_class)
            role="radio"
            aria-label=move || aria_label.get()
            aria-checked=move || checked.get().to_string()
            disabled=move || inactive.get()
            tabindex=move || if checked.get() { 0 } else { -1 }
            data-ui-primitive="true"
            data-ui-kind="radio"
            data-ui-slot=ui_slot
            data-ui-value=own_value.get_value()
            data-ui-binding=move || mode.get().token()
            data-ui-selected=move || bool_token(checked.get())
            data-ui-readonly=move || bool_token(read_only.get())
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |_| choose()
            on:keydown=move |ev| match ev.key().as_str() {
                " " | "Enter" => {
                    ev.prevent_default();
                    choose();
                }
                _ => {}
            }
        >
            <span data-ui-slot="indicator"></span>
            <span data-ui-slot="label">{children()}</span>
        </button>
    }
}
