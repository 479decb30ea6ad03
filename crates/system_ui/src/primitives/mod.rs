//! Shared bindable control primitives.

use control_binding::{Binding, BindingSpec, Fallback, TypedSource};
use leptos::*;

mod controls;

pub use controls::{Dropdown, DropdownOption, RadioButton, RadioGroup, Switch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Shared input-field variants.
pub enum FieldVariant {
    /// Standard input.
    Standard,
    /// Inset/editor input.
    Inset,
}

impl Default for FieldVariant {
    fn default() -> Self {
        Self::Standard
    }
}

impl FieldVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Inset => "inset",
        }
    }
}

/// Builds the value binding for a control from its source props.
pub(crate) fn bind_control<T>(
    store: Option<TypedSource<T>>,
    store_name: Option<String>,
    value: Option<MaybeSignal<T>>,
    on_change: Option<Callback<T>>,
    initial: Option<T>,
    fallback: Option<Fallback<T>>,
) -> Binding<T>
where
    T: Clone + PartialEq + 'static,
{
    Binding::new(BindingSpec {
        typed: store,
        named: MaybeSignal::Static(store_name),
        controlled_value: value,
        controlled_sink: on_change,
        initial_value: initial,
        registry: None,
        fallback,
    })
}

pub(crate) fn merge_layout_class(base: &'static str, layout_class: Option<&'static str>) -> String {
    match layout_class {
        Some(layout_class) if !layout_class.is_empty() => format!("{base} {layout_class}"),
        _ => base.to_string(),
    }
}

pub(crate) fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
