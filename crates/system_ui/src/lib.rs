//! Shared bindable control primitives for system applications.
//!
//! The crate owns the Leptos controls whose value can come from a typed store field, a named
//! store, controlled props, or private state, and the stable `data-ui-*` DOM contract consumed
//! by the shell CSS layers. Value-source resolution lives in [`control_binding`]; the controls
//! only render the resolved value and route user input back through it.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod primitives;

pub use primitives::{Dropdown, DropdownOption, FieldVariant, RadioButton, RadioGroup, Switch};

/// Convenience imports for application crates consuming the shared primitive set.
pub mod prelude {
    pub use crate::{Dropdown, DropdownOption, FieldVariant, RadioButton, RadioGroup, Switch};
    pub use control_binding::{
        provide_store_registry, use_store_registry, BindingMode, FieldStore, NamedStore,
        StoreRegistry, TypedSource,
    };
}
