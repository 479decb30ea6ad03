//! Value-binding resolution shared by bindable UI controls.
//!
//! A control such as a switch, dropdown, or radio button can take its value from a typed store
//! field, from a store registered by name, from an owner-supplied controlled prop pair, or from
//! its own private state. [`Binding`] picks exactly one of these per resolution, in that order,
//! and keeps the value and the update sink tied to the same source.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod error;
mod registry;
mod resolver;
mod store;

pub use error::BindingError;
pub use registry::{provide_store_registry, use_store_registry, NamedStore, StoreRegistry};
pub use resolver::{resolve, Binding, BindingMode, BindingSpec, Fallback, ResolvedBinding};
pub use store::{setter_name, FieldStore, TypedSource};
