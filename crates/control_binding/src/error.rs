use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Binding misconfigurations detected while wiring a control to its sources.
pub enum BindingError {
    /// A typed store field has no declared setter, so the bound control is read-only.
    #[error("store field `{field}` has no `{setter}` setter")]
    MissingSetter {
        /// Field key the control is bound to.
        field: String,
        /// Setter name expected by the naming convention.
        setter: String,
    },
    /// A store name is already taken in the registry.
    #[error("store name `{name}` is already registered")]
    DuplicateStoreName {
        /// Conflicting registry name.
        name: String,
    },
}
