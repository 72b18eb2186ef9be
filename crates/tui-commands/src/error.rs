//! Error types for bindings, commands and palette passes

use thiserror::Error;

/// Errors raised while constructing a [`Binding`](crate::Binding)
///
/// A malformed key chord is a configuration mistake, so it is reported at
/// construction time rather than when the binding is first displayed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("key chord is empty")]
    EmptyChord,

    #[error("key chord {chord:?} contains an empty key alternative")]
    EmptyKey { chord: String },
}

/// Errors raised by commands, providers and palette passes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// `primary_binding()` was asked of a command that declares no binding.
    /// Callers are expected to check `has_binding()` first.
    #[error("command {command:?} has no binding")]
    NoBinding { command: String },

    /// A provider was used without a screen context attached
    #[error("provider {provider:?} has no context to check or dispatch commands against")]
    NoContext { provider: String },

    /// The fuzzy matcher failed; never swallowed
    #[error("fuzzy matcher failed: {0}")]
    Matcher(String),

    #[error(transparent)]
    Binding(#[from] BindingError),
}
