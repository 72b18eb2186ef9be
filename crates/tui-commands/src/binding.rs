//! Key bindings attached to commands and UI nodes

use crate::error::BindingError;
use crate::keys::KeyDisplay;

/// An immutable key binding: a key chord, the action it triggers and its help text
///
/// The chord holds one or more comma-separated key alternatives, e.g.
/// `"f10, ctrl+q"`. Every alternative is validated when the binding is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    key: String,
    action: String,
    description: String,
    tooltip: String,
    show: bool,
}

impl Binding {
    /// Create a binding, validating the key chord
    ///
    /// Fails if the chord is empty or any comma-separated alternative trims
    /// to nothing.
    pub fn new(
        key: impl Into<String>,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, BindingError> {
        let key = key.into();
        validate_chord(&key)?;

        Ok(Self {
            key,
            action: action.into(),
            description: description.into(),
            tooltip: String::new(),
            show: true,
        })
    }

    /// Set the longer, human-oriented tooltip
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Set whether the binding is shown in the footer
    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// The raw key chord as declared
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Whether the binding should be shown in the footer
    pub fn show(&self) -> bool {
        self.show
    }

    /// The individual key alternatives, trimmed, in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.key.split(',').map(str::trim)
    }

    /// The first key alternative
    pub fn primary_key(&self) -> &str {
        // Validation guarantees at least one non-empty alternative
        self.keys().next().unwrap_or_default()
    }

    /// A copy of this binding reduced to its first key alternative
    pub fn primary(&self) -> Self {
        Self {
            key: self.primary_key().to_string(),
            ..self.clone()
        }
    }
}

fn validate_chord(chord: &str) -> Result<(), BindingError> {
    if chord.trim().is_empty() {
        return Err(BindingError::EmptyChord);
    }
    if chord.split(',').any(|key| key.trim().is_empty()) {
        return Err(BindingError::EmptyKey {
            chord: chord.to_string(),
        });
    }
    Ok(())
}

/// Display forms of every key alternative of a binding, in declaration order
pub fn all_keys(binding: &Binding, keys: &dyn KeyDisplay) -> Vec<String> {
    binding.keys().map(|key| keys.key_display(key)).collect()
}

/// A binding that carries a description meant for people reading help
///
/// Only helpful bindings are listed in the contextual help; plain bindings
/// are machine plumbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpfulBinding {
    binding: Binding,
}

impl HelpfulBinding {
    pub fn new(binding: Binding) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The tooltip if one was given, otherwise the short description
    pub fn most_helpful_description(&self) -> &str {
        if self.binding.tooltip().is_empty() {
            self.binding.description()
        } else {
            self.binding.tooltip()
        }
    }
}

impl From<Binding> for HelpfulBinding {
    fn from(binding: Binding) -> Self {
        Self::new(binding)
    }
}

/// A binding as declared on a UI node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBinding {
    /// Plain binding, not listed in help
    Machine(Binding),
    /// Binding listed in help
    Helpful(HelpfulBinding),
}

impl NodeBinding {
    /// The underlying binding regardless of kind
    pub fn binding(&self) -> &Binding {
        match self {
            NodeBinding::Machine(binding) => binding,
            NodeBinding::Helpful(helpful) => helpful.binding(),
        }
    }

    pub fn as_helpful(&self) -> Option<&HelpfulBinding> {
        match self {
            NodeBinding::Helpful(helpful) => Some(helpful),
            NodeBinding::Machine(_) => None,
        }
    }
}
