//! Commands: named, described units of behaviour with an optional key binding

use std::fmt::Debug;

use crate::binding::Binding;
use crate::error::{BindingError, PaletteError};

/// Derive an action name from a command name
///
/// The name is lower-cased and every character outside `[a-z0-9]` becomes `_`,
/// so `"Toggle Dark Mode"` becomes `"toggle_dark_mode"`.
pub fn action_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A command that can be offered in the command palette and listed in help
///
/// Implementors supply the name, description and, optionally, a key chord.
/// Everything else is derived. Commands carry no identity beyond their data
/// and are created on demand by providers.
pub trait Command: Debug + Send + Sync {
    /// Label shown in the palette (e.g. "Quit")
    fn name(&self) -> &str;

    /// Longer description, used as palette help and binding tooltip
    fn description(&self) -> &str;

    /// Comma-separated key chord for the command, if it has one
    fn binding_key(&self) -> Option<&str> {
        None
    }

    /// Whether the command's binding is shown in the footer
    fn show_in_footer(&self) -> bool {
        false
    }

    /// Short label for the footer; the name is used when absent
    fn footer_text(&self) -> Option<&str> {
        None
    }

    /// Name of the action this command maps to, derived from [`Command::name`]
    fn action_name(&self) -> String {
        action_name(self.name())
    }

    fn has_binding(&self) -> bool {
        self.binding_key().is_some()
    }

    /// The full binding for this command, all key alternatives included
    fn binding(&self) -> Result<Binding, PaletteError> {
        let key = self.binding_key().ok_or_else(|| PaletteError::NoBinding {
            command: self.name().to_string(),
        })?;

        Ok(Binding::new(
            key,
            self.action_name(),
            self.footer_text().unwrap_or(self.name()),
        )?
        .with_tooltip(self.description())
        .with_show(self.show_in_footer()))
    }

    /// The binding reduced to its first key alternative
    ///
    /// Fails with [`PaletteError::NoBinding`] when the command has no binding;
    /// check [`Command::has_binding`] first.
    fn primary_binding(&self) -> Result<Binding, PaletteError> {
        Ok(self.binding()?.primary())
    }
}

/// A command described entirely by data
///
/// ```rust
/// use tui_commands::{Command, DeclaredCommand};
///
/// let save = DeclaredCommand::new("Save File", "Save the current file")
///     .with_binding("ctrl+s")?
///     .shown_in_footer()
///     .with_footer_text("Save");
///
/// assert_eq!(save.action_name(), "save_file");
/// assert_eq!(save.primary_binding()?.key(), "ctrl+s");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredCommand {
    name: String,
    description: String,
    binding_key: Option<String>,
    show_in_footer: bool,
    footer_text: Option<String>,
}

impl DeclaredCommand {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            binding_key: None,
            show_in_footer: false,
            footer_text: None,
        }
    }

    /// Attach a key chord, validated immediately
    pub fn with_binding(mut self, key: impl Into<String>) -> Result<Self, BindingError> {
        let key = key.into();
        Binding::new(key.as_str(), action_name(&self.name), self.name.as_str())?;
        self.binding_key = Some(key);
        Ok(self)
    }

    pub fn shown_in_footer(mut self) -> Self {
        self.show_in_footer = true;
        self
    }

    pub fn with_footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }
}

impl Command for DeclaredCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn binding_key(&self) -> Option<&str> {
        self.binding_key.as_deref()
    }

    fn show_in_footer(&self) -> bool {
        self.show_in_footer
    }

    fn footer_text(&self) -> Option<&str> {
        self.footer_text.as_deref()
    }
}

/// Show help for and information about the application
#[derive(Debug, Clone, Copy, Default)]
pub struct Help;

impl Command for Help {
    fn name(&self) -> &str {
        "Help"
    }

    fn description(&self) -> &str {
        "Show help for and information about the application"
    }

    fn binding_key(&self) -> Option<&str> {
        Some("f1, ?")
    }

    fn show_in_footer(&self) -> bool {
        true
    }
}

/// Quit the application
#[derive(Debug, Clone, Copy, Default)]
pub struct Quit;

impl Command for Quit {
    fn name(&self) -> &str {
        "Quit"
    }

    fn description(&self) -> &str {
        "Quit the application"
    }

    fn binding_key(&self) -> Option<&str> {
        Some("f10, ctrl+q")
    }

    fn show_in_footer(&self) -> bool {
        true
    }
}

/// Application-wide binding that opens the command palette
pub fn command_palette_binding() -> Result<Binding, BindingError> {
    Ok(Binding::new("ctrl+p, super+x, :", "command_palette", "Commands")?
        .with_tooltip("Show the command palette")
        .with_show(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_name() {
        assert_eq!(action_name("Quit"), "quit");
        assert_eq!(action_name("Toggle Dark Mode"), "toggle_dark_mode");
        assert_eq!(action_name("Go to #42!"), "go_to__42_");
        assert_eq!(action_name(""), "");
    }

    #[test]
    fn test_action_name_idempotent() {
        for name in ["Quit", "Close Tab", "Ünïcode Ñame", "snake_case", "a-b.c/d", "  "] {
            let once = action_name(name);
            assert_eq!(action_name(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_builtin_bindings_are_valid() {
        let commands: [&dyn Command; 2] = [&Help, &Quit];
        for command in commands {
            assert!(command.has_binding());
            let binding = command.binding().unwrap();
            assert_eq!(binding.action(), command.action_name());
            assert!(command.primary_binding().is_ok(), "{}", command.name());
        }

        let palette = command_palette_binding().unwrap();
        assert_eq!(palette.keys().collect::<Vec<_>>(), vec!["ctrl+p", "super+x", ":"]);
        assert_eq!(palette.action(), "command_palette");
    }

    #[test]
    fn test_same_name_same_action() {
        let a = DeclaredCommand::new("Close Tab", "Close the tab");
        let b = DeclaredCommand::new("Close Tab", "Something else entirely");
        assert_eq!(a.action_name(), b.action_name());
    }

    #[test]
    fn test_primary_binding_without_binding() {
        let cmd = DeclaredCommand::new("Refresh", "Reload everything");
        assert!(!cmd.has_binding());
        assert_eq!(
            cmd.primary_binding().unwrap_err(),
            PaletteError::NoBinding {
                command: "Refresh".into()
            }
        );
    }

    #[test]
    fn test_binding_carries_command_metadata() {
        let binding = Quit.binding().unwrap();
        assert_eq!(binding.key(), "f10, ctrl+q");
        assert_eq!(binding.action(), "quit");
        assert_eq!(binding.description(), "Quit");
        assert_eq!(binding.tooltip(), "Quit the application");
        assert!(binding.show());

        assert_eq!(Quit.primary_binding().unwrap().key(), "f10");
    }

    #[test]
    fn test_footer_text_overrides_description() {
        let cmd = DeclaredCommand::new("Toggle Dark Mode", "Switch theme")
            .with_binding("ctrl+d")
            .unwrap()
            .with_footer_text("Dark");
        assert_eq!(cmd.binding().unwrap().description(), "Dark");
        assert!(!cmd.binding().unwrap().show());
    }

    #[test]
    fn test_malformed_binding_rejected_at_declaration() {
        let result = DeclaredCommand::new("Broken", "").with_binding("a,,b");
        assert!(matches!(result, Err(BindingError::EmptyKey { .. })));
    }

    #[test]
    fn test_command_palette_binding() {
        let binding = command_palette_binding().unwrap();
        assert_eq!(binding.keys().collect::<Vec<_>>(), vec!["ctrl+p", "super+x", ":"]);
        assert_eq!(binding.action(), "command_palette");
        assert!(!binding.show());
    }
}
