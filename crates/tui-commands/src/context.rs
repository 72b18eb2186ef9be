//! The screen context a provider works against, and its collaborators

use std::fmt::{self, Debug};
use std::rc::Rc;
use std::sync::Arc;

use ratatui::style::Style;

use crate::command::Command;
use crate::error::PaletteError;
use crate::keys::{DefaultKeyDisplay, KeyDisplay};

/// Answers whether an action may be performed right now
pub trait PermissionOracle {
    fn can_perform(&self, action: &str) -> bool;
}

impl<F> PermissionOracle for F
where
    F: Fn(&str) -> bool,
{
    fn can_perform(&self, action: &str) -> bool {
        self(action)
    }
}

/// Permission oracle that allows every action
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionOracle for AllowAll {
    fn can_perform(&self, _action: &str) -> bool {
        true
    }
}

/// A payload delivered to the active screen when a hit is selected
pub enum Dispatch<M> {
    /// A command acting as its own message
    Command(Arc<dyn Command>),
    /// An application message from a raw command hit
    Message(M),
}

impl<M> Dispatch<M> {
    /// The action name when this dispatch carries a command
    pub fn action_name(&self) -> Option<String> {
        match self {
            Dispatch::Command(command) => Some(command.action_name()),
            Dispatch::Message(_) => None,
        }
    }
}

impl<M: Clone> Clone for Dispatch<M> {
    fn clone(&self) -> Self {
        match self {
            Dispatch::Command(command) => Dispatch::Command(Arc::clone(command)),
            Dispatch::Message(message) => Dispatch::Message(message.clone()),
        }
    }
}

impl<M: Debug> Debug for Dispatch<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Dispatch::Message(message) => f.debug_tuple("Message").field(message).finish(),
        }
    }
}

/// Delivers dispatch payloads to the active screen, fire-and-forget
pub trait MessageBus<M> {
    fn post(&self, message: Dispatch<M>);
}

/// Receives failures that ended a provider's pass early
pub trait ErrorReporter {
    fn report(&self, provider: &str, error: &PaletteError);
}

/// Reports failures through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, provider: &str, error: &PaletteError) {
        log::error!("Command provider {} failed: {}", provider, error);
    }
}

/// Everything a provider needs from the screen it serves
///
/// The accent style is a snapshot of the active theme, taken when the
/// context is built; `None` means no theme is active.
pub struct Context<M> {
    permissions: Rc<dyn PermissionOracle>,
    bus: Rc<dyn MessageBus<M>>,
    keys: Rc<dyn KeyDisplay>,
    accent: Option<Style>,
}

impl<M> Context<M> {
    pub fn new(permissions: Rc<dyn PermissionOracle>, bus: Rc<dyn MessageBus<M>>) -> Self {
        Self {
            permissions,
            bus,
            keys: Rc::new(DefaultKeyDisplay),
            accent: None,
        }
    }

    pub fn with_key_display(mut self, keys: Rc<dyn KeyDisplay>) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_accent(mut self, accent: Option<Style>) -> Self {
        self.accent = accent;
        self
    }

    pub fn can_perform(&self, action: &str) -> bool {
        self.permissions.can_perform(action)
    }

    pub fn post(&self, message: Dispatch<M>) {
        self.bus.post(message);
    }

    pub fn bus(&self) -> Rc<dyn MessageBus<M>> {
        Rc::clone(&self.bus)
    }

    pub fn key_display(&self) -> &dyn KeyDisplay {
        self.keys.as_ref()
    }

    pub fn accent(&self) -> Option<Style> {
        self.accent
    }
}

impl<M> Clone for Context<M> {
    fn clone(&self) -> Self {
        Self {
            permissions: Rc::clone(&self.permissions),
            bus: Rc::clone(&self.bus),
            keys: Rc::clone(&self.keys),
            accent: self.accent,
        }
    }
}

impl<M> Debug for Context<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("accent", &self.accent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Quit;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<Option<String>>>);

    impl MessageBus<()> for Recorder {
        fn post(&self, message: Dispatch<()>) {
            self.0.borrow_mut().push(message.action_name());
        }
    }

    #[test]
    fn test_closure_permission_oracle() {
        let bus = Rc::new(Recorder::default());
        let ctx: Context<()> = Context::new(Rc::new(|action: &str| action == "quit"), bus);
        assert!(ctx.can_perform("quit"));
        assert!(!ctx.can_perform("help"));
    }

    #[test]
    fn test_post_reaches_bus() {
        let bus = Rc::new(Recorder::default());
        let ctx: Context<()> = Context::new(Rc::new(AllowAll), bus.clone());
        ctx.post(Dispatch::Command(Arc::new(Quit)));
        ctx.post(Dispatch::Message(()));
        assert_eq!(*bus.0.borrow(), vec![Some("quit".to_string()), None]);
    }
}
