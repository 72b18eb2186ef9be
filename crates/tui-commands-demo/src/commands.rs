use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_commands::{
    Binding, Command, CommandSource, CommandsProvider, Context, Dispatch, MessageBus,
    PermissionOracle, maybe,
};

use crate::log_capture::{self, LogBuffer};

/// Messages raised by palette entries that are not commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    WriteTestEntry,
    ScrollLogToEnd,
}

#[derive(Debug, Default)]
pub struct ToggleLog;

impl Command for ToggleLog {
    fn name(&self) -> &str {
        "Toggle Log"
    }

    fn description(&self) -> &str {
        "Show or hide the log panel"
    }

    fn binding_key(&self) -> Option<&str> {
        Some("`")
    }

    fn show_in_footer(&self) -> bool {
        true
    }

    fn footer_text(&self) -> Option<&str> {
        Some("Log")
    }
}

#[derive(Debug, Default)]
pub struct ClearLog;

impl Command for ClearLog {
    fn name(&self) -> &str {
        "Clear Log"
    }

    fn description(&self) -> &str {
        "Remove all captured log entries"
    }

    fn binding_key(&self) -> Option<&str> {
        Some("ctrl+l")
    }
}

/// Log panel commands, plus a couple of plain entries
#[derive(Debug)]
pub struct LogCommands;

impl CommandsProvider<AppMessage> for LogCommands {
    fn commands(&self, ctx: &Context<AppMessage>) -> Vec<CommandSource<AppMessage>> {
        [
            maybe::<ToggleLog, _>(ctx),
            maybe::<ClearLog, _>(ctx),
            Some(CommandSource::hit(
                "Write Test Log Entry",
                "Emit an info record to try out the log panel",
                AppMessage::WriteTestEntry,
            )),
            ctx.can_perform("scroll_log_to_end").then(|| {
                CommandSource::hit(
                    "Scroll Log To End",
                    "Jump to the newest log entry",
                    AppMessage::ScrollLogToEnd,
                )
            }),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn name(&self) -> &str {
        "LogCommands"
    }

    fn prompt(&self) -> &str {
        "Search for commands…"
    }
}

/// Permissions derived from what the application currently shows
pub struct AppPermissions {
    logs: LogBuffer,
    log_visible: Rc<Cell<bool>>,
}

impl AppPermissions {
    pub fn new(logs: LogBuffer, log_visible: Rc<Cell<bool>>) -> Self {
        Self { logs, log_visible }
    }
}

impl PermissionOracle for AppPermissions {
    fn can_perform(&self, action: &str) -> bool {
        match action {
            "clear_log" => log_capture::entry_count(&self.logs) > 0,
            "scroll_log_to_end" => self.log_visible.get(),
            _ => true,
        }
    }
}

/// Message bus feeding the main loop's channel
pub struct ChannelBus(Sender<Dispatch<AppMessage>>);

impl ChannelBus {
    pub fn new(sender: Sender<Dispatch<AppMessage>>) -> Self {
        Self(sender)
    }
}

impl MessageBus<AppMessage> for ChannelBus {
    fn post(&self, message: Dispatch<AppMessage>) {
        log::debug!("Posting {:?}", message);
        if self.0.send(message).is_err() {
            log::warn!("Message dropped, the event loop is gone");
        }
    }
}

/// Name of a key press in binding syntax, e.g. `ctrl+p` or `f1`
pub fn key_name(key: &KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("f{}", n),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "shift+tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        _ => return None,
    };

    let mut parts = Vec::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("ctrl");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("alt");
    }
    if key.modifiers.contains(KeyModifiers::SUPER) {
        parts.push("super");
    }
    // Shifted characters already arrive as their shifted form
    if key.modifiers.contains(KeyModifiers::SHIFT)
        && !matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab)
    {
        parts.push("shift");
    }

    parts.push(base.as_str());
    Some(parts.join("+"))
}

/// Whether any of the binding's keys is the pressed key
pub fn binding_matches(binding: &Binding, key: &str) -> bool {
    binding.keys().any(|k| k.eq_ignore_ascii_case(key))
}
