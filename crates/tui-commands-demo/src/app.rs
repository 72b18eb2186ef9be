use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use tui_commands::{
    Binding, Command, CommonCommands, Context, Dispatch, Help, HelpInfo, HelpNode, NodeBinding,
    NodeId, NodeTree, OnSelect, Palette, Quit, build_help, command_palette_binding,
    footer_bindings, help_close_binding, is_empty_query,
};

use crate::commands::{
    AppMessage, AppPermissions, ChannelBus, ClearLog, LogCommands, ToggleLog, binding_matches,
    key_name,
};
use crate::config::Config;
use crate::log_capture::LogBuffer;
use crate::theme::Theme;

const PAGE: usize = 10;

/// One palette entry ready to draw and select
pub struct PaletteRow {
    pub label: Line<'static>,
    pub help: String,
    pub on_select: OnSelect<AppMessage>,
}

pub struct PaletteState {
    pub query: String,
    pub rows: Vec<PaletteRow>,
    pub selected: usize,
}

pub struct HelpState {
    pub lines: Vec<String>,
    pub scroll: usize,
}

pub struct App {
    pub palette: Palette<AppMessage>,
    pub palette_state: Option<PaletteState>,
    pub help_state: Option<HelpState>,
    pub logs: LogBuffer,
    /// Entries hidden below the bottom of the log panel
    pub log_offset: usize,
    pub theme: Theme,
    pub running: bool,
    log_visible: Rc<Cell<bool>>,
    tree: NodeTree,
    main_node: NodeId,
    log_node: NodeId,
    info: HelpInfo,
    palette_binding: Binding,
    ctx: Context<AppMessage>,
    messages: Receiver<Dispatch<AppMessage>>,
}

impl App {
    pub fn new(config: &Config, logs: LogBuffer) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let log_visible = Rc::new(Cell::new(false));
        let theme = Theme::new(config.accent_color());

        let ctx = Context::new(
            Rc::new(AppPermissions::new(logs.clone(), log_visible.clone())),
            Rc::new(ChannelBus::new(tx)),
        )
        .with_accent(theme.binding_hint());

        let mut palette = Palette::new();
        palette.register(Box::new(CommonCommands));
        palette.register(Box::new(LogCommands));
        palette.attach(ctx.clone());

        let (tree, main_node, log_node) = help_tree()?;

        Ok(Self {
            palette,
            palette_state: None,
            help_state: None,
            logs,
            log_offset: 0,
            theme,
            running: true,
            log_visible,
            tree,
            main_node,
            log_node,
            info: config.help_info(),
            palette_binding: command_palette_binding()?,
            ctx,
            messages: rx,
        })
    }

    pub fn log_visible(&self) -> bool {
        self.log_visible.get()
    }

    /// The help node for what currently has focus
    pub fn focused(&self) -> NodeId {
        if self.log_visible() {
            self.log_node
        } else {
            self.main_node
        }
    }

    pub fn palette_prompt(&self) -> &str {
        self.palette.prompt()
    }

    /// Key hint and label pairs for the footer
    pub fn footer(&self) -> Vec<(String, String)> {
        match footer_bindings(&self.tree, Some(self.focused())) {
            Ok(bindings) => bindings
                .iter()
                .map(|b| {
                    (
                        self.ctx.key_display().binding_display(b),
                        b.description().to_string(),
                    )
                })
                .collect(),
            Err(e) => {
                log::error!("Failed to collect footer bindings: {}", e);
                Vec::new()
            }
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        let Some(name) = key_name(key) else {
            return;
        };

        if self.palette_state.is_some() {
            self.handle_palette_key(key);
        } else if self.help_state.is_some() {
            self.handle_help_key(&name);
        } else {
            self.handle_screen_key(&name);
        }
    }

    fn handle_palette_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => self.palette_state = None,
            KeyCode::Enter => {
                if let Some(state) = self.palette_state.take()
                    && let Some(row) = state.rows.into_iter().nth(state.selected)
                {
                    row.on_select.select();
                }
            }
            KeyCode::Up => {
                if let Some(state) = self.palette_state.as_mut() {
                    state.selected = state.selected.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if let Some(state) = self.palette_state.as_mut()
                    && state.selected + 1 < state.rows.len()
                {
                    state.selected += 1;
                }
            }
            KeyCode::Backspace => {
                if let Some(state) = self.palette_state.as_mut() {
                    state.query.pop();
                }
                self.refresh_palette();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let Some(state) = self.palette_state.as_mut() {
                    state.query.push(c);
                }
                self.refresh_palette();
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, name: &str) {
        match help_close_binding() {
            Ok(close) if binding_matches(&close, name) => {
                self.help_state = None;
                return;
            }
            Ok(_) => {}
            Err(e) => log::error!("Invalid help close binding: {}", e),
        }

        let Some(state) = self.help_state.as_mut() else {
            return;
        };
        let last = state.lines.len().saturating_sub(1);
        state.scroll = match name {
            "up" | "k" => state.scroll.saturating_sub(1),
            "down" | "j" => (state.scroll + 1).min(last),
            "pageup" => state.scroll.saturating_sub(PAGE),
            "pagedown" => (state.scroll + PAGE).min(last),
            "home" => 0,
            "end" => last,
            _ => state.scroll,
        };
    }

    fn handle_screen_key(&mut self, name: &str) {
        if binding_matches(&self.palette_binding, name) {
            self.open_palette();
            return;
        }

        if self.log_visible() {
            let total = crate::log_capture::entry_count(&self.logs);
            match name {
                "pageup" => {
                    self.log_offset = (self.log_offset + PAGE).min(total.saturating_sub(1));
                    return;
                }
                "pagedown" => {
                    self.log_offset = self.log_offset.saturating_sub(PAGE);
                    return;
                }
                "end" => {
                    self.log_offset = 0;
                    return;
                }
                _ => {}
            }
        }

        for node in self.tree.ancestors_with_self(self.focused()) {
            for command in node.commands() {
                let binding = match command.binding() {
                    Ok(binding) => binding,
                    Err(_) => continue,
                };
                if binding_matches(&binding, name) {
                    if self.ctx.can_perform(&command.action_name()) {
                        self.ctx.post(Dispatch::Command(Arc::clone(command)));
                    } else {
                        log::debug!("{} is not available right now", command.name());
                    }
                    return;
                }
            }
        }
    }

    pub fn open_palette(&mut self) {
        self.help_state = None;
        self.palette_state = Some(PaletteState {
            query: String::new(),
            rows: Vec::new(),
            selected: 0,
        });
        self.refresh_palette();
    }

    /// Start a new pass for the current query, replacing the previous rows
    fn refresh_palette(&mut self) {
        let Some(state) = self.palette_state.as_mut() else {
            return;
        };

        state.rows = if is_empty_query(&state.query) {
            self.palette
                .discover()
                .map(|hit| PaletteRow {
                    label: hit.label,
                    help: hit.help,
                    on_select: hit.on_select,
                })
                .collect()
        } else {
            self.palette
                .search(&state.query)
                .ranked()
                .into_iter()
                .map(|hit| PaletteRow {
                    label: hit.label,
                    help: hit.help,
                    on_select: hit.on_select,
                })
                .collect()
        };
        state.selected = 0;
    }

    pub fn open_help(&mut self) {
        self.palette_state = None;
        match build_help(
            &self.tree,
            Some(self.focused()),
            &self.info,
            self.ctx.key_display(),
        ) {
            Ok(doc) => {
                self.help_state = Some(HelpState {
                    lines: doc.render().lines().map(String::from).collect(),
                    scroll: 0,
                });
            }
            Err(e) => log::error!("Failed to build help: {}", e),
        }
    }

    /// Handle everything posted since the last call
    pub fn process_messages(&mut self) {
        while let Ok(message) = self.messages.try_recv() {
            self.handle_message(message);
        }
    }

    fn handle_message(&mut self, message: Dispatch<AppMessage>) {
        match message {
            Dispatch::Command(command) => match command.action_name().as_str() {
                "help" => self.open_help(),
                "quit" => {
                    log::info!("Quitting");
                    self.running = false;
                }
                "toggle_log" => {
                    self.log_visible.set(!self.log_visible());
                    self.log_offset = 0;
                }
                "clear_log" => {
                    if let Ok(mut logs) = self.logs.lock() {
                        logs.clear();
                    }
                    self.log_offset = 0;
                }
                other => log::warn!("No handler for command {}", other),
            },
            Dispatch::Message(AppMessage::WriteTestEntry) => {
                log::info!("Test entry written from the palette");
            }
            Dispatch::Message(AppMessage::ScrollLogToEnd) => self.log_offset = 0,
        }
    }
}

/// app -> main screen -> log panel
fn help_tree() -> Result<(NodeTree, NodeId, NodeId)> {
    let mut tree = NodeTree::new(
        HelpNode::new("app")
            .with_help(
                "## Application\n\n\
                 These keys work everywhere. Open the command palette to find \
                 everything else.",
            )
            .with_command(Help)
            .with_command(Quit)
            .with_binding(NodeBinding::Machine(
                command_palette_binding()?.with_show(true),
            )),
    );

    let main_node = tree.add_child(
        tree.root(),
        HelpNode::new("main")
            .with_help("## Main screen")
            .with_command(ToggleLog)
            .with_command(ClearLog),
    );

    let log_node = tree.add_child(
        main_node,
        HelpNode::new("log")
            .with_help(
                "## Log panel\n\n\
                 Shows records captured from this application. Set RUST_LOG \
                 to change what is captured.",
            )
            .with_helpful(
                Binding::new("pageup", "log_older", "Older")?
                    .with_tooltip("Scroll to older entries"),
            )
            .with_helpful(
                Binding::new("pagedown", "log_newer", "Newer")?
                    .with_tooltip("Scroll to newer entries"),
            )
            .with_helpful(
                Binding::new("end", "log_end", "Newest")?.with_tooltip("Jump to the newest entry"),
            ),
    );

    Ok((tree, main_node, log_node))
}
