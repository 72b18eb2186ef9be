//! Command metadata, command palette matching and contextual help for TUI applications
//!
//! This crate provides:
//! - Declarative commands that double as palette entries and key bindings
//! - Providers exposing commands for unfiltered discovery and fuzzy search,
//!   with binding hints appended to each label
//! - A palette driver running passes over many providers, newest pass wins
//! - Contextual help gathered from a node hierarchy, innermost node first
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tui_commands::{
//!     AllowAll, CommandSource, CommandsProvider, CommonCommands, Context, Dispatch, MessageBus,
//!     Palette,
//! };
//!
//! #[derive(Debug, Clone)]
//! enum MyMessage {
//!     OpenRecent,
//! }
//!
//! struct Bus;
//!
//! impl MessageBus<MyMessage> for Bus {
//!     fn post(&self, message: Dispatch<MyMessage>) {
//!         println!("selected {:?}", message);
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct FileCommands;
//!
//! impl CommandsProvider<MyMessage> for FileCommands {
//!     fn commands(&self, _ctx: &Context<MyMessage>) -> Vec<CommandSource<MyMessage>> {
//!         vec![CommandSource::hit("Open Recent", "Open a recent file", MyMessage::OpenRecent)]
//!     }
//!
//!     fn name(&self) -> &str {
//!         "FileCommands"
//!     }
//! }
//!
//! let mut palette = Palette::new();
//! palette.register(Box::new(CommonCommands));
//! palette.register(Box::new(FileCommands));
//! palette.attach(Context::new(Rc::new(AllowAll), Rc::new(Bus)));
//!
//! assert_eq!(palette.discover().count(), 3);
//!
//! let hits = palette.search("qu").ranked();
//! assert_eq!(hits.len(), 1);
//! hits.into_iter().for_each(|hit| hit.on_select.select());
//! ```

mod binding;
mod command;
mod context;
mod error;
mod help;
mod keys;
mod matcher;
mod palette;
mod provider;

pub use binding::{all_keys, Binding, HelpfulBinding, NodeBinding};
pub use command::{action_name, command_palette_binding, Command, DeclaredCommand, Help, Quit};
pub use context::{
    AllowAll, Context, Dispatch, ErrorReporter, LogReporter, MessageBus, PermissionOracle,
};
pub use error::{BindingError, PaletteError};
pub use help::{
    build_help, clean_text, footer_bindings, help_close_binding, HelpBlock, HelpDocument,
    HelpInfo, HelpNode, HelpRow, HelpTable, NodeId, NodeTree,
};
pub use keys::{DefaultKeyDisplay, KeyDisplay};
pub use matcher::{highlight, highlight_style, FuzzyMatch, FuzzyMatcher, NucleoMatcher};
pub use palette::{
    DiscoveryPass, Discovering, MatcherFactory, Palette, Pass, PassKind, PassToken, SearchPass,
    Searching,
};
pub use provider::{
    dim_style, discovery_hit, is_empty_query, maybe, maybe_add_binding, search_hit, CommandHit,
    CommandSource, CommandsProvider, CommonCommands, Discovery, DiscoveryHit, Hit, OnSelect, Search,
};
