//! Command providers: the sources the palette discovers and searches
//!
//! A provider yields [`CommandSource`]s, either full [`Command`]s or raw
//! [`CommandHit`]s. Both are normalized into one label/description/message
//! triple before any matching happens, so discovery, search and help share the
//! same rendering path.

use std::fmt::{self, Debug};
use std::rc::Rc;
use std::sync::Arc;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::command::{Command, Help, Quit};
use crate::context::{Context, Dispatch, MessageBus};
use crate::error::PaletteError;
use crate::keys::KeyDisplay;
use crate::matcher::FuzzyMatcher;

/// A palette entry that is not backed by a [`Command`]
///
/// No binding decoration is applied to raw hits.
#[derive(Debug, Clone)]
pub struct CommandHit<M> {
    /// Label shown in the palette
    pub label: String,
    /// Help text shown for the entry
    pub description: String,
    /// Message posted when the entry is selected
    pub message: M,
}

impl<M> CommandHit<M> {
    pub fn new(label: impl Into<String>, description: impl Into<String>, message: M) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            message,
        }
    }
}

/// What a provider yields: a command, or a raw hit
pub enum CommandSource<M> {
    Command(Arc<dyn Command>),
    Hit(CommandHit<M>),
}

impl<M> CommandSource<M> {
    pub fn command<C: Command + 'static>(command: C) -> Self {
        CommandSource::Command(Arc::new(command))
    }

    pub fn hit(label: impl Into<String>, description: impl Into<String>, message: M) -> Self {
        CommandSource::Hit(CommandHit::new(label, description, message))
    }

    /// Whether the source may be offered right now; raw hits always may
    pub fn is_permitted(&self, ctx: &Context<M>) -> bool {
        match self {
            CommandSource::Command(command) => ctx.can_perform(&command.action_name()),
            CommandSource::Hit(_) => true,
        }
    }

    /// Normalize into the canonical label/description/message triple
    ///
    /// A command becomes its own message, which also makes it the binding
    /// source for decoration.
    fn normalize(self) -> Candidate<M> {
        match self {
            CommandSource::Command(command) => Candidate {
                label: command.name().to_string(),
                description: command.description().to_string(),
                message: Dispatch::Command(command),
            },
            CommandSource::Hit(hit) => Candidate {
                label: hit.label,
                description: hit.description,
                message: Dispatch::Message(hit.message),
            },
        }
    }
}

impl<M: Debug> Debug for CommandSource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSource::Command(command) => f.debug_tuple("Command").field(command).finish(),
            CommandSource::Hit(hit) => f.debug_tuple("Hit").field(hit).finish(),
        }
    }
}

struct Candidate<M> {
    label: String,
    description: String,
    message: Dispatch<M>,
}

/// Yield an instance of `C` only if its action can be performed right now
///
/// Lets a provider list candidate command types statically while leaving out
/// those that are inactive in the current context.
pub fn maybe<C, M>(ctx: &Context<M>) -> Option<CommandSource<M>>
where
    C: Command + Default + 'static,
{
    let command = C::default();
    if ctx.can_perform(&command.action_name()) {
        Some(CommandSource::command(command))
    } else {
        None
    }
}

/// Posts a hit's message to the screen when the hit is selected
pub struct OnSelect<M> {
    bus: Rc<dyn MessageBus<M>>,
    message: Dispatch<M>,
}

impl<M> OnSelect<M> {
    /// The payload this selection will post
    pub fn message(&self) -> &Dispatch<M> {
        &self.message
    }

    /// Post the message, consuming the selection
    pub fn select(self) {
        self.bus.post(self.message);
    }
}

impl<M: Clone> OnSelect<M> {
    /// Post a copy of the message, keeping the selection usable
    pub fn trigger(&self) {
        self.bus.post(self.message.clone());
    }
}

impl<M: Debug> Debug for OnSelect<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnSelect")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// An unfiltered palette entry
#[derive(Debug)]
pub struct DiscoveryHit<M> {
    /// Label, with the binding hint appended when there is one
    pub label: Line<'static>,
    pub on_select: OnSelect<M>,
    pub help: String,
}

/// A palette entry that matched a search query
#[derive(Debug)]
pub struct Hit<M> {
    /// Match score; the palette shows higher scores first
    pub score: u32,
    /// Highlighted label, with the binding hint appended when there is one
    pub label: Line<'static>,
    pub on_select: OnSelect<M>,
    pub help: String,
}

/// Style of the binding hint when no theme accent is available
pub fn dim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Append `" [key]"` to `text` when `message` is a command with a binding
///
/// The hint uses the accent style if given, otherwise [`dim_style`]. Anything
/// else is returned unchanged.
pub fn maybe_add_binding<M>(
    message: &Dispatch<M>,
    mut text: Line<'static>,
    keys: &dyn KeyDisplay,
    accent: Option<Style>,
) -> Result<Line<'static>, PaletteError> {
    let Dispatch::Command(command) = message else {
        return Ok(text);
    };
    if !command.has_binding() {
        return Ok(text);
    }

    let binding = command.primary_binding()?;
    text.spans.push(Span::raw(" "));
    text.spans.push(Span::styled(
        format!("[{}]", keys.binding_display(&binding)),
        accent.unwrap_or_else(dim_style),
    ));
    Ok(text)
}

/// Build the discovery hit for one source; `Ok(None)` when it is not permitted
pub fn discovery_hit<M>(
    ctx: &Context<M>,
    source: CommandSource<M>,
) -> Result<Option<DiscoveryHit<M>>, PaletteError> {
    if !source.is_permitted(ctx) {
        return Ok(None);
    }
    let Candidate {
        label,
        description,
        message,
    } = source.normalize();

    let label = maybe_add_binding(&message, Line::from(label), ctx.key_display(), ctx.accent())?;
    Ok(Some(DiscoveryHit {
        label,
        on_select: OnSelect {
            bus: ctx.bus(),
            message,
        },
        help: description,
    }))
}

/// Match one source against `query`; `Ok(None)` when it does not match or is
/// not permitted
pub fn search_hit<M>(
    ctx: &Context<M>,
    query: &str,
    source: CommandSource<M>,
    matcher: &mut dyn FuzzyMatcher,
) -> Result<Option<Hit<M>>, PaletteError> {
    if !source.is_permitted(ctx) {
        return Ok(None);
    }
    let Candidate {
        label,
        description,
        message,
    } = source.normalize();

    let Some(found) = matcher.fuzzy_match(query, &label)? else {
        return Ok(None);
    };

    let highlighted = found.highlight(&label);
    let label = maybe_add_binding(&message, highlighted, ctx.key_display(), ctx.accent())?;
    Ok(Some(Hit {
        score: found.score,
        label,
        on_select: OnSelect {
            bus: ctx.bus(),
            message,
        },
        help: description,
    }))
}

/// Whether a query is empty for search purposes
///
/// An empty (or all-whitespace) query matches nothing, so the palette is not
/// flooded while the user has yet to type.
pub fn is_empty_query(query: &str) -> bool {
    query.trim().is_empty()
}

/// Trait for providing commands to the palette
///
/// Implementors only supply [`CommandsProvider::commands`]; discovery and
/// search are built on top of it. `commands` is called afresh for every pass.
pub trait CommandsProvider<M>: Debug {
    /// The commands available in the given context
    fn commands(&self, ctx: &Context<M>) -> Vec<CommandSource<M>>;

    /// Provider name for logging and error reports
    fn name(&self) -> &str;

    /// Prompt shown in the palette input while this provider is active
    fn prompt(&self) -> &str {
        ""
    }

    /// List every command unfiltered, each decorated with its binding
    fn discover(&self, ctx: &Context<M>) -> Discovery<M> {
        Discovery {
            ctx: ctx.clone(),
            sources: self.commands(ctx).into_iter(),
        }
    }

    /// Fuzzy-filter the commands by `query`, in the order they were provided
    fn search<'m>(
        &self,
        ctx: &Context<M>,
        query: &str,
        matcher: &'m mut dyn FuzzyMatcher,
    ) -> Search<'m, M> {
        let sources = if is_empty_query(query) {
            log::debug!("{}: empty query, nothing to search", self.name());
            Vec::new()
        } else {
            self.commands(ctx)
        };

        Search {
            ctx: ctx.clone(),
            query: query.to_string(),
            sources: sources.into_iter(),
            matcher,
        }
    }
}

/// Lazy discovery results of one provider
pub struct Discovery<M> {
    ctx: Context<M>,
    sources: std::vec::IntoIter<CommandSource<M>>,
}

impl<M> Iterator for Discovery<M> {
    type Item = Result<DiscoveryHit<M>, PaletteError>;

    fn next(&mut self) -> Option<Self::Item> {
        for source in self.sources.by_ref() {
            match discovery_hit(&self.ctx, source) {
                Ok(Some(hit)) => return Some(Ok(hit)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Lazy search results of one provider
pub struct Search<'m, M> {
    ctx: Context<M>,
    query: String,
    sources: std::vec::IntoIter<CommandSource<M>>,
    matcher: &'m mut dyn FuzzyMatcher,
}

impl<M> Iterator for Search<'_, M> {
    type Item = Result<Hit<M>, PaletteError>;

    fn next(&mut self) -> Option<Self::Item> {
        for source in self.sources.by_ref() {
            match search_hit(&self.ctx, &self.query, source, &mut *self.matcher) {
                Ok(Some(hit)) => return Some(Ok(hit)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Provides the common top-level commands: [`Help`] and [`Quit`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonCommands;

impl<M> CommandsProvider<M> for CommonCommands {
    fn commands(&self, _ctx: &Context<M>) -> Vec<CommandSource<M>> {
        vec![CommandSource::command(Help), CommandSource::command(Quit)]
    }

    fn name(&self) -> &str {
        "CommonCommands"
    }
}
