//! Registry of command providers and the passes run over them
//!
//! A pass is one discovery or search run across every registered provider,
//! in registration order. Starting a new pass supersedes the previous one: a
//! superseded pass stops yielding, silently.

use std::cell::Cell;
use std::fmt::{self, Debug};
use std::rc::Rc;

use crate::context::{Context, ErrorReporter, LogReporter};
use crate::error::PaletteError;
use crate::matcher::{FuzzyMatcher, NucleoMatcher};
use crate::provider::{
    discovery_hit, is_empty_query, search_hit, CommandSource, CommandsProvider, DiscoveryHit, Hit,
};

/// Builds a fresh matcher for each search pass
pub type MatcherFactory = Rc<dyn Fn() -> Box<dyn FuzzyMatcher>>;

/// Identifies a pass and tells whether it is still the latest one
#[derive(Debug, Clone)]
pub struct PassToken {
    latest: Rc<Cell<u64>>,
    id: u64,
}

impl PassToken {
    pub fn is_current(&self) -> bool {
        self.latest.get() == self.id
    }
}

/// Turns one provider source into a hit for a particular kind of pass
pub trait PassKind<M> {
    type Hit;

    fn hit(
        &mut self,
        ctx: &Context<M>,
        source: CommandSource<M>,
    ) -> Result<Option<Self::Hit>, PaletteError>;
}

/// Unfiltered listing
#[derive(Debug, Clone, Copy, Default)]
pub struct Discovering;

impl<M> PassKind<M> for Discovering {
    type Hit = DiscoveryHit<M>;

    fn hit(
        &mut self,
        ctx: &Context<M>,
        source: CommandSource<M>,
    ) -> Result<Option<Self::Hit>, PaletteError> {
        discovery_hit(ctx, source)
    }
}

/// Query-filtered listing
pub struct Searching {
    query: String,
    matcher: Box<dyn FuzzyMatcher>,
}

impl Debug for Searching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searching")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl<M> PassKind<M> for Searching {
    type Hit = Hit<M>;

    fn hit(
        &mut self,
        ctx: &Context<M>,
        source: CommandSource<M>,
    ) -> Result<Option<Self::Hit>, PaletteError> {
        search_hit(ctx, &self.query, source, self.matcher.as_mut())
    }
}

/// A lazy run over all providers
///
/// Each provider's `commands()` is only called when the pass reaches it. The
/// first error from a provider ends that provider's part of the pass; it is
/// handed to the error reporter and the pass moves on to the next provider.
pub struct Pass<M, K> {
    token: PassToken,
    context: Option<Context<M>>,
    providers: std::vec::IntoIter<Rc<dyn CommandsProvider<M>>>,
    current: Option<(Rc<dyn CommandsProvider<M>>, std::vec::IntoIter<CommandSource<M>>)>,
    kind: K,
    reporter: Rc<dyn ErrorReporter>,
}

/// Discovery across all providers
pub type DiscoveryPass<M> = Pass<M, Discovering>;

/// Search across all providers
pub type SearchPass<M> = Pass<M, Searching>;

impl<M, K> Pass<M, K> {
    pub fn token(&self) -> &PassToken {
        &self.token
    }

    fn abandon(&mut self) {
        if self.current.is_some() || !self.providers.as_slice().is_empty() {
            log::debug!("Pass {} superseded, discarding remaining results", self.token.id);
        }
        self.current = None;
        self.providers = Vec::new().into_iter();
    }
}

impl<M, K: PassKind<M>> Iterator for Pass<M, K> {
    type Item = K::Hit;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.token.is_current() {
                self.abandon();
                return None;
            }

            if let Some((provider, sources)) = &mut self.current {
                let Some(source) = sources.next() else {
                    self.current = None;
                    continue;
                };
                // A context is always present while a provider is current
                let Some(ctx) = &self.context else {
                    self.current = None;
                    continue;
                };
                match self.kind.hit(ctx, source) {
                    Ok(Some(hit)) => return Some(hit),
                    Ok(None) => continue,
                    Err(e) => {
                        log::warn!("Skipping the rest of provider {}", provider.name());
                        self.reporter.report(provider.name(), &e);
                        self.current = None;
                        continue;
                    }
                }
            }

            let provider = self.providers.next()?;
            match &self.context {
                Some(ctx) => {
                    let sources = provider.commands(ctx).into_iter();
                    self.current = Some((provider, sources));
                }
                None => {
                    log::warn!("No context attached, skipping provider {}", provider.name());
                    let error = PaletteError::NoContext {
                        provider: provider.name().to_string(),
                    };
                    self.reporter.report(provider.name(), &error);
                }
            }
        }
    }
}

impl<M> SearchPass<M> {
    /// Collect the remaining hits, best score first
    ///
    /// Ties keep provider registration order, then the order each provider
    /// yielded them.
    pub fn ranked(self) -> Vec<Hit<M>> {
        let mut hits: Vec<_> = self.collect();
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits
    }
}

/// Registry of command providers
///
/// Providers are asked in the order they were registered. The palette holds
/// the context of the screen it serves; without one every provider fails with
/// [`PaletteError::NoContext`].
pub struct Palette<M> {
    providers: Vec<Rc<dyn CommandsProvider<M>>>,
    context: Option<Context<M>>,
    matcher: MatcherFactory,
    reporter: Rc<dyn ErrorReporter>,
    latest: Rc<Cell<u64>>,
}

impl<M> Palette<M> {
    /// Create a new empty command palette
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            context: None,
            matcher: Rc::new(|| Box::new(NucleoMatcher::new()) as Box<dyn FuzzyMatcher>),
            reporter: Rc::new(LogReporter),
            latest: Rc::new(Cell::new(0)),
        }
    }

    /// Register a command provider
    ///
    /// Providers are called in the order they were registered.
    pub fn register(&mut self, provider: Box<dyn CommandsProvider<M>>) {
        log::debug!("Registered command provider {}", provider.name());
        self.providers.push(Rc::from(provider));
    }

    pub fn with_matcher(mut self, matcher: MatcherFactory) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_reporter(mut self, reporter: Rc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Serve the given screen context from now on
    pub fn attach(&mut self, context: Context<M>) {
        self.context = Some(context);
    }

    pub fn detach(&mut self) {
        self.context = None;
    }

    pub fn context(&self) -> Option<&Context<M>> {
        self.context.as_ref()
    }

    /// Get the number of registered providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// The prompt of the first provider that has one
    pub fn prompt(&self) -> &str {
        self.providers
            .iter()
            .map(|p| p.prompt())
            .find(|prompt| !prompt.is_empty())
            .unwrap_or_default()
    }

    /// Start listing every available command, superseding any running pass
    pub fn discover(&self) -> DiscoveryPass<M> {
        self.begin(Discovering, self.providers.clone())
    }

    /// Start searching for `query`, superseding any running pass
    ///
    /// An empty query matches nothing.
    pub fn search(&self, query: &str) -> SearchPass<M> {
        let providers = if is_empty_query(query) {
            Vec::new()
        } else {
            self.providers.clone()
        };
        let kind = Searching {
            query: query.to_string(),
            matcher: (self.matcher)(),
        };
        self.begin(kind, providers)
    }

    fn begin<K>(&self, kind: K, providers: Vec<Rc<dyn CommandsProvider<M>>>) -> Pass<M, K> {
        let id = self.latest.get() + 1;
        self.latest.set(id);
        log::debug!("Starting palette pass {} over {} providers", id, providers.len());

        Pass {
            token: PassToken {
                latest: Rc::clone(&self.latest),
                id,
            },
            context: self.context.clone(),
            providers: providers.into_iter(),
            current: None,
            kind,
            reporter: Rc::clone(&self.reporter),
        }
    }
}

impl<M> Default for Palette<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Debug for Palette<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette")
            .field("provider_count", &self.providers.len())
            .field("attached", &self.context.is_some())
            .finish()
    }
}
