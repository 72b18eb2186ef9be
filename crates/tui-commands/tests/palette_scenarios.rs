use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use ratatui::style::{Color, Style};
use ratatui::text::Line;
use tui_commands::{
    action_name, maybe, Command, CommandSource, CommandsProvider, Context, DeclaredCommand,
    DefaultKeyDisplay, Dispatch, ErrorReporter, FuzzyMatch, FuzzyMatcher, Help, KeyDisplay,
    MessageBus, Palette, PaletteError, PermissionOracle, Quit,
};

#[derive(Debug, Clone, PartialEq)]
enum AppMessage {
    NewTab,
}

#[derive(Default)]
struct RecordingBus(RefCell<Vec<String>>);

impl MessageBus<AppMessage> for RecordingBus {
    fn post(&self, message: Dispatch<AppMessage>) {
        let entry = match message {
            Dispatch::Command(command) => command.action_name(),
            Dispatch::Message(message) => format!("{:?}", message),
        };
        self.0.borrow_mut().push(entry);
    }
}

/// Permission oracle backed by a mutable set of allowed actions
#[derive(Default)]
struct Permissions(RefCell<HashSet<String>>);

impl Permissions {
    fn allow(&self, action: &str) {
        self.0.borrow_mut().insert(action.to_string());
    }

    fn deny(&self, action: &str) {
        self.0.borrow_mut().remove(action);
    }
}

impl PermissionOracle for Permissions {
    fn can_perform(&self, action: &str) -> bool {
        self.0.borrow().contains(action)
    }
}

#[derive(Default)]
struct Reports(RefCell<Vec<PaletteError>>);

impl ErrorReporter for Reports {
    fn report(&self, _provider: &str, error: &PaletteError) {
        self.0.borrow_mut().push(error.clone());
    }
}

/// Resolver that makes the display form easy to spot
struct Angled;

impl KeyDisplay for Angled {
    fn key_display(&self, key: &str) -> String {
        format!("<{}>", key)
    }
}

#[derive(Debug, Default)]
struct CloseTab;

impl Command for CloseTab {
    fn name(&self) -> &str {
        "Close Tab"
    }

    fn description(&self) -> &str {
        "Close the current tab"
    }

    fn binding_key(&self) -> Option<&str> {
        Some("ctrl+w")
    }
}

/// Provider declaring its commands statically, filtered by `maybe`
#[derive(Debug)]
struct TabCommands;

impl CommandsProvider<AppMessage> for TabCommands {
    fn commands(&self, ctx: &Context<AppMessage>) -> Vec<CommandSource<AppMessage>> {
        [
            maybe::<Help, _>(ctx),
            maybe::<CloseTab, _>(ctx),
            Some(CommandSource::hit("New Tab", "Open a new tab", AppMessage::NewTab)),
            maybe::<Quit, _>(ctx),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn name(&self) -> &str {
        "TabCommands"
    }
}

fn text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

fn setup() -> (Palette<AppMessage>, Rc<Permissions>, Rc<RecordingBus>) {
    let permissions = Rc::new(Permissions::default());
    for action in ["help", "quit", "close_tab"] {
        permissions.allow(action);
    }
    let bus = Rc::new(RecordingBus::default());

    let mut palette = Palette::new();
    palette.register(Box::new(TabCommands));
    palette.attach(Context::new(permissions.clone(), bus.clone()));
    (palette, permissions, bus)
}

#[test]
fn test_help_and_quit_scenario() {
    let (palette, _, _) = setup();

    let found: Vec<_> = palette.search("qu").map(|hit| text(&hit.label)).collect();
    assert_eq!(found, vec!["Quit [F10]"]);

    let discovered: Vec<_> = palette.discover().map(|hit| text(&hit.label)).collect();
    assert!(discovered.contains(&"Help [F1]".to_string()));
    assert!(discovered.contains(&"Quit [F10]".to_string()));
}

#[test]
fn test_discovery_respects_current_permissions() {
    let (palette, permissions, _) = setup();
    assert_eq!(palette.discover().count(), 4);

    permissions.deny("close_tab");
    let labels: Vec<_> = palette.discover().map(|hit| text(&hit.label)).collect();
    assert!(!labels.iter().any(|label| label.starts_with("Close Tab")));
    assert_eq!(labels.len(), 3);
}

#[test]
fn test_permission_change_does_not_touch_yielded_hits() {
    let (palette, permissions, bus) = setup();
    let hits: Vec<_> = palette.discover().collect();

    permissions.deny("help");
    hits.into_iter().next().unwrap().on_select.select();
    assert_eq!(*bus.0.borrow(), vec!["help"]);
}

#[test]
fn test_search_hits_subset_of_discovery() {
    let (palette, _, _) = setup();
    let discovered: HashSet<String> = palette.discover().map(|hit| text(&hit.label)).collect();

    for query in ["t", "ab", "new", "q", "close", "zzz"] {
        for hit in palette.search(query) {
            assert!(
                discovered.contains(&text(&hit.label)),
                "{:?} found by {:?} but not discovered",
                text(&hit.label),
                query
            );
        }
    }
}

#[test]
fn test_empty_query_yields_no_hits() {
    let (palette, _, _) = setup();
    assert_eq!(palette.search("").count(), 0);
}

#[test]
fn test_selected_hit_is_dispatched() {
    let (palette, _, bus) = setup();
    let hits = palette.search("new tab").ranked();
    assert_eq!(text(&hits[0].label), "New Tab");
    hits.into_iter().next().unwrap().on_select.select();

    let hits = palette.search("close").ranked();
    hits.into_iter().next().unwrap().on_select.select();

    assert_eq!(*bus.0.borrow(), vec!["NewTab", "close_tab"]);
}

#[test]
fn test_binding_hint_uses_key_resolver_and_accent() {
    let permissions = Rc::new(Permissions::default());
    permissions.allow("quit");
    let accent = Style::default().fg(Color::Magenta);

    #[derive(Debug)]
    struct QuitOnly;

    impl CommandsProvider<AppMessage> for QuitOnly {
        fn commands(&self, _ctx: &Context<AppMessage>) -> Vec<CommandSource<AppMessage>> {
            vec![CommandSource::command(
                DeclaredCommand::new("Quit", "Quit the application")
                    .with_binding("ctrl+q")
                    .unwrap(),
            )]
        }

        fn name(&self) -> &str {
            "QuitOnly"
        }
    }

    let mut palette = Palette::new();
    palette.register(Box::new(QuitOnly));
    palette.attach(
        Context::new(permissions, Rc::new(RecordingBus::default()))
            .with_key_display(Rc::new(Angled))
            .with_accent(Some(accent)),
    );

    let hit = palette.discover().next().unwrap();
    assert!(text(&hit.label).ends_with("[<ctrl+q>]"));
    assert_eq!(hit.label.spans.last().unwrap().style, accent);
    assert_eq!(DefaultKeyDisplay.key_display("ctrl+q"), "^q");
}

struct FailingMatcher;

impl FuzzyMatcher for FailingMatcher {
    fn fuzzy_match(&mut self, _query: &str, candidate: &str) -> Result<Option<FuzzyMatch>, PaletteError> {
        if candidate == "Close Tab" {
            return Err(PaletteError::Matcher("index corrupted".into()));
        }
        Ok(Some(FuzzyMatch {
            score: 1,
            indices: Vec::new(),
        }))
    }
}

#[test]
fn test_matcher_failure_is_reported_not_swallowed() {
    let reports = Rc::new(Reports::default());
    let (palette, _, _) = setup();
    let palette = palette
        .with_reporter(reports.clone())
        .with_matcher(Rc::new(|| Box::new(FailingMatcher) as Box<dyn FuzzyMatcher>));

    let labels: Vec<_> = palette.search("anything").map(|hit| text(&hit.label)).collect();
    // Help matched before the failure; the rest of the provider's pass is dropped
    assert_eq!(labels, vec!["Help [F1]"]);
    assert_eq!(
        *reports.0.borrow(),
        vec![PaletteError::Matcher("index corrupted".into())]
    );
}

#[test]
fn test_action_name_idempotent() {
    for name in ["Help", "Quit", "Close Tab", "Open: Recent (2)", "ÄÖÜ", "already_snake"] {
        let once = action_name(name);
        assert_eq!(action_name(&once), once);
    }
}
