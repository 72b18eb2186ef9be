//! Contextual help built from the bindings and commands of a node hierarchy
//!
//! Help reflects exactly what is reachable from the current focus: the focused
//! node and each of its ancestors contribute their help blurb and a table of
//! their helpful bindings and commands, innermost first.

use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::binding::{all_keys, Binding, HelpfulBinding, NodeBinding};
use crate::command::Command;
use crate::error::{BindingError, PaletteError};
use crate::keys::KeyDisplay;

/// Handle to a node in a [`NodeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A snapshot of one UI node: its help blurb, bindings and commands
#[derive(Debug, Clone, Default)]
pub struct HelpNode {
    name: String,
    help: Option<String>,
    bindings: Vec<NodeBinding>,
    commands: Vec<Arc<dyn Command>>,
}

impl HelpNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Free-text help for the node; de-indented when the help is built
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_binding(mut self, binding: NodeBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Declare a binding that is listed in help
    pub fn with_helpful(self, binding: Binding) -> Self {
        self.with_binding(NodeBinding::Helpful(HelpfulBinding::new(binding)))
    }

    pub fn with_command<C: Command + 'static>(mut self, command: C) -> Self {
        self.commands.push(Arc::new(command));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn bindings(&self) -> &[NodeBinding] {
        &self.bindings
    }

    pub fn commands(&self) -> &[Arc<dyn Command>] {
        &self.commands
    }

    fn helpful_bindings(&self) -> impl Iterator<Item = &HelpfulBinding> {
        self.bindings.iter().filter_map(NodeBinding::as_helpful)
    }
}

/// An explicit node hierarchy with a single root
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<(HelpNode, Option<NodeId>)>,
}

impl NodeTree {
    pub fn new(root: HelpNode) -> Self {
        Self {
            nodes: vec![(root, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add `node` under `parent`
    ///
    /// # Panics
    ///
    /// If `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, node: HelpNode) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "unknown parent node {:?}", parent);
        self.nodes.push((node, Some(parent)));
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&HelpNode> {
        self.nodes.get(id.0).map(|(node, _)| node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|(_, parent)| *parent)
    }

    /// The node itself, then each ancestor up to and including the root
    pub fn ancestors_with_self(&self, id: NodeId) -> impl Iterator<Item = &HelpNode> + '_ {
        std::iter::successors(self.node(id).map(|_| id), move |&id| self.parent(id))
            .filter_map(move |id| self.node(id))
    }
}

/// Application-level help sections, all optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpInfo {
    pub title: Option<String>,
    pub about: Option<String>,
    pub license: Option<String>,
}

/// One row of a node's help table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRow {
    /// Command name; `None` for binding rows
    pub command: Option<String>,
    /// All key alternatives, display form, comma-separated
    pub keys: String,
    pub description: String,
}

/// The bindings and commands of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpTable {
    /// Whether the table has a command column (the node declares commands)
    pub has_commands: bool,
    pub rows: Vec<HelpRow>,
}

impl HelpTable {
    /// Markdown rendering of the table
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.has_commands {
            out.push_str("| Command | Key | Description |\n| - | - | - |\n");
        } else {
            out.push_str("| Key | Description |\n| - | - |\n");
        }
        for row in &self.rows {
            if self.has_commands {
                out.push_str(&format!(
                    "| {} ",
                    escape_cell(row.command.as_deref().unwrap_or_default())
                ));
            }
            out.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&row.keys),
                escape_cell(&row.description)
            ));
        }
        out
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// A block of the contextual help
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpBlock {
    Text(String),
    Table(HelpTable),
}

impl HelpBlock {
    pub fn render(&self) -> String {
        match self {
            HelpBlock::Text(text) => text.clone(),
            HelpBlock::Table(table) => table.render(),
        }
    }
}

/// The composed help document
#[derive(Clone, PartialEq, Eq)]
pub struct HelpDocument {
    pub title: Option<String>,
    /// Context help, innermost node first
    pub blocks: Vec<HelpBlock>,
    pub about: Option<String>,
    pub license: Option<String>,
}

impl HelpDocument {
    /// Markdown rendering of the whole document
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&format!("# {}\n\n", title));
        }
        let context: Vec<String> = self.blocks.iter().map(HelpBlock::render).collect();
        out.push_str(&context.join("\n\n"));
        out.push_str("\n\n");
        if let Some(about) = &self.about {
            out.push_str(&format!("## About\n\n{}\n\n", about));
        }
        if let Some(license) = &self.license {
            out.push_str(&format!("## License\n\n{}\n", license));
        }
        out
    }
}

impl Debug for HelpDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpDocument")
            .field("title", &self.title)
            .field("blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

/// Build the contextual help for the focused node, or for the root when
/// nothing has focus
pub fn build_help(
    tree: &NodeTree,
    focused: Option<NodeId>,
    info: &HelpInfo,
    keys: &dyn KeyDisplay,
) -> Result<HelpDocument, PaletteError> {
    let start = focused.unwrap_or_else(|| tree.root());
    let mut blocks = Vec::new();

    for node in tree.ancestors_with_self(start) {
        if let Some(help) = node.help() {
            let help = clean_text(help);
            if !help.is_empty() {
                blocks.push(HelpBlock::Text(help));
            }
        }
        if let Some(table) = input_help(node, keys)? {
            blocks.push(HelpBlock::Table(table));
        }
    }

    log::debug!("Built help from {} blocks", blocks.len());
    Ok(HelpDocument {
        title: info.title.as_deref().map(clean_text),
        blocks,
        about: info.about.as_deref().map(clean_text),
        license: info.license.as_deref().map(clean_text),
    })
}

/// The help table of one node, if it has anything helpful to list
fn input_help(node: &HelpNode, keys: &dyn KeyDisplay) -> Result<Option<HelpTable>, PaletteError> {
    let mut helpful: Vec<&HelpfulBinding> = node.helpful_bindings().collect();
    let mut commands: Vec<&Arc<dyn Command>> = node.commands().iter().collect();
    if helpful.is_empty() && commands.is_empty() {
        return Ok(None);
    }

    helpful.sort_by(|a, b| a.most_helpful_description().cmp(b.most_helpful_description()));
    commands.sort_by(|a, b| a.name().cmp(b.name()));

    let mut rows = Vec::with_capacity(helpful.len() + commands.len());
    for binding in helpful {
        rows.push(HelpRow {
            command: None,
            keys: all_keys(binding.binding(), keys).join(", "),
            description: binding.most_helpful_description().to_string(),
        });
    }
    for command in commands {
        let command_keys = if command.has_binding() {
            all_keys(&command.binding()?, keys).join(", ")
        } else {
            String::new()
        };
        rows.push(HelpRow {
            command: Some(command.name().to_string()),
            keys: command_keys,
            description: command.description().to_string(),
        });
    }

    Ok(Some(HelpTable {
        has_commands: !node.commands().is_empty(),
        rows,
    }))
}

/// Bindings to show in the footer for the focused node
///
/// Walks from the focus to the root; the innermost binding for an action wins.
pub fn footer_bindings(tree: &NodeTree, focused: Option<NodeId>) -> Result<Vec<Binding>, PaletteError> {
    let start = focused.unwrap_or_else(|| tree.root());
    let mut footer: Vec<Binding> = Vec::new();

    for node in tree.ancestors_with_self(start) {
        let declared = node.bindings().iter().map(|b| Ok(b.binding().clone()));
        let from_commands = node
            .commands()
            .iter()
            .filter(|c| c.has_binding())
            .map(|c| c.binding());

        for binding in declared.chain(from_commands) {
            let binding = binding?;
            if binding.show() && !footer.iter().any(|b| b.action() == binding.action()) {
                footer.push(binding);
            }
        }
    }

    Ok(footer)
}

/// Binding that closes the help screen
pub fn help_close_binding() -> Result<Binding, BindingError> {
    Ok(Binding::new("escape, f1", "close", "Close")?.with_show(false))
}

/// Tidy a block of help text
///
/// Leading whitespace of the first line is dropped, the common indentation of
/// the remaining lines is removed and blank lines at either end are trimmed.
pub fn clean_text(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    cleaned.push(first.trim_start());
    for line in rest {
        let leading = (line.len() - line.trim_start().len()).min(indent);
        cleaned.push(line.get(leading..).unwrap_or_else(|| line.trim_start()));
    }

    while cleaned.first().is_some_and(|line| line.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }

    cleaned
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Help, Quit};
    use crate::keys::DefaultKeyDisplay;
    use indoc::indoc;

    fn binding(key: &str, action: &str, description: &str) -> Binding {
        Binding::new(key, action, description).unwrap()
    }

    #[test]
    fn test_clean_text() {
        let text = "  First line\n        second\n          indented\n\n";
        assert_eq!(clean_text(text), "First line\nsecond\n  indented");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\n\n   \n"), "");
    }

    #[test]
    fn test_clean_text_indoc_blurb() {
        let blurb = indoc! {"

            ## Main screen

            Use the arrow keys to move around.
        "};
        assert_eq!(
            clean_text(blurb),
            "## Main screen\n\nUse the arrow keys to move around."
        );
    }

    #[test]
    fn test_ancestors_innermost_first() {
        let mut tree = NodeTree::new(HelpNode::new("app"));
        let screen = tree.add_child(tree.root(), HelpNode::new("screen"));
        let list = tree.add_child(screen, HelpNode::new("list"));

        let names: Vec<_> = tree.ancestors_with_self(list).map(HelpNode::name).collect();
        assert_eq!(names, vec!["list", "screen", "app"]);
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_help_ordering_inner_table_then_outer_blurb_then_outer_table() {
        let mut tree = NodeTree::new(
            HelpNode::new("B")
                .with_help("B help")
                .with_helpful(binding("y", "y", "does Y")),
        );
        let a = tree.add_child(
            tree.root(),
            HelpNode::new("A").with_helpful(binding("x", "x", "does X")),
        );

        let doc = build_help(&tree, Some(a), &HelpInfo::default(), &DefaultKeyDisplay).unwrap();
        let rendered = doc.render();

        let a_table = rendered.find("does X").unwrap();
        let b_blurb = rendered.find("B help").unwrap();
        let b_table = rendered.find("does Y").unwrap();
        assert!(a_table < b_blurb);
        assert!(b_blurb < b_table);
    }

    #[test]
    fn test_without_focus_starts_at_root() {
        let mut tree = NodeTree::new(HelpNode::new("root").with_help("Root help"));
        tree.add_child(tree.root(), HelpNode::new("child").with_help("Child help"));

        let doc = build_help(&tree, None, &HelpInfo::default(), &DefaultKeyDisplay).unwrap();
        assert_eq!(doc.blocks, vec![HelpBlock::Text("Root help".into())]);
    }

    #[test]
    fn test_machine_bindings_are_not_listed() {
        let tree = NodeTree::new(
            HelpNode::new("root").with_binding(NodeBinding::Machine(binding("z", "z", "does Z"))),
        );
        let doc = build_help(&tree, None, &HelpInfo::default(), &DefaultKeyDisplay).unwrap();
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn test_rows_sorted() {
        let tree = NodeTree::new(
            HelpNode::new("root")
                .with_helpful(binding("b", "b", "Zoom"))
                .with_helpful(binding("a", "a", "Archive"))
                .with_command(Quit)
                .with_command(Help),
        );
        let doc = build_help(&tree, None, &HelpInfo::default(), &DefaultKeyDisplay).unwrap();
        let HelpBlock::Table(table) = &doc.blocks[0] else {
            panic!("expected a table");
        };

        let descriptions: Vec<_> = table.rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Archive",
                "Zoom",
                "Show help for and information about the application",
                "Quit the application",
            ]
        );
        assert_eq!(table.rows[2].command.as_deref(), Some("Help"));
        assert_eq!(table.rows[2].keys, "F1, ?");
        assert_eq!(table.rows[3].keys, "F10, ^q");
    }

    #[test]
    fn test_table_markdown() {
        let bindings_only = HelpTable {
            has_commands: false,
            rows: vec![HelpRow {
                command: None,
                keys: "x".into(),
                description: "does X".into(),
            }],
        };
        assert_eq!(
            bindings_only.render(),
            "| Key | Description |\n| - | - |\n| x | does X |\n"
        );

        let with_commands = HelpTable {
            has_commands: true,
            rows: vec![
                HelpRow {
                    command: None,
                    keys: "x".into(),
                    description: "does X".into(),
                },
                HelpRow {
                    command: Some("Quit".into()),
                    keys: "F10, ^q".into(),
                    description: "Quit the application".into(),
                },
            ],
        };
        assert_eq!(
            with_commands.render(),
            indoc! {"
                | Command | Key | Description |
                | - | - | - |
                |  | x | does X |
                | Quit | F10, ^q | Quit the application |
            "}
        );
    }

    #[test]
    fn test_pipe_is_escaped() {
        let table = HelpTable {
            has_commands: false,
            rows: vec![HelpRow {
                command: None,
                keys: "|".into(),
                description: "Split".into(),
            }],
        };
        assert!(table.render().contains("| \\| | Split |"));
    }

    #[test]
    fn test_document_sections() {
        let tree = NodeTree::new(HelpNode::new("root").with_help("Context"));
        let info = HelpInfo {
            title: Some("Demo".into()),
            about: Some("\n    A demo.\n".into()),
            license: Some("MIT".into()),
        };
        let doc = build_help(&tree, None, &info, &DefaultKeyDisplay).unwrap();
        assert_eq!(
            doc.render(),
            "# Demo\n\nContext\n\n## About\n\nA demo.\n\n## License\n\nMIT\n"
        );
    }

    #[test]
    fn test_footer_bindings_innermost_wins() {
        let mut tree = NodeTree::new(
            HelpNode::new("app")
                .with_command(Quit)
                .with_binding(NodeBinding::Machine(binding("r", "refresh", "Refresh"))),
        );
        let list = tree.add_child(
            tree.root(),
            HelpNode::new("list")
                .with_helpful(binding("f5", "refresh", "Reload"))
                .with_helpful(binding("h", "hidden", "Hidden").with_show(false)),
        );

        let footer = footer_bindings(&tree, Some(list)).unwrap();
        let keys: Vec<_> = footer.iter().map(|b| (b.key(), b.description())).collect();
        assert_eq!(keys, vec![("f5", "Reload"), ("f10, ctrl+q", "Quit")]);
    }

    #[test]
    fn test_help_close_binding() {
        let close = help_close_binding().unwrap();
        assert_eq!(close.keys().collect::<Vec<_>>(), vec!["escape", "f1"]);
    }
}
