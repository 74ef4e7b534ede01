//! The command tree: a flat arena of command nodes linked by index.
//!
//! Each node records its parent's [`CommandId`] (or `None` for a top-level
//! command) so option consolidation can walk upwards without owning
//! back-references. The tree only grows; nodes are never removed.

use crate::command::{self, Command};
use crate::error::{BuildError, ParseError};
use crate::flag_set::FlagSet;
use crate::parser::{self, ParseOutcome};

/// Stable handle to a command stored in a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct CommandNode {
    command: Command,
    parent: Option<CommandId>,
    children: Vec<CommandId>,
}

impl CommandNode {
    pub fn name(&self) -> &str {
        self.command.name()
    }

    pub fn aliases(&self) -> &[String] {
        self.command.aliases()
    }

    pub fn description(&self) -> &str {
        self.command.description()
    }

    pub fn long_description(&self) -> &str {
        self.command.long_description()
    }

    /// Options declared at this level only.
    pub fn flags(&self) -> &FlagSet {
        self.command.flags()
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    pub fn matches(&self, token: &str) -> bool {
        self.command.matches(token)
    }
}

/// Top-level commands and everything beneath them.
///
/// There is no implicit root: top-level commands are matched directly by
/// their own names and aliases.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    top_level: Vec<CommandId>,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands at all levels.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: CommandId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    pub fn top_level(&self) -> &[CommandId] {
        &self.top_level
    }

    /// Children of `parent`, or the top-level commands for `None`.
    pub fn children(&self, parent: Option<CommandId>) -> &[CommandId] {
        match parent {
            None => &self.top_level,
            Some(id) => self.get(id).map(CommandNode::children).unwrap_or(&[]),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CommandId, &CommandNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (CommandId(i), n))
    }

    /// Case-insensitive lookup of a child of `parent` by name or alias.
    pub fn find_child(&self, parent: Option<CommandId>, token: &str) -> Option<CommandId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|n| n.matches(token)))
    }

    /// Follow a sequence of command names/aliases from the top level.
    ///
    /// An empty sequence resolves to `None`, as does any unknown step.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Option<CommandId> {
        let mut cursor = None;
        for name in names {
            cursor = Some(self.find_child(cursor, name.as_ref())?);
        }
        cursor
    }

    /// Ids from the top-level command down to `id`, inclusive.
    pub fn path(&self, id: CommandId) -> Vec<CommandId> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.get(current) else {
                break;
            };
            path.push(current);
            cursor = node.parent;
        }
        path.reverse();
        path
    }

    /// Canonical names along `path`.
    pub fn names(&self, path: &[CommandId]) -> Vec<String> {
        path.iter()
            .filter_map(|id| self.get(*id))
            .map(|n| n.name().to_string())
            .collect()
    }

    /// All options visible at `id`: its own plus every ancestor's,
    /// ancestors first.
    pub fn consolidated_flags(&self, id: CommandId) -> FlagSet {
        let mut flags = FlagSet::new();
        for step in self.path(id) {
            if let Some(node) = self.get(step) {
                flags.absorb(node.flags());
            }
        }
        flags
    }

    /// Add a top-level command (with any subcommands it carries).
    pub fn add_command(&mut self, command: Command) -> Result<CommandId, BuildError> {
        let siblings = self.top_level.iter().filter_map(|id| self.get(*id));
        command::check_sibling(siblings.map(|n| &n.command), &command)?;
        command::check_options(&FlagSet::new(), &command)?;
        Ok(self.insert(None, command))
    }

    /// Add `command` (with any subcommands it carries) below `parent`.
    pub fn add_subcommand(
        &mut self,
        parent: CommandId,
        command: Command,
    ) -> Result<CommandId, BuildError> {
        let parent_node = self
            .get(parent)
            .ok_or(BuildError::UnknownCommandId(parent.0))?;
        let siblings = parent_node.children.iter().filter_map(|id| self.get(*id));
        command::check_sibling(siblings.map(|n| &n.command), &command)?;
        command::check_options(&self.consolidated_flags(parent), &command)?;
        Ok(self.insert(Some(parent), command))
    }

    fn insert(&mut self, parent: Option<CommandId>, mut command: Command) -> CommandId {
        let subcommands = command.take_subcommands();
        let id = CommandId(self.nodes.len());
        tracing::trace!(command = command.name(), id = id.0, "adding command");
        self.nodes.push(CommandNode {
            command,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.top_level.push(id),
        }
        for sub in subcommands {
            self.insert(Some(id), sub);
        }
        id
    }

    /// Parse `tokens` against this tree. See [`parser::parse`].
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParseOutcome, ParseError> {
        parser::parse(self, tokens)
    }
}
