//! Command definitions.
//!
//! A [`Command`] can be assembled bottom-up, carrying its own subcommands,
//! before it is placed into a [`CommandTree`](crate::CommandTree).

use crate::error::BuildError;
use crate::flag::Flag;
use crate::flag_set::FlagSet;
use crate::names::{self, Named};

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    long_description: String,
    flags: FlagSet,
    subcommands: Vec<Command>,
}

impl Command {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            long_description: String::new(),
            flags: FlagSet::new(),
            pending_flags: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    /// Whether `token` names this command (case-insensitive, name or alias).
    pub fn matches(&self, token: &str) -> bool {
        let needle = token.trim().to_lowercase();
        self.long_forms().any(|n| n == needle)
    }

    pub fn find_subcommand(&self, token: &str) -> Option<&Command> {
        self.subcommands.iter().find(|c| c.matches(token))
    }

    /// Attach `child` below this command.
    ///
    /// Fails with `DuplicateCommand` if the child's name or an alias is taken
    /// by a sibling, or `OptionCollision` if the options of the child, or of
    /// any of its descendants, overlap with the options above them.
    pub fn add_subcommand(&mut self, child: Command) -> Result<(), BuildError> {
        check_sibling(self.subcommands.iter(), &child)?;
        check_options(&self.flags, &child)?;
        self.subcommands.push(child);
        Ok(())
    }

    /// Chaining form of [`Command::add_subcommand`].
    pub fn with_subcommand(mut self, child: Command) -> Result<Self, BuildError> {
        self.add_subcommand(child)?;
        Ok(self)
    }

    pub(crate) fn take_subcommands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.subcommands)
    }
}

impl Named for Command {
    fn canonical(&self) -> &str {
        &self.name
    }

    fn long_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    fn short_forms(&self) -> impl Iterator<Item = char> {
        std::iter::empty()
    }
}

/// Reject `candidate` if any sibling already answers to one of its names.
pub(crate) fn check_sibling<'a>(
    siblings: impl IntoIterator<Item = &'a Command>,
    candidate: &Command,
) -> Result<(), BuildError> {
    match names::find_collision(siblings, candidate) {
        Some(c) => Err(BuildError::DuplicateCommand {
            command: candidate.name.clone(),
            name: c.form.as_word(),
            existing: c.existing,
        }),
        None => Ok(()),
    }
}

/// Check that `command` and all its descendants merge cleanly on top of
/// the options `inherited` from their ancestors.
pub(crate) fn check_options(inherited: &FlagSet, command: &Command) -> Result<(), BuildError> {
    let merged = inherited
        .merge(&command.flags)
        .map_err(|e| e.in_command(&command.name))?;
    for sub in &command.subcommands {
        check_options(&merged, sub)?;
    }
    Ok(())
}

/// Collects command parameters; [`CommandBuilder::build`] validates them.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    long_description: String,
    flags: FlagSet,
    pending_flags: Vec<Flag>,
    subcommands: Vec<Command>,
}

impl CommandBuilder {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn long_description(mut self, long_description: impl Into<String>) -> Self {
        self.long_description = long_description.into();
        self
    }

    /// Add one option; overlaps are reported by [`CommandBuilder::build`].
    pub fn flag(mut self, flag: Flag) -> Self {
        self.pending_flags.push(flag);
        self
    }

    /// Use an already validated option set.
    pub fn flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    pub fn subcommand(mut self, child: Command) -> Self {
        self.subcommands.push(child);
        self
    }

    pub fn build(self) -> Result<Command, BuildError> {
        let (name, aliases) = names::normalize_names(&self.name, &self.aliases)?;

        let mut flags = self.flags;
        for flag in self.pending_flags {
            flags.add(flag).map_err(|e| e.in_command(&name))?;
        }

        let mut command = Command {
            name,
            aliases,
            description: self.description,
            long_description: self.long_description,
            flags,
            subcommands: Vec::new(),
        };
        for child in self.subcommands {
            command.add_subcommand(child)?;
        }
        Ok(command)
    }
}
