//! Walks a token vector against a [`CommandTree`].
//!
//! Tokens are consumed left to right with a cursor that starts above the
//! top-level commands:
//! - `--` ends matching; everything after it is positional.
//! - `-` ends matching; it and everything after it is positional.
//! - `--name=value` / `--name value` set a long option.
//! - `-x=value` / `-xvalue` / `-x value` set a short option.
//! - a boolean option given without an inline value is set to `true` and
//!   does not consume the next token.
//! - `--help` short-circuits with the path matched so far.
//! - anything else either descends into a child command or ends matching
//!   and becomes the first positional argument.
//!
//! The tree is never mutated: options are consolidated into a fresh set as
//! the cursor descends and values are assigned there.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::HELP_FLAG;
use crate::error::{ParseError, ValueError};
use crate::flag_set::FlagSet;
use crate::tree::{CommandId, CommandTree};
use crate::value::{FlagType, FlagValue, ValueKind};

/// One consolidated option after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParsedFlag {
    pub name: String,
    /// The form that set the value (`--count`, `-c`, `--cnt`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoked_as: Option<String>,
    pub explicit: bool,
    /// Whether the option declares a default at all.
    pub has_default: bool,
    pub value: FlagValue,
}

impl ParsedFlag {
    /// Not given on the command line, so the declared default is in effect.
    ///
    /// An option without a default that was never given is neither explicit
    /// nor default; its value is the zero value of its kind.
    pub fn is_default(&self) -> bool {
        !self.explicit && self.has_default
    }
}

/// The matched command path, consolidated options and positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParsedResult {
    #[serde(skip)]
    path: Vec<CommandId>,
    commands: Vec<String>,
    options: IndexMap<String, ParsedFlag>,
    positional: Vec<String>,
    #[serde(skip)]
    flags: FlagSet,
}

impl ParsedResult {
    /// Matched commands, top-level first.
    pub fn path(&self) -> &[CommandId] {
        &self.path
    }

    /// The deepest matched command, if any matched at all.
    pub fn command(&self) -> Option<CommandId> {
        self.path.last().copied()
    }

    /// Canonical names of the matched commands.
    pub fn command_names(&self) -> &[String] {
        &self.commands
    }

    pub fn options(&self) -> impl Iterator<Item = &ParsedFlag> {
        self.options.values()
    }

    /// Look up a consolidated option by name or alias (case-insensitive).
    pub fn option(&self, name: &str) -> Option<&ParsedFlag> {
        let flag = self.flags.find(name)?;
        self.options.get(flag.name())
    }

    /// The option's value as `T`; `Ok(None)` if no such option exists.
    pub fn get<T: FlagType>(&self, name: &str) -> Result<Option<T>, ValueError> {
        match self.option(name) {
            Some(parsed) => T::from_value(&parsed.value).map(Some),
            None => Ok(None),
        }
    }

    /// The consolidated option set, with parsed values applied.
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }
}

/// `--help` was given; carries the path matched before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRequest {
    path: Vec<CommandId>,
    commands: Vec<String>,
}

impl HelpRequest {
    pub fn path(&self) -> &[CommandId] {
        &self.path
    }

    pub fn command_names(&self) -> &[String] {
        &self.commands
    }

    /// Render usage text for the requested subtree.
    pub fn render(&self, tree: &CommandTree) -> String {
        crate::help::render(tree, &self.path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Matched(ParsedResult),
    Help(HelpRequest),
}

/// How an option token was written.
enum OptionToken<'t> {
    Long {
        name: &'t str,
        inline: Option<&'t str>,
    },
    Short {
        c: char,
        inline: Option<&'t str>,
    },
}

fn split_option(token: &str) -> OptionToken<'_> {
    if let Some(body) = token.strip_prefix("--") {
        return match body.split_once('=') {
            Some((name, value)) => OptionToken::Long {
                name,
                inline: Some(value),
            },
            None => OptionToken::Long {
                name: body,
                inline: None,
            },
        };
    }

    let body = &token[1..];
    let mut chars = body.chars();
    // callers only pass tokens longer than "-"
    let c = chars.next().unwrap_or('-');
    let rest = chars.as_str();
    let inline = if rest.is_empty() {
        None
    } else {
        Some(rest.strip_prefix('=').unwrap_or(rest))
    };
    OptionToken::Short { c, inline }
}

struct Cursor<'tree> {
    tree: &'tree CommandTree,
    path: Vec<CommandId>,
    flags: FlagSet,
    invoked: HashMap<String, String>,
}

impl<'tree> Cursor<'tree> {
    fn new(tree: &'tree CommandTree) -> Self {
        Self {
            tree,
            path: Vec::new(),
            flags: FlagSet::new(),
            invoked: HashMap::new(),
        }
    }

    fn descend(&mut self, token: &str) -> bool {
        let Some(id) = self.tree.find_child(self.path.last().copied(), token) else {
            return false;
        };
        if let Some(node) = self.tree.get(id) {
            tracing::debug!(command = node.name(), "descending into subcommand");
            self.flags.absorb(node.flags());
        }
        self.path.push(id);
        true
    }

    fn finish(self, positional: Vec<String>) -> ParsedResult {
        let commands = self.tree.names(&self.path);
        let mut invoked = self.invoked;
        let options = self
            .flags
            .iter()
            .map(|flag| {
                let invoked_as = invoked.remove(flag.name());
                let parsed = ParsedFlag {
                    name: flag.name().to_string(),
                    explicit: invoked_as.is_some(),
                    invoked_as,
                    has_default: flag.has_default(),
                    value: flag.value().clone(),
                };
                (flag.name().to_string(), parsed)
            })
            .collect();
        ParsedResult {
            path: self.path,
            commands,
            options,
            positional,
            flags: self.flags,
        }
    }

    fn help(self) -> HelpRequest {
        HelpRequest {
            commands: self.tree.names(&self.path),
            path: self.path,
        }
    }
}

/// Parse `tokens` against `tree`.
///
/// `tokens` should start at the first command candidate (no program name).
/// Returns [`ParseOutcome::Help`] as soon as `--help` is seen. Errors stop
/// the walk immediately; no partial result is produced.
pub fn parse<S: AsRef<str>>(tree: &CommandTree, tokens: &[S]) -> Result<ParseOutcome, ParseError> {
    tracing::debug!(tokens = tokens.len(), "parsing command line");

    let mut cursor = Cursor::new(tree);
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0usize;

    while i < tokens.len() {
        let raw = tokens[i].as_ref();
        let token = raw.trim();

        if token.is_empty() {
            return Err(ParseError::EmptyToken { index: i });
        }

        if token == "--" {
            tracing::trace!(index = i, "end of options marker");
            positional.extend(tokens[i + 1..].iter().map(|t| t.as_ref().to_string()));
            break;
        }

        if token == "-" {
            tracing::trace!(index = i, "lone dash ends matching");
            positional.extend(tokens[i..].iter().map(|t| t.as_ref().to_string()));
            break;
        }

        if !token.starts_with('-') {
            if cursor.descend(token) {
                i += 1;
                continue;
            }
            tracing::trace!(index = i, token, "no subcommand matched; rest is positional");
            positional.extend(tokens[i..].iter().map(|t| t.as_ref().to_string()));
            break;
        }

        let option = split_option(token);
        if let OptionToken::Long { name, .. } = &option {
            if name.trim().to_lowercase() == HELP_FLAG {
                tracing::debug!("help requested");
                return Ok(ParseOutcome::Help(cursor.help()));
            }
        }

        let (written, inline) = match &option {
            OptionToken::Long { name, inline } => (format!("--{name}"), *inline),
            OptionToken::Short { c, inline } => (format!("-{c}"), *inline),
        };
        let found = match &option {
            OptionToken::Long { name, .. } => cursor.flags.find_mut(name),
            OptionToken::Short { c, .. } => cursor.flags.find_short_mut(*c),
        };
        let Some(flag) = found else {
            return Err(ParseError::UnknownOption {
                option: option_label(&option),
                token: written,
            });
        };

        let value = match inline {
            Some(v) => v,
            // a bare boolean is a switch; turning it off needs `--name=false`
            None if flag.kind() == ValueKind::Bool => "true",
            None => {
                i += 1;
                match tokens.get(i) {
                    Some(next) => next.as_ref(),
                    None => {
                        return Err(ParseError::MissingOptionValue {
                            option: flag.name().to_string(),
                            token: written,
                        });
                    }
                }
            }
        };

        flag.set_value(value)
            .map_err(|source| ParseError::InvalidOptionValue {
                option: flag.name().to_string(),
                source,
            })?;
        tracing::trace!(option = flag.name(), value, "assigned option");
        cursor.invoked.insert(flag.name().to_string(), written);
        i += 1;
    }

    let result = cursor.finish(positional);
    tracing::debug!(
        commands = ?result.command_names(),
        positional = result.positional().len(),
        "parsed command line"
    );
    Ok(ParseOutcome::Matched(result))
}

fn option_label(option: &OptionToken<'_>) -> String {
    match option {
        OptionToken::Long { name, .. } => name.to_string(),
        OptionToken::Short { c, .. } => c.to_string(),
    }
}
