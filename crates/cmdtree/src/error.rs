use thiserror::Error;

use crate::value::ValueKind;

/// Rejections raised while building flags, commands and trees.
///
/// These describe a broken static definition rather than bad user input, so
/// they are reported at the moment the offending piece is added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid alias '{alias}' for '{owner}': {reason}")]
    InvalidAlias {
        owner: String,
        alias: String,
        reason: &'static str,
    },

    #[error("'{owner}' lists '{name}' more than once among its name and aliases")]
    DuplicateNameOrAlias { owner: String, name: String },

    #[error("option '{option}' has short aliases but no short name")]
    OrphanShortAlias { option: String },

    #[error("option '{option}' has a whitespace or empty short form")]
    WhitespaceShortForm { option: String },

    #[error("option '{option}' uses '-' as a short form, which always reads as a long option")]
    DashShortForm { option: String },

    #[error("option '{option}' lists the short form -{short} more than once")]
    DuplicateShortForm { option: String, short: char },

    #[error("option '{option}' reuses {form}, already taken by option '{existing}'")]
    DuplicateOption {
        option: String,
        existing: String,
        form: String,
    },

    #[error("command '{command}' reuses '{name}', already taken by sibling '{existing}'")]
    DuplicateCommand {
        command: String,
        name: String,
        existing: String,
    },

    #[error("option '{option}' collides on {form} with inherited option '{existing}'")]
    OptionCollision {
        option: String,
        existing: String,
        form: String,
    },

    #[error("command id {0} does not belong to this tree")]
    UnknownCommandId(usize),

    #[error("in command '{command}': {source}")]
    InCommand {
        command: String,
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Attach the name of the command being built, unless already attached.
    pub fn in_command(self, command: &str) -> Self {
        match self {
            Self::InCommand { .. } => self,
            other => Self::InCommand {
                command: command.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, with command context stripped.
    pub fn root_cause(&self) -> &BuildError {
        match self {
            Self::InCommand { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failures converting or reading a typed option value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("'{value}' is not a valid {kind}")]
    InvalidIntegerValue { value: String, kind: ValueKind },

    #[error("'{value}' is not a valid bool (expected true/false/t/f/1/0)")]
    InvalidBooleanValue { value: String },

    #[error("value is {actual}, not {expected}")]
    KindMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
}

/// Failures caused by the runtime token vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("argument {index} is empty")]
    EmptyToken { index: usize },

    #[error("option '{token}' requires a value")]
    MissingOptionValue { option: String, token: String },

    #[error("unknown option '{token}'")]
    UnknownOption { option: String, token: String },

    #[error("invalid value for option '{option}': {source}")]
    InvalidOptionValue {
        option: String,
        #[source]
        source: ValueError,
    },
}
