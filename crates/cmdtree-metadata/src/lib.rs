//! Declarative command tree definitions.
//!
//! A tree definition is a JSON document describing commands, their options
//! and their subcommands. It is deliberately a plain data model: nothing
//! here is validated until [`TreeDef::build`] hands it to `cmdtree`, which
//! applies the same rules as programmatic construction.

use cmdtree::{BuildError, Command, CommandTree, Flag, FlagValue, ValueKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version written to, and required in, `format-version`.
pub const FORMAT_VERSION: u32 = 1;

/// File name looked up in the working directory when none is given.
pub const DEFAULT_TREE_FILE: &str = "cmdtree.json";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unsupported format-version {found} (expected {FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },

    #[error("invalid tree definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("option '{option}': short form '{value}' must be exactly one character")]
    InvalidShort { option: String, value: String },

    #[error("option '{option}': default {value} is not a valid {kind}")]
    InvalidDefault {
        option: String,
        kind: ValueKind,
        value: String,
    },

    #[error("option '{option}': cannot infer a kind from default {value}; set `kind`")]
    UntypedDefault { option: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TreeDef {
    pub format_version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long_description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub short_aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long_description: String,
    /// Value kind; inferred from `default` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl TreeDef {
    pub fn new(commands: Vec<CommandDef>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            commands,
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, MetadataError> {
        let def: TreeDef = serde_json::from_str(contents)?;
        if def.format_version != FORMAT_VERSION {
            return Err(MetadataError::UnsupportedVersion {
                found: def.format_version,
            });
        }
        Ok(def)
    }

    pub fn to_json_pretty(&self) -> Result<String, MetadataError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Validate the definition and turn it into a [`CommandTree`].
    pub fn build(&self) -> Result<CommandTree, MetadataError> {
        let mut tree = CommandTree::new();
        for def in &self.commands {
            tracing::debug!(command = %def.name, "building command from definition");
            tree.add_command(def.to_command()?)?;
        }
        Ok(tree)
    }
}

impl CommandDef {
    /// Build this command and its subcommands bottom-up.
    pub fn to_command(&self) -> Result<Command, MetadataError> {
        let mut builder = Command::builder(&self.name)
            .aliases(self.aliases.iter().cloned())
            .description(&self.description)
            .long_description(&self.long_description);
        for option in &self.options {
            let flag = option
                .to_flag()
                .map_err(|e| in_command(e, &self.name))?;
            builder = builder.flag(flag);
        }
        for sub in &self.subcommands {
            builder = builder.subcommand(sub.to_command()?);
        }
        Ok(builder.build()?)
    }
}

fn in_command(err: MetadataError, command: &str) -> MetadataError {
    match err {
        MetadataError::Build(e) => MetadataError::Build(e.in_command(command)),
        other => other,
    }
}

impl OptionDef {
    pub fn to_flag(&self) -> Result<Flag, MetadataError> {
        let builder = match (self.default_value()?, self.kind) {
            (Some(default), _) => Flag::builder(&self.name, default),
            (None, Some(kind)) => Flag::builder_of(&self.name, kind),
            (None, None) => return Err(self.untyped("null")),
        };
        let mut builder = builder
            .aliases(self.aliases.iter().cloned())
            .description(&self.description)
            .long_description(&self.long_description);
        if let Some(short) = &self.short {
            builder = builder.short(self.single_char(short)?);
        }
        for alias in &self.short_aliases {
            builder = builder.short_alias(self.single_char(alias)?);
        }
        Ok(builder.build()?)
    }

    fn single_char(&self, value: &str) -> Result<char, MetadataError> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(MetadataError::InvalidShort {
                option: self.name.clone(),
                value: value.to_string(),
            }),
        }
    }

    fn untyped(&self, value: impl Into<String>) -> MetadataError {
        MetadataError::UntypedDefault {
            option: self.name.clone(),
            value: value.into(),
        }
    }

    /// The typed default: `default` checked against `kind`, or inferred.
    ///
    /// `Ok(None)` when `default` is absent or null and `kind` is set: the
    /// option then has no default.
    pub fn default_value(&self) -> Result<Option<FlagValue>, MetadataError> {
        use serde_json::Value;

        let invalid = |kind: ValueKind, value: &Value| MetadataError::InvalidDefault {
            option: self.name.clone(),
            kind,
            value: value.to_string(),
        };

        let default = match &self.default {
            None | Some(Value::Null) => {
                return match self.kind {
                    Some(_) => Ok(None),
                    None => Err(self.untyped("null")),
                };
            }
            Some(v) => v,
        };

        let value = match (self.kind, default) {
            (None | Some(ValueKind::Bool), Value::Bool(b)) => Ok(FlagValue::Bool(*b)),
            (None, Value::String(s)) => Ok(FlagValue::String(s.clone())),
            (Some(kind), Value::String(s)) => {
                FlagValue::parse_as(kind, s).map_err(|_| invalid(kind, default))
            }
            (None, Value::Number(n)) => match n.as_i64() {
                Some(v) => Ok(i32::try_from(v)
                    .map(FlagValue::Int)
                    .unwrap_or(FlagValue::Int64(v))),
                None => Err(self.untyped(default.to_string())),
            },
            (Some(ValueKind::Int), Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(FlagValue::Int)
                .ok_or_else(|| invalid(ValueKind::Int, default)),
            (Some(ValueKind::Int64), Value::Number(n)) => n
                .as_i64()
                .map(FlagValue::Int64)
                .ok_or_else(|| invalid(ValueKind::Int64, default)),
            (Some(kind), _) => Err(invalid(kind, default)),
            (None, _) => Err(self.untyped(default.to_string())),
        };
        value.map(Some)
    }
}

/// A small definition to start from: `root` (alias `rt`) with `count` and
/// `verbose`, and a `build` subcommand.
pub fn starter() -> TreeDef {
    TreeDef::new(vec![CommandDef {
        name: "root".to_string(),
        aliases: vec!["rt".to_string()],
        description: "Example root command".to_string(),
        options: vec![
            OptionDef {
                name: "count".to_string(),
                short: Some("c".to_string()),
                description: "How many times to run".to_string(),
                default: Some(serde_json::json!(1)),
                ..Default::default()
            },
            OptionDef {
                name: "verbose".to_string(),
                short: Some("v".to_string()),
                description: "Print more detail".to_string(),
                default: Some(serde_json::json!(false)),
                ..Default::default()
            },
        ],
        subcommands: vec![CommandDef {
            name: "build".to_string(),
            description: "Build the project".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }])
}
