//! Command/option tree parsing for command lines.
//!
//! A [`CommandTree`] holds top-level [`Command`]s, each with its own
//! [`FlagSet`] and nested subcommands. [`parse`] walks a flat token vector
//! against the tree and returns either the matched command path with
//! consolidated option values and trailing positional arguments, or a help
//! request for the path matched so far.
//!
//! ```
//! use cmdtree::{Command, CommandTree, Flag, ParseOutcome};
//!
//! let mut tree = CommandTree::new();
//! let root = Command::builder("root")
//!     .flag(Flag::builder("count", 1).short('c').build().unwrap())
//!     .build()
//!     .unwrap();
//! tree.add_command(root).unwrap();
//!
//! let ParseOutcome::Matched(m) = tree.parse(&["root", "-c", "3", "file.txt"]).unwrap() else {
//!     panic!("expected a match");
//! };
//! assert_eq!(m.get::<i32>("count").unwrap(), Some(3));
//! assert_eq!(m.positional(), ["file.txt"]);
//! ```

pub mod command;
pub mod error;
pub mod flag;
pub mod flag_set;
pub mod help;
mod names;
pub mod parser;
pub mod tree;
pub mod value;

pub use command::{Command, CommandBuilder};
pub use error::{BuildError, ParseError, ValueError};
pub use flag::{Flag, FlagBuilder};
pub use flag_set::FlagSet;
pub use parser::{HelpRequest, ParseOutcome, ParsedFlag, ParsedResult, parse};
pub use tree::{CommandId, CommandNode, CommandTree};
pub use value::{FlagType, FlagValue, ValueKind};

/// Long option name reserved for the synthetic help flag.
pub const HELP_FLAG: &str = "help";
