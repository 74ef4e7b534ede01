//! A single named, typed option.

use crate::HELP_FLAG;
use crate::error::{BuildError, ValueError};
use crate::names::{self, Named};
use crate::value::{FlagValue, ValueKind};

/// One option: canonical name, aliases, optional short forms, and a typed value.
///
/// Names and aliases are case-insensitive and stored lower-cased; short
/// forms are single characters compared exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    name: String,
    aliases: Vec<String>,
    short: Option<char>,
    short_aliases: Vec<char>,
    description: String,
    long_description: String,
    default: FlagValue,
    has_default: bool,
    value: FlagValue,
}

impl Flag {
    /// Start building an option whose kind is taken from `default`.
    pub fn builder(name: impl Into<String>, default: impl Into<FlagValue>) -> FlagBuilder {
        FlagBuilder {
            name: name.into(),
            aliases: Vec::new(),
            short: None,
            short_aliases: Vec::new(),
            description: String::new(),
            long_description: String::new(),
            default: default.into(),
            has_default: true,
        }
    }

    /// Start building an option of `kind` with no default.
    ///
    /// Until it is set, such an option holds the zero value of its kind but
    /// is never reported as using a default.
    pub fn builder_of(name: impl Into<String>, kind: ValueKind) -> FlagBuilder {
        FlagBuilder {
            has_default: false,
            ..Self::builder(name, kind.zero())
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn short_aliases(&self) -> &[char] {
        &self.short_aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    /// The declared default, if the option has one.
    pub fn default_value(&self) -> Option<&FlagValue> {
        self.has_default.then_some(&self.default)
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    pub fn value(&self) -> &FlagValue {
        &self.value
    }

    /// Parse `token` according to this option's kind and make it the current value.
    ///
    /// The default is left untouched. On failure the current value is unchanged.
    pub fn set_value(&mut self, token: &str) -> Result<(), ValueError> {
        self.value = FlagValue::parse_as(self.kind(), token)?;
        Ok(())
    }

    /// Assign an already-typed value; its kind must match.
    pub fn set(&mut self, value: FlagValue) -> Result<(), ValueError> {
        if value.kind() != self.kind() {
            return Err(ValueError::KindMismatch {
                expected: self.kind(),
                actual: value.kind(),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Restore the current value to the default, or the zero value of the
    /// kind when there is none.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }

    /// Whether `name` (already normalized) is this option's name or an alias.
    pub(crate) fn has_long(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    pub(crate) fn has_short(&self, c: char) -> bool {
        self.short == Some(c) || self.short_aliases.contains(&c)
    }
}

impl Named for Flag {
    fn canonical(&self) -> &str {
        &self.name
    }

    fn long_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    fn short_forms(&self) -> impl Iterator<Item = char> {
        self.short.into_iter().chain(self.short_aliases.iter().copied())
    }
}

/// Collects option parameters; [`FlagBuilder::build`] validates them.
#[derive(Debug, Clone)]
pub struct FlagBuilder {
    name: String,
    aliases: Vec<String>,
    short: Option<char>,
    short_aliases: Vec<char>,
    description: String,
    long_description: String,
    default: FlagValue,
    has_default: bool,
}

impl FlagBuilder {
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

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn short_alias(mut self, short: char) -> Self {
        self.short_aliases.push(short);
        self
    }

    pub fn short_aliases(mut self, shorts: impl IntoIterator<Item = char>) -> Self {
        self.short_aliases.extend(shorts);
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

    pub fn build(self) -> Result<Flag, BuildError> {
        let (name, aliases) = names::normalize_names(&self.name, &self.aliases)?;
        if name == HELP_FLAG {
            return Err(BuildError::InvalidName {
                name,
                reason: "name is reserved for --help",
            });
        }
        if let Some(alias) = aliases.iter().find(|a| *a == HELP_FLAG) {
            return Err(BuildError::InvalidAlias {
                owner: name.clone(),
                alias: alias.clone(),
                reason: "name is reserved for --help",
            });
        }

        match self.short {
            None => {
                if !self.short_aliases.is_empty() {
                    return Err(BuildError::OrphanShortAlias { option: name });
                }
            }
            Some(short) => {
                let mut seen: Vec<char> = Vec::with_capacity(self.short_aliases.len() + 1);
                for c in std::iter::once(short).chain(self.short_aliases.iter().copied()) {
                    if c == '\0' || c.is_whitespace() {
                        return Err(BuildError::WhitespaceShortForm { option: name });
                    }
                    // `--` always opens a long option
                    if c == '-' {
                        return Err(BuildError::DashShortForm { option: name });
                    }
                    if seen.contains(&c) {
                        return Err(BuildError::DuplicateShortForm {
                            option: name,
                            short: c,
                        });
                    }
                    seen.push(c);
                }
            }
        }

        Ok(Flag {
            name,
            aliases,
            short: self.short,
            short_aliases: self.short_aliases,
            description: self.description,
            long_description: self.long_description,
            value: self.default.clone(),
            default: self.default,
            has_default: self.has_default,
        })
    }
}
