//! The options scoped to one command level.

use indexmap::IndexMap;

use crate::error::BuildError;
use crate::flag::Flag;
use crate::names;

/// Options keyed by canonical name, in insertion order.
///
/// No two options share a name, alias, short name or short alias.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagSet {
    flags: IndexMap<String, Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Insert `flag`, rejecting any name/alias/short-form already in the set.
    pub fn add(&mut self, flag: Flag) -> Result<(), BuildError> {
        if let Some(c) = names::find_collision(self.flags.values(), &flag) {
            return Err(BuildError::DuplicateOption {
                option: flag.name().to_string(),
                existing: c.existing,
                form: c.form.as_option(),
            });
        }
        self.flags.insert(flag.name().to_string(), flag);
        Ok(())
    }

    /// Chaining form of [`FlagSet::add`].
    pub fn with(mut self, flag: Flag) -> Result<Self, BuildError> {
        self.add(flag)?;
        Ok(self)
    }

    /// Look up a long form by name, then by alias.
    ///
    /// The token is trimmed and lower-cased first.
    pub fn find(&self, token: &str) -> Option<&Flag> {
        let key = self.resolve_long(token)?;
        self.flags.get(key)
    }

    /// Look up a short form by short name, then by short alias. Exact match.
    pub fn find_short(&self, c: char) -> Option<&Flag> {
        let key = self.resolve_short(c)?;
        self.flags.get(key)
    }

    pub(crate) fn find_mut(&mut self, token: &str) -> Option<&mut Flag> {
        let key = self.resolve_long(token)?.to_string();
        self.flags.get_mut(&key)
    }

    pub(crate) fn find_short_mut(&mut self, c: char) -> Option<&mut Flag> {
        let key = self.resolve_short(c)?.to_string();
        self.flags.get_mut(&key)
    }

    fn resolve_long(&self, token: &str) -> Option<&str> {
        let needle = token.trim().to_lowercase();
        if let Some((key, _)) = self.flags.get_key_value(needle.as_str()) {
            return Some(key.as_str());
        }
        self.flags
            .values()
            .find(|f| f.has_long(&needle))
            .map(Flag::name)
    }

    fn resolve_short(&self, c: char) -> Option<&str> {
        if let Some(f) = self.flags.values().find(|f| f.short() == Some(c)) {
            return Some(f.name());
        }
        self.flags
            .values()
            .find(|f| f.has_short(c))
            .map(Flag::name)
    }

    /// The union of `self` and `other`, ancestors' options first.
    ///
    /// Fails if `other` brings in any form already present in `self`.
    pub fn merge(&self, other: &FlagSet) -> Result<FlagSet, BuildError> {
        let mut merged = self.clone();
        for flag in other.iter() {
            if let Some(c) = names::find_collision(merged.flags.values(), flag) {
                return Err(BuildError::OptionCollision {
                    option: flag.name().to_string(),
                    existing: c.existing,
                    form: c.form.as_option(),
                });
            }
            merged.flags.insert(flag.name().to_string(), flag.clone());
        }
        Ok(merged)
    }

    /// Append `other` without collision checks.
    ///
    /// Only for sets whose disjointness was established by [`FlagSet::merge`]
    /// when the tree was built.
    pub(crate) fn absorb(&mut self, other: &FlagSet) {
        for flag in other.iter() {
            self.flags
                .entry(flag.name().to_string())
                .or_insert_with(|| flag.clone());
        }
    }
}

impl<'a> IntoIterator for &'a FlagSet {
    type Item = &'a Flag;
    type IntoIter = indexmap::map::Values<'a, String, Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FlagValue;

    fn sample() -> FlagSet {
        FlagSet::new()
            .with(
                Flag::builder("count", 1)
                    .alias("num")
                    .short('c')
                    .short_alias('n')
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .with(Flag::builder("verbose", false).short('v').build().unwrap())
            .unwrap()
    }

    #[test]
    fn add_rejects_every_kind_of_overlap() {
        let mut set = sample();

        let err = set.add(Flag::builder("COUNT", 0).build().unwrap()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateOption { ref form, .. } if form == "--count"));

        let err = set.add(Flag::builder("other", 0).alias("num").build().unwrap()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateOption { ref existing, .. } if existing == "count"));

        let err = set.add(Flag::builder("num2", 0).alias("verbose").build().unwrap()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateOption { .. }));

        let err = set.add(Flag::builder("other", 0).short('n').build().unwrap()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateOption { ref form, .. } if form == "-n"));

        let err = set
            .add(Flag::builder("other", 0).short('x').short_alias('v').build().unwrap())
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateOption { .. }));

        assert_eq!(set.len(), 2);
        set.add(Flag::builder("other", 0).short('V').build().unwrap()).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn find_by_every_form() {
        let set = sample();
        assert_eq!(set.find("count").map(Flag::name), Some("count"));
        assert_eq!(set.find(" NUM ").map(Flag::name), Some("count"));
        assert_eq!(set.find_short('c').map(Flag::name), Some("count"));
        assert_eq!(set.find_short('n').map(Flag::name), Some("count"));
        assert!(set.find_short('C').is_none());
        assert!(set.find("cnt").is_none());
        // no prefix matching
        assert!(set.find("verb").is_none());
    }

    #[test]
    fn merge_unions_or_reports_collision() {
        let parent = sample();
        let child = FlagSet::new()
            .with(Flag::builder("output", "-").short('o').build().unwrap())
            .unwrap();
        let merged = parent.merge(&child).unwrap();
        let names: Vec<&str> = merged.iter().map(Flag::name).collect();
        assert_eq!(names, ["count", "verbose", "output"]);

        let clash = FlagSet::new()
            .with(Flag::builder("level", 0).short('v').build().unwrap())
            .unwrap();
        let err = parent.merge(&clash).unwrap_err();
        assert_eq!(
            err,
            BuildError::OptionCollision {
                option: "level".to_string(),
                existing: "verbose".to_string(),
                form: "-v".to_string(),
            }
        );
    }

    #[test]
    fn find_mut_updates_in_place() {
        let mut set = sample();
        set.find_short_mut('n').unwrap().set_value("9").unwrap();
        assert_eq!(set.find("count").unwrap().value(), &FlagValue::Int(9));
        set.find_mut("verbose").unwrap().set_value("t").unwrap();
        assert_eq!(set.find("verbose").unwrap().value(), &FlagValue::Bool(true));
    }
}
