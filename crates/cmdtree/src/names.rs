//! Name normalization and the collision checker shared by option sets and
//! sibling commands.

use std::collections::HashSet;

use crate::error::BuildError;

/// Trim and lower-case a long name, rejecting forms the token grammar
/// could never reach.
pub(crate) fn normalize(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    // counted before folding: some single runes lower-case to two
    match trimmed.chars().count() {
        0 => return Err("name is blank"),
        1 => return Err("name must be at least two characters"),
        _ => {}
    }
    let name = trimmed.to_lowercase();
    if name.starts_with('-') {
        return Err("name must not start with '-'");
    }
    if name.contains('=') {
        return Err("name must not contain '='");
    }
    if name.chars().any(char::is_whitespace) {
        return Err("name must not contain whitespace");
    }
    Ok(name)
}

/// Normalize a name plus its aliases and require them to be pairwise distinct.
pub(crate) fn normalize_names(
    raw_name: &str,
    raw_aliases: &[String],
) -> Result<(String, Vec<String>), BuildError> {
    let name = normalize(raw_name).map_err(|reason| BuildError::InvalidName {
        name: raw_name.to_string(),
        reason,
    })?;

    let mut aliases = Vec::with_capacity(raw_aliases.len());
    for raw in raw_aliases {
        let alias = normalize(raw).map_err(|reason| BuildError::InvalidAlias {
            owner: name.clone(),
            alias: raw.clone(),
            reason,
        })?;
        aliases.push(alias);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for n in std::iter::once(&name).chain(aliases.iter()) {
        if !seen.insert(n.as_str()) {
            return Err(BuildError::DuplicateNameOrAlias {
                owner: name.clone(),
                name: n.clone(),
            });
        }
    }

    Ok((name, aliases))
}

/// Anything that claims long (and possibly short) forms in a shared namespace.
pub(crate) trait Named {
    fn canonical(&self) -> &str;
    fn long_forms(&self) -> impl Iterator<Item = &str>;
    fn short_forms(&self) -> impl Iterator<Item = char>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Form {
    Long(String),
    Short(char),
}

impl Form {
    /// How the form is written on a command line.
    pub(crate) fn as_option(&self) -> String {
        match self {
            Self::Long(name) => format!("--{name}"),
            Self::Short(c) => format!("-{c}"),
        }
    }

    pub(crate) fn as_word(&self) -> String {
        match self {
            Self::Long(name) => name.clone(),
            Self::Short(c) => c.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Collision {
    pub(crate) form: Form,
    pub(crate) existing: String,
}

/// The first form of `candidate` already claimed by an entry of `existing`.
///
/// Long forms are compared after normalization (so case-insensitively),
/// short forms exactly.
pub(crate) fn find_collision<'a, T, C>(
    existing: impl IntoIterator<Item = &'a T>,
    candidate: &C,
) -> Option<Collision>
where
    T: Named + 'a,
    C: Named,
{
    for other in existing {
        for long in candidate.long_forms() {
            if other.long_forms().any(|l| l == long) {
                return Some(Collision {
                    form: Form::Long(long.to_string()),
                    existing: other.canonical().to_string(),
                });
            }
        }
        for short in candidate.short_forms() {
            if other.short_forms().any(|s| s == short) {
                return Some(Collision {
                    form: Form::Short(short),
                    existing: other.canonical().to_string(),
                });
            }
        }
    }
    None
}
