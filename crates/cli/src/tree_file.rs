use anyhow::{Context, Result, bail};
use cmdtree::CommandTree;
use cmdtree_metadata::{DEFAULT_TREE_FILE, TreeDef};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct LoadedTree {
    pub path: PathBuf,
    pub tree: CommandTree,
}

/// Read and validate a tree definition, `cmdtree.json` in the working
/// directory unless `tree_path` is given.
pub fn load_tree(tree_path: Option<&Path>) -> Result<LoadedTree> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match tree_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_TREE_FILE), false),
    };

    if !path.exists() {
        if explicit {
            bail!("tree definition not found: {}", path.display());
        }
        bail!(
            "no {DEFAULT_TREE_FILE} in {} (run `cmdtree init` or pass --tree)",
            cwd.display()
        );
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read tree definition: {}", path.display()))?;
    let def = TreeDef::from_json(&contents)
        .with_context(|| format!("failed to parse tree definition: {}", path.display()))?;
    let tree = def
        .build()
        .with_context(|| format!("invalid tree definition: {}", path.display()))?;
    tracing::debug!(path = %path.display(), commands = tree.len(), "loaded tree definition");

    Ok(LoadedTree { path, tree })
}

pub fn write_default_tree(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_TREE_FILE);
    if dest.exists() && !overwrite {
        bail!(
            "{DEFAULT_TREE_FILE} already exists in {} (use --force to overwrite)",
            dir.display()
        );
    }

    let out = cmdtree_metadata::starter()
        .to_json_pretty()
        .context("failed to serialize tree definition")?;

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
