//! Usage text for a matched command path.

use crate::flag::Flag;
use crate::flag_set::FlagSet;
use crate::tree::{CommandId, CommandTree};
use crate::value::{FlagValue, ValueKind};

fn format_flag_left(flag: &Flag) -> String {
    let mut names: Vec<String> = Vec::new();
    names.extend(flag.short().map(|c| format!("-{c}")));
    names.extend(flag.short_aliases().iter().map(|c| format!("-{c}")));
    names.push(format!("--{}", flag.name()));
    names.extend(flag.aliases().iter().map(|a| format!("--{a}")));
    let mut left = names.join(", ");
    if flag.kind() != ValueKind::Bool {
        left.push_str(&format!(" <{}>", flag.kind().as_str().to_ascii_uppercase()));
    }
    left
}

fn format_flag_help(flag: &Flag) -> String {
    let mut out = flag.description().trim().to_string();
    let Some(default) = flag.default_value() else {
        return out;
    };
    if !out.is_empty() {
        out.push(' ');
    }
    match default {
        FlagValue::String(s) if s.is_empty() => out.push_str("[default: \"\"]"),
        default => out.push_str(&format!("[default: {default}]")),
    }
    out
}

fn push_rows(out: &mut String, heading: &str, rows: Vec<(String, String)>) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{heading}:\n"));
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

/// Render help for the command at the end of `path`.
///
/// An empty path describes the top level: just the available commands.
pub fn render(tree: &CommandTree, path: &[CommandId]) -> String {
    let cursor = path.last().copied();
    let node = cursor.and_then(|id| tree.get(id));
    let title = tree.names(path).join(" ");
    let children = tree.children(cursor);

    let mut out = String::new();
    match node {
        Some(node) if !node.description().trim().is_empty() => {
            out.push_str(&format!("{title} - {}\n", node.description().trim()));
        }
        Some(_) => {
            out.push_str(&title);
            out.push('\n');
        }
        None => out.push_str("Available commands\n"),
    }

    let mut usage = if title.is_empty() {
        "<COMMAND>".to_string()
    } else {
        title.clone()
    };
    usage.push_str(" [OPTIONS]");
    if node.is_some() && !children.is_empty() {
        usage.push_str(" [COMMAND]");
    }
    usage.push_str(" [ARGS]...");
    out.push_str(&format!("\nUsage: {usage}\n"));

    if let Some(node) = node {
        if !node.long_description().trim().is_empty() {
            out.push('\n');
            out.push_str(node.long_description().trim_end());
            out.push('\n');
        }
    }

    let flags = cursor
        .map(|id| tree.consolidated_flags(id))
        .unwrap_or_else(FlagSet::new);
    let mut option_rows: Vec<(String, String)> = flags
        .iter()
        .map(|f| (format_flag_left(f), format_flag_help(f)))
        .collect();
    option_rows.push(("--help".to_string(), "Show help information".to_string()));
    push_rows(&mut out, "Options", option_rows);

    let command_rows: Vec<(String, String)> = children
        .iter()
        .filter_map(|id| tree.get(*id))
        .map(|child| {
            let mut left = child.name().to_string();
            for alias in child.aliases() {
                left.push_str(", ");
                left.push_str(alias);
            }
            (left, child.description().trim().to_string())
        })
        .collect();
    push_rows(&mut out, "Commands", command_rows);

    out
}
