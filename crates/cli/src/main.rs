mod tree_file;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cmdtree::{CommandId, CommandTree, ParseOutcome, ParsedResult};
use std::{fs, path::PathBuf, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt};

use crate::tree_file::{load_tree, write_default_tree};

#[derive(Parser)]
#[command(name = "cmdtree")]
#[command(version, about = "Inspect and exercise command tree definitions", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter cmdtree.json
    Init(InitArgs),

    /// Parse a token vector against a tree definition
    Parse(ParseArgs),

    /// Show usage for a command path
    Help(HelpArgs),

    /// Validate a tree definition and print its outline
    Check(CheckArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing cmdtree.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the tree definition (default: ./cmdtree.json)
    #[arg(short, long, value_name = "FILE")]
    tree: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Tokens to parse; put them after `--` so they reach the parser as-is
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct HelpArgs {
    /// Path to the tree definition (default: ./cmdtree.json)
    #[arg(short, long, value_name = "FILE")]
    tree: Option<PathBuf>,

    /// Command names from the top level down
    #[arg(value_name = "PATH")]
    path: Vec<String>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the tree definition (default: ./cmdtree.json)
    #[arg(short, long, value_name = "FILE")]
    tree: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
        Commands::Help(args) => help(args),
        Commands::Check(args) => check(args),
    }
}

fn init(args: InitArgs) -> Result<ExitCode> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;
    let dest = write_default_tree(&dir, args.force)?;

    eprintln!("Created: {}", dest.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {} to describe your commands", dest.display());
    eprintln!("  2. Run: cmdtree check");
    eprintln!("  3. Run: cmdtree parse -- root --count=3 build -v");

    Ok(ExitCode::SUCCESS)
}

fn parse(args: ParseArgs) -> Result<ExitCode> {
    tracing::debug!("executing parse command");

    let loaded = load_tree(args.tree.as_deref())?;
    let outcome = match loaded.tree.parse(args.tokens.as_slice()) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("hint: add --help to the tokens to list the available options");
            return Ok(ExitCode::from(2));
        }
    };

    match outcome {
        ParseOutcome::Help(request) => {
            print!("{}", request.render(&loaded.tree));
        }
        ParseOutcome::Matched(result) if args.json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        ParseOutcome::Matched(result) => print_result(&result),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_result(result: &ParsedResult) {
    if result.command_names().is_empty() {
        println!("commands: (none matched)");
    } else {
        println!("commands: {}", result.command_names().join(" "));
    }

    let width = result
        .options()
        .map(|o| o.name.chars().count())
        .max()
        .unwrap_or(0);
    if result.options().next().is_some() {
        println!("options:");
    }
    for option in result.options() {
        match &option.invoked_as {
            Some(form) => println!("  {:width$}  {}  (set by {form})", option.name, option.value),
            None => println!("  {:width$}  {}", option.name, option.value),
        }
    }

    if !result.positional().is_empty() {
        println!("positional:");
        for arg in result.positional() {
            println!("  {arg}");
        }
    }
}

fn help(args: HelpArgs) -> Result<ExitCode> {
    tracing::debug!("executing help command");

    let loaded = load_tree(args.tree.as_deref())?;
    let path = if args.path.is_empty() {
        Vec::new()
    } else {
        let Some(id) = loaded.tree.resolve(args.path.as_slice()) else {
            bail!("no command at '{}'", args.path.join(" "));
        };
        loaded.tree.path(id)
    };
    print!("{}", cmdtree::help::render(&loaded.tree, &path));
    Ok(ExitCode::SUCCESS)
}

fn check(args: CheckArgs) -> Result<ExitCode> {
    tracing::debug!("executing check command");

    let loaded = load_tree(args.tree.as_deref())?;
    let tree = &loaded.tree;
    let options: usize = tree.iter().map(|(_, node)| node.flags().len()).sum();

    println!("{}", loaded.path.display());
    for id in tree.top_level() {
        print_outline(tree, *id, 1);
    }
    eprintln!("OK: {} command(s), {} option(s)", tree.len(), options);
    Ok(ExitCode::SUCCESS)
}

fn print_outline(tree: &CommandTree, id: CommandId, depth: usize) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let mut line = format!("{}{}", "  ".repeat(depth), node.name());
    if !node.aliases().is_empty() {
        line.push_str(&format!(" ({})", node.aliases().join(", ")));
    }
    let flags: Vec<String> = node.flags().iter().map(|f| format!("--{}", f.name())).collect();
    if !flags.is_empty() {
        line.push_str(&format!(" [{}]", flags.join(" ")));
    }
    println!("{line}");
    for child in node.children() {
        print_outline(tree, *child, depth + 1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
