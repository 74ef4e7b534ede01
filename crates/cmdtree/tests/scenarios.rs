use cmdtree::{
    BuildError, Command, CommandTree, Flag, FlagSet, FlagValue, ParseError, ParseOutcome,
    ParsedResult, ValueError,
};

/// `root` (alias `rt`) with `count` (-c, 1) and `verbose` (-v, false), and
/// a `build` subcommand below it.
fn scenario_tree() -> CommandTree {
    let mut tree = CommandTree::new();
    let root = tree
        .add_command(
            Command::builder("root")
                .alias("rt")
                .description("Scenario root")
                .flag(Flag::builder("count", 1).short('c').build().unwrap())
                .flag(Flag::builder("verbose", false).short('v').build().unwrap())
                .build()
                .unwrap(),
        )
        .unwrap();
    tree.add_subcommand(root, Command::builder("build").build().unwrap())
        .unwrap();
    tree
}

fn matched(tree: &CommandTree, tokens: &[&str]) -> ParsedResult {
    match tree.parse(tokens) {
        Ok(ParseOutcome::Matched(result)) => result,
        other => panic!("expected a match for {tokens:?}, got {other:?}"),
    }
}

fn value_of(result: &ParsedResult, name: &str) -> FlagValue {
    result
        .option(name)
        .unwrap_or_else(|| panic!("option {name} missing"))
        .value
        .clone()
}

#[test]
fn scenario_options_from_every_level_are_consolidated() {
    let tree = scenario_tree();
    let result = matched(&tree, &["root", "--count=3", "build", "-v"]);
    assert_eq!(result.command_names(), ["root", "build"]);
    assert_eq!(value_of(&result, "count"), FlagValue::Int(3));
    assert_eq!(value_of(&result, "verbose"), FlagValue::Bool(true));
    assert!(result.positional().is_empty());

    let names: Vec<&str> = result.options().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["count", "verbose"]);
}

#[test]
fn scenario_unmatched_token_starts_positionals() {
    let tree = scenario_tree();
    let result = matched(&tree, &["root", "extra", "args"]);
    assert_eq!(result.command_names(), ["root"]);
    assert_eq!(value_of(&result, "count"), FlagValue::Int(1));
    assert_eq!(value_of(&result, "verbose"), FlagValue::Bool(false));
    assert_eq!(result.positional(), ["extra", "args"]);
}

#[test]
fn scenario_terminator_forces_literals() {
    let tree = scenario_tree();
    let result = matched(&tree, &["root", "--", "-v", "build"]);
    assert_eq!(result.command_names(), ["root"]);
    assert_eq!(result.positional(), ["-v", "build"]);
    assert_eq!(value_of(&result, "verbose"), FlagValue::Bool(false));
}

#[test]
fn scenario_bad_integer_short_circuits() {
    let tree = scenario_tree();
    let err = tree.parse(&["root", "--count=notanumber", "tail"]).unwrap_err();
    match err {
        ParseError::InvalidOptionValue { option, source } => {
            assert_eq!(option, "count");
            assert!(matches!(source, ValueError::InvalidIntegerValue { .. }));
        }
        other => panic!("expected InvalidOptionValue, got {other:?}"),
    }
}

#[test]
fn scenario_unknown_option_is_named() {
    let tree = scenario_tree();
    let err = tree.parse(&["root", "--unknown=5"]).unwrap_err();
    assert!(matches!(err, ParseError::UnknownOption { ref option, .. } if option == "unknown"));
    assert!(err.to_string().contains("unknown"));
}

#[test]
fn untouched_options_keep_their_defaults() {
    let tree = scenario_tree();
    let result = matched(&tree, &["root", "build", "-c", "8"]);
    let verbose = result.option("verbose").unwrap();
    assert!(verbose.is_default());
    assert_eq!(verbose.value, FlagValue::Bool(false));

    // a second parse of the same tree starts from defaults again
    let again = matched(&tree, &["root", "build"]);
    assert_eq!(value_of(&again, "count"), FlagValue::Int(1));
}

#[test]
fn everything_after_the_terminator_is_verbatim() {
    let tree = scenario_tree();
    let tail = ["--count=9", "-v", "build", " spaced ", "", "--"];
    let mut tokens = vec!["root", "build", "--"];
    tokens.extend(tail);
    let result = matched(&tree, &tokens);
    assert_eq!(result.command_names(), ["root", "build"]);
    assert_eq!(result.positional(), tail);
    assert_eq!(value_of(&result, "count"), FlagValue::Int(1));
}

#[test]
fn long_form_round_trip() {
    let mut tree = CommandTree::new();
    tree.add_command(
        Command::builder("cmd")
            .flag(Flag::builder("opt", 0).build().unwrap())
            .build()
            .unwrap(),
    )
    .unwrap();
    let result = matched(&tree, &["cmd", "--opt=5"]);
    assert_eq!(result.get::<i32>("opt").unwrap(), Some(5));
}

#[test]
fn names_ignore_case_but_short_forms_do_not() {
    let mut tree = CommandTree::new();
    tree.add_command(
        Command::builder("cmd")
            .flag(Flag::builder("output", "-").short('o').build().unwrap())
            .build()
            .unwrap(),
    )
    .unwrap();

    let result = matched(&tree, &["CMD", "--OUTPUT", "x.txt"]);
    assert_eq!(result.command_names(), ["cmd"]);
    assert_eq!(result.get::<String>("output").unwrap().as_deref(), Some("x.txt"));

    let err = tree.parse(&["cmd", "-O", "x.txt"]).unwrap_err();
    assert!(matches!(err, ParseError::UnknownOption { ref option, .. } if option == "O"));
}

#[test]
fn collisions_never_overwrite() {
    // option vs option in one set
    let mut set = FlagSet::new();
    set.add(Flag::builder("count", 1).short('c').build().unwrap())
        .unwrap();
    let err = set
        .add(Flag::builder("cache", false).short('c').build().unwrap())
        .unwrap_err();
    assert!(matches!(err, BuildError::DuplicateOption { .. }));
    assert_eq!(set.find_short('c').map(Flag::name), Some("count"));

    // option vs ancestor option
    let mut tree = scenario_tree();
    let root = tree.resolve(&["root"]).unwrap();
    let err = tree
        .add_subcommand(
            root,
            Command::builder("deploy")
                .flag(Flag::builder("vv", 0).alias("VERBOSE").build().unwrap())
                .build()
                .unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err.root_cause(), BuildError::OptionCollision { .. }));

    // command vs sibling
    let err = tree
        .add_subcommand(root, Command::builder("make").alias("Build").build().unwrap())
        .unwrap_err();
    assert!(matches!(err, BuildError::DuplicateCommand { .. }));

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.children(Some(root)).len(), 1);
}

#[test]
fn alias_reaches_the_same_command() {
    let tree = scenario_tree();
    let result = matched(&tree, &["RT", "build", "-c", "2"]);
    assert_eq!(result.command_names(), ["root", "build"]);
    assert_eq!(result.get::<i32>("count").unwrap(), Some(2));
}

#[test]
fn help_reports_the_path_so_far() {
    let tree = scenario_tree();
    let ParseOutcome::Help(help) = tree.parse(&["root", "-c", "2", "build", "--help"]).unwrap()
    else {
        panic!("expected help");
    };
    assert_eq!(help.command_names(), ["root", "build"]);
    let text = help.render(&tree);
    assert!(text.contains("Usage: root build"));
    assert!(text.contains("--count"));
    assert!(text.contains("--verbose"));
}
