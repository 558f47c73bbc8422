use agentfs::{
    AsyncTool, Config, CopyFileArgs, CreateDirectoryArgs, CreateDirectoryTool, DirectoryTreeArgs,
    DirectoryTreeTool, FileCopyTool, FileEditorArgs, FileEditorTool, FileReaderTool,
    FileRenameTool, FileWriterTool, ReadFileArgs, ReadmeArgs, ReadmeTool, RenameFileArgs,
    ToolResult, TreeFormat, WriteFileArgs,
};
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let config = Config::load(config_path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;

    let level = match matches.get_count("verbose") {
        0 => config.log_level()?,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    let outcome = match matches.subcommand() {
        Some(("schema", _)) => {
            let definitions = agentfs::definitions();
            println!("{}", serde_json::to_string_pretty(&definitions)?);
            return Ok(());
        }
        Some(("config", _)) => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        Some((name, sub)) => run_tool(name, sub, &config).await?,
        None => anyhow::bail!("No command given"),
    };

    match outcome {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => {
            tracing::debug!("Tool error: {:?}", err);
            println!("{}", err.to_legacy_string());
            std::process::exit(1);
        }
    }
}

fn build_cli() -> Command {
    Command::new("agentfs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("File-system tools for coding agents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("Sets a custom config file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("tree")
                .about("Render a directory tree")
                .arg(Arg::new("root").default_value(".").help("Directory to map"))
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("ascii or json"),
                )
                .arg(
                    Arg::new("all")
                        .short('a')
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Include entries whose name starts with '.'"),
                )
                .arg(
                    Arg::new("no-hidden")
                        .long("no-hidden")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("all")
                        .help("Omit entries whose name starts with '.', whatever the config says"),
                )
                .arg(
                    Arg::new("depth")
                        .short('d')
                        .long("depth")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Maximum depth, the root being level 1"),
                ),
        )
        .subcommand(
            Command::new("readme")
                .about("Print the README of a directory")
                .arg(Arg::new("directory").default_value("."))
                .arg(max_chars_arg()),
        )
        .subcommand(
            Command::new("read")
                .about("Print a file with line numbers")
                .arg(Arg::new("file").required(true))
                .arg(max_chars_arg())
                .arg(
                    Arg::new("plain")
                        .long("plain")
                        .action(ArgAction::SetTrue)
                        .help("Do not prefix lines with their number"),
                ),
        )
        .subcommand(
            Command::new("write")
                .about("Write a file; content is read from stdin when omitted")
                .arg(Arg::new("file").required(true))
                .arg(Arg::new("content"))
                .arg(
                    Arg::new("no-overwrite")
                        .long("no-overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Fail if the file already exists"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Create a file, insert lines or replace a line range")
                .arg(Arg::new("file").required(true))
                .arg(
                    Arg::new("action")
                        .required(true)
                        .value_parser(["new", "insert", "update"]),
                )
                .arg(
                    Arg::new("content")
                        .long("content")
                        .value_name("TEXT")
                        .help("Content to write; read from stdin when omitted"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("LINE")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .value_name("LINE")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true),
                ),
        )
        .subcommand(
            Command::new("copy")
                .about("Copy a file")
                .arg(Arg::new("source").required(true))
                .arg(Arg::new("destination").required(true))
                .arg(
                    Arg::new("no-overwrite")
                        .long("no-overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Fail if the destination already exists"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename or move a file")
                .arg(Arg::new("source").required(true))
                .arg(Arg::new("destination").required(true))
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Replace an existing destination"),
                ),
        )
        .subcommand(
            Command::new("mkdir")
                .about("Create a directory and its parents")
                .arg(Arg::new("directory").required(true)),
        )
        .subcommand(Command::new("schema").about("Print the tool definitions as JSON"))
        .subcommand(Command::new("config").about("Print the effective configuration"))
}

fn max_chars_arg() -> Arg {
    Arg::new("max-chars")
        .short('n')
        .long("max-chars")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Return at most N characters")
}

fn string_arg(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn read_stdin() -> anyhow::Result<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read content from stdin")?;
    Ok(content)
}

fn tree_args(matches: &ArgMatches, config: &Config) -> DirectoryTreeArgs {
    let format = matches
        .get_one::<String>("format")
        .map(|f| TreeFormat::parse_lenient(f))
        .unwrap_or(config.tree.format);
    DirectoryTreeArgs::new(string_arg(matches, "root"))
        .with_format(format)
        .with_hidden(show_hidden(matches, config))
        .with_depth(matches.get_one::<usize>("depth").copied().or(config.tree.max_depth))
}

fn show_hidden(matches: &ArgMatches, config: &Config) -> bool {
    if matches.get_flag("no-hidden") {
        false
    } else {
        matches.get_flag("all") || config.tree.show_hidden
    }
}

fn readme_args(matches: &ArgMatches, config: &Config) -> ReadmeArgs {
    ReadmeArgs::new(string_arg(matches, "directory")).with_max_chars(
        matches
            .get_one::<usize>("max-chars")
            .copied()
            .or(config.readme.max_chars),
    )
}

fn read_args(matches: &ArgMatches, config: &Config) -> ReadFileArgs {
    ReadFileArgs::new(string_arg(matches, "file"))
        .with_max_chars(
            matches
                .get_one::<usize>("max-chars")
                .copied()
                .or(config.reader.max_chars),
        )
        .with_line_numbers(config.reader.inject_line_numbers && !matches.get_flag("plain"))
}

fn edit_args(matches: &ArgMatches, content: Option<String>) -> FileEditorArgs {
    let mut args = FileEditorArgs::new(string_arg(matches, "file"), string_arg(matches, "action"))
        .with_lines(
            matches.get_one::<i64>("start").copied(),
            matches.get_one::<i64>("end").copied(),
        );
    args.content = content;
    args
}

async fn run_tool(
    name: &str,
    matches: &ArgMatches,
    config: &Config,
) -> anyhow::Result<ToolResult<String>> {
    let outcome = match name {
        "tree" => DirectoryTreeTool.run_async(tree_args(matches, config)).await,
        "readme" => {
            ReadmeTool::with_file_name(&config.readme.file_name)
                .run_async(readme_args(matches, config))
                .await
        }
        "read" => FileReaderTool.run_async(read_args(matches, config)).await,
        "write" => {
            let content = match matches.get_one::<String>("content") {
                Some(content) => content.clone(),
                None => read_stdin()?,
            };
            let args = WriteFileArgs::new(string_arg(matches, "file"), content)
                .with_overwrite(!matches.get_flag("no-overwrite"));
            FileWriterTool.run_async(args).await
        }
        "edit" => {
            let content = match matches.get_one::<String>("content") {
                Some(content) => Some(content.clone()),
                None if matches.get_one::<String>("action").map(String::as_str) != Some("new") => {
                    Some(read_stdin()?)
                }
                None => None,
            };
            FileEditorTool.run_async(edit_args(matches, content)).await
        }
        "copy" => {
            let args = CopyFileArgs::new(
                string_arg(matches, "source"),
                string_arg(matches, "destination"),
            )
            .with_overwrite(!matches.get_flag("no-overwrite"));
            FileCopyTool.run_async(args).await
        }
        "rename" => {
            let args = RenameFileArgs::new(
                string_arg(matches, "source"),
                string_arg(matches, "destination"),
            )
            .with_overwrite(matches.get_flag("overwrite"));
            FileRenameTool.run_async(args).await
        }
        "mkdir" => {
            CreateDirectoryTool
                .run_async(CreateDirectoryArgs::new(string_arg(matches, "directory")))
                .await
        }
        other => anyhow::bail!("Unknown command: {}", other),
    };
    Ok(outcome)
}
