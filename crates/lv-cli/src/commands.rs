use std::fs;
use std::path::Path as FsPath;

use anyhow::{bail, Context};
use colored::Colorize;
use imbl::Vector;
use lv_store::{HistoryWindow, Snapshot, Store, StoreConfig};
use lv_tree::Node;
use lv_types::{ContentKey, Path};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command, format, ..
    } = cli;
    match command {
        Command::Replay(args) => cmd_replay(args, format),
        Command::Check(args) => cmd_check(args),
        Command::Config(args) => cmd_config(args, format),
    }
}

fn load_config(path: Option<&FsPath>) -> anyhow::Result<StoreConfig> {
    match path {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(StoreConfig::default()),
    }
}

/// Apply every operation in `log` to a fresh store. Blank lines are
/// skipped; the first malformed line aborts the replay.
pub fn replay(config: StoreConfig, log: &str) -> anyhow::Result<Store> {
    let mut store = Store::new(config);
    for (index, line) in log.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(line).with_context(|| format!("line {}: not JSON", index + 1))?;
        store
            .dispatch_json(value)
            .with_context(|| format!("line {}: rejected operation", index + 1))?;
    }
    debug!(transitions = store.transitions(), "replay finished");
    Ok(store)
}

fn parse_path(raw: &str) -> anyhow::Result<Path> {
    if raw.trim_start().starts_with('[') {
        serde_json::from_str(raw).with_context(|| format!("invalid path {raw}"))
    } else {
        Ok(Path::from(raw))
    }
}

/// The node the user asked for, or the whole tree.
fn select<'a>(snapshot: &'a Snapshot, args: &ReplayArgs) -> anyhow::Result<Option<&'a Node>> {
    if let Some(raw) = &args.content {
        let key: ContentKey = raw.parse()?;
        return Ok(snapshot.content(&key));
    }
    match &args.path {
        Some(raw) => Ok(snapshot.get(&parse_path(raw)?)),
        None => Ok(Some(snapshot.root())),
    }
}

/// Rows of page `page` of `list`, plus the window they were cut from.
pub fn paginate(list: &Vector<Node>, size: usize, page: usize) -> (HistoryWindow, Node) {
    let mut window = HistoryWindow::new(size);
    for _ in 0..page {
        window = window.page(true, list.len());
    }
    let visible = window.range(list.len());
    let rows = Node::list(list.iter().skip(visible.start).take(visible.len()).cloned());
    (window, rows)
}

fn cmd_replay(args: ReplayArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let log = fs::read_to_string(&args.log)
        .with_context(|| format!("reading {}", args.log.display()))?;
    let store = replay(config, &log)?;
    let snapshot = store.snapshot();

    let Some(node) = select(snapshot, &args)? else {
        bail!("nothing stored at the requested location");
    };

    let (output, window) = match args.page {
        Some(page) => {
            let Some(list) = node.as_list() else {
                bail!("--page needs a list, found {}", kind_of(node));
            };
            let (window, rows) = paginate(list, store.config().history_window, page);
            (rows, Some((window, list.len())))
        }
        None => (node.clone(), None),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => {
            println!(
                "{} Replayed {} operations",
                "✓".green().bold(),
                store.transitions().to_string().bold()
            );
            if let Some((window, len)) = window {
                let first = window.offset().min(len);
                let last = (window.offset() + window.size()).min(len);
                println!(
                    "  Rows {}-{} of {}  newer: {}  older: {}",
                    first,
                    last,
                    len,
                    yes_no(window.can_page_newer()),
                    yes_no(window.can_page_older(len))
                );
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Decode every line and count the bad ones.
pub fn check(log: &str) -> (usize, Vec<(usize, String)>) {
    let mut valid = 0;
    let mut errors = Vec::new();
    for (index, line) in log.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match lv_store::Operation::from_json_str(line) {
            Ok(_) => valid += 1,
            Err(err) => {
                warn!(line = index + 1, error = %err, "undecodable operation");
                errors.push((index + 1, err.to_string()));
            }
        }
    }
    (valid, errors)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let log = fs::read_to_string(&args.log)
        .with_context(|| format!("reading {}", args.log.display()))?;
    let (valid, errors) = check(&log);
    for (line, err) in &errors {
        println!("  {} line {}: {}", "✗".red(), line.to_string().yellow(), err);
    }
    if errors.is_empty() {
        println!("{} {} operations decode cleanly", "✓".green().bold(), valid);
        Ok(())
    } else {
        bail!("{} of {} operations are invalid", errors.len(), valid + errors.len())
    }
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.path.as_deref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            println!("fetch_batch_size = {}", config.fetch_batch_size.to_string().bold());
            println!("history_window = {}", config.history_window.to_string().bold());
        }
    }
    Ok(())
}

fn kind_of(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Bool(_) => "a boolean",
        Node::Number(_) => "a number",
        Node::String(_) => "a string",
        Node::List(_) => "a list",
        Node::Set(_) => "a set",
        Node::Map(_) => "a mapping",
    }
}

fn yes_no(flag: bool) -> colored::ColoredString {
    if flag {
        "yes".green()
    } else {
        "no".dimmed()
    }
}
