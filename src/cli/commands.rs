//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{DumpArtifact, TreeSession};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, InsertArgs, OrderArg, TreeArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{BinarySearchTree, NodeValue, Traversal};
use crate::infrastructure::di::ServiceContainer;

/// Arena size of the reference run.
pub const DEMO_CAPACITY: usize = 32;
/// Values inserted after the first dump of the reference run.
pub const DEMO_VALUES: [NodeValue; 11] = [10, 10, 40, 10, 50, 20, 40, 20, 60, 30, 20];
/// Slot highlighted in the second dump of the reference run.
pub const DEMO_HIGHLIGHT_SLOT: usize = 4;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Insert(args)) => _insert(load_settings(cli)?, args),
        Some(Commands::Traverse { tree, order }) => _traverse(&load_settings(cli)?, tree, *order),
        Some(Commands::Show { tree }) => _show(&load_settings(cli)?, tree),
        Some(Commands::Demo { no_render }) => _demo(load_settings(cli)?, *no_render),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".into(),
        )),
    }
}

/// Layered settings, with `--config` replacing the local layer.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load_file(path)?,
        None => Settings::load(None)?,
    };
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn build_tree(settings: &Settings, args: &TreeArgs) -> CliResult<BinarySearchTree> {
    let capacity = args.capacity.unwrap_or(settings.capacity);
    let mut tree = BinarySearchTree::with_capacity(capacity).map_err(ApplicationError::from)?;
    for &value in &args.values {
        tree.insert(value).map_err(ApplicationError::from)?;
    }
    Ok(tree)
}

fn report(artifact: &DumpArtifact) {
    output::action(
        &format!("dump {}", artifact.index),
        &artifact.dot_path.display(),
    );
}

fn print_inorder(session: &TreeSession) -> CliResult<()> {
    {
        let mut out = io::stdout().lock();
        session.write_traversal(Traversal::InOrder, &mut out)?;
    }
    println!();
    Ok(())
}

#[instrument(skip(settings))]
fn _insert(mut settings: Settings, args: &InsertArgs) -> CliResult<()> {
    if args.dump_every == Some(0) {
        return Err(CliError::InvalidArgs(
            "--dump-every must be at least 1".into(),
        ));
    }
    if args.no_render {
        settings.dump.render = false;
    }
    let capacity = args.tree.capacity.unwrap_or(settings.capacity);
    let container = ServiceContainer::new(settings);
    let mut session = container.session(capacity)?;

    for (inserted, &value) in (1..).zip(&args.tree.values) {
        session.insert(value)?;
        if let Some(every) = args.dump_every {
            if inserted % every == 0 {
                report(&session.dump(None)?);
            }
        }
    }

    let artifact = match (args.highlight, args.highlight_value) {
        (Some(slot), _) => {
            let id = session.tree()?.slot(slot).ok_or_else(|| {
                CliError::InvalidArgs(format!("slot {slot} holds no node"))
            })?;
            session.dump(Some(id))?
        }
        (None, Some(value)) => {
            if session.tree()?.find(value).is_none() {
                output::warning(&format!("{value} is not in the tree, nothing highlighted"));
            }
            session.dump_value(value)?
        }
        (None, None) => session.dump(None)?,
    };
    report(&artifact);

    print_inorder(&session)?;
    session.destroy()?;
    Ok(())
}

#[instrument(skip(settings))]
fn _traverse(settings: &Settings, args: &TreeArgs, order: OrderArg) -> CliResult<()> {
    let tree = build_tree(settings, args)?;
    output::info(&tree.traversal(order.into()));
    Ok(())
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, args: &TreeArgs) -> CliResult<()> {
    let tree = build_tree(settings, args)?;
    output::info(&output::tree_shape(&tree));
    Ok(())
}

/// Reference run: one dump after the first insert, one highlighting slot 4
/// after the rest, then the in-order traversal.
#[instrument(skip(settings))]
fn _demo(mut settings: Settings, no_render: bool) -> CliResult<()> {
    if no_render {
        settings.dump.render = false;
    }
    let container = ServiceContainer::new(settings);
    let mut session = container.session(DEMO_CAPACITY)?;

    session.insert(10)?;
    report(&session.dump(None)?);

    for value in DEMO_VALUES {
        session.insert(value)?;
    }
    let highlight = session.tree()?.slot(DEMO_HIGHLIGHT_SLOT);
    report(&session.dump(highlight)?);

    print_inorder(&session)?;
    session.destroy()?;
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => {
                    output::detail(&format!("global: {}{}", path.display(), marker(&path)))
                }
                None => output::detail(&"global: (no config directory on this platform)"),
            }
            let local = cli
                .config
                .clone()
                .unwrap_or_else(|| local_config_path(Path::new(".")));
            output::detail(&format!("local:  {}{}", local.display(), marker(&local)));
        }
    }
    Ok(())
}

fn marker(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (not found)"
    }
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
