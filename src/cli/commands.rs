//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Generator};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::sample::sample_json;
use crate::application::Diagnostics;
use crate::cli::args::{Cli, Commands, ConfigCommands, SourceArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // Completions and templates must work even with a broken config file
    match command {
        Commands::Completion { shell } => {
            print_completions(*shell, &mut Cli::command());
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Template,
        } => {
            output::info(&Settings::template());
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree {
            source,
            toggle,
            all,
            no_color,
        } => cmd_tree(&container, source, toggle, *all, *no_color),
        Commands::Roots { source } => cmd_roots(&container, source),
        Commands::Check { source, strict } => cmd_check(&container, source, *strict),
        Commands::Sample => {
            output::info(&sample_json()?);
            Ok(())
        }
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, &mut io::stdout());
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    source: &SourceArgs,
    toggle: &[String],
    all: bool,
    no_color: bool,
) -> CliResult<()> {
    let records = container.load_records(source.file.as_deref(), source.sample)?;
    let mut session = container.session(records);

    if all {
        session.expand_all();
    }
    for id in toggle {
        if session.tree().contains(id) {
            session.toggle(id);
        } else {
            output::warning(&format!("no node with id {id}"));
        }
    }

    let rendered = container.renderer(no_color).render_to_string(&session);
    print!("{}", rendered);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_roots(container: &ServiceContainer, source: &SourceArgs) -> CliResult<()> {
    let records = container.load_records(source.file.as_deref(), source.sample)?;
    let session = container.session(records);
    let tree = session.tree();

    for &root in tree.roots() {
        if let Some(node) = tree.get_node(root) {
            let reason = node
                .root_reason
                .map(|r| r.to_string())
                .unwrap_or_default();
            output::info(&format!("{}\t{}\t({})", node.data.id, node.data.name, reason));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, source: &SourceArgs, strict: bool) -> CliResult<()> {
    let records = container.load_records(source.file.as_deref(), source.sample)?;
    let session = container.session(records);
    let report = Diagnostics::collect(session.records(), session.tree());

    output::header(&format!(
        "{} records, {} roots, depth {}",
        session.records().len(),
        session.tree().roots().len(),
        session.tree().depth()
    ));

    if report.is_clean() {
        output::success("no issues found");
        return Ok(());
    }

    for (id, parent) in &report.dangling {
        output::failure(&format!("{id}: parent {parent} does not exist, shown as root"));
    }
    for id in &report.self_parents {
        output::failure(&format!("{id}: is its own parent, shown as root"));
    }
    for id in &report.cycle_breaks {
        output::failure(&format!("{id}: on a parent cycle, promoted to root"));
    }
    for edge in &report.cycle_edges {
        output::detail(&format!("cut: {} -> {}", edge.child, edge.ancestor));
    }
    if !report.unknown_kinds.is_empty() {
        let listed = report
            .unknown_kinds
            .iter()
            .map(|(id, tag)| format!("{id} ({tag})"))
            .join(", ");
        output::warning(&format!("unknown types: {listed}"));
    }

    if strict && report.cycles_cut() > 0 {
        return Err(CliError::CyclesFound(report.cycles_cut()));
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info("global: <unavailable>"),
            }
            let local = local_config_path(std::path::Path::new("."));
            output::info(&format!("local:  {}", local.display()));
        }
    }
    Ok(())
}
