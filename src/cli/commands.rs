//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{self, Settings};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let command = cli
        .command
        .as_ref()
        .ok_or_else(|| CliError::Usage("no command given, see `umlgen --help`".into()))?;

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    // `config init` may be asked to create the file passed with --config
    let config_file = match command {
        Commands::Config {
            command: ConfigCommands::Init { .. },
        } => None,
        _ => cli.config.as_deref(),
    };
    let settings = Settings::load(config_file)?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Generate { input, output_dir } => {
            cmd_generate(&container, input.as_deref(), output_dir.as_deref())
        }
        Commands::Hierarchy { input } => cmd_hierarchy(&container, input.as_deref()),
        Commands::Meta { input } => cmd_meta(&container, input.as_deref()),
        Commands::Tree { input } => cmd_tree(&container, input.as_deref()),
        Commands::Check { input } => cmd_check(&container, input.as_deref()),
        Commands::Config { command } => cmd_config(&container, command, cli.config.as_deref()),
        Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_input(container: &ServiceContainer, input: Option<&Path>) -> PathBuf {
    input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.input.clone())
}

#[instrument(skip(container))]
fn cmd_generate(
    container: &ServiceContainer,
    input: Option<&Path>,
    output_dir: Option<&Path>,
) -> CliResult<()> {
    let input = resolve_input(container, input);
    let paths = container.settings.artifact_paths(output_dir);
    let report = container.generator.generate(&input, &paths)?;

    output::action("wrote", &report.paths.hierarchy.display());
    output::action("wrote", &report.paths.metadata.display());
    output::success(&format!(
        "{} classes in hierarchy, {} metadata entries",
        report.hierarchy_classes, report.descriptors
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_hierarchy(container: &ServiceContainer, input: Option<&Path>) -> CliResult<()> {
    let model = container.generator.load(&resolve_input(container, input))?;
    output::info(&container.generator.render_hierarchy(&model)?.trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_meta(container: &ServiceContainer, input: Option<&Path>) -> CliResult<()> {
    let model = container.generator.load(&resolve_input(container, input))?;
    output::info(&container.generator.render_metadata(&model)?);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, input: Option<&Path>) -> CliResult<()> {
    let model = container.generator.load(&resolve_input(container, input))?;
    output::info(&container.generator.render_tree(&model)?.trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, input: Option<&Path>) -> CliResult<()> {
    let input = resolve_input(container, input);
    let summary = container.generator.check(&input)?;

    output::header(&input.display());
    output::detail(&format!(
        "{} classes, {} aggregations",
        summary.classes, summary.aggregations
    ));
    output::detail(&format!(
        "root: {} ({} classes in hierarchy, depth {})",
        summary.root, summary.hierarchy_classes, summary.depth
    ));
    for name in &summary.unreachable {
        output::warning(&format!("class not reachable from root: {name}"));
    }
    output::success("model is valid");
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_override: Option<&Path>,
) -> CliResult<()> {
    let local = local_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config::local_config_path(Path::new(".")));

    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match config::global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local.display());
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                config::global_config_path().ok_or_else(|| ApplicationError::Config {
                    message: "no global config directory on this platform".into(),
                })?
            } else {
                local
            };
            if container.fs.exists(&target) {
                return Err(ApplicationError::Config {
                    message: format!("config already exists: {}", target.display()),
                }
                .into());
            }
            container
                .fs
                .ensure_parent(&target)
                .with_path_context("create config directory", &target)?;
            container
                .fs
                .write(&target, &Settings::template())
                .with_path_context("write config", &target)?;
            output::action("created", &target.display());
        }
    }
    Ok(())
}
