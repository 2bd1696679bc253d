//! dashstyle CLI
//!
//! Checks theme files and shows how a theme styles an actor tree.

mod tree;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dashstyle_actor::{ActorId, ActorTree, Stylable};
use dashstyle_css::{InvalidationReport, StyleSheet, Theme, ThemeManager};
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "dashstyle")]
#[command(version, about = "Theme checker and style resolver for dashstyle actors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse theme files and report every problem found
    Check {
        /// Style files, loaded in order into one style sheet
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Apply a theme to an actor tree and print the resolved properties
    Resolve {
        /// A theme directory (with theme.json) or style files
        #[arg(short, long, required = true, num_args = 1..)]
        theme: Vec<PathBuf>,

        /// Actor tree description (JSON)
        #[arg(long)]
        tree: PathBuf,

        /// Only print the actor with this name
        #[arg(short, long)]
        actor: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { files } => check(&files),
        Command::Resolve {
            theme,
            tree,
            actor,
        } => resolve(&theme, &tree, actor.as_deref()),
    }
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_files(files: &[PathBuf]) -> Result<StyleSheet> {
    let mut builder = StyleSheet::builder();
    for file in files {
        let _ = builder.add_file(file)?;
    }
    Ok(builder.build())
}

fn check(files: &[PathBuf]) -> Result<ExitCode> {
    let sheet = load_files(files)?;

    for error in sheet.errors() {
        println!("{} {error}", "error:".red().bold());
    }

    let summary = format!(
        "{} rules, {} errors",
        sheet.rules().len(),
        sheet.errors().len()
    );
    if sheet.errors().is_empty() {
        println!("{}", summary.green());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", summary.yellow());
        Ok(ExitCode::FAILURE)
    }
}

fn load_theme(paths: &[PathBuf]) -> Result<StyleSheet> {
    match paths {
        [dir] if dir.is_dir() => {
            let theme = Theme::load(dir).with_context(|| format!("cannot load theme {}", dir.display()))?;
            println!(
                "{} {} ({})",
                "theme:".bold(),
                theme.manifest.name,
                theme.path.display()
            );
            Ok(Rc::unwrap_or_clone(theme.style_sheet))
        }
        _ => load_files(paths),
    }
}

fn resolve(theme: &[PathBuf], tree_path: &Path, only: Option<&str>) -> Result<ExitCode> {
    let sheet = load_theme(theme)?;
    for error in sheet.errors() {
        println!("{} {error}", "warning:".yellow().bold());
    }

    let mut manager = ThemeManager::default();
    let mut tree = tree::load(tree_path, manager.converters())?;
    let _ = manager.replace(Some(Rc::new(sheet)));

    let reports = manager.restyle(&mut tree);
    tracing::debug!(actors = reports.len(), "restyled actor tree");

    let selected: Vec<&(ActorId, InvalidationReport)> = match only {
        Some(name) => {
            let Some(id) = tree.find_by_name(name) else {
                bail!("no actor named '{name}' in {}", tree_path.display());
            };
            reports.iter().filter(|(actor, _)| *actor == id).collect()
        }
        None => reports.iter().collect(),
    };

    let mut clean = true;
    for (id, report) in selected {
        print_actor(&tree, *id, report);
        clean &= report.is_clean();
    }

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// `Type#name.class:pseudo` followed by every property and where it came from.
fn print_actor(tree: &ActorTree, id: ActorId, report: &InvalidationReport) {
    let Some(stylable) = tree.stylable(id) else {
        return;
    };

    let mut label = stylable.type_name().to_string();
    if let Some(name) = stylable.name() {
        label.push('#');
        label.push_str(name);
    }
    for class in stylable.classes().iter() {
        label.push('.');
        label.push_str(class);
    }
    for pseudo in stylable.pseudo_classes().iter() {
        label.push(':');
        label.push_str(pseudo);
    }
    println!("{}", label.cyan().bold());

    for spec in stylable.stylable_properties() {
        let value = stylable
            .style_property(&spec.name)
            .map_or_else(|| "<unset>".to_string(), ToString::to_string);

        if report.applied.contains(&spec.name) {
            println!("  {} = {}", spec.name, value.green());
        } else if let Some(failure) = report.failures.iter().find(|f| f.property == spec.name) {
            println!(
                "  {} = {} {}",
                spec.name,
                value.dimmed(),
                format!("('{}' is not a valid {})", failure.value, failure.expected).yellow()
            );
        } else {
            println!("  {} = {}", spec.name, value.dimmed());
        }
    }
}
