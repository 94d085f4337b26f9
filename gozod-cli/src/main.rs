//! # gozodgen
//!
//! Generates gozod `Schema()` methods for Go structs.
//!
//! ## Usage
//!
//! ```bash
//! # Generate for every package under the current directory
//! gozodgen generate
//!
//! # Preview changes without writing
//! gozodgen generate ./models --dry-run
//!
//! # Print the record model as JSON
//! gozodgen generate ./models --dump-ir
//!
//! # Regenerate on change
//! gozodgen generate --watch
//!
//! # Write a default gozod.toml
//! gozodgen init
//!
//! # Fail when generated files are stale
//! gozodgen check
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use gozod_cli::{
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    generator::{SchemaGenerator, Staleness},
    watcher::{FileWatcher, WatchEvent},
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "gozodgen")]
#[command(author, version, about = "Generate gozod schema methods for Go structs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schema methods for Go packages
    Generate {
        /// Package directories or files (default: current directory)
        paths: Vec<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file suffix
        #[arg(long)]
        suffix: Option<String>,

        /// Package clause of generated files
        #[arg(long)]
        package: Option<String>,

        /// Build tags, comma separated
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Only consider files matching this glob
        #[arg(long)]
        include: Option<String>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Do not descend into subdirectories
        #[arg(long)]
        no_recursive: bool,

        /// Print record descriptors as JSON instead of generating
        #[arg(long, conflicts_with = "watch")]
        dump_ir: bool,

        /// Watch for file changes and regenerate
        #[arg(short, long)]
        watch: bool,
    },

    /// Write a default configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Check that generated files are up to date
    Check {
        /// Package directories or files (default: current directory)
        paths: Vec<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            paths,
            config,
            suffix,
            package,
            tags,
            include,
            dry_run,
            no_recursive,
            dump_ir,
            watch,
        } => {
            let args = CliArgs {
                suffix,
                package,
                tags,
                dry_run,
                no_recursive,
                include,
            };
            let config = load_config(config, &args)?;
            let roots = roots(paths);
            if dump_ir {
                cmd_dump_ir(config, &roots)?;
            } else if watch {
                run_watch_mode(config, &roots)?;
            } else {
                let mut generator = SchemaGenerator::new(config)?;
                run_generate(&mut generator, &roots)?;
            }
        }

        Commands::Init { output, force } => cmd_init(output, force)?,

        Commands::Check { paths, config } => {
            let config = load_config(config, &CliArgs::default())?;
            cmd_check(config, &roots(paths))?;
        }
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>, args: &CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::load(path.as_deref())?;
    Ok(ConfigManager::merge_cli_args(config, args)?)
}

fn roots(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

/// Run generation once, write the results and prune orphaned outputs.
fn run_generate(generator: &mut SchemaGenerator, roots: &[PathBuf]) -> Result<(), CliError> {
    let files = generator.generate(roots)?;
    let orphans = generator.orphans(roots, &files)?;
    if files.is_empty() && orphans.is_empty() {
        println!("{}", "No annotated structs found.".yellow());
        return Ok(());
    }

    let writer = FileWriter::new(generator.config().output.dry_run);
    let mut results = Vec::with_capacity(files.len() + orphans.len());
    for file in &files {
        results.push(writer.write(&file.path, &file.contents)?);
    }
    for path in &orphans {
        results.push(writer.remove(path)?);
    }

    for result in &results {
        print_result(result);
    }
    let records: usize = files.iter().map(|f| f.records.len()).sum();
    let changed = results.iter().filter(|r| r.was_written()).count();
    println!(
        "  {} record(s) in {} file(s), {} changed",
        records.to_string().green(),
        files.len(),
        changed
    );
    Ok(())
}

fn print_result(result: &WriteResult) {
    match result {
        WriteResult::Created { path, bytes } | WriteResult::Updated { path, bytes } => {
            println!("{} {} ({} bytes)", "✓".green(), path.display(), bytes);
        }
        WriteResult::Unchanged { path } => {
            println!("{} {}", "=".dimmed(), path.display().to_string().dimmed());
        }
        WriteResult::Removed { path } => {
            println!("{} {} (orphaned)", "-".red(), path.display());
        }
        WriteResult::DryRun { path, content } => {
            println!("{} Would write to {}:", "[dry-run]".yellow(), path.display());
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content.trim_end());
            println!("{}", "─".repeat(60).dimmed());
        }
        WriteResult::WouldRemove { path } => {
            println!("{} Would remove {}", "[dry-run]".yellow(), path.display());
        }
    }
}

/// Run in watch mode.
fn run_watch_mode(config: Config, roots: &[PathBuf]) -> Result<(), CliError> {
    let watcher = FileWatcher::new(roots.iter().cloned(), config.output.suffix.clone())
        .with_recursive(config.scan.recursive);
    let mut generator = SchemaGenerator::new(config)?;

    println!("{}", "Starting watch mode...".cyan());
    if let Err(e) = run_generate(&mut generator, roots) {
        print_error(&e);
    }

    let session = watcher.start()?;
    for root in watcher.roots() {
        println!("  Watching: {}", root.display());
    }
    println!("  Press Ctrl+C to stop\n");

    while let Some(event) = session.next_event() {
        match event {
            WatchEvent::Error(message) => println!("{} {}", "Watch error:".red(), message),
            WatchEvent::Changed(paths) => {
                for path in &paths {
                    println!("\n{} {}", "File changed:".cyan(), path.display());
                }
                if let Err(e) = run_generate(&mut generator, roots) {
                    print_error(&e);
                }
            }
        }
    }
    Ok(())
}

/// Print the record model as JSON.
fn cmd_dump_ir(config: Config, roots: &[PathBuf]) -> Result<(), CliError> {
    let mut generator = SchemaGenerator::new(config)?;
    let records = generator.describe(roots)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        return Err(CliError::AlreadyExists { path: output });
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;
    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );
    Ok(())
}

/// Check command implementation.
fn cmd_check(config: Config, roots: &[PathBuf]) -> Result<(), CliError> {
    let mut generator = SchemaGenerator::new(config)?;
    let stale = generator.check(roots)?;

    if stale.is_empty() {
        println!("{} Generated files are up to date", "✓".green());
        return Ok(());
    }

    for file in &stale {
        let reason = match file.reason {
            Staleness::Missing => "missing",
            Staleness::Outdated => "out of date",
            Staleness::Orphaned => "orphaned",
        };
        println!("{} {} ({})", "✗".red(), file.path.display(), reason);
    }
    println!("  Run 'gozodgen generate' to update");
    Err(CliError::Stale { count: stale.len() })
}

/// Print an error with formatting.
fn print_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
