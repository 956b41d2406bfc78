//! LMP CLI - prompt templates on the command line
//!
//! Loads prompt template files, checks them for errors and renders prompts
//! interactively, asking for placeholder values on the terminal.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lmp_core::tools::fs_impl::StdFsAdapter;
use lmp_core::tools::source_impl::ConsoleSource;
use lmp_core::{LmpConfig, LoadReport, Session, export_templates, load_templates};
use lmp_pm::write_template;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

/// LMP - prompt templates for editor LLM workflows
///
/// Works on the template files configured in `.lmp/config.toml`.
#[derive(Parser)]
#[command(name = "lmp", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    location: Location,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where templates are looked up
#[derive(Args)]
struct Location {
    /// Root directory holding `.lmp/config.toml` (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Extra template directory, scanned after the configured ones
    #[arg(long = "dir", global = true)]
    dirs: Vec<PathBuf>,
}

/// Available LMP commands
#[derive(Subcommand)]
enum Commands {
    /// List loaded prompts
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print one prompt in template format
    Show {
        /// Prompt name
        name: String,
    },

    /// Parse every template file and report failures
    ///
    /// Exits with status 1 if any file could not be loaded.
    Check,

    /// Substitute a prompt's placeholders interactively
    ///
    /// Questions are asked on stderr and answers read from stdin. An empty
    /// answer cancels without output.
    Render {
        /// Prompt name
        name: String,

        /// Value for `$filetype`
        #[arg(long, default_value = "")]
        filetype: String,

        /// Register contents, e.g. `--register a=text` or `--register +=clip`
        #[arg(long = "register", value_name = "NAME=VALUE", value_parser = parse_register)]
        registers: Vec<(char, String)>,

        /// Print the prepared request as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write all loaded prompts into one template file
    Export {
        /// Output file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing subscriber
    init_tracing(cli.verbose);

    match run_command(cli.command, &cli.location).await {
        Ok(code) => code,
        Err(e) => {
            // Log with tracing
            error!("Command failed: {:#}", e);
            // Also print to stderr for CLI users
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing subscriber for structured logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("lmp=debug,lmp_core=debug,lmp_pm=debug")
    } else {
        EnvFilter::new("lmp=warn,lmp_core=warn,lmp_pm=warn")
    };

    // stdout carries command output only
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Execute the specified command
async fn run_command(command: Commands, location: &Location) -> Result<ExitCode> {
    let (config, report) = load(location)?;

    match command {
        Commands::List { json } => run_list(&report, json),
        Commands::Show { name } => run_show(&report, &name),
        Commands::Check => Ok(run_check(&report)),
        Commands::Render {
            name,
            filetype,
            registers,
            json,
        } => run_render(config, report, &name, filetype, registers, json).await,
        Commands::Export { file } => run_export(&report, &file),
    }
}

/// Load configuration and every template file it points at
fn load(location: &Location) -> Result<(LmpConfig, LoadReport)> {
    let root = match &location.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    info!("Template root: {}", root.display());

    let mut config = LmpConfig::load(root).context("Failed to load LMP configuration")?;
    for dir in &location.dirs {
        config = config.with_template_dir(dir);
    }

    let report =
        load_templates(&config, &StdFsAdapter::new()).context("Failed to load templates")?;
    Ok((config, report))
}

#[derive(Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    model: Option<&'a str>,
    source_file: Option<&'a Path>,
}

/// Run the list command
fn run_list(report: &LoadReport, json: bool) -> Result<ExitCode> {
    let entries: Vec<ListEntry<'_>> = report
        .prompts
        .iter()
        .map(|p| ListEntry {
            name: &p.name,
            model: p.model.as_deref(),
            source_file: p.source_file.as_deref(),
        })
        .collect();

    if json {
        let text = serde_json::to_string_pretty(&entries).context("Failed to encode prompts")?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    for entry in &entries {
        println!(
            "{}\t{}\t{}",
            entry.name,
            entry.model.unwrap_or("-"),
            entry
                .source_file
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the show command
fn run_show(report: &LoadReport, name: &str) -> Result<ExitCode> {
    let prompt = report
        .prompts
        .get(name)
        .with_context(|| format!("Prompt not found: {name}"))?;
    print!("{}", write_template(prompt));
    Ok(ExitCode::SUCCESS)
}

/// Run the check command
fn run_check(report: &LoadReport) -> ExitCode {
    for failure in &report.failures {
        println!("✘ {}", failure.error);
    }

    if report.is_clean() {
        println!("✔ {} prompts loaded", report.prompts.len());
        ExitCode::SUCCESS
    } else {
        println!(
            "\n{} prompts loaded, {} files failed",
            report.prompts.len(),
            report.failures.len()
        );
        ExitCode::FAILURE
    }
}

/// Run the render command
async fn run_render(
    config: LmpConfig,
    report: LoadReport,
    name: &str,
    filetype: String,
    registers: Vec<(char, String)>,
    json: bool,
) -> Result<ExitCode> {
    let mut source = ConsoleSource::stdio().with_filetype(filetype);
    for (register, value) in registers {
        source = source.with_register(register, value);
    }

    let mut session = Session::new(report.prompts).with_default_model(config.default_model);
    let request = match session.prepare(name, &source).await {
        Ok(request) => request,
        Err(e) if e.is_cancelled() => {
            info!("Render cancelled");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to render prompt {name}")),
    };

    if json {
        let text = serde_json::to_string_pretty(&request).context("Failed to encode request")?;
        println!("{text}");
    } else {
        println!("{}", request.text);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the export command
fn run_export(report: &LoadReport, file: &Path) -> Result<ExitCode> {
    let written = export_templates(file, report.prompts.iter(), &StdFsAdapter::new())
        .with_context(|| format!("Failed to export prompts to {}", file.display()))?;
    println!("✔ Exported {written} prompts to {}", file.display());
    Ok(ExitCode::SUCCESS)
}

/// Parse `NAME=VALUE` where NAME is a single register character
fn parse_register(arg: &str) -> std::result::Result<(char, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(register), None) => Ok((register, value.to_string())),
        _ => Err(format!("register name must be one character, got '{name}'")),
    }
}
