//! pjournal CLI: commit-message lint and prompt journal tooling.
//!
//! Commands: lint, extract, validate, stats, journal

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use pjournal_core::lint::lint;
use pjournal_core::scaffold;
use pjournal_core::stats::JournalStats;
use pjournal_core::{Config, SchemaVersion, Severity, ValidationResult};
use pjournal_vault::{config, extract, GitCli, JournalStore};

#[derive(Parser)]
#[command(name = "pjournal")]
#[command(version)]
#[command(about = "Commit-message governance and prompt journal extraction")]
struct Cli {
    /// Repository root
    #[arg(long, global = true, env = "PJOURNAL_ROOT", default_value = ".")]
    root: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Lint a commit message (reads stdin without --edit)
    Lint {
        /// File holding the commit message, as passed to a commit-msg hook
        #[arg(long)]
        edit: Option<PathBuf>,
        /// Override the configured schema (v4 or legacy)
        #[arg(long)]
        schema: Option<SchemaVersion>,
    },
    /// Merge commit history, journals and thinking logs into one JSON file
    Extract {
        /// Output file (default from config: prompts.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate journals and thinking logs
    Validate {
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Journal statistics
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
        /// Write the JSON statistics to this file instead of stdout
        #[arg(long, requires = "json")]
        output: Option<PathBuf>,
    },
    /// Generate a journal for the HEAD commit
    Journal,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli);
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run one command; `Ok(false)` means it completed but found failures.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let root = cli.root;
    let config = config::load(&root).context("failed to load configuration")?;

    match cli.command {
        Commands::Lint { edit, schema } => cmd_lint(&config, edit.as_deref(), schema),
        Commands::Extract { output } => cmd_extract(&root, &config, output),
        Commands::Validate { json } => cmd_validate(&root, &config, json),
        Commands::Stats { json, output } => cmd_stats(&root, &config, json, output.as_deref()),
        Commands::Journal => cmd_journal(&root, &config),
    }
}

fn cmd_lint(
    config: &Config,
    edit: Option<&Path>,
    schema: Option<SchemaVersion>,
) -> anyhow::Result<bool> {
    let message = match edit {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read commit message from stdin")?;
            buf
        }
    };

    let mut lint_config = config.lint.clone();
    if let Some(schema) = schema {
        lint_config.schema = schema;
    }

    let report = lint(&message, &lint_config);
    for failure in report.failures() {
        let label = match failure.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{label} [{}]: {}", failure.rule, failure.outcome.message);
    }

    let passed = !report.has_errors();
    if passed {
        println!("commit message ok ({} schema)", lint_config.schema);
    }
    Ok(passed)
}

fn cmd_extract(root: &Path, config: &Config, output: Option<PathBuf>) -> anyhow::Result<bool> {
    let output = output.unwrap_or_else(|| extract::default_output(root, config));
    let store = JournalStore::new(root, config);
    let aggregate = extract::run(&GitCli::new(root), &store, config, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let stats = &aggregate.stats;
    println!(
        "extracted {} records ({} v4 commits, {} legacy commits, {} journals, {} thinking logs) to {}",
        stats.total,
        stats.v4_commits,
        stats.legacy_commits,
        stats.journals,
        stats.thinking_logs,
        output.display()
    );
    Ok(true)
}

fn cmd_validate(root: &Path, config: &Config, json: bool) -> anyhow::Result<bool> {
    let store = JournalStore::new(root, config);
    let results = store.validate_all()?;
    let passed = results.iter().all(|r| r.valid);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(passed);
    }

    if results.is_empty() {
        tracing::warn!("no journal or thinking log files found");
        println!("no files to validate");
        return Ok(true);
    }

    for result in &results {
        print_validation(result);
    }
    let valid = results.iter().filter(|r| r.valid).count();
    println!("{valid}/{} files valid", results.len());
    Ok(passed)
}

fn print_validation(result: &ValidationResult) {
    let status = if result.valid { "ok" } else { "FAIL" };
    println!("{status} {}", result.filename);
    for error in &result.errors {
        println!("  error: {error}");
    }
    for warning in &result.warnings {
        println!("  warning: {warning}");
    }
}

fn cmd_stats(
    root: &Path,
    config: &Config,
    json: bool,
    output: Option<&Path>,
) -> anyhow::Result<bool> {
    let store = JournalStore::new(root, config);
    let stats = JournalStats::compute(&store.journals());

    if json {
        match output {
            Some(path) => {
                extract::write_json(path, &stats)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("statistics written to {}", path.display());
            }
            None => println!("{}", serde_json::to_string_pretty(&stats)?),
        }
        return Ok(true);
    }

    println!("journals: {}", stats.total_journals);
    match stats.avg_quality_score {
        Some(avg) => println!("average quality: {avg}/48"),
        None => println!("average quality: n/a"),
    }
    for (label, counts) in [
        ("by month", &stats.by_month),
        ("by domain", &stats.by_domain),
        ("by complexity", &stats.by_complexity),
        ("grades", &stats.grade_distribution),
    ] {
        if counts.is_empty() {
            continue;
        }
        println!("{label}:");
        for (key, count) in counts {
            println!("  {key}: {count}");
        }
    }
    if !stats.top_tags.is_empty() {
        let tags: Vec<String> = stats
            .top_tags
            .iter()
            .map(|t| format!("{} ({})", t.tag, t.count))
            .collect();
        println!("top tags: {}", tags.join(", "));
    }
    Ok(true)
}

fn cmd_journal(root: &Path, config: &Config) -> anyhow::Result<bool> {
    let head = match GitCli::new(root).head() {
        Ok(head) => head,
        Err(e) => {
            tracing::warn!(error = %e, "no HEAD commit, skipping journal");
            return Ok(true);
        }
    };

    let Some(draft) = scaffold::draft(&head)? else {
        println!("HEAD is not a structured commit, no journal generated");
        return Ok(true);
    };

    let store = JournalStore::new(root, config);
    match store.write_draft(&draft)? {
        Some(path) => println!("journal written to {}", path.display()),
        None => println!("journal {} already exists", draft.filename),
    }
    Ok(true)
}
