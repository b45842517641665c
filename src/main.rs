use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowdex::catalog::{Complexity, Generator, TriggerType};
use flowdex::config::Config;
use flowdex::query::{Catalog, QueryState, ALL};
use flowdex::storage::ArtifactWriter;

#[derive(Parser)]
#[command(name = "flowdex")]
#[command(about = "Static catalog generator for n8n workflow exports", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file loaded on top of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan workflow files and write the static catalog
    Generate {
        /// Directory of workflow JSON files
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory to write artifacts to
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Indent the emitted JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Filter the generated catalog
    Search {
        /// Free text matched against name, description and integrations
        query: Option<String>,
        /// Trigger filter: Manual|Webhook|Scheduled|HTTP
        #[arg(short, long, default_value = ALL)]
        trigger: String,
        /// Complexity filter: low|medium|high
        #[arg(short = 'x', long, default_value = ALL)]
        complexity: String,
        /// Category filter
        #[arg(short, long, default_value = ALL)]
        category: String,
        /// Only active workflows
        #[arg(short, long)]
        active_only: bool,
        /// Static data directory
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Print matching records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one workflow with its category and diagram
    Show {
        /// Workflow file name, e.g. 0001_Telegram_Schedule.json
        filename: String,
        /// Static data directory
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Also print the workflow JSON
        #[arg(long)]
        json: bool,
    },
    /// Print catalog statistics
    Stats {
        /// Static data directory
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// List categories with workflow counts
    Categories {
        /// Static data directory
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Add translation stubs to workflow files in place
    Annotate {
        /// Directory of workflow JSON files
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Language key, defaults to the configured one
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "flowdex=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        return cmd_completions(shell);
    }

    let config = Config::load_with(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            pretty,
        } => cmd_generate(&config, input.as_deref(), output.as_deref(), pretty)?,
        Commands::Search {
            query,
            trigger,
            complexity,
            category,
            active_only,
            data,
            json,
        } => {
            let state = QueryState::search(query.unwrap_or_default())
                .with_trigger(trigger)
                .with_complexity(complexity)
                .with_category(category)
                .active_only(active_only);
            cmd_search(&config, data.as_deref(), &state, json)?
        }
        Commands::Show {
            filename,
            data,
            json,
        } => cmd_show(&config, data.as_deref(), &filename, json)?,
        Commands::Stats { data } => cmd_stats(&config, data.as_deref())?,
        Commands::Categories { data } => cmd_categories(&config, data.as_deref())?,
        Commands::Annotate { input, language } => {
            cmd_annotate(&config, input.as_deref(), language)?
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Shell completion variants
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CompletionShell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions
fn cmd_completions(shell: CompletionShell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}

// ============================================================================
// Generation
// ============================================================================

fn cmd_generate(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let input = input.unwrap_or(config.paths.workflows_dir.as_path());
    let output = output.unwrap_or(config.paths.output_dir.as_path());

    let generator = Generator::new(config.extractor(), config.classifier());
    let writer = ArtifactWriter::new(output).pretty(pretty);
    let report = generator.run(input, &writer)?;

    println!("Generated catalog in {}", output.display());
    println!("  Processed:  {}", report.processed);
    println!("  Skipped:    {}", report.skipped.len());
    println!("  Categories: {}", report.categories.len());

    for skipped in &report.skipped {
        println!(
            "    {} ({}): {}",
            skipped.file.as_deref().unwrap_or("?"),
            skipped.code,
            skipped.message
        );
    }

    Ok(())
}

// ============================================================================
// Query Commands
// ============================================================================

fn load_catalog(config: &Config, data: Option<&Path>) -> anyhow::Result<Catalog> {
    let dir = data.unwrap_or(config.paths.output_dir.as_path());
    Ok(Catalog::load(dir)?)
}

fn check_filter<T: std::str::FromStr>(value: &str, what: &str) -> anyhow::Result<()> {
    if value != ALL && value.parse::<T>().is_err() {
        anyhow::bail!("Unknown {} filter: {}", what, value);
    }
    Ok(())
}

fn cmd_search(
    config: &Config,
    data: Option<&Path>,
    state: &QueryState,
    json: bool,
) -> anyhow::Result<()> {
    check_filter::<TriggerType>(&state.filters.trigger, "trigger")?;
    check_filter::<Complexity>(&state.filters.complexity, "complexity")?;

    let catalog = load_catalog(config, data)?;
    let results = catalog.filter(state);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No workflows match.");
        return Ok(());
    }

    println!(
        "{:<40} {:<10} {:<8} {:<24} {:<6}",
        "NAME", "TRIGGER", "SIZE", "CATEGORY", "ACTIVE"
    );
    println!("{}", "-".repeat(92));

    for record in &results {
        println!(
            "{:<40} {:<10} {:<8} {:<24} {:<6}",
            truncate(&record.name, 40),
            record.trigger_type.as_str(),
            record.complexity.as_str(),
            truncate(catalog.category_of(record), 24),
            if record.active { "yes" } else { "no" }
        );
    }

    println!();
    println!("{} of {} workflows", results.len(), catalog.len());
    Ok(())
}

fn cmd_show(
    config: &Config,
    data: Option<&Path>,
    filename: &str,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(config, data)?;
    let Some(detail) = catalog.detail(filename) else {
        anyhow::bail!("Workflow not found: {}", filename);
    };
    let record = &detail.record;

    println!("{}", record.name);
    println!("{}", "=".repeat(record.name.chars().count()));
    println!("File:         {}", record.filename);
    if let Some(id) = &record.workflow_id {
        println!("ID:           {}", id);
    }
    println!("Category:     {}", detail.category);
    println!("Trigger:      {}", record.trigger_type);
    println!("Complexity:   {} ({} nodes)", record.complexity, record.node_count);
    println!("Active:       {}", if record.active { "yes" } else { "no" });
    if !record.integrations.is_empty() {
        println!("Integrations: {}", record.integrations.join(", "));
    }
    if !record.tags.is_empty() {
        println!("Tags:         {}", record.tags.join(", "));
    }
    println!("Size:         {} bytes", record.file_size);
    println!("Hash:         {}", record.file_hash);
    println!();
    println!("{}", record.description);
    println!();
    println!("{}", detail.diagram);

    if json {
        println!();
        println!("{}", detail.json);
    }

    Ok(())
}

fn cmd_stats(config: &Config, data: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_catalog(config, data)?;
    let stats = catalog.stats();

    println!("Workflows:    {}", stats.total);
    println!("  Active:     {}", stats.active);
    println!("  Inactive:   {}", stats.inactive);
    println!("Nodes:        {}", stats.total_nodes);
    println!("Integrations: {}", stats.unique_integrations);
    println!("Indexed:      {}", stats.last_indexed);
    println!();
    println!("By trigger:");
    for (trigger, count) in &stats.triggers {
        println!("  {:<12} {}", trigger, count);
    }
    println!("By complexity:");
    for (complexity, count) in &stats.complexity {
        println!("  {:<12} {}", complexity, count);
    }

    Ok(())
}

fn cmd_categories(config: &Config, data: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_catalog(config, data)?;

    if catalog.categories().is_empty() {
        println!("No categories.");
        return Ok(());
    }

    for (label, count) in catalog.category_counts() {
        println!("{:<32} {}", label, count);
    }
    Ok(())
}

// ============================================================================
// Annotation
// ============================================================================

fn cmd_annotate(
    config: &Config,
    input: Option<&Path>,
    language: Option<String>,
) -> anyhow::Result<()> {
    let input = input.unwrap_or(config.paths.workflows_dir.as_path());
    let annotator = match language {
        Some(language) => flowdex::workflow::Annotator::new(language),
        None => config.annotator(),
    };

    let report = annotator.annotate_dir(input)?;
    for file in &report.processed {
        println!("Processed {}", file);
    }
    for (file, error) in &report.failed {
        eprintln!("Failed {}: {}", file, error);
    }
    println!(
        "{} annotated, {} failed",
        report.processed.len(),
        report.failed.len()
    );
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
