use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway::GroqGateway;
use orchestrator::{
    AppConfig, CancelToken, ContentLength, ContentRequest, ContentType, InMemoryPersonaStore,
    Orchestrator, PersonaStore, RunLogStore, RunSummary, ToneStyle,
};

#[derive(Parser)]
#[command(name = "targetscript")]
#[command(about = "Persona-targeted marketing content generation pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a config file (default: .targetscript.toml found by walking up)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra personas file merged over the built-in set
    #[arg(long, global = true)]
    personas: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the content generation pipeline
    Generate {
        /// Topic or brief for the content
        topic: String,

        /// Target persona id
        #[arg(short, long)]
        persona: String,

        /// Type of content to produce
        #[arg(short = 't', long, value_enum, default_value = "blog_post")]
        content_type: ContentType,

        /// Target platform, e.g. "twitter", "linkedin", "website"
        #[arg(long, default_value = "website")]
        platform: String,

        /// Tone of voice
        #[arg(long, value_enum, default_value = "professional")]
        tone: ToneStyle,

        /// Target length
        #[arg(long, value_enum)]
        length: Option<ContentLength>,

        /// Additional background for the agents
        #[arg(long)]
        context: Option<String>,

        /// Keywords to weave in (repeatable)
        #[arg(short, long)]
        keyword: Vec<String>,

        /// Skip the call to action
        #[arg(long)]
        no_cta: bool,
    },
    /// Persona management
    Personas {
        #[command(subcommand)]
        command: PersonaCommands,
    },
    /// List supported content types
    ContentTypes,
    /// Run history
    Runs {
        #[command(subcommand)]
        command: RunCommands,
    },
}

#[derive(Subcommand)]
enum PersonaCommands {
    /// List available personas
    List,
    /// Show one persona in full
    Show {
        /// Persona id
        id: String,
    },
}

#[derive(Subcommand)]
enum RunCommands {
    /// List recorded runs, newest first
    List,
    /// Show one run record in full
    Show {
        /// Run id
        id: String,
    },
}

/// Initialize tracing with the given verbosity level
///
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Allow RUST_LOG to override if set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::load()?,
    };

    let mut personas = InMemoryPersonaStore::with_defaults();
    if let Some(path) = &cli.personas {
        let loaded = personas
            .load_file(path)
            .with_context(|| format!("loading personas {}", path.display()))?;
        tracing::info!("loaded {loaded} persona(s) from {}", path.display());
    }

    match cli.command {
        Commands::Generate {
            topic,
            persona,
            content_type,
            platform,
            tone,
            length,
            context,
            keyword,
            no_cta,
        } => {
            let request = ContentRequest {
                content_type,
                platform,
                tone,
                persona_id: persona,
                topic,
                context,
                keywords: keyword,
                length,
                include_cta: !no_cta,
            };
            run_generate(config, personas, request).await
        }
        Commands::Personas { command } => run_personas_command(command, &personas),
        Commands::ContentTypes => {
            println!("Supported content types:\n");
            for content_type in ContentType::all() {
                println!("  {:<16} {}", content_type.name(), content_type.description());
            }
            Ok(())
        }
        Commands::Runs { command } => run_runs_command(command, &config),
    }
}

fn run_log_store(config: &AppConfig) -> Option<RunLogStore> {
    config
        .orchestrator
        .run_log_dir
        .clone()
        .or_else(RunLogStore::default_dir)
        .map(RunLogStore::new)
}

async fn run_generate(
    config: AppConfig,
    personas: InMemoryPersonaStore,
    request: ContentRequest,
) -> Result<()> {
    let run_log = run_log_store(&config);
    let gateway = GroqGateway::new(config.gateway)?;

    let mut orchestrator = Orchestrator::new(
        Arc::new(gateway),
        Arc::new(personas),
        config.orchestrator,
    );
    if let Some(store) = run_log {
        orchestrator = orchestrator.with_run_log(store);
    }

    let cancel = CancelToken::new();
    let report = orchestrator.generate(request, &cancel).await?;

    if let Some(title) = &report.artifact.title {
        println!("# {title}\n");
    }
    println!("{}", report.artifact.body);
    if let Some(cta) = &report.artifact.call_to_action {
        println!("\n{cta}");
    }
    if !report.artifact.tags.is_empty() {
        println!("\nTags: {}", report.artifact.tags.join(", "));
    }

    print_summary(&report.summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n--- Run {} ---", summary.run_id);
    println!("Status: {:?}", summary.status);
    for stage in &summary.stages {
        println!(
            "  {:<10} {:?} in {}ms ({} attempt(s), ~{} tokens)",
            stage.stage.name(),
            stage.status,
            stage.duration_ms,
            stage.attempts,
            stage.estimated_tokens
        );
    }
    println!("Total duration: {}ms", summary.total_duration_ms);
    println!(
        "Estimated tokens: {} (~${:.4})",
        summary.total_estimated_tokens, summary.estimated_cost
    );
    if let Some(score) = summary.alignment_score {
        println!("Alignment score: {score}/100");
    }
}

fn run_personas_command(command: PersonaCommands, personas: &InMemoryPersonaStore) -> Result<()> {
    match command {
        PersonaCommands::List => {
            println!("Available personas:\n");
            for persona in personas.list() {
                println!("  {:<24} {} ({})", persona.id, persona.name, persona.industry);
            }
        }
        PersonaCommands::Show { id } => match personas.get(&id) {
            Some(persona) => {
                println!("{}", serde_json::to_string_pretty(&persona)?);
            }
            None => anyhow::bail!("unknown persona: {id}"),
        },
    }
    Ok(())
}

fn run_runs_command(command: RunCommands, config: &AppConfig) -> Result<()> {
    let store = match run_log_store(config) {
        Some(store) => store,
        None => anyhow::bail!("no run log directory available"),
    };

    match command {
        RunCommands::List => {
            let records = store.list()?;
            if records.is_empty() {
                println!("No runs recorded under {}", store.dir().display());
                return Ok(());
            }
            for record in records {
                println!(
                    "{}  {}  {:?}  {} -> {}  {}",
                    record.created_at.format("%Y-%m-%d %H:%M:%S"),
                    record.run_id,
                    record.status,
                    record.persona_id,
                    record.content_type,
                    record.topic
                );
            }
        }
        RunCommands::Show { id } => {
            let record = store.load(&id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}
