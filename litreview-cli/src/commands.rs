//! CLI subcommand handlers.

use crate::repl::{ConsoleCallback, run_follow_up};
use crate::{Commands, ConfigAction};
use litreview_core::citation::render_study_detail;
use litreview_core::config::{AppConfig, load_config, load_config_file, workspace_config_path};
use litreview_core::providers::create_provider;
use litreview_core::research::{Category, DomainClassifier, select};
use litreview_core::{Brain, DigestScheduler, ResearchPipeline, ReviewOutcome, ReviewRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub workspace: PathBuf,
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub quiet: bool,
}

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, options: &GlobalOptions) -> anyhow::Result<()> {
    match command {
        Commands::Review {
            question,
            no_refine,
            follow_up,
        } => handle_review(&question.join(" "), no_refine, follow_up, options).await,
        Commands::Digest { topics } => handle_digest(topics, options).await,
        Commands::Classify { query } => handle_classify(&query.join(" "), options).await,
        Commands::Sources { category } => handle_sources(category.as_deref()),
        Commands::Config { action } => handle_config(action, options),
    }
}

/// Load configuration and apply CLI overrides.
///
/// A relative output directory is resolved against the workspace.
fn load_app_config(options: &GlobalOptions) -> anyhow::Result<AppConfig> {
    let mut config = match &options.config_path {
        Some(path) => load_config_file(path)
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?,
        None => load_config(Some(options.workspace.as_path()), None)
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?,
    };

    if let Some(model) = &options.model {
        config.llm.model = model.clone();
    }
    if config.output.base_dir.is_relative() {
        config.output.base_dir = options.workspace.join(&config.output.base_dir);
    }

    for warning in config.llm.validate() {
        tracing::warn!("{}", warning);
    }
    Ok(config)
}

fn build_brain(config: &AppConfig) -> anyhow::Result<Brain> {
    let provider = create_provider(&config.llm)
        .map_err(|e| anyhow::anyhow!("LLM provider init failed: {}", e))?;
    Ok(Brain::new(provider)
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens)
        .with_retry(config.llm.retry.clone()))
}

fn build_pipeline(
    config: &AppConfig,
    brain: Brain,
    quiet: bool,
) -> anyhow::Result<Arc<ResearchPipeline>> {
    let router = litreview_tools::build_router(&config.sources)
        .map_err(|e| anyhow::anyhow!("Source setup failed: {}", e))?;
    let mut pipeline = ResearchPipeline::new(brain, Arc::new(router), config);
    if !quiet {
        pipeline = pipeline.with_callback(Arc::new(ConsoleCallback));
    }
    Ok(Arc::new(pipeline))
}

async fn handle_review(
    question: &str,
    no_refine: bool,
    follow_up: bool,
    options: &GlobalOptions,
) -> anyhow::Result<()> {
    let config = load_app_config(options)?;
    let brain = build_brain(&config)?;
    let pipeline = build_pipeline(&config, brain.clone(), options.quiet)?;

    let mut runner = ReviewRunner::new(pipeline, brain.clone(), &config);
    if no_refine {
        runner = runner.without_refinement();
    }

    let outcome = runner.run_review(question).await?;
    println!("{}", render_review(&outcome));
    if !options.quiet {
        println!("Transcript saved to: {}", outcome.transcript.display());
    }

    if follow_up && outcome.result.has_sources() {
        run_follow_up(brain, &outcome).await?;
    }
    Ok(())
}

/// Terminal rendering of a finished review.
pub(crate) fn render_review(outcome: &ReviewOutcome) -> String {
    let mut out = format!("\n📚 Literature review: {}\n\n", outcome.refined_query);
    if let Some(notice) = &outcome.result.notice {
        out.push_str(&format!("⚠️ {notice}\n\n"));
    }
    out.push_str(&outcome.result.summary);
    out.push('\n');

    if outcome.result.has_sources() {
        out.push_str("\n📖 Studies\n\n");
        for paper in &outcome.result.sources {
            out.push_str(&render_study_detail(paper));
            out.push('\n');
        }
    }
    out
}

async fn handle_digest(topics: Vec<String>, options: &GlobalOptions) -> anyhow::Result<()> {
    let config = load_app_config(options)?;
    let topics = if topics.is_empty() {
        config.digest.topics.clone()
    } else {
        topics
    };
    if topics.is_empty() {
        anyhow::bail!(
            "No digest topics. Pass --topic or set [digest] topics in {}",
            workspace_config_path(&options.workspace).display()
        );
    }

    let brain = build_brain(&config)?;
    let pipeline = build_pipeline(&config, brain, options.quiet)?;
    let scheduler = DigestScheduler::new(pipeline, &config);

    let digest = scheduler.run_all(&topics).await?;
    for (topic, result) in &digest.sections {
        println!("\n🔎 {}: {} papers", topic, result.sources.len());
    }
    println!("\nDigest saved to: {}", digest.path.display());
    Ok(())
}

async fn handle_classify(query: &str, options: &GlobalOptions) -> anyhow::Result<()> {
    let config = load_app_config(options)?;
    let classifier = DomainClassifier::new(build_brain(&config)?);
    let category = classifier.classify(query).await?;
    println!("Category: {}", category);
    println!("Sources:  {}", format_sources(category));
    Ok(())
}

fn handle_sources(category: Option<&str>) -> anyhow::Result<()> {
    match category {
        Some(label) => {
            let category = Category::from_label(label).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown category '{}'. Known categories: {}",
                    label,
                    Category::ALL.map(|c| c.label()).join(", ")
                )
            })?;
            println!("{}", format_sources(category));
        }
        None => {
            for category in Category::ALL {
                println!("{:<22} {}", category.label(), format_sources(category));
            }
        }
    }
    Ok(())
}

fn format_sources(category: Category) -> String {
    select(category)
        .iter()
        .map(|s| s.display_name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn handle_config(action: ConfigAction, options: &GlobalOptions) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace_config_path(&options.workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            write_default_config(&config_path)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_app_config(options)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

fn write_default_config(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let toml_str = toml::to_string_pretty(&AppConfig::default())?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
