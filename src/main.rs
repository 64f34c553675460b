//! quran-hybrid - Hybrid Quran Translation Workflow
//!
//! Command-line entry point: prints the chapter list and chapter views
//! built by the workflow, as text tables or as JSON.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use quran_hybrid::cli::{Args, BackendArg, Commands};
use quran_hybrid::config::Config;
use quran_hybrid::synthesis::probe_synthesizer;
use quran_hybrid::view::{ChapterListView, ChapterView};
use quran_hybrid::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let mut config = if args.command.uses_config() {
        load_config(args.config.as_deref())?
    } else {
        Config::default()
    };

    match args.command {
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
            }
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
        Commands::Chapters { json } => {
            let workflow = Workflow::new(config)?;
            let view = workflow.chapter_list().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_chapter_list(&view);
            }
            if view.error.is_some() {
                std::process::exit(1);
            }
        }
        Commands::Chapter { number, json, model, backend } => {
            apply_overrides(&mut config, model, backend);
            let workflow = Workflow::new(config)?;

            let spinner = spinner(format!(
                "Building chapter {} with {}...",
                number,
                workflow.config().synthesis.model
            ));
            let view = workflow.chapter(number).await;
            spinner.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_chapter(&view, &workflow.config().content.translation_ids);
            }
            if !view.is_ok() {
                std::process::exit(1);
            }
        }
        Commands::Probe { model, backend } => {
            apply_overrides(&mut config, model, backend);
            let workflow = Workflow::new(config)?;

            let spinner = spinner(format!("Waiting for {}...", workflow.config().synthesis.model));
            let reply = probe_synthesizer(
                workflow.synthesizer(),
                &workflow.config().synthesis.target_language,
            )
            .await;
            spinner.finish_and_clear();

            println!("{}", reply?);
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".quran-hybrid").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "quran-hybrid.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr so --json stays machine-readable
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("quran-hybrid.log").display());

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(config_path) => Ok(Config::from_file(config_path)?),
        None => {
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Ok(Config::from_file("config.toml")?)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn apply_overrides(config: &mut Config, model: Option<String>, backend: Option<BackendArg>) {
    if let Some(model) = model {
        config.synthesis.model = model;
    }
    if let Some(backend) = backend {
        config.synthesis.backend = backend.into();
    }
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn print_chapter_list(view: &ChapterListView) {
    if let Some(error) = &view.error {
        println!("Error: {}", error);
        return;
    }

    println!("{:<5} {:<20} {:<15} {:<8} {:<10}", "No.", "Name", "Arabic", "Verses", "Revealed");
    println!("{}", "-".repeat(62));
    for chapter in &view.chapters {
        println!("{:<5} {:<20} {:<15} {:<8} {:<10}",
            chapter.id,
            chapter.name_simple,
            chapter.name_arabic,
            chapter.verses_count,
            chapter.revelation_place
        );
    }
}

fn print_chapter(view: &ChapterView, translation_ids: &[u32]) {
    if let Some(error) = &view.error {
        println!("Error: {}", error);
        return;
    }

    if let Some(chapter) = &view.chapter {
        match chapter.translated() {
            Some(meaning) => println!("{}. {} ({}) - {}", chapter.id, chapter.name_simple, chapter.name_arabic, meaning),
            None => println!("{}. {} ({})", chapter.id, chapter.name_simple, chapter.name_arabic),
        }
        println!("{}", "=".repeat(62));
    }

    for verse in &view.verses {
        println!("\n[{}] {}", verse.verse_number, verse.arabic_text);
        for (id, text) in translation_ids.iter().zip(&verse.translations) {
            println!("  {:>5}: {}", id, text);
        }
        println!("  {:>5}: {}", "model", verse.hybrid);
    }

    if let Some(reason) = &view.synthesis_error {
        println!("\nNote: hybrid translations unavailable ({})", reason);
    }
    println!("\nGenerated by {} at {}", view.model, view.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
}
