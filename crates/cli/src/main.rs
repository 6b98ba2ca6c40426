mod scenario;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{EngineConfig, FilterEngine, SchedulerSummary, ScrollScheduler};
use feed_model::{Engagement, PostRecord, SimPostId};
use pipeline::Fingerprint;
use scenario::{RenderLog, Scenario};
use signals::AccountRef;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// feedguard - live feed content filter
#[derive(Parser)]
#[command(name = "feedguard")]
#[command(about = "Removes posts with banned phrases from a live feed", long_about = None)]
struct Cli {
    /// TOML config file (phrases, scheduler timing, extra rules)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Extra banned phrase, may be repeated
    #[arg(short, long = "phrase", global = true)]
    phrases: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler against a scripted feed and report removals
    Replay {
        /// Scenario JSON file
        #[arg(long)]
        scenario: PathBuf,
    },

    /// Show whether a post would be suppressed
    Check {
        /// Post text
        #[arg(long)]
        text: String,

        /// Author handle or profile URL
        #[arg(long)]
        author: Option<String>,
    },

    /// Print the fingerprint of a post text
    Fingerprint {
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { scenario } => {
            let config = load_config(cli.config.as_deref(), cli.phrases)?;
            handle_replay(config, &scenario).await?
        }
        Commands::Check { text, author } => {
            let config = load_config(cli.config.as_deref(), cli.phrases)?;
            handle_check(&config, text, author)?
        }
        Commands::Fingerprint { text } => handle_fingerprint(&text),
    }

    Ok(())
}

/// Merge the config file (if any) with phrases given on the command line
fn load_config(path: Option<&Path>, phrases: Vec<String>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::read(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config.banned_phrases.extend(phrases);
    config
        .validate()
        .context("Pass --phrase or a config file with banned_phrases")?;
    Ok(config)
}

/// Handle the 'replay' command
async fn handle_replay(config: EngineConfig, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    let scenario = Scenario::from_json(&raw)?;

    let mut log = RenderLog::new();
    let feed = Arc::new(scenario.initial_feed(&mut log));
    println!(
        "Replaying {} posts and {} steps over {}ms",
        scenario.posts.len(),
        scenario.steps.len(),
        scenario.last_step_ms()
    );

    let scheduler = ScrollScheduler::new(
        feed.clone(),
        FilterEngine::from_config(&config),
        &config.scheduler,
    );
    let cancel = CancellationToken::new();
    let session = tokio::spawn(scheduler.run(cancel.clone()));

    // Leave room for one more tick and its settle delay after the last step
    let linger = config.scheduler.poll_interval()
        + config.scheduler.settle_delay()
        + Duration::from_millis(100);
    tokio::select! {
        _ = scenario.play(&feed, &mut log, linger) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping replay");
        }
    }
    cancel.cancel();

    let summary = session.await.context("Scheduler task failed")??;
    print_replay(&summary, &feed.removed_ids(), &log, &feed.rendered_texts());
    Ok(())
}

/// Handle the 'check' command
fn handle_check(config: &EngineConfig, text: String, author: Option<String>) -> Result<()> {
    let phrases = Arc::new(config.phrase_set());
    let policy = config.build_policy(phrases.clone());
    let author_handle = match author {
        Some(author) => AccountRef::parse(&author)
            .context("Invalid --author")?
            .handle()
            .to_string(),
        None => String::new(),
    };
    let record = PostRecord {
        text: Some(text),
        author_handle,
        permalink: String::new(),
        engagement: Engagement::default(),
    };

    match policy.evaluate(&record) {
        Some(rule) => {
            println!("{} suppressed by {}", "✗".red(), rule.bold());
            if let Some(phrase) = phrases.first_match(record.text_or_empty()) {
                println!("   matched phrase: \"{}\"", phrase);
            }
        }
        None => println!("{} kept ({} rules checked)", "✓".green(), policy.len()),
    }
    Ok(())
}

/// Handle the 'fingerprint' command
fn handle_fingerprint(text: &str) {
    println!("{}", Fingerprint::of_text(text));
}

fn print_replay(
    summary: &SchedulerSummary,
    removed: &[SimPostId],
    log: &RenderLog,
    kept: &[Option<String>],
) {
    println!("{}", "Removed:".bold().red());
    for id in removed {
        let text = log.get(id).cloned().flatten().unwrap_or_default();
        println!("  {} {}", "✗".red(), text);
    }
    println!("{}", "Kept:".bold().green());
    for text in kept {
        println!("  {} {}", "✓".green(), text.as_deref().unwrap_or("<unreadable>"));
    }
    println!(
        "{} passes ({} failed), {} suppressed, {} processed",
        summary.passes, summary.failed_passes, summary.suppressed, summary.processed
    );
}
