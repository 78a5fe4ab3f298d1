use std::path::PathBuf;

use chrono::SecondsFormat;
use clap::{Parser, Subcommand};
use dxreport_core::constants::{self, env};
use dxreport_core::store::{SqliteSubmissionStore, SubmissionStore};
use dxreport_core::summariser::{build_summary_prompt, OpenAiSummariser, Summariser};
use dxreport_core::CoreConfig;

#[derive(Parser)]
#[command(name = "dxreport")]
#[command(about = "DXReport diagnostic report simplifier CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored submissions
    List {
        /// Only show submissions of this center (exact match)
        #[arg(long)]
        center: Option<String>,
    },
    /// Summarise a local report file without storing anything
    Summarise {
        /// Path to the report file
        file: PathBuf,
        /// Print the prompt instead of calling the summariser
        #[arg(long)]
        dry_run: bool,
    },
    /// List the models available to the configured API key
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { center }) => {
            let database_url = std::env::var(env::DATABASE_URL)
                .unwrap_or_else(|_| constants::DEFAULT_DATABASE_URL.into());
            let store = SqliteSubmissionStore::open(&database_url)?;
            let submissions = store.find_by_center(center.as_deref())?;
            if submissions.is_empty() {
                println!("No submissions found.");
            } else {
                for s in submissions {
                    println!(
                        "ID: {}, Center: {}, Patient: {}, Original: {}, Simplified: {}, Created: {}",
                        s.id,
                        s.center_id,
                        s.patient_name,
                        s.original_report_url,
                        s.simplified_report_url.as_deref().unwrap_or("-"),
                        s.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
                    );
                }
            }
        }
        Some(Commands::Summarise { file, dry_run }) => {
            let bytes = std::fs::read(&file)?;
            let content = String::from_utf8_lossy(&bytes);
            if dry_run {
                println!("{}", build_summary_prompt(&content));
                return Ok(());
            }
            let cfg = CoreConfig::from_lookup(|name| std::env::var(name).ok())?;
            let summariser = OpenAiSummariser::new(cfg.openai())?;
            let summary = summariser
                .summarise(&build_summary_prompt(&content), cfg.summary_max_tokens())
                .await?;
            println!("{}", summary.trim());
        }
        Some(Commands::Models) => {
            let cfg = CoreConfig::from_lookup(|name| std::env::var(name).ok())?;
            let summariser = OpenAiSummariser::new(cfg.openai())?;
            for model in summariser.list_models().await? {
                println!("{model}");
            }
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
