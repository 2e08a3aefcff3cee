//! Generate a daily name insight and print it.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable when
//! `--api` is given; without it everything is generated from the built-in
//! catalogs.
//!
//! # Examples
//!
//! ```sh
//! # Today's card for one name
//! nameglow generate "Alexander"
//!
//! # Reproducible output, saved to history and written as HTML
//! nameglow --seed 7 generate "Mary Jane" --save --html card.html
//!
//! # Ask a model for the virtue and nicknames
//! nameglow --api --model anthropic/claude-sonnet-4 generate "Sophia"
//!
//! # Quick comparison across several names
//! nameglow batch Michael Sophia Robert Emma William
//!
//! # Past entries
//! nameglow history "Mary Jane"
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use nameglow::composer::{ContentComposer, DailyContent};
use nameglow::config::NameGlowConfig;
use nameglow::history::{DEFAULT_HISTORY_FILE, HistoryStore, user_id_for};
use nameglow::name::capitalize;
use nameglow::render::{render_alternatives, render_html, render_json, render_text};
use nameglow::{API_KEY_ENV, DEFAULT_MODEL, NameGlowError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Personalized daily insights from a name: anagram, virtue, nicknames, and
/// a reflection prompt.
#[derive(Parser)]
#[command(name = "nameglow")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    // ── Generation ─────────────────────────────────────────────
    /// Ask the model for virtues and nicknames (needs OPENROUTER_KEY)
    #[arg(long, global = true)]
    api: bool,

    /// Model to use with --api
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Upper bound on each model call, in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    /// Seed for random picks (prefixes, suffixes, reflection prompt)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JSON file overriding the built-in word catalogs
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    // ── Storage / output ───────────────────────────────────────
    /// History file
    #[arg(long, global = true, default_value = DEFAULT_HISTORY_FILE)]
    history: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate today's content for a name
    Generate {
        /// The name to transform
        name: String,

        /// Append the result to the history file
        #[arg(long)]
        save: bool,

        /// Also write the HTML card to this file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print the raw JSON record instead of the text summary
        #[arg(long)]
        json: bool,
    },
    /// One summary line per name
    Batch {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show saved entries for a name
    History { name: String },
    /// Prompt for a name, show the result, and offer to save it
    Interactive,
}

impl Cli {
    fn config(&self) -> NameGlowConfig {
        NameGlowConfig {
            use_api: self.api,
            api_key: std::env::var(API_KEY_ENV).ok(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            seed: self.seed,
            history_path: self.history.clone(),
            catalog_path: self.catalog.clone(),
            ..Default::default()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "nameglow=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

// ── Helpers ────────────────────────────────────────────────────────

fn prompt_line(question: &str) -> Result<String, NameGlowError> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Print the text card followed by the alternatives, each with its virtue.
async fn print_with_alternatives(composer: &ContentComposer, content: &DailyContent) {
    print!("{}", render_text(content));
    let assignments = composer
        .assign_virtues(&content.name, &content.alternative_anagrams)
        .await;
    if !assignments.is_empty() {
        println!("\nAlternative anagrams that could be used tomorrow:");
        print!("{}", render_alternatives(&assignments));
    }
}

fn save_content(store: &HistoryStore, content: &DailyContent) -> Result<(), NameGlowError> {
    store.save(&user_id_for(&content.name), content)?;
    eprintln!("  Saved to {}", store.path().display());
    Ok(())
}

fn summary_row(content: &DailyContent) -> String {
    let nickname = |idx: usize| {
        content
            .nicknames
            .get(idx)
            .map_or("", |n| n.nickname.as_str())
    };
    format!(
        "{:<12} {:<12} {:<14} {:<12} {}",
        content.name,
        capitalize(&content.anagram),
        content.virtue,
        nickname(0),
        nickname(1)
    )
}

// ── Commands ───────────────────────────────────────────────────────

async fn run(cli: Cli) -> Result<(), NameGlowError> {
    let config = cli.config();
    let composer = config.build_composer()?;
    let store = config.history_store();

    match cli.command {
        Command::Generate {
            name,
            save,
            html,
            json,
        } => {
            let content = composer.compose(&name).await?;
            if json {
                println!("{}", render_json(&content)?);
            } else {
                print_with_alternatives(&composer, &content).await;
            }
            if let Some(path) = html {
                std::fs::write(&path, render_html(&content))?;
                eprintln!("  Wrote HTML card to {}", path.display());
            }
            if save {
                save_content(&store, &content)?;
            }
        }
        Command::Batch { names } => {
            println!(
                "{:<12} {:<12} {:<14} {:<12} {}",
                "name", "anagram", "virtue", "nickname 1", "nickname 2"
            );
            for name in &names {
                match composer.compose(name).await {
                    Ok(content) => println!("{}", summary_row(&content)),
                    Err(e) => eprintln!("  Skipping '{name}': {e}"),
                }
            }
        }
        Command::History { name } => {
            let entries = store.history(&user_id_for(&name));
            if entries.is_empty() {
                println!("No saved history for {name}");
            }
            for entry in entries {
                let nicknames: Vec<&str> = entry
                    .nicknames
                    .iter()
                    .map(|n| n.nickname.as_str())
                    .collect();
                println!(
                    "{}  {} → {}  ({})",
                    entry.date.format("%Y-%m-%d"),
                    capitalize(&entry.anagram),
                    entry.virtue,
                    nicknames.join(", ")
                );
            }
        }
        Command::Interactive => {
            println!("Welcome to NameGlow!");
            println!("--------------------");
            let name = prompt_line("Enter a name to transform: ")?;
            let content = composer.compose(&name).await?;
            println!();
            print_with_alternatives(&composer, &content).await;

            let answer = prompt_line("\nDo you want to save this result? (y/n): ")?;
            if answer.eq_ignore_ascii_case("y") {
                save_content(&store, &content)?;
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
