use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use airport_dests::compare::{self, Phase};
use airport_dests::config::Settings;
use airport_dests::fetch::{self, ProxyChain};
use airport_dests::parser::locate::StrategySet;
use airport_dests::parser::rows::ResetPolicy;
use airport_dests::wiki::WikiClient;
use airport_dests::{build_destination_index_with, merge_indices, render, ParseOptions};

#[derive(Parser)]
#[command(
    name = "airport_dests",
    about = "Compare passenger destinations of two airports from Wikipedia"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up both airports, fetch their articles and compare destinations
    Compare {
        /// First airport code (e.g. LHR)
        code_a: String,
        /// Second airport code (e.g. JFK)
        code_b: String,
        #[command(flatten)]
        parse: ParseArgs,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract the destination index from a saved article
    Parse {
        file: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        /// Print the index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare two saved articles
    Diff {
        file_a: PathBuf,
        file_b: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the Wikipedia article URL for an airport code
    Lookup { code: String },
    /// Fetch an article through the proxy chain and print its HTML
    Fetch { url: String },
}

#[derive(Args)]
struct ParseArgs {
    /// Read every table row, ignoring the alphabetical-reset heuristic
    #[arg(long)]
    no_reset: bool,
    /// Table selection: union, heading-scope or caption
    #[arg(long)]
    strategy: Option<StrategySet>,
}

impl ParseArgs {
    fn options(&self, settings: &Settings) -> ParseOptions {
        let mut opts = settings.parse_options();
        if self.no_reset {
            opts.reset = ResetPolicy::Off;
        }
        if let Some(strategy) = self.strategy {
            opts.strategies = strategy;
        }
        opts
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;

    let result = match cli.command {
        Commands::Compare {
            code_a,
            code_b,
            parse,
            json,
        } => {
            let opts = parse.options(&settings);
            let spinner = spinner();
            let comparison = compare::compare_airports(&settings, &opts, &code_a, &code_b, |phase| {
                spinner.set_message(match phase {
                    Phase::Searching => "Searching for Wikipedia pages...",
                    Phase::Fetching => "Fetching destination data...",
                })
            })
            .await;
            spinner.finish_and_clear();
            let comparison = comparison?;

            println!("{}: {}", comparison.code_a, comparison.url_a);
            println!("{}: {}\n", comparison.code_b, comparison.url_b);
            print_rows(&comparison.code_a, &comparison.code_b, &comparison.rows, json)
        }
        Commands::Parse { file, parse, json } => {
            let html = read_html(&file)?;
            let index = build_destination_index_with(&html, &parse.options(&settings));
            if json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else if index.is_empty() {
                println!("No passenger destination data found in {}.", file.display());
            } else {
                print!("{}", render::index_text(&index));
            }
            Ok(())
        }
        Commands::Diff {
            file_a,
            file_b,
            parse,
            json,
        } => {
            let opts = parse.options(&settings);
            let index_a = build_destination_index_with(&read_html(&file_a)?, &opts);
            let index_b = build_destination_index_with(&read_html(&file_b)?, &opts);
            if index_a.is_empty() && index_b.is_empty() {
                println!("{}", render::NO_DATA);
                return Ok(());
            }
            let rows = merge_indices(&index_a, &index_b);
            print_rows(&label(&file_a), &label(&file_b), &rows, json)
        }
        Commands::Lookup { code } => {
            let client = fetch::http_client(&settings)?;
            let wiki = WikiClient::new(client, settings.search_api.clone());
            let url = wiki
                .article_url(code.trim())
                .await
                .with_context(|| format!("Failed to search Wikipedia for {code}"))?;
            println!("{url}");
            Ok(())
        }
        Commands::Fetch { url } => {
            let client = fetch::http_client(&settings)?;
            let chain = ProxyChain::new(client, &settings);
            let html = chain.fetch_html(&url).await?;
            print!("{html}");
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn print_rows(
    code_a: &str,
    code_b: &str,
    rows: &[airport_dests::ComparisonRow],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", render::comparison_json(rows)?);
    } else if rows.is_empty() {
        println!("{}", render::NO_COMPARABLE);
    } else {
        print!("{}", render::comparison_text(code_a, code_b, rows));
    }
    Ok(())
}

fn read_html(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
