// file: src/main.rs
// description: commandline application entry point with command handling

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::*;
use desk_research::utils::logging::{format_error, format_heading, format_link};
use desk_research::{
    agents, analyze, report, stocks, AppError, ArxivClient, ChatClient, Config, ContentFetcher,
    EnrichedResult, GroupChat, MarketDataClient, Paper, WebSearchClient,
};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "desk_research")]
#[command(version = "0.1.0")]
#[command(about = "Company research, literature review and travel planning from the terminal", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Web-search a company and enrich each hit with a page excerpt
    Research {
        company: String,

        #[arg(short, long, value_name = "NUM")]
        results: Option<usize>,

        #[arg(long, value_name = "CHARS")]
        max_chars: Option<usize>,
    },

    /// Analyze a year of price history for a ticker
    Stock {
        ticker: String,

        #[arg(long)]
        no_chart: bool,
    },

    /// Literature review over arXiv or the open web
    Literature {
        topic: String,

        #[arg(short, long, value_enum, default_value_t = Source::Arxiv)]
        source: Source,

        #[arg(short, long, value_name = "NUM")]
        results: Option<usize>,
    },

    /// Plan a trip with the round-robin agent team
    Travel {
        destination: String,

        #[arg(short, long, default_value_t = 3)]
        days: u32,

        #[arg(
            short,
            long,
            default_value = "I want adventure and local experiences."
        )]
        preferences: String,
    },

    /// Combined report: search results plus the stock metric block
    Report {
        company: String,

        #[arg(short, long)]
        ticker: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Arxiv,
    Web,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    desk_research::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Research {
            company,
            results,
            max_chars,
        } => {
            cmd_research(&config, &company, results, max_chars).await?;
        }
        Commands::Stock { ticker, no_chart } => {
            cmd_stock(&config, &ticker, no_chart).await?;
        }
        Commands::Literature {
            topic,
            source,
            results,
        } => {
            cmd_literature(&config, &topic, source, results).await?;
        }
        Commands::Travel {
            destination,
            days,
            preferences,
        } => {
            cmd_travel(&config, &destination, days, &preferences).await?;
        }
        Commands::Report { company, ticker } => {
            cmd_report(&config, &company, &ticker).await?;
        }
    }

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn cmd_research(
    config: &Config,
    company: &str,
    results: Option<usize>,
    max_chars: Option<usize>,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(results) = results {
        config.search.num_results = results;
    }
    if let Some(max_chars) = max_chars {
        config.fetcher.max_chars = max_chars;
    }

    let search = WebSearchClient::new(&config.search)?;
    let fetcher = ContentFetcher::new(&config.fetcher)?;

    let bar = spinner("Searching...");
    let enriched = search.search_enriched(company, &fetcher).await;
    bar.finish_and_clear();

    let enriched = enriched.context("Company search failed")?;
    info!("Found {} results for {}", enriched.len(), company);
    print_enriched(&enriched);

    Ok(())
}

async fn cmd_stock(config: &Config, ticker: &str, no_chart: bool) -> Result<()> {
    let client = MarketDataClient::new(&config.stocks)?;

    let bar = spinner("Analyzing...");
    let history = client.history(ticker).await;
    bar.finish_and_clear();

    let history = history.context("Failed to fetch price history")?;

    let analysis = match analyze(&history) {
        Ok(analysis) => analysis,
        Err(AppError::NoHistoricalData) => {
            // Displayed, not propagated: a bad ticker is a user-input
            // problem, and nothing gets plotted.
            eprintln!("{}", format_error(&AppError::NoHistoricalData.to_string()));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&analysis)?);

    if !no_chart {
        println!();
        println!(
            "{}",
            stocks::chart::render(
                &history,
                stocks::chart::DEFAULT_WIDTH,
                stocks::chart::DEFAULT_HEIGHT
            )
        );
    }

    Ok(())
}

async fn cmd_literature(
    config: &Config,
    topic: &str,
    source: Source,
    results: Option<usize>,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(results) = results {
        config.arxiv.max_results = results;
        config.search.num_results = results;
    }

    match source {
        Source::Arxiv => {
            let client = ArxivClient::new(&config.arxiv);

            let bar = spinner("Loading...");
            let papers = client.search(topic).await;
            bar.finish_and_clear();

            let papers = papers.context("arXiv search failed")?;
            println!("{}", format_heading("Arxiv Search Results"));
            println!();
            for paper in &papers {
                print_paper(paper);
            }
        }
        Source::Web => {
            let search = WebSearchClient::new(&config.search)?;
            let fetcher = ContentFetcher::new(&config.fetcher)?;

            let bar = spinner("Loading...");
            let enriched = search.search_enriched(topic, &fetcher).await;
            bar.finish_and_clear();

            let enriched = enriched.context("Web search failed")?;
            println!("{}", format_heading("Web Search Results"));
            println!();
            print_enriched(&enriched);
        }
    }

    Ok(())
}

async fn cmd_travel(
    config: &Config,
    destination: &str,
    days: u32,
    preferences: &str,
) -> Result<()> {
    let client = ChatClient::new(&config.llm)?;
    let chat = GroupChat::new(client, agents::travel_team(), &config.agents);
    let task = agents::travel_task(destination, days, preferences);

    println!("{}", format_heading("Planning your trip..."));
    println!();

    let transcript = chat
        .run(&task, |message| {
            println!("{}", format!("{}:", message.sender).bold());
            println!("{}", message.content);
            println!();
        })
        .await
        .context("Travel planning conversation failed")?;

    info!("Conversation finished after {} turns", transcript.len());
    Ok(())
}

async fn cmd_report(config: &Config, company: &str, ticker: &str) -> Result<()> {
    let search = WebSearchClient::new(&config.search)?;
    let fetcher = ContentFetcher::new(&config.fetcher)?;
    let market = MarketDataClient::new(&config.stocks)?;

    let bar = spinner("Generating report...");
    let enriched = search.search_enriched(company, &fetcher).await;
    let history = market.history(ticker).await;
    bar.finish_and_clear();

    let enriched = enriched.context("Company search failed")?;
    let history = history.context("Failed to fetch price history")?;

    let analysis = match analyze(&history) {
        Ok(analysis) => Some(analysis),
        Err(AppError::NoHistoricalData) => None,
        Err(e) => return Err(e.into()),
    };

    let rendered = report::render(company, ticker, &enriched, analysis.as_ref())?;
    println!("{rendered}");

    Ok(())
}

fn print_enriched(results: &[EnrichedResult]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    for result in results {
        println!("{}", format_heading(&result.title));
        if !result.snippet.is_empty() {
            println!("{}", result.snippet);
        }
        if !result.body.is_empty() {
            println!("{}", result.body);
        }
        println!("{}", format_link(&result.link));
        println!("{}", "---".dimmed());
    }
}

fn print_paper(paper: &Paper) {
    println!("{}", format_heading(&paper.title));
    println!("Authors: {}", paper.authors.join(", "));
    println!("Published: {}", paper.published);
    println!("{}", paper.summary);
    println!("{}", format_link(&paper.pdf_url));
    println!("{}", "---".dimmed());
}
