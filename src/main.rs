mod card;
mod config;
mod dashboard;
mod github;
mod stats;
mod store;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::github::GithubClient;
use crate::store::{HttpDocumentStore, SnapshotStore};

/// statcard — queries the GitHub REST API for a username, aggregates
/// pull-request, commit, and repository statistics, and renders them as
/// a dashboard or a shareable stat card.
#[derive(Parser, Debug)]
#[command(name = "statcard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the dashboard for a GitHub username
    Fetch {
        /// GitHub username to aggregate
        username: String,

        /// Organization names to match the user's PRs against
        #[arg(short, long)]
        org: Vec<String>,

        /// Print the aggregated snapshot as JSON instead of the dashboard
        #[arg(long)]
        json: bool,
    },

    /// Render the stat card and export it as a PNG
    Card {
        /// GitHub username to aggregate
        username: String,

        /// Output path for the PNG (defaults to {username}-github-stats.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Persist the snapshot to the document store and print a share link
        #[arg(long)]
        share: bool,
    },

    /// Look up a shared stat card by its identifier
    View {
        /// Identifier from a share link
        share_id: String,
    },

    /// Interactive dashboard session
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let client = GithubClient::new(config.github.api_base());

    match cli.command {
        Command::Fetch { username, org, json } => {
            run_fetch(&client, &username, &org, json).await?
        }
        Command::Card {
            username,
            output,
            share,
        } => run_card(&client, &config, &username, output.as_deref(), share).await?,
        Command::View { share_id } => run_view(&config, &share_id).await?,
        Command::Dashboard => run_dashboard(&client, &config).await?,
    }

    Ok(())
}

async fn run_fetch(
    client: &GithubClient,
    username: &str,
    orgs: &[String],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dash = Dashboard::default();
    dash.submit_username(client, username).await?;

    for org in orgs {
        if let Err(error) = dash.submit_org(client, org).await {
            warn!(%org, %error, "organization search failed");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dash.snapshot())?);
    } else {
        card::render_dashboard(&dash);
    }
    Ok(())
}

async fn run_card(
    client: &GithubClient,
    config: &Config,
    username: &str,
    output: Option<&Path>,
    share: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dash = Dashboard::default();
    dash.submit_username(client, username).await?;
    let snapshot = dash.snapshot();

    card::render_card(&snapshot);

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| card::default_card_path(username));
    card::export_png(&snapshot, &path)?;
    info!(path = %path.display(), "stat card exported");
    println!("Card saved to {}", path.display().to_string().bold());

    if share {
        share_snapshot(config, &snapshot).await?;
    }
    Ok(())
}

async fn run_view(config: &Config, share_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = HttpDocumentStore::from_config(&config.store)?;
    let snapshot = store.read(share_id).await?;
    card::render_card(&snapshot);
    Ok(())
}

/// Persist the snapshot and print the resulting share link. A write
/// failure gets its own prominent message, distinct from the inline
/// fetch-error banners.
async fn share_snapshot(
    config: &Config,
    snapshot: &stats::StatsSnapshot,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = HttpDocumentStore::from_config(&config.store)?;
    let id = match store.write(snapshot).await {
        Ok(id) => id,
        Err(error) => {
            eprintln!("{}", "Error generating share link".red().bold());
            return Err(error.into());
        }
    };

    match config.store.share_url(&id) {
        Some(url) => println!("Share this link: {}", url.bold()),
        None => println!("Shared snapshot id: {}", id.bold()),
    }
    Ok(())
}

/// Interactive session mirroring the dashboard flow: submit a username,
/// drill into organizations, export or share the card, all against one
/// controller whose state resets on each new user.
async fn run_dashboard(
    client: &GithubClient,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "GitHub User Dashboard".bold());
    println!("commands: user <name>, org <name>, card [path], share, quit");

    let mut dash = Dashboard::default();
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "user" => {
                if let Err(error) = dash.submit_username(client, arg).await {
                    println!("{} {}", "error:".red().bold(), error);
                } else {
                    card::render_dashboard(&dash);
                }
            }
            "org" => {
                if let Err(error) = dash.submit_org(client, arg).await {
                    println!("{} {}", "error:".red().bold(), error);
                } else {
                    card::render_dashboard(&dash);
                }
            }
            "card" => {
                let Some(username) = dash.username().map(str::to_string) else {
                    println!("No user loaded yet.");
                    continue;
                };
                let snapshot = dash.snapshot();
                card::render_card(&snapshot);
                let path = if arg.is_empty() {
                    card::default_card_path(&username)
                } else {
                    PathBuf::from(arg)
                };
                match card::export_png(&snapshot, &path) {
                    Ok(()) => println!("Card saved to {}", path.display().to_string().bold()),
                    Err(error) => println!("{} {}", "error:".red().bold(), error),
                }
            }
            "share" => {
                if dash.username().is_none() {
                    println!("No user loaded yet.");
                    continue;
                }
                if let Err(error) = share_snapshot(config, &dash.snapshot()).await {
                    println!("{} {}", "error:".red().bold(), error);
                }
            }
            "quit" | "exit" => break,
            "" => {}
            _ => println!("unknown command: {command}"),
        }
    }

    Ok(())
}
