use anyhow::{bail, Context};
use clap::Parser;
use repodeck_core::{
    format::{format_count, format_date},
    views::{DetailView, SearchView, Section},
    Config, FavoritesStore, GitHubGateway,
};
use repodeck_tui::{run_tui, App};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repodeck")]
#[command(version, about = "Browse GitHub repositories from the terminal", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, global = true, env = "REPODECK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search for repositories
    Search {
        /// Search query
        query: String,

        /// Maximum number of results to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show repository details
    Show {
        /// Repository name (owner/repo)
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file instead
    init_tracing(cli.command.is_none())?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(api_url) = cli.api_url {
        config.github.api_url = api_url;
    }

    let gateway = GitHubGateway::from_config(&config.github)?;
    let favorites = FavoritesStore::new();

    match cli.command {
        Some(Commands::Search { query, limit }) => {
            tracing::info!("Searching for: {}", query);
            print_search(&gateway, favorites, &query, limit).await?;
        }
        Some(Commands::Show { name }) => {
            tracing::info!("Showing repository: {}", name);
            print_details(&gateway, favorites, &name, config.detail.contributors_limit).await?;
        }
        None => {
            let app = App::new(favorites, config.detail.contributors_limit);
            run_tui(app, Arc::new(gateway), config.ui.mouse_enabled).await?;
        }
    }

    Ok(())
}

fn init_tracing(to_file: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "repodeck=info".into());

    if to_file {
        let dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("repodeck");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("repodeck.log"))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

async fn print_search(
    gateway: &GitHubGateway,
    favorites: FavoritesStore,
    query: &str,
    limit: usize,
) -> anyhow::Result<()> {
    let mut view = SearchView::new(favorites);
    view.search(gateway, query).await;

    if let Some(error) = view.error() {
        bail!("{}", error);
    }
    if view.results().is_empty() {
        println!("No repositories found.");
        return Ok(());
    }

    for repo in view.results().iter().take(limit) {
        println!(
            "{}  ★ {}  {}",
            repo.full_name,
            format_count(repo.stars),
            repo.language.as_deref().unwrap_or("-")
        );
        if let Some(description) = &repo.description {
            println!("    {}", description);
        }
    }

    Ok(())
}

async fn print_details(
    gateway: &GitHubGateway,
    favorites: FavoritesStore,
    name: &str,
    contributors_limit: usize,
) -> anyhow::Result<()> {
    match name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {}
        _ => bail!("Expected owner/repo, got '{}'", name),
    }

    let mut search = SearchView::new(favorites.clone());
    search.search(gateway, &format!("repo:{}", name)).await;
    if let Some(error) = search.error() {
        bail!("{}", error);
    }
    let Some(record) = search
        .results()
        .iter()
        .find(|r| r.full_name.eq_ignore_ascii_case(name))
        .cloned()
    else {
        bail!("Repository '{}' not found", name);
    };

    let mut detail = DetailView::new(record, favorites, contributors_limit);
    detail.load(gateway).await;
    let repo = detail.record();

    println!("{}", repo.full_name);
    if let Some(description) = &repo.description {
        println!("{}", description);
    }
    println!(
        "★ {}  forks {}  watchers {}  open issues {}",
        format_count(repo.stars),
        format_count(repo.forks),
        format_count(repo.watchers),
        format_count(repo.open_issues)
    );
    println!(
        "Created {}  Updated {}",
        format_date(&repo.created_at),
        format_date(&repo.updated_at)
    );
    println!("{}", repo.html_url);

    println!("\nTop contributors:");
    match detail.contributors() {
        Section::Ready(contributors) => {
            for c in contributors {
                println!("  {} ({} commits)", c.login, c.contributions);
            }
        }
        Section::Failed(e) => println!("  unavailable: {}", e),
        _ => println!("  none listed"),
    }

    println!();
    match detail.readme() {
        Section::Ready(readme) => println!("{}", readme.text),
        Section::Failed(e) => println!("README unavailable: {}", e),
        _ => println!("No README."),
    }

    Ok(())
}
