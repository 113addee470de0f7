//! statusboard - project status dashboard backed by Notion and Supabase

mod cli;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use statusboard_core::config::{
    ENV_NOTION_API_KEY, ENV_NOTION_DATABASE_ID_PROJECTS, ENV_NOTION_DATABASE_ID_SERVICES,
    ENV_SUPABASE_SERVICE_ROLE_KEY, ENV_SUPABASE_URL,
};
use statusboard_core::{DashboardConfig, DashboardStore, NotionConfig, SupabaseConfig};
use statusboard_types::HelpRequestOrder;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "statusboard",
    version,
    about = "Project status dashboard backed by Notion and Supabase",
    long_about = "Mirrors the projects and services Notion databases into a status page and\n\
                  JSON API, and hosts an anonymous help board stored in Supabase.\n\
                  \n\
                  Examples:\n\
                    statusboard                          # Run web server (default)\n\
                    statusboard serve --port 8080        # Custom port\n\
                    statusboard projects --search AI     # Filter projects\n\
                    statusboard services --json          # Services as JSON\n\
                    statusboard schema                   # Inspect the projects database\n\
                    statusboard check                    # Verify configuration\n\
                    statusboard board post \"질문\"        # Post to the help board\n\
                  \n\
                  Without Supabase settings the help board is kept in memory."
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Notion integration token
    #[arg(long, env = ENV_NOTION_API_KEY, hide_env_values = true)]
    notion_api_key: Option<String>,

    /// Projects database id
    #[arg(long, env = ENV_NOTION_DATABASE_ID_PROJECTS)]
    projects_database: Option<String>,

    /// Services database id
    #[arg(long, env = ENV_NOTION_DATABASE_ID_SERVICES)]
    services_database: Option<String>,

    /// Notion API base URL
    #[arg(long, env = "STATUSBOARD_NOTION_BASE_URL")]
    notion_base_url: Option<String>,

    /// Supabase project URL
    #[arg(long, env = ENV_SUPABASE_URL)]
    supabase_url: Option<String>,

    /// Supabase service role key
    #[arg(long, env = ENV_SUPABASE_SERVICE_ROLE_KEY, hide_env_values = true)]
    supabase_key: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "STATUSBOARD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, env = "STATUSBOARD_LOG_FORMAT", value_parser = ["text", "json"], default_value = "text")]
    log_format: String,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "STATUSBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Run web server with status page and API (default)
    Serve {
        /// Port for web server
        #[arg(long, default_value = "3333")]
        port: u16,
    },
    /// Print the project table and stage counts
    Projects {
        /// Bypass the response cache
        #[arg(long)]
        refresh: bool,
        /// Filter by title, status, PM, company or stage
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print services and their distributions
    Services {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Describe a Notion database schema
    Schema {
        /// Database id (default: projects database)
        database: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify configuration and connectivity
    Check,
    /// Community help board
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },
}

#[derive(Subcommand)]
enum BoardAction {
    /// List help requests
    List {
        /// latest, oldest or popular
        #[arg(long, default_value = "latest")]
        order: HelpRequestOrder,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Post an anonymous help request
    Post {
        content: String,
    },
    /// Like a help request
    Like {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format == "json", cli.no_color);

    let config = build_config(&cli);
    let no_color = cli.no_color;
    let store = Arc::new(DashboardStore::new(config).context("Failed to initialize dashboard")?);
    debug!(?store, "Store initialized");

    match cli.mode.unwrap_or(Mode::Serve { port: 3333 }) {
        Mode::Serve { port } => run_serve(store, port).await?,
        Mode::Projects {
            refresh,
            search,
            json,
        } => run_projects(&store, refresh, search, json, no_color).await?,
        Mode::Services { json } => run_services(&store, json, no_color).await?,
        Mode::Schema { database, json } => run_schema(&store, database, json, no_color).await?,
        Mode::Check => run_check(&store, no_color).await?,
        Mode::Board { action } => run_board(&store, action, no_color).await?,
    }

    Ok(())
}

fn init_logging(level: &str, json: bool, no_color: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout is reserved for command output
    let fmt_layer = if json {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_ansi(!no_color)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_config(cli: &Cli) -> DashboardConfig {
    let mut notion = NotionConfig {
        api_key: non_blank(&cli.notion_api_key),
        projects_database_id: non_blank(&cli.projects_database),
        services_database_id: non_blank(&cli.services_database),
        ..NotionConfig::default()
    };
    if let Some(base_url) = non_blank(&cli.notion_base_url) {
        notion = notion.with_base_url(base_url);
    }

    let supabase = SupabaseConfig::new(non_blank(&cli.supabase_url), non_blank(&cli.supabase_key));
    DashboardConfig::new(notion, supabase)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

async fn run_serve(store: Arc<DashboardStore>, port: u16) -> Result<()> {
    let state = store.degraded_state();
    if state.is_degraded() {
        eprintln!("⚠ {}", cli::format_missing(&store.config().missing_vars()));
    }
    info!(port, "Starting web server");
    statusboard_web::run(store, port).await
}

async fn run_projects(
    store: &DashboardStore,
    refresh: bool,
    search: Option<String>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let page = store.projects(refresh).await;
    if let Some(error) = &page.status.error {
        bail!("{}", error);
    }

    let term = search.unwrap_or_default();
    let rows = statusboard_core::views::filter_projects(&page.projects, &term);
    println!("{}", cli::format_projects(&rows, &page.stats, json, no_color));

    if let Some(changes) = &page.changes {
        if !json && !changes.is_empty() {
            println!("\n{}", cli::format_changes(changes));
        }
    }
    Ok(())
}

async fn run_services(store: &DashboardStore, json: bool, no_color: bool) -> Result<()> {
    let page = store.services(false).await;
    if let Some(error) = &page.status.error {
        bail!("{}", error);
    }
    println!("{}", cli::format_services(&page, json, no_color));
    Ok(())
}

async fn run_schema(
    store: &DashboardStore,
    database: Option<String>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let database = database
        .or_else(|| store.config().notion.projects_database_id.clone())
        .with_context(|| {
            format!(
                "No database given and {} is not set",
                ENV_NOTION_DATABASE_ID_PROJECTS
            )
        })?;

    let schema = store.notion().schema(&database).await?;
    println!("{}", cli::format_schema(&schema.report(), json, no_color));
    Ok(())
}

async fn run_check(store: &DashboardStore, no_color: bool) -> Result<()> {
    let missing = store.config().missing_vars();
    println!("{}", cli::format_env_status(&missing, no_color));

    let mut failures = Vec::new();
    for (label, page) in [
        ("projects", store.projects(true).await.status),
        ("services", store.services(true).await.status),
    ] {
        match page.error {
            Some(error) => {
                println!("✗ {label}: {error}");
                failures.push(label);
            }
            None => println!("✓ {label}: reachable"),
        }
    }
    println!("✓ help board: {}", store.board().backend());

    if !missing.is_empty() {
        bail!("{}", cli::format_missing(&missing));
    }
    if !failures.is_empty() {
        bail!("Notion fetch failed for: {}", failures.join(", "));
    }
    Ok(())
}

async fn run_board(store: &DashboardStore, action: BoardAction, no_color: bool) -> Result<()> {
    let board = store.board();
    match action {
        BoardAction::List { order, json } => {
            let requests = board.list(order).await?;
            println!(
                "{}",
                cli::format_requests(&requests, chrono::Utc::now(), json, no_color)
            );
        }
        BoardAction::Post { content } => {
            let posted = board.submit(&content).await?;
            let order = board.order_of(&posted.id).await;
            println!(
                "{} #{} posted{}",
                posted.emoji,
                posted.id,
                order.map(|n| format!(" ({}번째 요청)", n)).unwrap_or_default()
            );
        }
        BoardAction::Like { id } => {
            let liked = board.like(&id).await?;
            println!("♥ #{} now has {} likes", liked.id, liked.likes);
        }
    }
    Ok(())
}
