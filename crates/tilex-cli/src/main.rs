//! Tilex CLI - manage and search blog articles

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tilex_core::config::Config;
use tilex_core::domain::article::{
    ArticleRepositoryTrait, ArticleService, ArticleStatus, ArticleUpdate, ArticleView, NewArticle,
    SqliteArticleRepository, TIMESTAMP_FORMAT, parse_timestamp,
};
use tilex_core::domain::listing::{PageRequest, PageResult};
use tilex_core::domain::search::SearchResult;
use tilex_core::storage::{Database, DatabaseConfig};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "tilex")]
#[command(author, version, about = "Blog articles with keyword search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Database file (overrides database.path from the config)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage articles
    Articles {
        #[command(subcommand)]
        action: ArticleAction,
    },

    /// Search article titles and contents
    Search {
        /// Keyword, matched literally and case-insensitively
        keyword: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Database maintenance
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum ArticleAction {
    /// List articles, one page at a time
    List {
        /// List every article without pagination
        #[arg(long)]
        all: bool,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Page size (defaults to listing.default_page_size)
        #[arg(short, long)]
        size: Option<u32>,
        /// Only titles containing this text
        #[arg(long)]
        title: Option<String>,
        /// Only this status (draft, published or a numeric code)
        #[arg(long)]
        status: Option<String>,
        /// createdAt, updatedAt, title or status
        #[arg(long)]
        sort_field: Option<String>,
        /// asc or desc
        #[arg(long)]
        sort_order: Option<String>,
    },
    /// Show one article
    Get { id: i64 },
    /// Create an article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// draft, published or a numeric code
        #[arg(long)]
        status: Option<String>,
        /// yyyy-MM-dd HH:mm:ss or yyyy-MM-dd
        #[arg(long)]
        created_at: Option<String>,
    },
    /// Change fields of an article
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete an article
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show configuration file path
    Path,
}

#[derive(Subcommand)]
enum DbAction {
    /// Show schema version and health
    Status,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tilex=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;
    if let Err(e) = &result {
        if let Some(suggestion) = e
            .downcast_ref::<tilex_core::Error>()
            .and_then(|e| e.suggestion())
        {
            eprintln!("Hint: {}", suggestion);
        }
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Articles { action } => {
            let config = Config::load()?;
            let db = open_database(&config, cli.database.as_ref(), true).await?;
            let service = article_service(&db, &config);
            cmd_articles(&service, &config, action, cli.format, cli.quiet).await
        }

        Commands::Search { keyword } => {
            let config = Config::load()?;
            let db = open_database(&config, cli.database.as_ref(), true).await?;
            let service = article_service(&db, &config);
            cmd_search(&service, &keyword, cli.format, cli.quiet).await
        }

        Commands::Config { action } => cmd_config(action, cli.format, cli.quiet),

        Commands::Db { action } => {
            let config = Config::load()?;
            cmd_db(&config, cli.database.as_ref(), action, cli.format, cli.quiet).await
        }
    }
}

async fn open_database(
    config: &Config,
    path: Option<&PathBuf>,
    migrate: bool,
) -> anyhow::Result<Database> {
    let mut db_config = DatabaseConfig::from_settings(&config.database);
    if let Some(path) = path {
        db_config.path = path.clone();
    }
    if !migrate {
        db_config = db_config.no_migrate();
    }

    debug!(path = %db_config.path.display(), "Opening database");
    Database::new(db_config).await
}

fn article_service(db: &Database, config: &Config) -> ArticleService {
    let repository = Arc::new(SqliteArticleRepository::new(db.pool().clone()));
    ArticleService::from_config(repository, config)
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_articles(
    service: &ArticleService,
    config: &Config,
    action: ArticleAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    match action {
        ArticleAction::List { all: true, .. } => {
            let articles = service.list_all().await?;
            if format == OutputFormat::Json {
                return print_json(&articles);
            }
            if articles.is_empty() {
                if !quiet {
                    println!("No articles found.");
                    println!("\nCreate one with: tilex articles create --title <title> --content <content>");
                }
                return Ok(());
            }
            for article in &articles {
                print_article_line(article);
            }
        }
        ArticleAction::List {
            all: false,
            page,
            size,
            title,
            status,
            sort_field,
            sort_order,
        } => {
            let mut request =
                PageRequest::new(page, size.unwrap_or(config.listing.default_page_size));
            request.title = title;
            request.status = status.as_deref().map(parse_status_code).transpose()?;
            request.sort_field = sort_field;
            request.sort_order = sort_order;

            let page = service.list_page(&request).await?;
            if format == OutputFormat::Json {
                return print_json(&page);
            }
            print_page(&page, quiet);
        }
        ArticleAction::Get { id } => {
            let article = service.get_by_id(id).await?;
            if format == OutputFormat::Json {
                return print_json(&article);
            }
            print_article(&article);
        }
        ArticleAction::Create {
            title,
            content,
            status,
            created_at,
        } => {
            let mut article = NewArticle::new(title, content);
            if let Some(status) = status.as_deref() {
                article = article.with_status(parse_status(status)?);
            }
            if let Some(created_at) = created_at.as_deref() {
                let created_at = parse_timestamp(created_at)
                    .ok_or_else(|| anyhow!("Invalid timestamp '{}'", created_at))?;
                article = article.with_created_at(created_at);
            }

            let created = service.create(article).await?;
            if format == OutputFormat::Json {
                return print_json(&created);
            }
            if !quiet {
                println!("Article created successfully!");
            }
            print_article(&created);
        }
        ArticleAction::Update {
            id,
            title,
            content,
            status,
        } => {
            let changes = ArticleUpdate {
                title,
                content,
                status: status.as_deref().map(parse_status).transpose()?,
            };

            let updated = service.update(id, changes).await?;
            if format == OutputFormat::Json {
                return print_json(&updated);
            }
            if !quiet {
                println!("Article {} updated.", id);
            }
            print_article(&updated);
        }
        ArticleAction::Delete { id } => {
            service.delete(id).await?;
            if format == OutputFormat::Json {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            if !quiet {
                println!("Article {} deleted.", id);
            }
        }
    }
    Ok(())
}

async fn cmd_search(
    service: &ArticleService,
    keyword: &str,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling search");
            on_interrupt.cancel();
        }
    });

    let results = service.search_cancellable(keyword, &token).await?;

    if format == OutputFormat::Json {
        return print_json(&results);
    }

    if results.is_empty() {
        if !quiet {
            println!("No articles match '{}'.", keyword);
        }
        return Ok(());
    }

    if !quiet {
        println!("{} article(s) match '{}':", results.len(), keyword);
    }
    for result in &results {
        print_search_result(result);
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            if format == OutputFormat::Json {
                let map: serde_json::Map<String, serde_json::Value> = items
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::String(value)))
                    .collect();
                return print_json(&map);
            }
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_db(
    config: &Config,
    path: Option<&PathBuf>,
    action: DbAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let db = open_database(config, path, false).await?;

    match action {
        DbAction::Status => {
            db.health_check().await?;
            let status = db.migration_status().await?;
            // The articles table only exists once migrations have run
            let articles = if status.needs_migration {
                None
            } else {
                Some(SqliteArticleRepository::new(db.pool().clone()).count().await?)
            };
            if format == OutputFormat::Json {
                return print_json(&serde_json::json!({
                    "path": db.path().display().to_string(),
                    "currentVersion": status.current_version,
                    "targetVersion": status.target_version,
                    "needsMigration": status.needs_migration,
                    "articles": articles,
                }));
            }
            println!("Database: {}", db.path().display());
            println!("  Schema version: {}", status.current_version);
            println!("  Latest version: {}", status.target_version);
            if let Some(count) = articles {
                println!("  Articles: {}", count);
            }
            if status.needs_migration {
                println!("  Migrations pending. Run `tilex db migrate`.");
            } else {
                println!("  Up to date.");
            }
        }
        DbAction::Migrate => {
            db.migrate().await?;
            let status = db.migration_status().await?;
            if format == OutputFormat::Json {
                return print_json(&status);
            }
            if !quiet {
                println!(
                    "Database is at schema version {}.",
                    status.current_version
                );
            }
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_status(raw: &str) -> anyhow::Result<ArticleStatus> {
    ArticleStatus::parse(raw)
        .ok_or_else(|| anyhow!("Invalid status '{}'. Use draft, published or a number.", raw))
}

fn parse_status_code(raw: &str) -> anyhow::Result<i64> {
    parse_status(raw)?
        .code()
        .ok_or_else(|| anyhow!("Invalid status '{}'", raw))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_article_line(article: &ArticleView) {
    println!(
        "  {:>4}  {}  [{}]  {}",
        article.id,
        article.created_at.format(TIMESTAMP_FORMAT),
        article.status_name,
        article.title
    );
}

fn print_article(article: &ArticleView) {
    println!("Article: {}", article.title);
    println!("  ID: {}", article.id);
    println!("  Status: {}", article.status_name);
    println!("  Created: {}", article.created_at.format(TIMESTAMP_FORMAT));
    println!("  Updated: {}", article.updated_at.format(TIMESTAMP_FORMAT));
    println!();
    println!("{}", article.content);
}

fn print_page(page: &PageResult<ArticleView>, quiet: bool) {
    if !quiet {
        println!(
            "Page {} of {} ({} article(s), {} per page)",
            page.page_num, page.total_pages, page.total, page.page_size
        );
    }
    for article in &page.records {
        print_article_line(article);
    }
}

fn print_search_result(result: &SearchResult) {
    println!("[{}] {}", result.id, result.title);
    for snippet in &result.snippets {
        println!("    {}", snippet);
    }
}
