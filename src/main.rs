use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use financer::categories::CategoryStore;
use financer::config::{Config, DEFAULT_CONFIG_FILE};
use financer::filter::{CategoryFilter, FilterCriteria};
use financer::normalizer::TransactionNormalizer;
use financer::persistence::JsonFileStore;
use financer::session::Session;
use financer::shell::run_shell;
use financer::sort::{SortColumn, SortDirection, SortState};
use financer::{read_statement, write_categories, write_summary, write_transactions};

#[derive(Parser, Debug)]
#[command(name = "financer", version, about = "Categorize bank statement transactions")]
struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the filtered, sorted transactions as CSV
    Show {
        csv: PathBuf,

        /// Category id, or __uncategorized__
        #[arg(long)]
        category: Option<String>,

        /// Inclusive lower date bound
        #[arg(long)]
        from: Option<String>,

        /// Inclusive upper date bound
        #[arg(long)]
        to: Option<String>,

        /// Case-insensitive description search
        #[arg(long)]
        search: Option<String>,

        /// Column to sort by (default: date)
        #[arg(long)]
        sort: Option<SortColumn>,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Print per-category totals as CSV
    Summary { csv: PathBuf },

    /// Manage the category list
    Categories {
        #[command(subcommand)]
        action: CategoriesCommand,
    },

    /// Interactive session: select, assign and summarize
    Shell { csv: PathBuf },
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    /// Print id,name for every category
    List,

    /// Create a category
    Add { name: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config '{}'", cli.config.display()))?;

    match cli.command {
        Command::Show {
            csv,
            category,
            from,
            to,
            search,
            sort,
            desc,
        } => {
            let mut session = open_session(&config, &csv).await?;
            session.set_filter(FilterCriteria {
                category: category.as_deref().map_or(CategoryFilter::All, CategoryFilter::from_wire),
                date_from: from,
                date_to: to,
                search_text: search.unwrap_or_default(),
            });
            session.set_sort(SortState {
                column: Some(sort.unwrap_or(SortColumn::Date)),
                direction: if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                },
            });

            write_transactions(session.visible(), io::stdout().lock())
                .context("Failed to write transactions")?;
        }
        Command::Summary { csv } => {
            let session = open_session(&config, &csv).await?;
            write_summary(&session.summary(), io::stdout().lock()).context("Failed to write summary")?;
        }
        Command::Categories { action } => {
            let mut store = open_store(&config);
            match action {
                CategoriesCommand::List => {}
                CategoriesCommand::Add { name } => {
                    anyhow::ensure!(store.add(&name).is_some(), "Category name must not be blank");
                }
            }
            write_categories(store.categories(), io::stdout().lock())
                .context("Failed to write categories")?;
        }
        Command::Shell { csv } => {
            let mut session = open_session(&config, &csv).await?;
            run_shell(&mut session, io::stdin().lock(), io::stdout().lock())
                .context("Shell session failed")?;
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> CategoryStore<JsonFileStore> {
    let path = config.store_path();
    tracing::debug!("Using category store {}", path.display());
    CategoryStore::load(
        JsonFileStore::new(path),
        config.store.key.clone(),
        config.categories.defaults.as_slice(),
    )
}

async fn open_session(config: &Config, csv: &Path) -> Result<Session<JsonFileStore>> {
    let text = read_statement(csv)
        .await
        .with_context(|| format!("Failed to read statement '{}'", csv.display()))?;

    let normalizer = TransactionNormalizer::with_delimiter(config.delimiter_byte()?);
    let mut session = Session::with_normalizer(open_store(config), normalizer);
    session
        .load_csv(&text)
        .with_context(|| format!("Failed to import '{}'", csv.display()))?;

    Ok(session)
}
