pub mod catalog;
pub mod config;
pub mod model;
pub mod search;
pub mod ui;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use search::{CatalogIndex, MAX_RESULTS, SearchQuery};
use ui::components::theme::ThemeMode;

static LONG_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}\nbuilt: {}\ntarget: {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown"),
    )
});

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "vibeflicks",
    version,
    long_version = LONG_VERSION.as_str(),
    about = "Content-based movie search over a TMDB catalog"
)]
pub struct Cli {
    /// Path to the catalog CSV (overrides config and VIBEFLICKS_CATALOG)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Path to a config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The six query fields shared by every search front end.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Words from the movie title
    #[arg(long, default_value = "")]
    pub title: String,
    /// Genre keywords (e.g. "ScienceFiction")
    #[arg(long, alias = "genre", default_value = "")]
    pub genres: String,
    /// Original language code (e.g. "en"); alone, browses that language
    #[arg(long, default_value = "")]
    pub language: String,
    /// Keywords from the overview
    #[arg(long, default_value = "")]
    pub overview: String,
    /// Keywords from the tagline
    #[arg(long, default_value = "")]
    pub tagline: String,
    /// Production company keywords
    #[arg(long, default_value = "")]
    pub company: String,
}

impl From<QueryArgs> for SearchQuery {
    fn from(args: QueryArgs) -> Self {
        SearchQuery {
            title: args.title.trim().to_string(),
            genres: args.genres.trim().to_string(),
            language: args.language.trim().to_string(),
            overview: args.overview.trim().to_string(),
            tagline: args.tagline.trim().to_string(),
            company: args.company.trim().to_string(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Show at most this many rows (1 to 1000)
        #[arg(
            long,
            default_value_t = MAX_RESULTS,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
                .range(1..=MAX_RESULTS as u64)
        )]
        limit: usize,

        /// Include similarity scores
        #[arg(long)]
        scores: bool,
    },
    /// Launch the interactive search form
    Tui {
        /// Starting theme (overrides config)
        #[arg(long, value_enum)]
        theme: Option<ThemeMode>,
    },
    /// Print catalog statistics
    Stats {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(config.log_level.as_deref());
    run_with(cli, config)
}

/// Install the stderr fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run_with(cli: Cli, config: AppConfig) -> Result<()> {
    let catalog_path = cli.catalog.unwrap_or(config.catalog);

    match cli.command {
        Commands::Search {
            query,
            json,
            limit,
            scores,
        } => {
            let query = SearchQuery::from(query);
            if query.is_blank() {
                bail!("please enter at least one search field");
            }
            let index = open_index(&catalog_path)?;
            run_search(&index, &query, json, limit, scores)
        }
        Commands::Tui { theme } => {
            let index = open_index(&catalog_path)?;
            ui::tui::run_tui(&index, theme.unwrap_or(config.theme))
        }
        Commands::Stats { json } => {
            let index = open_index(&catalog_path)?;
            let stats = index.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("records:    {}", stats.records);
                println!("vocabulary: {}", stats.vocabulary);
                println!("nonzero:    {}", stats.nonzero_entries);
                println!("languages:");
                for (code, count) in &stats.languages {
                    let code = if code.is_empty() { "(none)" } else { code };
                    println!("  {code:<8}{count}");
                }
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vibeflicks", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

fn open_index(path: &std::path::Path) -> Result<CatalogIndex> {
    CatalogIndex::open(path).with_context(|| format!("loading catalog from {}", path.display()))
}

fn run_search(
    index: &CatalogIndex,
    query: &SearchQuery,
    json: bool,
    limit: usize,
    with_scores: bool,
) -> Result<()> {
    let ranked: Vec<_> = index.search_ranked(query).into_iter().take(limit).collect();
    let hits: Vec<_> = ranked
        .iter()
        .filter_map(|m| index.record(m.position).map(model::types::SearchHit::from_record))
        .collect();

    if json {
        let rows: Vec<serde_json::Value> = hits
            .iter()
            .zip(&ranked)
            .map(|(hit, m)| -> serde_json::Result<serde_json::Value> {
                let mut row = serde_json::to_value(hit)?;
                if with_scores && let Some(obj) = row.as_object_mut() {
                    obj.insert("score".into(), serde_json::json!(m.score));
                }
                Ok(row)
            })
            .collect::<serde_json::Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let scores: Vec<Option<f64>> = ranked.iter().map(|m| m.score).collect();
        let table = ui::table::render_table(
            &hits,
            with_scores.then_some(scores.as_slice()),
            std::io::stdout().is_terminal(),
        );
        print!("{table}");
    }
    Ok(())
}
