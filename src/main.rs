use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tysearch_core::{config::Config, get_type_suggestions, SearchHit, TypeSearch};

#[derive(Parser)]
#[command(name = "tysearch", about = "Search function signatures by type shape")]
struct Cli {
    /// Type-shaped query, e.g. "A -> Effect<B>" or "Option<A>".
    query: String,

    /// Catalog JSON produced by the indexer.
    #[arg(long, required_unless_present = "suggest")]
    catalog: Option<PathBuf>,

    /// Maximum number of results (defaults to `search.default_limit`).
    #[arg(long)]
    limit: Option<usize>,

    /// Config file to use instead of ~/.config/tysearch/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Print example queries containing QUERY instead of searching.
    #[arg(long)]
    suggest: bool,

    /// Write debug logs to /tmp/tysearch-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/tysearch-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("tysearch debug log started; tail -f /tmp/tysearch-debug.log");
    }

    if cli.suggest {
        for suggestion in get_type_suggestions(&cli.query) {
            println!("{suggestion}");
        }
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let search = TypeSearch::from_config(&config);

    let catalog_path = cli.catalog.context("--catalog is required")?;
    let entries = tysearch_catalog::load_catalog(&catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;

    let limit = cli.limit.unwrap_or(search.default_limit());
    let hits = search.search_with_limit(&cli.query, &entries, limit);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        for hit in &hits {
            println!("{}", render_hit(hit));
        }
    }
    Ok(())
}

fn render_hit(hit: &SearchHit<'_>) -> String {
    format!(
        "{:>5.1}  {}.{} :: {}",
        hit.score(),
        hit.entry.module,
        hit.entry.name,
        hit.entry.signature
    )
}
