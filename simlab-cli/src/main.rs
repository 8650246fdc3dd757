//! simlab CLI — single runs, batch queues, and cache management.
//!
//! Commands:
//! - `run` — execute one simulation from flags and print its summary
//! - `queue` — run every sim in a batch queue file across a worker pool
//! - `cache status` — report cached keys
//! - `cache clear` — wipe the persistent cache

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use simlab_core::data::{
    DataLoader, DataRequest, DataSourceKind, MarketDataProvider, PersistentLruCache,
    RemoteProvider, DEFAULT_CACHE_CAPACITY,
};
use simlab_core::engine::{run_simulation, EngineConfig};
use simlab_core::strategies::StrategySpec;
use simlab_runner::{BacktestSummary, MetricsConfig, QueueManager, QueueOptions};

#[derive(Parser)]
#[command(name = "simlab", about = "simlab — strategy backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one simulation and print its summary.
    Run {
        /// Ticker symbol (e.g. AAPL).
        #[arg(long)]
        ticker: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: String,

        /// Data source: remote or csv.
        #[arg(long, default_value = "remote")]
        source: String,

        /// Price CSV path (required with --source csv).
        #[arg(long)]
        csv_path: Option<PathBuf>,

        /// Strategy spec as inline JSON, e.g.
        /// '{"type":"sma_crossover","fields":{"short_window":20,"long_window":50}}'.
        #[arg(long)]
        strategy: String,

        #[arg(long, default_value_t = 100_000.0)]
        initial_cash: f64,

        #[arg(long, default_value_t = 0.0)]
        slippage: f64,

        #[arg(long, default_value_t = 0.0)]
        commission: f64,

        /// Cache directory.
        #[arg(long, default_value = ".cache")]
        cache_dir: PathBuf,
    },
    /// Run every sim in a batch queue file.
    Queue {
        /// Path to the queue JSON file.
        #[arg(long)]
        file: PathBuf,

        /// Worker pool size. Defaults to one worker per logical CPU.
        #[arg(long)]
        max_workers: Option<usize>,

        /// Give up on outstanding jobs after this many quiet seconds.
        #[arg(long)]
        job_timeout_secs: Option<u64>,

        /// Cache directory shared by all workers.
        #[arg(long, default_value = ".cache")]
        cache_dir: PathBuf,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached keys in least-to-most recently used order.
    Status {
        #[arg(long, default_value = ".cache")]
        cache_dir: PathBuf,
    },
    /// Remove every cached entry.
    Clear {
        #[arg(long, default_value = ".cache")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            ticker,
            start,
            end,
            source,
            csv_path,
            strategy,
            initial_cash,
            slippage,
            commission,
            cache_dir,
        } => run_single(
            ticker,
            &start,
            &end,
            &source,
            csv_path,
            &strategy,
            EngineConfig::new(initial_cash, slippage, commission),
            cache_dir,
        ),
        Commands::Queue {
            file,
            max_workers,
            job_timeout_secs,
            cache_dir,
        } => run_queue(&file, max_workers, job_timeout_secs, cache_dir),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => cache_status(&cache_dir),
            CacheAction::Clear { cache_dir } => cache_clear(&cache_dir),
        },
    }
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid {label} date '{value}', expected YYYY-MM-DD"))
}

#[allow(clippy::too_many_arguments)]
fn run_single(
    ticker: String,
    start: &str,
    end: &str,
    source: &str,
    csv_path: Option<PathBuf>,
    strategy_json: &str,
    engine_config: EngineConfig,
    cache_dir: PathBuf,
) -> Result<()> {
    let source = match source {
        "remote" => DataSourceKind::Remote,
        "csv" => DataSourceKind::Csv,
        other => bail!("unknown source '{other}', expected 'remote' or 'csv'"),
    };

    let spec: StrategySpec =
        serde_json::from_str(strategy_json).context("invalid --strategy JSON")?;

    let request = DataRequest {
        ticker: ticker.clone(),
        start_date: parse_date("start", start)?,
        end_date: parse_date("end", end)?,
        source,
        csv_path,
    };

    let cache = PersistentLruCache::open(&cache_dir, DEFAULT_CACHE_CAPACITY)?;
    let provider: Box<dyn MarketDataProvider> = Box::new(RemoteProvider::new());
    let mut loader = DataLoader::new(cache, provider);

    let series = loader.load(&request)?;
    let strategy = spec.build(&series)?;
    let signals = strategy.generate_signals(&series);
    let result = run_simulation(&engine_config, &ticker, &series, &signals);

    let summary = BacktestSummary::compute(
        &ticker,
        &result.history.values(),
        &MetricsConfig::default(),
    );

    let (first, last) = series.date_range();
    println!("Ticker:        {}", summary.ticker);
    println!("Period:        {first} → {last}");
    println!("Bars:          {}", result.history.len());
    println!("Trades:        {}", result.trades.len());
    println!("Total Return:  {:.2}%", summary.total_return * 100.0);
    println!("Sharpe Ratio:  {:.2}", summary.sharpe_ratio);
    println!("Max Drawdown:  {:.2}%", summary.max_drawdown * 100.0);
    println!("Volatility:    {:.2}%", summary.volatility * 100.0);

    Ok(())
}

fn run_queue(
    file: &PathBuf,
    max_workers: Option<usize>,
    job_timeout_secs: Option<u64>,
    cache_dir: PathBuf,
) -> Result<()> {
    let options = QueueOptions {
        max_workers,
        cache_dir,
        job_timeout: job_timeout_secs.map(Duration::from_secs),
    };

    let manager = QueueManager::from_file(file, options)?;
    let report = manager.run_all()?;

    println!(
        "[{}] {}/{} jobs completed",
        report.sim_group,
        report.completed_count(),
        report.jobs.len()
    );
    for job in &report.jobs {
        match &job.status {
            simlab_runner::JobStatus::Completed {
                summary,
                trade_count,
            } => println!(
                "  {:<16} ok     return {:+.2}%  sharpe {:.2}  trades {}",
                job.sim_id,
                summary.total_return * 100.0,
                summary.sharpe_ratio,
                trade_count
            ),
            simlab_runner::JobStatus::Failed { message } => {
                println!("  {:<16} FAILED {message}", job.sim_id)
            }
            simlab_runner::JobStatus::TimedOut => {
                println!("  {:<16} TIMED OUT", job.sim_id)
            }
        }
    }

    if !report.all_completed() {
        bail!(
            "{} of {} jobs did not complete",
            report.jobs.len() - report.completed_count(),
            report.jobs.len()
        );
    }
    Ok(())
}

fn cache_status(cache_dir: &PathBuf) -> Result<()> {
    let cache = PersistentLruCache::open(cache_dir, DEFAULT_CACHE_CAPACITY)?;
    println!(
        "{} of {} cache slots used in {}",
        cache.len(),
        cache.max_size(),
        cache.cache_path().display()
    );
    for key in cache.keys() {
        println!("  {} {} → {}", key.ticker, key.start_date, key.end_date);
    }
    Ok(())
}

fn cache_clear(cache_dir: &PathBuf) -> Result<()> {
    let mut cache = PersistentLruCache::open(cache_dir, DEFAULT_CACHE_CAPACITY)?;
    let count = cache.len();
    cache.clear();
    println!("cleared {count} cached entries");
    Ok(())
}
