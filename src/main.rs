mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{error, info};

use crate::input::InputError;
use crate::input::motifs::load_motif_groups;
use crate::input::rankdb::load_ranking_db;
use crate::input::regions::load_region_list;
use crate::input::triplets::load_triplets;
use crate::model::{MissingScorePolicy, RankingConfig};
use crate::pipeline::RankError;
use crate::pipeline::stage1_motif_ranks::run_stage1;
use crate::pipeline::stage4_triplets::{Stage4Output, run_stage4};
use crate::pipeline::stage5_report::{RANKED_TSV, Stage5Input, write_reports};
use crate::report::InputSummary;

const TOOL_NAME: &str = "kira-tripletrank";

#[derive(Debug, Parser)]
#[command(
    name = "kira-tripletrank",
    version,
    about = "Rank TF-region-gene triplets by order-statistics aggregation of three relevance scores"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank a triplet table against a motif ranking database.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Triplet table (TSV, optionally .gz) with TF, Region, Gene,
    /// importance_TF2G and importance_R2G columns.
    #[arg(long)]
    triplets: PathBuf,

    /// Motif ranking database (TSV, optionally .gz): motifs x regions.
    #[arg(long)]
    rankings: PathBuf,

    /// TF to motif annotation (TSV: TF, comma-separated motifs).
    #[arg(long)]
    motifs: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Target regions, one per line. Defaults to the triplet table's regions.
    #[arg(long)]
    regions: Option<PathBuf>,

    /// JSON ranking config; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Score for triplets whose TF/region pair has no motif rank.
    #[arg(long, value_enum)]
    missing_tf_region: Option<MissingScorePolicy>,

    /// Share of the target or database region an overlap must exceed.
    #[arg(long)]
    min_overlap_fraction: Option<f64>,

    #[arg(long)]
    threads: Option<usize>,

    /// Combine rank ratios on the calling thread only.
    #[arg(long)]
    no_parallel: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Rank(#[from] RankError),
    #[error("invalid config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to write reports: {0}")]
    Output(std::io::Error),
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    if let Err(err) = run(cli.command) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Run(args) => run_ranking(&args),
    }
}

fn run_ranking(args: &RunArgs) -> Result<(), AppError> {
    let config = resolve_config(args)?;
    info!(
        "seed={} missing_tf_region={} min_overlap_fraction={} parallel={}",
        config.seed,
        config.missing_tf_region.label(),
        config.min_overlap_fraction,
        config.parallel
    );

    let table = load_triplets(&args.triplets)?;
    info!(
        "loaded {} triplets from {}",
        table.records.len(),
        args.triplets.display()
    );
    let motif_groups = load_motif_groups(&args.motifs)?;
    let db = load_ranking_db(&args.rankings)?
        .with_min_overlap_fraction(config.min_overlap_fraction);
    info!(
        "ranking database {}: {} motifs x {} regions",
        args.rankings.display(),
        db.motifs().len(),
        db.regions().len()
    );

    let regions = match &args.regions {
        Some(path) => load_region_list(path)?,
        None => table.regions(),
    };
    let stage1 = run_stage1(&db, &regions, &motif_groups)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let stage4: Stage4Output = if config.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| run_stage4(&table.records, &stage1.matrix, &config, &mut rng))?
    } else {
        run_stage4(&table.records, &stage1.matrix, &config, &mut rng)?
    };

    let input = Stage5Input {
        columns: &table.columns,
        rows: &table.rows,
        ranked: &stage4.ranked,
        matrix: &stage1.matrix,
        diagnostics: &stage1.diagnostics,
        n_missing_tf_region: stage4.n_missing_tf_region,
        config: &config,
        inputs: InputSummary {
            triplets: args.triplets.display().to_string(),
            rankings: args.rankings.display().to_string(),
            motifs: args.motifs.display().to_string(),
            regions: args.regions.as_ref().map(|p| p.display().to_string()),
        },
        tool_name: TOOL_NAME.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    write_reports(&input, &args.out).map_err(AppError::Output)?;
    info!("wrote {}", args.out.join(RANKED_TSV).display());

    Ok(())
}

fn load_config(path: &Path) -> Result<RankingConfig, AppError> {
    let text = std::fs::read_to_string(path).map_err(InputError::from)?;
    serde_json::from_str(&text).map_err(|source| AppError::Config {
        path: path.display().to_string(),
        source,
    })
}

fn resolve_config(args: &RunArgs) -> Result<RankingConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RankingConfig::default_v1(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(policy) = args.missing_tf_region {
        config.missing_tf_region = policy;
    }
    if let Some(fraction) = args.min_overlap_fraction {
        config.min_overlap_fraction = fraction;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if args.no_parallel {
        config.parallel = false;
    }
    config.validate().map_err(AppError::InvalidConfig)?;
    Ok(config)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
