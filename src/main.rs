use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use forest_growth_projector::{
    growth::{BatchSummary, GrowthEngine, SnapshotOverview, HORIZON},
    io,
    visualization::{
        print_batch_summary, print_results_table, print_site_index_tables,
        print_snapshot_overview, print_trajectory_table, print_volume_chart,
    },
    EngineConfig, StandRecord, StandResult, TreeSpecies,
};

#[derive(Parser)]
#[command(
    name = "forest-growth",
    about = "Forest Growth Projector - current-year growth, 100-year trajectories and maturity for forest stands",
    version,
    author
)]
struct Cli {
    /// Log pipeline stages to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the growth engine over a stand snapshot
    Run {
        /// Path to the snapshot (CSV, JSON, or Excel)
        #[arg(short, long)]
        input: PathBuf,

        /// Write enriched results here (CSV, JSON, or Excel)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Annual growth rate below which a stand counts as mature (0.0-1.0)
        #[arg(short, long)]
        yield_requirement: Option<f64>,

        /// Engine configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Replace undefined values with zero in the written results
        #[arg(long)]
        fill_missing_zero: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Do not print the per-stand table
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the 100-year trajectory of one stand
    Project {
        /// Path to the snapshot (CSV, JSON, or Excel)
        #[arg(short, long)]
        input: PathBuf,

        /// bestand_id of the stand to project
        #[arg(short, long)]
        stand: String,

        /// Number of years to show
        #[arg(long, default_value_t = HORIZON)]
        years: usize,

        /// Show every n-th year
        #[arg(long, default_value = "5")]
        step: usize,

        /// Engine configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Display a quick overview of a snapshot
    Summary {
        /// Path to the snapshot
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the active bonitet to Ht40 tables
    Tables {
        /// Engine configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_stands(path: &Path) -> Result<Vec<StandRecord>> {
    io::read_stands(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            output,
            yield_requirement,
            config,
            fill_missing_zero,
            pretty,
            quiet,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(y) = yield_requirement {
                config = config.with_yield_requirement(y)?;
            }
            let engine = GrowthEngine::new(config)?;
            let records = load_stands(&input)?;

            println!(
                "\n{}",
                format!("Growth Projection: {}", input.display()).bold().cyan()
            );
            println!(
                "  Loaded {} stands, yield requirement {:.1}%",
                records.len(),
                engine.config().yield_requirement * 100.0
            );

            let results = engine.run(&records)?;
            if !quiet {
                print_results_table(&results);
            }
            print_batch_summary(&BatchSummary::from_results(&results));

            if let Some(output) = output {
                let written: Vec<StandResult> = if fill_missing_zero {
                    results.iter().map(StandResult::filled_with_zero).collect()
                } else {
                    results
                };
                io::write_results(&written, &output, pretty)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                println!(
                    "{} Wrote {} results -> {}",
                    "Success:".green().bold(),
                    written.len(),
                    output.display()
                );
            }
        }

        Commands::Project {
            input,
            stand,
            years,
            step,
            config,
        } => {
            if years > HORIZON {
                anyhow::bail!("--years must be at most {HORIZON}, got {years}");
            }
            let engine = GrowthEngine::new(load_config(config.as_deref())?)?;
            let records = load_stands(&input)?;
            let record = records
                .iter()
                .find(|r| r.bestand_id == stand)
                .with_context(|| format!("Stand '{stand}' not found in {}", input.display()))?;

            let projection = engine.project(record)?;
            let result = engine.evaluate(record);

            println!(
                "\n{}",
                format!(
                    "Stand {stand}: {}, age {}",
                    TreeSpecies::from_label(&record.treslag),
                    opt_age(record.alder)
                )
                .bold()
                .cyan()
            );
            print_trajectory_table(&stand, &projection, years, step);
            print_volume_chart(&projection, result.years_to_maturity, step);
            match result.years_to_maturity {
                Some(year) => println!("  Years to maturity: {year}"),
                None => println!("  {}", "Maturity not computable for this stand".yellow()),
            }
        }

        Commands::Summary { input } => {
            let records = load_stands(&input)?;
            print_snapshot_overview(&SnapshotOverview::from_records(&records));
        }

        Commands::Tables { config } => {
            let engine = GrowthEngine::new(load_config(config.as_deref())?)?;
            print_site_index_tables(engine.site_index());
        }
    }

    Ok(())
}

fn opt_age(age: Option<f64>) -> String {
    age.map_or_else(|| "unknown".to_string(), |a| format!("{a:.0}"))
}
