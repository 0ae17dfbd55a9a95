use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use showdown_core::config::OptimizerConfig;
use showdown_core::io::{
    load_projections, load_salaries, merge_players, save_upload_csv, save_view_csv,
    write_workbook,
};
use showdown_core::model::RoundOutcome;
use showdown_core::optimize_lineups;
use showdown_core::ownership::{Exposure, OwnershipSummary, summarize};
use showdown_core::players::{CandidatePool, PlayerRecord};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Captain-mode DFS lineup optimizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Args)]
struct InputArgs {
    /// Salary export from the contest platform
    #[arg(short, long, default_value = "input/DKSalaries.csv")]
    salaries: PathBuf,

    /// Projection sheet keyed by player name
    #[arg(short, long, default_value = "input/OFModel.csv")]
    projections: PathBuf,

    /// YAML file overriding contest, solver and column settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate lineups and write them to the output folder
    Optimize {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Overrides contest.max_lineups
        #[arg(short = 'n', long)]
        max_lineups: Option<usize>,

        /// Also write lineups.xlsx
        #[arg(long)]
        xlsx: bool,
    },
    /// Print the candidate pools built from the inputs
    Pool {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Optimize {
            input,
            output,
            max_lineups,
            xlsx,
        } => {
            let mut config = load_config(input.config.as_deref())?;
            if let Some(max_lineups) = max_lineups {
                config.contest.max_lineups = max_lineups;
            }
            let players = load_players(&input, &config)?;
            run_optimize(&players, &config, &output, xlsx)
        }
        Commands::Pool { input } => {
            let config = load_config(input.config.as_deref())?;
            let players = load_players(&input, &config)?;
            let pool = CandidatePool::build(&players, &config.contest)?;
            println!("{}", pool_table(&pool));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<OptimizerConfig> {
    let config = match path {
        Some(path) => OptimizerConfig::from_yaml_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => OptimizerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn load_players(input: &InputArgs, config: &OptimizerConfig) -> Result<Vec<PlayerRecord>> {
    let salaries = load_salaries(&input.salaries, &config.columns)
        .with_context(|| format!("reading salaries {}", input.salaries.display()))?;
    let projections = load_projections(&input.projections, &config.columns)
        .with_context(|| format!("reading projections {}", input.projections.display()))?;
    Ok(merge_players(&salaries, &projections, &config.columns))
}

fn run_optimize(
    players: &[PlayerRecord],
    config: &OptimizerConfig,
    output: &Path,
    xlsx: bool,
) -> Result<()> {
    let bar = ProgressBar::new(config.contest.max_lineups as u64);
    bar.enable_steady_tick(Duration::from_millis(250));
    bar.set_style(
        ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} lineups ({elapsed})")?,
    );

    let run = optimize_lineups(players, config, |report| {
        if report.outcome == RoundOutcome::Accepted {
            bar.inc(1);
        }
    })?;
    bar.finish_and_clear();

    if run.lineups.len() < config.contest.max_lineups {
        info!(
            found = run.lineups.len(),
            requested = config.contest.max_lineups,
            stop = ?run.generation.stop,
            "not enough feasible lineups produced"
        );
    }

    let ownership = summarize(&run.lineups);
    print_ownership(&ownership);

    save_view_csv(output.join("view.csv"), &config.contest, &run.lineups)?;
    save_upload_csv(output.join("upload.csv"), &config.contest, &run.lineups)?;
    if xlsx {
        write_workbook(
            output.join("lineups.xlsx"),
            &config.contest,
            &run.lineups,
            &ownership,
        )?;
    }
    Ok(())
}

fn exposure_table(title: &str, exposures: &[Exposure], lineups: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![title, "Count", "Share"]);
    for exposure in exposures {
        table.add_row(vec![
            exposure.label.clone(),
            exposure.count.to_string(),
            format!("{:.1}%", exposure.share(lineups) * 100.0),
        ]);
    }
    table
}

fn print_ownership(ownership: &OwnershipSummary) {
    println!("\nCPT OWNERSHIP:");
    println!("{}", exposure_table("Captain", &ownership.captain, ownership.lineups));
    println!("\nFLEX OWNERSHIP:");
    println!("{}", exposure_table("Flex", &ownership.flex, ownership.lineups));
}

fn pool_table(pool: &CandidatePool) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Role", "#", "Player", "Salary", "Score"]);
    let captains = pool.captains().iter().map(|c| ("CPT", c));
    let flex = pool.flex().iter().map(|c| ("FLEX", c));
    for (role, candidate) in captains.chain(flex) {
        table.add_row(vec![
            role.to_string(),
            candidate.index.to_string(),
            candidate.label.clone(),
            candidate.salary.to_string(),
            format!("{:.2}", candidate.effective_score),
        ]);
    }
    table
}
