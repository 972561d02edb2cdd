use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{AssaultConfig, DEFAULT_RESULT_LIMIT};
use crate::data::boss::{load_bosses, resolve_bosses, DEFAULT_BOSSES_PATH};
use crate::data::unit::{load_units, DEFAULT_UNITS_PATH};
use crate::data::validate::{validate_unit_dataset, ValidationSeverity};
use crate::error::{PlannerError, Result};
use crate::logging::init_cli_logger;
use crate::optimizer::{plan_assault, rank_teams, score_named_team};

#[derive(Parser, Debug)]
#[command(name = "lineup")]
#[command(about = "Recommend non-overlapping teams against a set of bosses")]
#[command(version)]
pub struct Cli {
    /// Per-boss diagnostics and debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan one disjoint team per boss for a three-boss assault
    Assault(AssaultArgs),
    /// Rank teams without a specific boss in mind
    Build(BuildArgs),
    /// Score one team against one boss and print the rule trace
    Score(ScoreArgs),
    /// Check a unit dataset for structural problems
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub struct DataArgs {
    #[arg(long, default_value = DEFAULT_UNITS_PATH)]
    pub units: PathBuf,

    #[arg(long, default_value = DEFAULT_BOSSES_PATH)]
    pub bosses_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct AssaultArgs {
    /// YAML or JSON assault configuration
    #[arg(short, long, conflicts_with = "bosses")]
    pub config: Option<PathBuf>,

    /// Exactly three boss names, comma separated
    #[arg(long, value_delimiter = ',', required_unless_present = "config")]
    pub bosses: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub flex: Vec<String>,

    /// Overrides the configured result limit
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Scoring threads (0 = sequential)
    #[arg(long)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[arg(short, long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,

    #[arg(long, value_delimiter = ',')]
    pub flex: Vec<String>,

    #[arg(long, default_value = DEFAULT_UNITS_PATH)]
    pub units: PathBuf,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[arg(long)]
    pub boss: String,

    /// Two or three unit names, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub team: Vec<String>,

    /// Relax the three lenient-mode rules into penalties
    #[arg(long)]
    pub lenient: bool,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[arg(long, default_value = DEFAULT_UNITS_PATH)]
    pub units: PathBuf,
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    init_cli_logger(cli.verbose);

    let outcome = match cli.command {
        Command::Assault(args) => handle_assault(args, cli.verbose),
        Command::Build(args) => handle_build(args),
        Command::Score(args) => handle_score(args),
        Command::Validate(args) => handle_validate(args),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn handle_assault(args: AssaultArgs, verbose: bool) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => AssaultConfig::load(path)?,
        None => AssaultConfig::for_bosses(&args.bosses),
    };
    config.verbose |= verbose;
    config.flex.extend(args.flex);
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    config.validate()?;

    let units = load_units(&args.data.units)?;
    let bosses = load_bosses(&args.data.bosses_file)?;
    let report = plan_assault(&units, &bosses, &config)?;
    print_json(&report)?;
    Ok(0)
}

fn handle_build(args: BuildArgs) -> Result<i32> {
    let units = load_units(&args.units)?;
    let ranking = rank_teams(&units, &args.flex, args.limit)?;
    print_json(&ranking)?;
    Ok(0)
}

fn handle_score(args: ScoreArgs) -> Result<i32> {
    let units = load_units(&args.data.units)?;
    let bosses = load_bosses(&args.data.bosses_file)?;
    let boss = resolve_bosses(&bosses, std::slice::from_ref(&args.boss))?
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::UnknownBoss(args.boss.clone()))?;
    let report = score_named_team(&units, &boss, &args.team, args.lenient)?;
    print_json(&report)?;
    Ok(0)
}

fn handle_validate(args: ValidateArgs) -> Result<i32> {
    let path = args.units.to_string_lossy();
    let report = validate_unit_dataset(&path)?;
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s), {} warning(s)",
            report.count(ValidationSeverity::Error),
            report.count(ValidationSeverity::Warning)
        );
        return Ok(1);
    }
    println!(
        "validation passed: {path} ({} warning(s))",
        report.count(ValidationSeverity::Warning)
    );
    Ok(0)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}
