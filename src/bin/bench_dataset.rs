use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use dnfcount::bench::{Method, run_dataset};
use dnfcount::count::{CountOptions, DEFAULT_DELTA, DEFAULT_EPS};

#[derive(Debug, Parser)]
#[command(name = "bench_dataset")]
struct Cli {
    #[arg(long)]
    dir: String,
    #[arg(long, default_value = "coverage")]
    method: String,
    #[arg(long)]
    num_vars: Option<u32>,
    #[arg(long, default_value_t = DEFAULT_EPS)]
    eps: f64,
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    delta: f64,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long = "timeout_ms", default_value_t = 30000)]
    timeout_ms: u64,
    #[arg(long, default_value = "OutputMonte")]
    out_dir: String,
    #[arg(long)]
    csv: String,
    #[arg(long, default_value_t = false)]
    progress: bool,
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    run_from_args(&cli)
}

fn run_from_args(cli: &Cli) -> Result<()> {
    let method = parse_method(&cli.method)?;
    let opts = CountOptions {
        eps: cli.eps,
        delta: cli.delta,
        seed: cli.seed,
    };
    opts.validate()?;
    let rows = run_dataset(
        &PathBuf::from(&cli.dir),
        &PathBuf::from(&cli.out_dir),
        method,
        cli.num_vars,
        opts,
        Duration::from_millis(cli.timeout_ms),
        &PathBuf::from(&cli.csv),
        cli.progress,
    )?;
    println!("rows={}", rows.len());
    Ok(())
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "exact" => Ok(Method::Exact),
        "first-hit" => Ok(Method::FirstHit),
        "coverage" => Ok(Method::Coverage),
        _ => bail!("unknown method '{}', expected exact|first-hit|coverage", s),
    }
}
