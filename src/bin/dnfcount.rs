use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use dnfcount::bench::{
    Method, RunLogRow, append_run_log, mean_absolute_error, output_path, read_results,
    resolve_num_vars, run_file,
};
use dnfcount::count::{CountOptions, DEFAULT_DELTA, DEFAULT_EPS};
use dnfcount::dnf::Analysis;
use dnfcount::dnf::binfmt::{read_formulas_from_path, write_formulas_to_path};
use dnfcount::generator::{GenConfig, dataset_file_name, generate};
use dnfcount::rng::run_rng;
use dnfcount::sample::ClauseSampler;

#[derive(Debug, Parser)]
#[command(name = "dnfcount")]
#[command(about = "Exact and approximate DNF model counting")]
struct Cli {
    #[arg(long, default_value = "warn", global = true)]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Args)]
struct CountArgs {
    path: PathBuf,
    #[arg(long)]
    num_vars: Option<u32>,
    #[arg(long, default_value_t = DEFAULT_EPS)]
    eps: f64,
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    delta: f64,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    out_dir: Option<PathBuf>,
    #[arg(long)]
    run_log: Option<PathBuf>,
}

impl CountArgs {
    fn options(&self) -> CountOptions {
        CountOptions {
            eps: self.eps,
            delta: self.delta,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Write a dataset of random formulas.
    Gen {
        #[arg(long, default_value_t = 20)]
        samples: usize,
        #[arg(long, default_value_t = 5)]
        num_vars: u32,
        #[arg(long, default_value_t = 20)]
        clauses: usize,
        #[arg(long)]
        width: Option<usize>,
        #[arg(long, default_value_t = false)]
        fixed_width: bool,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "Data")]
        out_dir: PathBuf,
    },
    Exact(CountArgs),
    FirstHit(CountArgs),
    Coverage(CountArgs),
    /// Mean absolute error between two result files.
    Mae { truth: PathBuf, pred: PathBuf },
    /// Clause statistics and sample counts for each formula in a file.
    Info {
        path: PathBuf,
        #[arg(long)]
        num_vars: Option<u32>,
        #[arg(long, default_value_t = DEFAULT_EPS)]
        eps: f64,
        #[arg(long, default_value_t = DEFAULT_DELTA)]
        delta: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    match cli.command {
        Cmd::Gen {
            samples,
            num_vars,
            clauses,
            width,
            fixed_width,
            seed,
            out_dir,
        } => gen_cmd(
            samples,
            GenConfig {
                num_vars,
                num_clauses: clauses,
                clause_width: width,
                var_width: !fixed_width,
            },
            seed,
            &out_dir,
        )?,
        Cmd::Exact(args) => count_cmd(Method::Exact, &args)?,
        Cmd::FirstHit(args) => count_cmd(Method::FirstHit, &args)?,
        Cmd::Coverage(args) => count_cmd(Method::Coverage, &args)?,
        Cmd::Mae { truth, pred } => {
            let mae = mean_absolute_error(&read_results(&truth)?, &read_results(&pred)?)?;
            println!("MAE: {}", mae);
        }
        Cmd::Info {
            path,
            num_vars,
            eps,
            delta,
        } => info_cmd(&path, num_vars, CountOptions::new(eps, delta))?,
    }
    Ok(())
}

fn gen_cmd(samples: usize, cfg: GenConfig, seed: Option<u64>, out_dir: &Path) -> Result<()> {
    if cfg.num_vars == 0 {
        bail!("num-vars must be >= 1");
    }
    let mut rng = run_rng(seed);
    let formulas = (0..samples)
        .map(|_| generate(&cfg, &mut rng))
        .collect::<Vec<_>>();
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(dataset_file_name(samples, &cfg));
    write_formulas_to_path(&path, &formulas)?;
    println!(
        "GEN: wrote {} | formulas={} vars={} clauses={}",
        path.display(),
        samples,
        cfg.num_vars,
        cfg.num_clauses
    );
    Ok(())
}

fn count_cmd(method: Method, args: &CountArgs) -> Result<()> {
    let opts = args.options();
    opts.validate()?;
    let num_vars = resolve_num_vars(&args.path, args.num_vars);
    let out_dir = args.out_dir.clone().unwrap_or_else(|| match method {
        Method::Exact => PathBuf::from("Output"),
        _ => PathBuf::from("OutputMonte"),
    });

    let run = run_file(&args.path, method, num_vars, &opts);
    let (status, samples_used, seconds) = match &run {
        Ok(outcome) => ("ok", outcome.samples_used, outcome.seconds),
        Err(_) => ("error", 0, 0.0),
    };
    if let Some(log_path) = &args.run_log {
        append_run_log(
            log_path,
            &RunLogRow {
                file: args.path.to_string_lossy().to_string(),
                num_vars,
                samples_used,
                seconds,
                status: status.to_string(),
                eps: opts.eps,
                delta: opts.delta,
            },
        )?;
    }
    let outcome = run?;

    for (idx, value) in outcome.results.iter().enumerate() {
        println!("Formula #{} satisfying assignments ({}): {}", idx, method.name(), value);
    }
    let out = output_path(&out_dir, &args.path, method, &opts);
    outcome.write_results(&out)?;
    println!(
        "{}: wrote {} | formulas={} vars={} samples_used={} seconds={:.3}",
        method.name(),
        out.display(),
        outcome.results.len(),
        num_vars,
        outcome.samples_used,
        outcome.seconds
    );
    Ok(())
}

fn info_cmd(path: &Path, num_vars: Option<u32>, opts: CountOptions) -> Result<()> {
    opts.validate()?;
    let n = resolve_num_vars(path, num_vars);
    for (idx, dnf) in read_formulas_from_path(path)?.iter().enumerate() {
        let analysis = Analysis::new(dnf, dnf.universe(n));
        let total = ClauseSampler::new(&analysis).map_or(0.0, |s| s.total_weight());
        println!(
            "formula={} clauses={} max_var={} universe={} live={} contradictory={} total_weight={:e} m={}",
            idx,
            dnf.len(),
            dnf.max_var(),
            analysis.num_vars,
            analysis.live_count(),
            analysis.contradictory_count(),
            total,
            opts.sample_count(dnf.len())
        );
    }
    Ok(())
}
