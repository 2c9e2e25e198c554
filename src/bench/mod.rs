use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use log::{info, warn};

use crate::count::{
    CountError, CountOptions, Estimate, estimate_union_coverage, estimate_union_first_hit,
    exact_count,
};
use crate::dnf::Dnf;
use crate::dnf::binfmt::open_formulas;
use crate::generator::num_vars_from_path;

/// Universe size used when neither the caller nor the file name gives one.
pub const DEFAULT_NUM_VARS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Exact,
    FirstHit,
    Coverage,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::Exact => "exact",
            Method::FirstHit => "first-hit",
            Method::Coverage => "coverage",
        }
    }

    pub fn count(
        self,
        dnf: &Dnf,
        num_vars: u32,
        opts: &CountOptions,
    ) -> Result<Estimate, CountError> {
        match self {
            Method::Exact => Ok(Estimate {
                value: exact_count(dnf, num_vars) as f64,
                samples: 0,
            }),
            Method::FirstHit => estimate_union_first_hit(dnf, num_vars, opts),
            Method::Coverage => estimate_union_coverage(dnf, num_vars, opts),
        }
    }

    fn format_value(self, value: f64) -> String {
        match self {
            Method::Exact | Method::FirstHit => format!("{:.0}", value.round()),
            Method::Coverage => format!("{}", value),
        }
    }
}

pub fn resolve_num_vars(path: &Path, explicit: Option<u32>) -> u32 {
    explicit
        .or_else(|| num_vars_from_path(path))
        .unwrap_or(DEFAULT_NUM_VARS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub path: PathBuf,
    pub method: Method,
    pub num_vars: u32,
    pub results: Vec<f64>,
    /// Sample count of the last formula counted.
    pub samples_used: usize,
    pub seconds: f64,
}

impl RunOutcome {
    pub fn write_results(&self, out: &Path) -> std::io::Result<()> {
        if let Some(dir) = out.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut w = BufWriter::new(File::create(out)?);
        for &v in &self.results {
            writeln!(w, "{}", self.method.format_value(v))?;
        }
        w.flush()
    }
}

/// Counts every formula stored in `path`.
pub fn run_file(
    path: &Path,
    method: Method,
    num_vars: u32,
    opts: &CountOptions,
) -> Result<RunOutcome> {
    let start = Instant::now();
    let mut results = Vec::new();
    let mut samples_used = 0usize;
    for (idx, dnf) in open_formulas(path)?.enumerate() {
        let dnf = dnf?;
        let est = method.count(&dnf, num_vars, opts)?;
        info!(
            "{} formula #{}: {} = {}",
            path.display(),
            idx,
            method.name(),
            est.value
        );
        samples_used = est.samples;
        results.push(est.value);
    }
    Ok(RunOutcome {
        path: path.to_path_buf(),
        method,
        num_vars,
        results,
        samples_used,
        seconds: start.elapsed().as_secs_f64(),
    })
}

/// Result file for `input` under `out_dir`, tagged by method and parameters.
pub fn output_path(out_dir: &Path, input: &Path, method: Method, opts: &CountOptions) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let file = match method {
        Method::Exact => format!("{}_sol.txt", name),
        Method::FirstHit => format!("{}_kl{:.2}_{:.2}.txt", name, opts.eps, opts.delta),
        Method::Coverage => format!("{}_klm{:.2}_{:.2}.txt", name, opts.eps, opts.delta),
    };
    out_dir.join(file)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLogRow {
    pub file: String,
    pub num_vars: u32,
    pub samples_used: usize,
    pub seconds: f64,
    pub status: String,
    pub eps: f64,
    pub delta: f64,
}

impl RunLogRow {
    pub fn csv_header() -> &'static str {
        "file,num_vars,samples_used,seconds,status,eps,delta"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{:.6},{},{},{}",
            esc_csv(&self.file),
            self.num_vars,
            self.samples_used,
            self.seconds,
            self.status,
            self.eps,
            self.delta
        )
    }
}

/// Appends one row, writing the header first if the log is new or empty.
pub fn append_run_log(log_path: &Path, row: &RunLogRow) -> std::io::Result<()> {
    if let Some(dir) = log_path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let mut f = OpenOptions::new().create(true).append(true).open(log_path)?;
    if f.metadata()?.len() == 0 {
        writeln!(f, "{}", RunLogRow::csv_header())?;
    }
    writeln!(f, "{}", row.to_csv_line())?;
    f.flush()
}

/// Runs one file on a worker thread, giving up after `timeout`.
pub fn run_one(
    path: &Path,
    method: Method,
    num_vars: Option<u32>,
    opts: CountOptions,
    timeout: Duration,
) -> (RunLogRow, Option<RunOutcome>) {
    let n = resolve_num_vars(path, num_vars);
    let start = Instant::now();
    let p = path.to_path_buf();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let res = run_file(&p, method, n, &opts);
        let _ = tx.send(res);
    });

    let mut row = RunLogRow {
        file: path.to_string_lossy().to_string(),
        num_vars: n,
        samples_used: 0,
        seconds: 0.0,
        status: "ok".to_string(),
        eps: opts.eps,
        delta: opts.delta,
    };
    let outcome = match rx.recv_timeout(timeout) {
        Ok(Ok(outcome)) => {
            row.samples_used = outcome.samples_used;
            Some(outcome)
        }
        Ok(Err(e)) => {
            warn!("{}: {:#}", path.display(), e);
            row.status = "error".to_string();
            None
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            row.status = "timeout".to_string();
            None
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            row.status = "error".to_string();
            None
        }
    };
    row.seconds = start.elapsed().as_secs_f64();
    (row, outcome)
}

/// Counts every `.bin` file under `dir`, writing result files to `out_dir`
/// and one run-log row per file to `csv_path`.
#[allow(clippy::too_many_arguments)]
pub fn run_dataset(
    dir: &Path,
    out_dir: &Path,
    method: Method,
    num_vars: Option<u32>,
    opts: CountOptions,
    timeout: Duration,
    csv_path: &Path,
    progress: bool,
) -> std::io::Result<Vec<RunLogRow>> {
    let paths = discover_paths(dir)?;
    let mut rows = Vec::new();
    for path in paths {
        let (row, outcome) = run_one(&path, method, num_vars, opts, timeout);
        if let Some(outcome) = outcome {
            outcome.write_results(&output_path(out_dir, &path, method, &opts))?;
        }
        if progress {
            println!(
                "file={} status={} seconds={:.3} samples_used={}",
                row.file, row.status, row.seconds, row.samples_used
            );
        }
        append_run_log(csv_path, &row)?;
        rows.push(row);
    }
    Ok(rows)
}

fn discover_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::<PathBuf>::new();
    collect_paths(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let p = entry.path();
        if p.is_dir() {
            collect_paths(&p, out)?;
            continue;
        }
        if p.extension().and_then(|x| x.to_str()) == Some("bin") {
            out.push(p);
        }
    }
    Ok(())
}

/// One number per non-blank line.
pub fn read_results(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)?;
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<f64>() {
            Ok(v) => out.push(v),
            Err(_) => bail!("{}:{}: not a number: '{}'", path.display(), i + 1, line),
        }
    }
    Ok(out)
}

/// Mean absolute error between two equally long result lists; NaN when empty.
pub fn mean_absolute_error(truth: &[f64], pred: &[f64]) -> Result<f64> {
    if truth.len() != pred.len() {
        bail!("length mismatch: {} vs {}", truth.len(), pred.len());
    }
    if truth.is_empty() {
        return Ok(f64::NAN);
    }
    let total = truth
        .iter()
        .zip(pred)
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>();
    Ok(total / truth.len() as f64)
}

fn esc_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
