use std::env;
use std::time::Instant;

use parsort::{SortEngineBuilder, SortError};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

const SIZES: &[usize] = &[
    1_024, 4_096, 16_384, 65_536, 262_144, 1_048_576, 4_194_304,
];

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("sort_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("parsort Scaling Probe: Performance and Correctness Testing");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
    eprintln!("Each input shape is sorted at increasing sizes on every requested");
    eprintln!("worker count. Runs up to size {} are checked against slice::sort.", options.verify_limit);
    eprintln!();
    eprintln!("Metrics explained:");
    eprintln!("  • wall_s: Wall-clock time in seconds (lower is better)");
    eprintln!("  • rss_delta_kib: Memory delta in KiB (scratch buffers dominate)");
    eprintln!("  • status: 'passed' = matches slice::sort, 'not_checked' = above verify limit");
    eprintln!();
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();
    let shapes = Shape::ALL;

    for (idx, shape) in shapes.iter().enumerate() {
        eprintln!("[{}/{}] Input shape: {}", idx + 1, shapes.len(), shape.label());
        for &threads in &options.threads {
            measurements.extend(run_shape(*shape, threads, &options, &mut sys));
        }
        eprintln!();
    }

    print_summary(&measurements, &options);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("sort_probe output error: {err}");
        std::process::exit(1);
    }
}

struct Options {
    format: OutputFormat,
    verify_limit: usize,
    threads: Vec<usize>,
    cutoff: Option<usize>,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut verify_limit = 65_536usize;
        let mut threads = vec![1, 2, 4];
        let mut cutoff = None;

        while let Some(arg) = args.next() {
            let arg = arg.into();
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg.clone(), None),
            };
            let mut value = || -> Result<String, String> {
                match inline.clone() {
                    Some(v) => Ok(v),
                    None => args
                        .next()
                        .map(Into::into)
                        .ok_or_else(|| format!("missing value after {flag}")),
                }
            };
            match flag.as_str() {
                "--help" | "-h" => {
                    Options::print_help();
                    std::process::exit(0);
                }
                "--format" => format = OutputFormat::from_str(&value()?)?,
                "--verify-limit" => {
                    verify_limit = value()?
                        .parse::<usize>()
                        .map_err(|_| "verify limit must be a positive integer".to_string())?;
                }
                "--threads" => threads = parse_thread_list(&value()?)?,
                "--cutoff" => {
                    let parsed = value()?
                        .parse::<usize>()
                        .map_err(|_| "cutoff must be a positive integer".to_string())?;
                    cutoff = Some(parsed);
                }
                _ => return Err(format!("unrecognized argument '{arg}'")),
            }
        }

        Ok(Self {
            format,
            verify_limit,
            threads,
            cutoff,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --release --bin sort_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --verify-limit <N>            Largest input checked against slice::sort (default: 65536)
  --threads <N[,N...]>          Worker counts to run with (default: 1,2,4)
  --cutoff <N>                  Fixed sequential cutoff (default: per-run heuristic)
  -h, --help                    Print this help message

Examples:
  cargo run --release --bin sort_probe
  cargo run --release --bin sort_probe -- --format table --threads 1,8 --cutoff 4096
"
        );
    }
}

fn parse_thread_list(value: &str) -> Result<Vec<usize>, String> {
    let threads = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| format!("invalid thread count '{part}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if threads.is_empty() {
        return Err("thread list is empty".to_string());
    }
    Ok(threads)
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

#[derive(Copy, Clone)]
enum Shape {
    Random,
    Reversed,
    Sorted,
    FewUnique,
}

impl Shape {
    const ALL: [Shape; 4] = [Shape::Random, Shape::Reversed, Shape::Sorted, Shape::FewUnique];

    fn label(self) -> &'static str {
        match self {
            Shape::Random => "random",
            Shape::Reversed => "reversed",
            Shape::Sorted => "sorted",
            Shape::FewUnique => "few_unique",
        }
    }

    fn generate(self, len: usize) -> Vec<u64> {
        match self {
            Shape::Random => (0..len as u64).map(splitmix64).collect(),
            Shape::Reversed => (0..len as u64).rev().collect(),
            Shape::Sorted => (0..len as u64).collect(),
            Shape::FewUnique => (0..len as u64).map(|i| splitmix64(i) % 16).collect(),
        }
    }
}

#[derive(Clone)]
struct Measurement {
    scenario: &'static str,
    size_desc: String,
    threads: usize,
    wall_s: f64,
    rss_delta_kib: u64,
    tasks: usize,
    verification_status: VerificationStatus,
    verification_detail: Option<String>,
}

#[derive(Clone, Copy)]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            VerificationStatus::Passed => "✓",
            VerificationStatus::Failed => "✗",
            VerificationStatus::NotChecked => "○",
        }
    }
}

fn run_shape(shape: Shape, threads: usize, options: &Options, sys: &mut System) -> Vec<Measurement> {
    let mut builder = SortEngineBuilder::new().threads(threads);
    if let Some(cutoff) = options.cutoff {
        builder = builder.sequential_cutoff(cutoff);
    }
    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("      threads={threads}: engine setup failed: {err}");
            return Vec::new();
        }
    };

    let total = SIZES.len();
    SIZES
        .iter()
        .enumerate()
        .map(|(idx, &len)| {
            eprint!("      [{}/{}] threads={} len={}... ", idx + 1, total, threads, len);
            let mut input = shape.generate(len);
            let expected = (len <= options.verify_limit).then(|| {
                let mut copy = input.clone();
                copy.sort();
                copy
            });

            let before = rss_kib(sys);
            let start = Instant::now();
            let outcome: Result<_, SortError> = engine.sort_with_stats(&mut input);
            let wall_s = start.elapsed().as_secs_f64();
            let after = rss_kib(sys);

            let (status, detail, tasks) = match (outcome, expected) {
                (Err(err), _) => (VerificationStatus::Failed, Some(err.to_string()), 0),
                (Ok(stats), Some(expected)) if expected == input => {
                    (VerificationStatus::Passed, None, stats.tasks)
                }
                (Ok(stats), Some(_)) => (
                    VerificationStatus::Failed,
                    Some("output differs from slice::sort".to_string()),
                    stats.tasks,
                ),
                (Ok(stats), None) => (VerificationStatus::NotChecked, None, stats.tasks),
            };

            eprintln!(
                "{} tasks={}, time={:.3}s, status={}",
                status.icon(),
                tasks,
                wall_s,
                status.label()
            );
            Measurement {
                scenario: shape.label(),
                size_desc: format!("len={len}"),
                threads,
                wall_s,
                rss_delta_kib: after.saturating_sub(before),
                tasks,
                verification_status: status,
                verification_detail: detail,
            }
        })
        .collect()
}

fn print_summary(measurements: &[Measurement], options: &Options) {
    eprintln!("{}", "=".repeat(80));
    eprintln!("SUMMARY");
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut passed = 0;
    let mut failed = 0;
    let mut not_checked = 0;
    for m in measurements {
        match m.verification_status {
            VerificationStatus::Passed => passed += 1,
            VerificationStatus::Failed => failed += 1,
            VerificationStatus::NotChecked => not_checked += 1,
        }
    }

    let total = measurements.len().max(1);
    eprintln!("Verification Results:");
    eprintln!("  Total runs: {}", measurements.len());
    eprintln!("  ✓ Passed: {} ({:.1}%)", passed, 100.0 * passed as f64 / total as f64);
    eprintln!("  ✗ Failed: {} ({:.1}%)", failed, 100.0 * failed as f64 / total as f64);
    eprintln!(
        "  ○ Not checked (size > {}): {} ({:.1}%)",
        options.verify_limit,
        not_checked,
        100.0 * not_checked as f64 / total as f64
    );
    eprintln!();

    if failed > 0 {
        eprintln!("Failed Runs:");
        for m in measurements {
            if matches!(m.verification_status, VerificationStatus::Failed) {
                eprintln!("  ✗ {} ({}, threads={})", m.scenario, m.size_desc, m.threads);
                if let Some(ref detail) = m.verification_detail {
                    eprintln!("     Error: {}", detail);
                }
            }
        }
        eprintln!();
    }

    // Speedup of the largest input relative to the single-worker run.
    eprintln!("Speedup at the largest size:");
    for shape in Shape::ALL {
        let largest: Vec<&Measurement> = measurements
            .iter()
            .filter(|m| m.scenario == shape.label())
            .filter(|m| m.size_desc == format!("len={}", SIZES[SIZES.len() - 1]))
            .collect();
        let baseline = largest
            .iter()
            .min_by_key(|m| m.threads)
            .map(|m| (m.threads, m.wall_s));
        if let Some((base_threads, base_s)) = baseline {
            for m in &largest {
                let speedup = if m.wall_s > 0.0 { base_s / m.wall_s } else { 0.0 };
                eprintln!(
                    "  {:<12} threads={:<3} {:.2}x vs threads={}",
                    shape.label(),
                    m.threads,
                    speedup,
                    base_threads
                );
            }
        }
    }
    eprintln!();

    eprintln!("{}", "=".repeat(80));
    if failed == 0 {
        eprintln!("✓ All verified runs passed.");
    } else {
        eprintln!("✗ {} run(s) failed. Please review the errors above.", failed);
    }
    eprintln!("{}", "=".repeat(80));
    eprintln!();
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,size_desc,threads,wall_s,rss_delta_kib,tasks,verification_status,verification_detail");
    for m in measurements {
        let detail = m
            .verification_detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{},{:.3},{},{},{},\"{}\"",
            m.scenario,
            m.size_desc,
            m.threads,
            m.wall_s,
            m.rss_delta_kib,
            m.tasks,
            m.verification_status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let mut col1 = "scenario".len();
    let mut col2 = "size".len();
    for m in measurements {
        col1 = col1.max(m.scenario.len());
        col2 = col2.max(m.size_desc.len());
    }

    println!(
        "{:<col1$}  {:<col2$}  {:>7}  {:>12}  {:>14}  {:>10}  {:>12}  {}",
        "scenario",
        "size",
        "threads",
        "wall_s",
        "rss_delta_kib",
        "tasks",
        "status",
        "detail",
        col1 = col1,
        col2 = col2
    );
    println!(
        "{:-<col1$}  {:-<col2$}  {:-<7}  {:-<12}  {:-<14}  {:-<10}  {:-<12}  {:-<12}",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        col1 = col1,
        col2 = col2
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:<col2$}  {:>7}  {:>12.3}  {:>14}  {:>10}  {:>12}  {}",
            m.scenario,
            m.size_desc,
            m.threads,
            m.wall_s,
            m.rss_delta_kib,
            m.tasks,
            m.verification_status.label(),
            m.verification_detail.as_deref().unwrap_or(""),
            col1 = col1,
            col2 = col2
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    println!("[");
    for (idx, m) in measurements.iter().enumerate() {
        let detail = m.verification_detail.as_ref().map(|s| s.replace('"', "'"));
        println!(
            "  {{\"scenario\":\"{}\",\"size\":\"{}\",\"threads\":{},\"wall_s\":{:.3},\"rss_delta_kib\":{},\"tasks\":{},\"verification\":{{\"status\":\"{}\",\"detail\":{}}}}}{}",
            m.scenario,
            m.size_desc,
            m.threads,
            m.wall_s,
            m.rss_delta_kib,
            m.tasks,
            m.verification_status.label(),
            match detail {
                Some(ref d) => format!("\"{d}\""),
                None => "null".to_string(),
            },
            if idx + 1 == measurements.len() { "" } else { "," }
        );
    }
    println!("]");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    if let Some(process) = get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        process.memory() / 1024
    } else {
        0
    }
}

/// Deterministic scrambler so every run sorts the same "random" input.
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
