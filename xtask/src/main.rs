use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride dispatch workspace",
    long_about = "A unified CLI for serving the dispatch API, running benchmarks,\n\
                  and CI checks in the ride dispatch workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dispatch HTTP server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,
        /// Initial dispatch algorithm
        #[arg(long, default_value = "balanced")]
        dispatch_mode: String,
        /// Build with optimizations
        #[arg(long)]
        release: bool,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Save or compare against a named Criterion baseline
    BenchBaseline {
        /// Baseline name
        #[arg(long, default_value = "main")]
        name: String,
        /// Compare against the baseline instead of saving it
        #[arg(long)]
        compare: bool,
    },
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn bench_args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["bench", "--package", "sim_core", "--bench", "performance"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    args
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test sim_core");
    run_cargo(&["test", "-p", "sim_core"]);

    step("Test sim_server");
    run_cargo(&["test", "-p", "sim_server"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&bench_args(&[]));
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            dispatch_mode,
            release,
        } => {
            let mut args = vec!["run", "-p", "sim_server"];
            if release {
                args.push("--release");
            }
            args.extend_from_slice(&["--", "--bind", &bind, "--dispatch-mode", &dispatch_mode]);
            run_cargo(&args);
        }
        Commands::Bench => {
            run_cargo(&bench_args(&[]));
        }
        Commands::BenchBaseline { name, compare } => {
            let flag = if compare { "--baseline" } else { "--save-baseline" };
            run_cargo(&bench_args(&[flag, &name]));
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
