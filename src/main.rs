//! Command-line front end: count the directories under a root path.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering as AtomicOrdering;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shardwalk::{Parallelism, Walk};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shardwalk", about = "Count directories under a root path in parallel.")]
struct Args {
    /// Directory to traverse.
    root: PathBuf,

    /// Worker thread count; defaults to one per CPU. Sharded mode only.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Scheduling mode.
    #[arg(long, value_enum, default_value = "sharded")]
    mode: Mode,

    /// Bound the traversal depth; 0 counts nothing but the root lookup.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Ignore dot-directories.
    #[arg(long)]
    skip_hidden: bool,

    /// Log worker lifecycle and timing details.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Single thread, breadth-first.
    Serial,
    /// Two threads over one shared queue.
    Pair,
    /// One queue per worker thread.
    Sharded,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let parallelism = match args.mode {
        Mode::Serial => Parallelism::Serial,
        Mode::Pair => Parallelism::SharedPair,
        Mode::Sharded => Parallelism::Sharded(args.threads.unwrap_or_else(num_cpus::get)),
    };

    let mut walk = Walk::new(&args.root)
        .parallelism(parallelism)
        .skip_hidden(args.skip_hidden);
    if let Some(depth) = args.max_depth {
        walk = walk.max_depth(depth);
    }

    let stop = walk.stop_signal();
    ctrlc::set_handler(move || {
        eprintln!("\ninterrupted, winding down...");
        stop.store(true, AtomicOrdering::SeqCst);
    })
    .context("failed to install the interrupt handler")?;

    let report = walk
        .run()
        .with_context(|| format!("failed to traverse {}", args.root.display()))?;

    if !report.completed {
        info!("traversal interrupted before completion");
    }
    if report.skipped > 0 {
        info!(
            skipped = report.skipped,
            "some directories could not be listed; the count is a lower bound"
        );
    }
    println!(
        "{} directories under {} in {:.3}s",
        report.directories,
        args.root.display(),
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("shardwalk=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
