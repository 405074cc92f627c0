//! midsquare CLI
//!
//! Usage:
//!   midsquare --seed 1234                   # Run to the first repeat
//!   midsquare                               # Random four-digit seed
//!   midsquare --seed 6239 --interval-ms 50  # Step live every 50 ms
//!   midsquare --seed 123456 --width 6       # Wider iterates
//!   midsquare --seed 1234 --json            # JSON report
//!   midsquare --serve                       # HTTP API server

use clap::Parser;
use colored::Colorize;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use midsquare::core::{run_server, seed_from_input, SequenceEngine};
use midsquare::types::{seed_terminal_string, DigitString, RunReport, SequenceError};
use midsquare::{DEFAULT_ADDR, DEFAULT_WIDTH, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "midsquare",
    version = VERSION,
    about = "Middle-square generator - square, keep the middle digits, repeat until a cycle",
    long_about = "Runs the middle-square pseudo-random generator.\n\n\
                  Each step squares the current N-digit value, pads the square\n\
                  to 2N digits and keeps the middle N digits. The run stops at\n\
                  the first value that already appeared; the iterates that\n\
                  repeat forever from there on are highlighted.\n\n\
                  Output columns: step, then hi | mid | lo of the square.\n\
                  Set RUST_LOG=debug to trace every step on stderr."
)]
struct Args {
    /// Seed digits (non-digits ignored, extra digits dropped, random if empty)
    #[arg(short, long)]
    seed: Option<String>,

    /// Iterate width in digits (1-9)
    #[arg(short, long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Delay between steps in milliseconds (0 = no delay)
    #[arg(short, long, default_value_t = 0)]
    interval_ms: u64,

    /// Stop after this many steps even without a cycle
    #[arg(long)]
    max_steps: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Only print the summary line
    #[arg(short, long)]
    quiet: bool,

    /// Run as HTTP API server
    #[arg(long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = DEFAULT_ADDR)]
    addr: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(if args.serve { "info" } else { "warn" });

    if args.no_color {
        colored::control::set_override(false);
    }

    if args.serve {
        run_serve(&args).await;
    } else if let Err(e) = run_sequence(&args).await {
        eprintln!("{}", format!("error: {}", e).red());
        std::process::exit(if e.is_fatal() { 1 } else { 2 });
    }
}

/// Logs go to stderr so stdout stays parseable
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run one sequence from the seed
async fn run_sequence(args: &Args) -> Result<(), SequenceError> {
    let seed = seed_from_input(args.seed.as_deref(), args.width)?;
    let mut engine = SequenceEngine::with_seed(seed.clone())?;
    let live = args.interval_ms > 0 && !args.json && !args.quiet;

    if live {
        print_header(&seed);
        println!("{}", seed_terminal_string(&seed, false));
    }

    while !engine.cycle_detected() {
        if args.max_steps.is_some_and(|max| engine.step_count() >= max) {
            return print_stopped(&engine, args);
        }
        let output = engine.advance()?;
        if live {
            println!("{}", output.to_terminal_string(output.already_seen));
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
    }

    let report = engine.report()?;
    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("serialization failed: {}", e),
        }
    } else if args.quiet {
        println!("{}", report.summary());
    } else if live {
        print_cycle(&report);
    } else {
        print_header(&seed);
        print_report(&report);
    }
    Ok(())
}

/// Stopped by --max-steps before a repeat
fn print_stopped(engine: &SequenceEngine, args: &Args) -> Result<(), SequenceError> {
    if args.json {
        match serde_json::to_string_pretty(engine.steps()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("serialization failed: {}", e),
        }
        return Ok(());
    }
    if args.interval_ms == 0 && !args.quiet {
        if let Some(seed) = engine.seed() {
            print_header(seed);
            println!("{}", seed_terminal_string(seed, false));
        }
        for output in engine.steps() {
            println!("{}", output.to_terminal_string(false));
        }
    }
    println!(
        "{}",
        format!("stopped after {} steps, no repeat yet", engine.step_count()).yellow()
    );
    Ok(())
}

/// Print header
fn print_header(seed: &DigitString) {
    println!("{}", format!("midsquare v{} - seed {} (width {})", VERSION, seed, seed.width()).bold());
    println!();
}

/// Seed and every step, cycle highlighted, then the summary
fn print_report(report: &RunReport) {
    println!("{}", report.seed_terminal_string());
    for output in &report.steps {
        println!("{}", output.to_terminal_string(report.is_cyclic(output.step)));
    }
    print_cycle(report);
}

/// Cycle summary
fn print_cycle(report: &RunReport) {
    let values: Vec<String> = report.cycle_values().iter().map(|v| v.to_string()).collect();
    println!();
    println!(
        "{}",
        format!(
            "cycle of length {} entered after {} steps: {}",
            report.cycle_len,
            report.tail_len,
            values.join(" → ")
        )
        .red()
    );
    println!("{}", report.summary().dimmed());
}

/// Run HTTP API server
async fn run_serve(args: &Args) {
    if let Err(e) = run_server(&args.addr).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
