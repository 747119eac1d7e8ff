//! # loadtime - Main Entry Point
//!
//! Loads the root unit once with the interceptor installed, prints the
//! slowest loads, and exits non-zero if the root load itself failed.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::rc::Rc;

use loadtime::cli::Args;
use loadtime::export::ChromeTraceExporter;
use loadtime::preflight::run_preflight_checks;
use loadtime::profiling::profile;
use loadtime::report::{write_json_report, write_report};
use loadtime::script::ScriptFinder;
use loadtime_host::{BuiltinFinder, ResolutionChain, Runtime};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

/// Build the host runtime: builtins first, then unit scripts.
fn build_runtime(args: &Args) -> Runtime {
    let mut chain = ResolutionChain::new();
    if !args.builtins.is_empty() {
        chain.push(Rc::new(BuiltinFinder::new(args.builtins.iter().cloned())));
    }
    chain.push(Rc::new(ScriptFinder::new(args.paths.iter().cloned())));
    Runtime::with_chain(chain)
}

fn run() -> Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;

    run_preflight_checks(&args.unit, &args.paths)?;

    if !quiet {
        eprintln!("loadtime v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("root: {}", args.unit);
    }

    let mut runtime = build_runtime(&args);
    let (recorder, result) = profile(&mut runtime, &args.unit);
    let (handled, unhandled) = recorder.partition_errors();
    info!(
        "recorded {} loads, {} handled and {} unhandled errors",
        recorder.len(),
        handled.len(),
        unhandled.len()
    );

    let mut options = args.report_options();
    let stdout = io::stdout();
    options.color &= stdout.is_terminal();
    let mut out = stdout.lock();
    let written = if args.json {
        write_json_report(&mut out, &recorder, &options)
    } else {
        write_report(&mut out, &recorder, &options)
    };
    written.context("Failed to write report")?;

    if let Some(ref export_path) = args.export {
        let file = File::create(export_path).context("Failed to create trace output file")?;
        ChromeTraceExporter::from_records(&recorder.records())
            .export(BufWriter::new(file))
            .context("Failed to export trace")?;
        if !quiet {
            eprintln!("saved: {}", export_path.display());
        }
    }

    // Report first, then surface a failed root load
    result.with_context(|| format!("Failed to load '{}'", args.unit))?;
    Ok(())
}
