//! CLI argument definitions

use crate::report::ReportOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "loadtime",
    version,
    about = "Measure how long each unit takes to load",
    after_help = "\
EXAMPLES:
    loadtime app                          Profile unit 'app' from ./
    loadtime -p src app.cli --top 10      Search src/, show the 10 slowest
    loadtime app --export trace.json      Also write a Chrome trace"
)]
pub struct Args {
    /// Root unit to load (dotted name)
    #[arg(value_name = "UNIT")]
    pub unit: String,

    /// Number of slowest loads to show
    #[arg(long, default_value_t = 25)]
    pub top: usize,

    /// Decimal places for durations (seconds)
    #[arg(long, default_value_t = 4)]
    pub precision: usize,

    /// Directory to search for unit scripts (repeatable)
    #[arg(short = 'p', long = "path", value_name = "DIR", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Unit provided by the host itself; resolved but never timed (repeatable)
    #[arg(long = "builtin", value_name = "NAME")]
    pub builtins: Vec<String>,

    /// Export trace to file (Chrome Trace Event format)
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Add time totals per unit kind
    #[arg(long)]
    pub summary: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    #[must_use]
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top: self.top,
            precision: self.precision,
            color: !self.no_color && !self.json,
            summary: self.summary,
        }
    }
}
