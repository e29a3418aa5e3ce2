use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use nerode_re::suite;

/// Checks a file of `pattern:accepted;words:rejected;words` lines
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Test file, one pattern per line
    file: PathBuf,

    /// Print the tree and automata built for every pattern
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let contents = fs::read_to_string(&args.file)
        .with_context(|| format!("can't open file {}", args.file.display()))?;
    let report = suite::run_suite(&contents)?;

    if args.verbose {
        print!("{:#}", report);
    } else {
        print!("{}", report);
    }

    if report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
