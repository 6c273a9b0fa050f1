//! Entry point for the `silly` binary.

use std::io::{self, BufWriter};

use anyhow::Result;
use clap::Parser;

use sillydb::cli::Cli;
use sillydb::logging;
use sillydb::repl::Repl;

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.help {
        Cli::print_usage();
        return Ok(());
    }

    logging::init_logging()?;

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let mut repl = Repl::new(stdin, stdout, cli.quiet);
    repl.run()?;
    Ok(())
}
