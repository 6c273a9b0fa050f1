//! Command-line flag surface.
//!
//! Only two flags exist; anything else on the command line is ignored
//! rather than rejected, so stray options never keep the shell from
//! starting. Help is an explicit flag (clap's auto-help would bypass
//! `ignore_errors`).

use clap::Parser;

/// Flags accepted by the `silly` binary.
#[derive(Debug, Parser)]
#[command(name = "silly", disable_help_flag = true, ignore_errors = true)]
pub struct Cli {
    /// Print this help message and exit.
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Run in quiet mode: suppress row output for PRINT and JOIN.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// The usage text printed for `-h`/`--help`.
    pub fn print_usage() {
        println!("Usage: silly [options]");
        println!("-h, --help\t\tPrint this help message and exit.");
        println!("-q, --quiet\t\tRun in quiet mode.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::parse_from(["silly", "-q"]);
        assert!(cli.quiet);
        assert!(!cli.help);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::parse_from(["silly", "--quiet", "--help"]);
        assert!(cli.quiet);
        assert!(cli.help);
    }

    #[test]
    fn test_unknown_options_ignored() {
        let cli = Cli::parse_from(["silly", "-q", "--frobnicate"]);
        assert!(cli.quiet);
    }
}
