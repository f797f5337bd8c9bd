use std::env;
use std::process::ExitCode;

use cliproc::{Cli, FromCli};
use colored::Colorize;

use sv2ipxact::cli::{print_cli_error, Args};
use sv2ipxact::pipeline;

fn main() -> ExitCode {
    let mut cli = Cli::default().parse(env::args());

    let args = match Args::from_cli(&mut cli) {
        Ok(args) => args,
        Err(e) => {
            print_cli_error(&e);
            return ExitCode::from(3);
        }
    };
    std::mem::drop(cli);

    let verbose = args.verbose;

    match pipeline::run(args) {
        Ok(report) => {
            if verbose {
                report.print_summary();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", "error".red().bold(), err);
            ExitCode::from(err.exit_code())
        }
    }
}
