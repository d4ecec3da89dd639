mod render;

use clap::Parser;
use hdrpeek_core::Binary;
use log::LevelFilter;
use std::io;
use std::process::ExitCode;

/// Executable header inspector
#[derive(Parser)]
#[command(
    name = "hdrpeek",
    about = "Identify PE, Mach-O and universal binaries and print their fixed headers",
    version,
    author
)]
struct Cli {
    /// Path to binary file
    #[arg(required = true)]
    path: std::path::PathBuf,

    /// Log debug details and show the raw magic of unrecognised files
    #[arg(short, long)]
    verbose: bool,

    /// Print the decoded report as JSON
    #[arg(long)]
    json: bool,
}

const EXIT_USAGE: u8 = 1;
const EXIT_UNREADABLE: u8 = 2;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let bin = match Binary::open(&cli.path) {
        Ok(bin) => bin,
        Err(err) => {
            eprintln!("err: {err:#}");
            return ExitCode::from(EXIT_UNREADABLE);
        }
    };

    let mut out = io::stdout().lock();
    let printed = if cli.json {
        render::json(&mut out, &bin)
    } else {
        render::text(&mut out, &bin, cli.verbose).map_err(Into::into)
    };
    if let Err(err) = printed {
        log::error!("failed to write report: {err:#}");
    }

    ExitCode::SUCCESS
}
