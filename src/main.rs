mod aggregate;
mod ci;
mod classify;
mod cli;
mod config;
mod declaration;
mod error;
mod git;
mod pipeline;
mod report;
mod types;

use crate::error::AttributionError;
use clap::Parser;
use std::io::Read;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const DECLARATION_REJECTED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_body(cmd: &cli::DeclarationCommand) -> Result<String, AttributionError> {
    match &cmd.file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}

fn run() -> Result<i32, AttributionError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        cli::Commands::Run(cmd) => {
            let summary = pipeline::execute_run(&cmd)?;
            println!("{summary}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Scan(cmd) => {
            let rendered = pipeline::execute_scan(&cmd)?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Declaration(cmd) => {
            let body = read_body(&cmd)?;
            let declared = declaration::resolve_declared(&body, None)?;
            println!("{declared}");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
