//! `fund-tx`: build, sign and check a 2-of-2 funding transaction.
//!
//! Prints the signed transaction hex on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use btc_sdk::funding::{build_funding_transaction, FundingError, FundingFixture};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON fixture to build from. Defaults to the bundled reference fixture.
    #[arg(long, value_name = "PATH")]
    fixture: Option<PathBuf>,

    /// Skip the comparison against the fixture's expected hex.
    #[arg(long)]
    no_verify: bool,

    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<String, FundingError> {
    let fixture = match &args.fixture {
        Some(path) => FundingFixture::from_path(path)?,
        None => FundingFixture::reference()?,
    };

    let funded = build_funding_transaction(&fixture)?;
    if !args.no_verify {
        fixture.verify(&funded.hex)?;
    }
    Ok(funded.hex)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(hex) => {
            println!("{}", hex);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
