use std::io;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::agent::{connect, dispatch, validate};
use crate::types::{AgentError, Args, OptionSet};

mod agent;
mod types;

pub const RELEASE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    let args = Args::parse();
    init_tracing(args.verbose);
    debug!(version = RELEASE_VERSION, "fence_dli starting");

    let options = OptionSet::parse(io::stdin().lock())?;
    if let Some(warning) = options.unknown_options_warning() {
        eprintln!("{}", warning);
    }

    let request = match validate(&options) {
        Ok(request) => request,
        Err(validation_error) => {
            validation_error.report();
            process::exit(validation_error.exit_code());
        }
    };

    let mut switch = connect(&request)?;
    let outcome = dispatch(&request, &mut switch).await?;
    debug!(?outcome, "action finished");
    process::exit(outcome.exit_code());
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // stdout belongs to the cluster manager, logs go to stderr
    let env_filter = EnvFilter::try_from_env("FENCE_DLI_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
