//! `values` - command-line harness for an XML values service.
//!
//! Each invocation builds one `EntityClient`, runs one subcommand against
//! it and exits. Errors are reported on stderr with a non-zero exit code;
//! logs also go to stderr so stdout carries only results.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use values_core::{ClientConfig, EntityClient, DEFAULT_BASE_URL};

mod commands;

/// Exercise a values service: list, read, create, replace and delete
/// entities by index
#[derive(Debug, Parser)]
#[command(name = "values")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the values collection
    #[arg(long, env = "VALUES_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Abandon an exchange after this many seconds
    #[arg(long, env = "VALUES_API_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: commands::Command,
}

impl Cli {
    fn config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.base_url);
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = EntityClient::connect(&cli.config());
    match commands::execute(&client, &cli.command, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error in Web API Request: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}
