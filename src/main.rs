//! blokbustr entry point.
//!
//! One binary, three commands:
//! - `watch`: ingests the configured chain and notifies transactions touching watched addresses
//! - `explore`: drains the exploration queue, tracing fund flows one hop at a time
//! - `seed`: submits the first task of a new trace
//!
//! Configuration comes from the environment (a `.env` file is loaded first when present).
//! SIGINT and SIGTERM stop the running command and exit with code 0. Startup and runtime
//! failures exit with code 1.

use blokbustr::{
	bootstrap::{
		run_explorer, run_seed, run_watcher, seed_task, wait_for_shutdown_signal, Result,
	},
	models::ServiceConfig,
	utils::logging::{setup_logging, LoggingConfig},
};

use clap::{Arg, ArgMatches, Command};
use dotenvy::dotenv;
use std::{process::ExitCode, sync::Arc};
use tokio::sync::watch;
use tracing::{error, info};

fn cli() -> Command {
	Command::new("blokbustr")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Ingests transactions from multiple blockchains, reports activity on watched \
			 addresses and traces fund flows from a seed address.",
		)
		.subcommand_required(true)
		.arg_required_else_help(true)
		.subcommand(Command::new("watch").about("Watch the configured chain for watched addresses"))
		.subcommand(Command::new("explore").about("Process fund-flow exploration tasks"))
		.subcommand(
			Command::new("seed")
				.about("Submit the first exploration task of a trace")
				.arg(
					Arg::new("chain")
						.long("chain")
						.help("Chain of the seed address (ETHEREUM, BITCOIN, SOLANA)")
						.value_name("CHAIN")
						.required(true),
				)
				.arg(
					Arg::new("address")
						.long("address")
						.help("Address the trace starts from")
						.value_name("ADDRESS")
						.required(true),
				)
				.arg(
					Arg::new("start-tx")
						.long("start-tx")
						.help("Only follow transactions after this one")
						.value_name("TX_HASH"),
				)
				.arg(
					Arg::new("amount")
						.long("amount")
						.help("Amount to track, in the chain's smallest unit (default: 0)")
						.value_name("AMOUNT"),
				),
		)
}

/// Runs `run` until it returns or a shutdown signal arrives
async fn until_shutdown<F, Fut>(run: F) -> Result<()>
where
	F: FnOnce(watch::Receiver<bool>) -> Fut,
	Fut: std::future::Future<Output = Result<()>>,
{
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	tokio::spawn(async move {
		wait_for_shutdown_signal().await;
		info!("Shutdown signal received, stopping services...");
		let _ = shutdown_tx.send(true);
	});
	run(shutdown_rx).await
}

async fn run(matches: ArgMatches) -> Result<()> {
	let config = Arc::new(ServiceConfig::from_env()?);

	match matches.subcommand() {
		Some(("watch", _)) => until_shutdown(|shutdown| run_watcher(config, shutdown)).await,
		Some(("explore", _)) => until_shutdown(|shutdown| run_explorer(config, shutdown)).await,
		Some(("seed", args)) => {
			let arg = |name: &str| args.get_one::<String>(name).map(String::as_str);
			let task = seed_task(
				arg("chain").unwrap_or_default(),
				arg("address").unwrap_or_default(),
				arg("start-tx"),
				arg("amount"),
			)?;
			run_seed(config, task).await
		}
		_ => Err("Unknown command".into()),
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	let matches = cli().get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	let _log_guard = match setup_logging(&LoggingConfig::from_env()) {
		Ok(guard) => guard,
		Err(e) => {
			eprintln!("Failed to setup logging: {}", e);
			None
		}
	};

	match run(matches).await {
		Ok(()) => {
			info!("Shutdown complete");
			ExitCode::SUCCESS
		}
		Err(e) => {
			error!("{}", e);
			ExitCode::FAILURE
		}
	}
}
