//! Logging setup.
//!
//! Events go to stdout in the compact format, filtered by `RUST_LOG` (default `info`). When
//! `LOG_TO_FILE=true`, every event is also written as a JSON line to `LOG_FILE_PATH` through a
//! non-blocking writer whose guard must outlive the process main loop.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Log file used when `LOG_FILE_PATH` is unset
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/blokbustr.log";

type SetupResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync + 'static>>;

/// File logging settings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoggingConfig {
	/// JSON log file, None when file logging is disabled
	pub file_path: Option<PathBuf>,
}

impl LoggingConfig {
	/// Reads `LOG_TO_FILE` and `LOG_FILE_PATH` from the process environment
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads the settings from an arbitrary key lookup
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let enabled = lookup("LOG_TO_FILE")
			.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));
		let file_path = enabled.then(|| {
			lookup("LOG_FILE_PATH")
				.map(|path| path.trim().to_string())
				.filter(|path| !path.is_empty())
				.unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string())
				.into()
		});
		Self { file_path }
	}
}

/// Setup logging to stdout, plus the JSON file when configured
///
/// # Returns
/// * `Option<WorkerGuard>` - Flushes the file writer when dropped, None without file logging
pub fn setup_logging(config: &LoggingConfig) -> SetupResult<Option<WorkerGuard>> {
	setup_logging_with_writer(std::io::stdout, config)
}

/// Setup logging with a custom console writer
pub fn setup_logging_with_writer<W>(
	writer: W,
	config: &LoggingConfig,
) -> SetupResult<Option<WorkerGuard>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	let (file_layer, guard) = match config.file_path.as_deref() {
		Some(path) => {
			let (file_writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
			let layer = fmt::layer()
				.json()
				.with_writer(file_writer)
				.with_ansi(false);
			(Some(layer), Some(guard))
		}
		None => (None, None),
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(true)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.with(file_layer)
		.try_init()?;

	Ok(guard)
}

fn open_log_file(path: &Path) -> SetupResult<std::fs::File> {
	if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
		std::fs::create_dir_all(dir)?;
	}
	let file = std::fs::OpenOptions::new()
		.create(true)
		.append(true)
		.open(path)?;
	Ok(file)
}
