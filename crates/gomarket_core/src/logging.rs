//! Core logging bootstrap.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Emit metadata-only diagnostic events; cart contents never reach logs.
//!
//! # Invariants
//! - Init is idempotent for an identical `LogConfig`.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "gomarket";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    config: LogConfig,
    _logger: LoggerHandle,
}

/// Validated logging configuration supplied by the host app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

impl LogConfig {
    /// Normalizes a host-provided level and directory.
    ///
    /// Levels are case-insensitive `trace|debug|info|warn|error`
    /// (`warning` is accepted as `warn`). The directory must be absolute.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: normalize_log_dir(log_dir)?,
        })
    }
}

/// Initializes core logging with level and directory.
///
/// # Errors
/// - Unsupported `level`, or empty / relative `log_dir`.
/// - Directory creation or logger backend failure.
/// - A different configuration is already active.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let config = LogConfig::parse(level, log_dir)?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(config.clone()))?;
    ensure_same_config(&state.config, &config)
}

/// Returns the active `(level, log_dir)`, or `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.config.level, state.config.log_dir.clone()))
}

/// Default log level for the current build mode: `debug` or `info`.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(config: LogConfig) -> Result<LoggingState, String> {
    std::fs::create_dir_all(&config.log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            config.log_dir.display()
        )
    })?;

    let logger = Logger::try_with_str(config.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", config.level))?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=app_start module=core status=ok platform={} build_mode={} version={}",
        std::env::consts::OS,
        build_mode(),
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=core_init module=core status=ok level={} log_dir={}",
        config.level,
        config.log_dir.display()
    );

    Ok(LoggingState {
        config,
        _logger: logger,
    })
}

fn ensure_same_config(active: &LogConfig, requested: &LogConfig) -> Result<(), String> {
    if active.log_dir != requested.log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            active.log_dir.display(),
            requested.log_dir.display()
        ));
    }
    if active.level != requested.level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            active.level, requested.level
        ));
    }
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payload may carry product titles; cap and flatten before logging.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!("event=panic_captured module=core status=error location={location} payload={payload}");
        previous_hook(panic_info);
    }));
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, sanitize_message, LogConfig};

    #[test]
    fn log_config_normalizes_level_aliases() {
        let config = LogConfig::parse(" WARNING ", "/tmp/gomarket-logs").expect("valid config");
        assert_eq!(config.level, "warn");
        assert_eq!(config.log_dir.to_str(), Some("/tmp/gomarket-logs"));
    }

    #[test]
    fn log_config_rejects_relative_and_empty_dirs() {
        let relative = LogConfig::parse("info", "logs/dev").expect_err("relative dir");
        assert!(relative.contains("absolute"));

        let empty = LogConfig::parse("info", "   ").expect_err("empty dir");
        assert!(empty.contains("empty"));
    }

    #[test]
    fn log_config_rejects_unknown_level() {
        let error = LogConfig::parse("verbose", "/tmp").expect_err("unknown level");
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn sanitize_message_flattens_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_reconfiguration() {
        let dir = tempfile::tempdir().expect("temp dir");
        let dir_str = dir.path().to_str().expect("utf-8 temp dir").to_string();
        let other = tempfile::tempdir().expect("temp dir");
        let other_str = other.path().to_str().expect("utf-8 temp dir").to_string();

        init_logging("info", &dir_str).expect("first init");
        init_logging("INFO", &dir_str).expect("same config is idempotent");

        let level_error = init_logging("debug", &dir_str).expect_err("level conflict");
        assert!(level_error.contains("refusing to switch"));

        let dir_error = init_logging("info", &other_str).expect_err("dir conflict");
        assert!(dir_error.contains("refusing to switch"));

        let (level, active_dir) = logging_status().expect("logging active");
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir.path());
    }
}
