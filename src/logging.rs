use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Event, Level, Subscriber};
use tracing_appender::rolling;
use tracing_subscriber::layer::{Context as LayerContext, Layer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Answers whether the logging subsystem has recorded an error
/// (`HasLoggedError() -> bool`).
#[cfg_attr(test, mockall::automock)]
pub trait ErrorProbe: Send + Sync {
    fn has_logged_error(&self) -> bool;
}

/// Shared flag raised by [`ErrorFlagLayer`] on the first ERROR event.
#[derive(Debug, Clone, Default)]
pub struct ErrorTracker {
    seen: Arc<AtomicBool>,
}

impl ErrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer that feeds this tracker.
    pub fn layer(&self) -> ErrorFlagLayer {
        ErrorFlagLayer {
            seen: Arc::clone(&self.seen),
        }
    }
}

impl ErrorProbe for ErrorTracker {
    fn has_logged_error(&self) -> bool {
        self.seen.load(Ordering::SeqCst)
    }
}

/// Tracing layer that raises a flag whenever an ERROR-level event is recorded.
pub struct ErrorFlagLayer {
    seen: Arc<AtomicBool>,
}

impl<S: Subscriber> Layer<S> for ErrorFlagLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.seen.store(true, Ordering::SeqCst);
        }
    }
}

/// Setup logging for the settings subsystem.
///
/// Console output is always on. When `file_output` is set (the `Enable_Log`
/// flag) logs are also written to a daily rotating file in `log_dir`.
/// Every ERROR event raises `tracker`.
///
/// # Arguments
/// * `log_dir` - Directory for log files (e.g., "logs")
/// * `log_prefix` - Prefix for log files (e.g., "blockthespot")
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `file_output` - If true, also log to a rotating file
/// * `tracker` - Error flag consulted by the background synchronizer
///
/// # Returns
/// A guard that must be held for the duration of the program to keep file logging active
pub fn setup_logging(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
    file_output: bool,
    tracker: &ErrorTracker,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // Determine log level based on debug mode
    let env_filter = if debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    if !file_output {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracker.layer())
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;

        tracing::info!("Logging initialized: console only, debug={}", debug_mode);
        return Ok(None);
    }

    create_log_dir(log_dir)?;

    // Create daily rotating file appender
    let file_appender = rolling::daily(log_dir, log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracker.layer())
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}",
        log_dir,
        log_prefix,
        debug_mode
    );

    Ok(Some(guard))
}

/// Create `log_dir` if it doesn't exist.
fn create_log_dir(log_dir: &str) -> Result<()> {
    let log_path = Utf8PathBuf::from(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(&log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}
