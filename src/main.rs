//! spotsync - Self-updating persisted settings for BlockTheSpot
//!
//! Main entry point.
//!
//! # Execution Flow
//!
//! 1. Load runtime options (defaults + `SPOTSYNC_*` environment variables)
//! 2. Read static flags from `config.ini` (defaults if absent)
//! 3. Initialize logging → console, plus logs/blockthespot.<date> when `Enable_Log=1`
//! 4. Build the sync context (settings store, HTTP fetcher, update prompt)
//! 5. Load `blockthespot_settings.json`, writing defaults if it cannot be loaded
//! 6. Run the background synchronizer on its own thread until its window elapses
//!
//! # Configuration Files
//!
//! - `config.ini`: `Block_Ads`, `Block_Banner`, `Enable_Developer`,
//!   `Enable_Auto_Update`, `Enable_Log` flags (`1` means on)
//! - `blockthespot_settings.json`: cached settings document, kept in sync with the
//!   remote copy

use anyhow::{Context, Result};
use spotsync::services::BackgroundSynchronizer;
use spotsync::{APP_NAME, ErrorTracker, StaticConfig, SyncContext, SyncOptions, VERSION};
use std::sync::Arc;

fn main() -> Result<()> {
    let options = SyncOptions::load()?;
    let static_config = StaticConfig::load(&options.static_config_file);

    let tracker = ErrorTracker::new();
    let _guard = spotsync::logging::setup_logging(
        &options.log_dir,
        "blockthespot",
        options.debug_mode,
        static_config.enable_log(),
        &tracker,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    for (flag, enabled) in static_config.iter() {
        tracing::debug!("{}={}", flag.key(), enabled);
    }

    let ctx = Arc::new(
        SyncContext::production(static_config, options, Arc::new(tracker))
            .context("Failed to build settings sync context")?,
    );

    // Failures are logged inside; the synchronizer keeps retrying the write.
    ctx.initialize();

    let handle = BackgroundSynchronizer::new(Arc::clone(&ctx))
        .spawn()
        .context("Failed to start settings sync thread")?;

    let report = handle
        .join()
        .map_err(|_| anyhow::anyhow!("Settings sync thread panicked"))?;

    tracing::info!(
        "Settings sync finished after {} ticks ({} drift repairs, remote sync: {:?})",
        report.ticks,
        report.drift_repairs,
        report.remote_sync
    );

    Ok(())
}
