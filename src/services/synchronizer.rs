use crate::context::SyncContext;
use crate::services::remote_sync::SyncOutcome;
use crate::state::DriftOutcome;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Name of the background thread.
pub const THREAD_NAME: &str = "settings-sync";

/// What one poll tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub drift: DriftOutcome,
    /// `Some(success)` on the tick that ran the one-shot remote sync.
    pub remote_sync: Option<bool>,
}

/// Totals for a finished poll loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub ticks: u64,
    pub drift_repairs: u64,
    pub remote_sync: Option<bool>,
}

impl SyncReport {
    fn absorb(&mut self, tick: TickReport) {
        self.ticks += 1;
        if tick.drift == DriftOutcome::Persisted {
            self.drift_repairs += 1;
        }
        if tick.remote_sync.is_some() {
            self.remote_sync = tick.remote_sync;
        }
    }
}

/// Bounded poll loop keeping disk and remote in step with the live settings.
///
/// Each tick persists in-memory drift, then runs the remote sync once per
/// context when auto-update is enabled and an error has been logged. The loop
/// exits for good once the poll window has elapsed.
pub struct BackgroundSynchronizer {
    ctx: Arc<SyncContext>,
    interval: Duration,
    window: Duration,
}

impl BackgroundSynchronizer {
    /// Cadence taken from the context's options.
    pub fn new(ctx: Arc<SyncContext>) -> Self {
        let interval = ctx.options.poll_interval();
        let window = ctx.options.poll_window();
        Self {
            ctx,
            interval,
            window,
        }
    }

    pub fn with_cadence(mut self, interval: Duration, window: Duration) -> Self {
        self.interval = interval;
        self.window = window;
        self
    }

    /// Run the loop on a dedicated named thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<SyncReport>> {
        thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || self.run())
    }

    /// Poll until the window elapses.
    pub fn run(&self) -> SyncReport {
        tracing::info!(
            interval = ?self.interval,
            window = ?self.window,
            "Background settings sync started"
        );

        // A window too large for `Instant` means no deadline.
        let deadline = Instant::now().checked_add(self.window);
        let mut report = SyncReport::default();

        while deadline.is_none_or(|deadline| Instant::now() < deadline) {
            report.absorb(self.tick());

            let remaining = deadline.map_or(self.interval, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
            if remaining.is_zero() {
                break;
            }
            thread::sleep(self.interval.min(remaining));
        }

        tracing::info!(
            ticks = report.ticks,
            drift_repairs = report.drift_repairs,
            "Background settings sync finished"
        );
        self.ctx.metrics.log_summary();
        report
    }

    /// One iteration: drift check, then the gated one-shot remote sync.
    pub fn tick(&self) -> TickReport {
        let ctx = &self.ctx;
        ctx.metrics.record_tick();

        let drift = ctx.store.reconcile_drift();
        match drift {
            DriftOutcome::Persisted => ctx.metrics.record_drift_repair(),
            DriftOutcome::WriteFailed => ctx.metrics.record_persist_failure(),
            DriftOutcome::InSync => {}
        }

        let remote_sync = (ctx.remote_gate_open() && ctx.claim_remote_sync())
            .then(|| self.sync_remote());

        TickReport { drift, remote_sync }
    }

    fn sync_remote(&self) -> bool {
        let ctx = &self.ctx;
        tracing::info!("Checking {} for newer settings", ctx.options.remote_url);

        let started = Instant::now();
        let outcome = ctx.agent.try_sync(&ctx.store, &ctx.options.remote_url);
        ctx.metrics
            .record_remote_attempt(outcome.is_some(), started.elapsed());

        if matches!(outcome, Some(SyncOutcome::Adopted { .. })) {
            ctx.metrics.record_remote_adoption();
        }
        outcome.is_some()
    }
}
