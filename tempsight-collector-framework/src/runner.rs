//! Collector loop: fetch, write, sleep, repeat.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{CollectorError, Result};
use crate::shutdown::Shutdown;
use crate::sink::Sink;
use crate::source::Source;

/// When cycles run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Run a single cycle and stop.
    Once,
    /// Sleep this long after each cycle, then run the next one.
    Every(Duration),
}

impl Schedule {
    /// Build a schedule from an optional interval in seconds.
    ///
    /// `None` runs once. Zero is rejected.
    pub fn from_interval_secs(secs: Option<u64>) -> Result<Self> {
        match secs {
            None => Ok(Schedule::Once),
            Some(0) => Err(CollectorError::config("interval must be at least 1 second")),
            Some(secs) => Ok(Schedule::Every(Duration::from_secs(secs))),
        }
    }

    /// The sleep between cycles, if any.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Schedule::Once => None,
            Schedule::Every(interval) => Some(*interval),
        }
    }
}

/// What a periodic loop does when a cycle fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the loop and return the error.
    Abort,
    /// Log the error and wait for the next cycle. Authentication failures
    /// still stop the loop.
    #[default]
    SkipCycle,
}

/// Counters reported when the loop ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    /// Cycles whose batch was acknowledged.
    pub cycles: u64,
    /// Cycles skipped after a fetch or write failure.
    pub failed_cycles: u64,
    /// Points acknowledged across all cycles.
    pub points_written: usize,
}

/// Drives one [`Source`] into one [`Sink`].
///
/// States run strictly in sequence: open the source session, then
/// fetch → write → sleep until the schedule ends, shutdown is requested or a
/// failure is fatal. The session is closed exactly once on every exit path.
///
/// # Example
///
/// ```ignore
/// let sink = InfluxWriter::new(&config.influx)?;
/// let schedule = Schedule::from_interval_secs(Some(60))?;
/// let collector = CollectorLoop::new(source, sink, &config.influx.bucket, schedule);
/// let summary = collector.run(Shutdown::on_ctrl_c()).await?;
/// ```
pub struct CollectorLoop<S: Source, K: Sink> {
    source: S,
    sink: K,
    bucket: String,
    schedule: Schedule,
    failure_policy: FailurePolicy,
}

impl<S: Source, K: Sink> CollectorLoop<S, K> {
    /// Create a loop writing into `bucket`.
    pub fn new(source: S, sink: K, bucket: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            source,
            sink,
            bucket: bucket.into(),
            schedule,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Set the failure policy for periodic schedules.
    ///
    /// [`Schedule::Once`] always returns its cycle's error.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Get the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get the target bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Run until the schedule completes, `shutdown` fires, or a cycle fails fatally.
    pub async fn run(&self, mut shutdown: Shutdown) -> Result<LoopSummary> {
        let name = self.source.name();

        info!(
            source = name,
            bucket = %self.bucket,
            schedule = ?self.schedule,
            policy = ?self.failure_policy,
            "Starting collector"
        );

        let session = self.source.open().await?;
        debug!(source = name, "Source session established");

        let outcome = self.cycle_loop(&session, &mut shutdown).await;

        if let Err(e) = self.source.close(session).await {
            warn!(source = name, error = %e, "Failed to release source session");
        } else {
            debug!(source = name, "Source session released");
        }

        match &outcome {
            Ok(summary) => info!(
                source = name,
                cycles = summary.cycles,
                failed_cycles = summary.failed_cycles,
                points = summary.points_written,
                "Collector stopped"
            ),
            Err(e) => error!(source = name, kind = e.kind(), error = %e, "Collector failed"),
        }

        outcome
    }

    async fn cycle_loop(&self, session: &S::Session, shutdown: &mut Shutdown) -> Result<LoopSummary> {
        let name = self.source.name();
        let mut summary = LoopSummary::default();

        loop {
            if shutdown.is_triggered() {
                info!(source = name, "Shutdown requested");
                return Ok(summary);
            }

            let cycle = summary.cycles + summary.failed_cycles + 1;

            match self.run_cycle(session).await {
                Ok(count) => {
                    summary.cycles += 1;
                    summary.points_written += count;
                    info!(
                        source = name,
                        bucket = %self.bucket,
                        points = count,
                        cycle,
                        "Wrote {} points to InfluxDB",
                        count
                    );
                }
                Err(e) => {
                    // A refused session fails every later cycle too
                    if self.schedule == Schedule::Once
                        || self.failure_policy == FailurePolicy::Abort
                        || e.is_session_lost()
                    {
                        return Err(e);
                    }
                    summary.failed_cycles += 1;
                    error!(
                        source = name,
                        cycle,
                        kind = e.kind(),
                        error = %e,
                        "Collection cycle failed, waiting for next cycle"
                    );
                }
            }

            let Some(interval) = self.schedule.interval() else {
                return Ok(summary);
            };

            debug!(source = name, secs = interval.as_secs(), "Sleeping until next cycle");

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.wait() => {
                    info!(source = name, "Shutdown requested");
                    return Ok(summary);
                }
            }
        }
    }

    /// Run one fetch → write cycle and return the number of points written.
    pub async fn run_cycle(&self, session: &S::Session) -> Result<usize> {
        let points = self.source.fetch(session).await?;
        let count = points.len();
        self.sink.write(&self.bucket, &points).await?;
        Ok(count)
    }
}
