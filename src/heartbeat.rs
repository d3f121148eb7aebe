//! Periodic "still alive" logging on top of [`LogRecord`].
//!
//! One background tokio task per heartbeat runs a tick loop: sleep one
//! tick, poll the stop flag, and after a full period of uninterrupted
//! ticks issue a status-50 update. Sleeping in ticks instead of one long
//! period-sized sleep bounds cancellation latency by the tick size.

use crate::core::{LogError, Result, Status};
use crate::record::LogRecord;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

const TARGET: &str = "proclog";

/// Timing of the heartbeat loop.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between heartbeat updates.
    pub period: Duration,

    /// Sleep increment of the loop; cancellation is observed within one
    /// tick. Defaults to one second.
    pub tick: Duration,
}

impl HeartbeatConfig {
    /// Heartbeat every `period_secs` seconds with one-second ticks.
    pub fn every_secs(period_secs: u64) -> Self {
        Self {
            period: Duration::from_secs(period_secs),
            tick: Duration::from_secs(1),
        }
    }

    /// Override the tick size. Tests shrink it to keep timing scenarios fast.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.period.is_zero() {
            return Err(LogError::Config("heartbeat period must be positive".to_string()));
        }
        if self.tick.is_zero() {
            return Err(LogError::Config("heartbeat tick must be positive".to_string()));
        }
        if self.tick > self.period {
            return Err(LogError::Config(format!(
                "heartbeat tick ({:?}) must not exceed the period ({:?})",
                self.tick, self.period
            )));
        }
        Ok(())
    }

    fn ticks_per_beat(&self) -> u64 {
        (self.period.as_millis() / self.tick.as_millis()).max(1) as u64
    }
}

enum State {
    Running {
        handle: JoinHandle<LogRecord>,
        detail: String,
    },
    Stopped,
}

/// Owns one [`LogRecord`] and a background loop that keeps it fresh.
///
/// Lifecycle is linear: running after [`start`](PeriodicHeartbeat::start),
/// stopped after the first [`stop`](PeriodicHeartbeat::stop) completes,
/// never running again. The record moves into the loop task and is handed
/// back through the join, so the terminal update can only happen after the
/// loop has fully exited; no two calls ever race on the same record.
pub struct PeriodicHeartbeat {
    stop_flag: Arc<AtomicBool>,
    state: Mutex<State>,
}

impl PeriodicHeartbeat {
    /// Persist the initial entry and launch the heartbeat loop.
    ///
    /// A failed create is reported and swallowed (the loop then runs with
    /// nothing to update); an invalid config is a hard error.
    pub async fn start(mut record: LogRecord, config: HeartbeatConfig) -> Result<Self> {
        config.validate()?;
        if record.create().await.is_none() {
            debug!(target: TARGET, "initial entry not persisted, heartbeats will be no-ops");
        }

        let stop_flag = Arc::new(AtomicBool::new(false));
        let detail = record.detail().to_string();
        let alive_detail = format!("{detail} Process is still alive!");
        let flag = Arc::clone(&stop_flag);
        let tick = config.tick;
        let ticks_per_beat = config.ticks_per_beat();

        let handle = tokio::spawn(async move {
            let mut ticks = 0u64;
            while !flag.load(Ordering::Acquire) {
                sleep(tick).await;
                ticks += 1;
                if ticks >= ticks_per_beat {
                    ticks = 0;
                    // A stop requested mid-period must not produce one
                    // last heartbeat on the way out.
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    record.update(Status::HEARTBEAT, alive_detail.clone()).await;
                }
            }
            debug!(target: TARGET, app = %record.app_name(), "heartbeat loop exited");
            record
        });

        Ok(Self {
            stop_flag,
            state: Mutex::new(State::Running { handle, detail }),
        })
    }

    /// Stop the loop and write the terminal entry.
    ///
    /// Idempotent under arbitrary concurrency: every caller sets the flag,
    /// but only the one that wins the state lock joins the loop and issues
    /// the single status-100 update. Later callers wait for the winner
    /// (the lock is held across the join) and then return immediately.
    /// Control returns to the caller; exiting the process is the caller's
    /// decision.
    pub async fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);

        let mut state = self.state.lock().await;
        let State::Running { handle, detail } = std::mem::replace(&mut *state, State::Stopped)
        else {
            return;
        };

        match handle.await {
            Ok(mut record) => {
                record
                    .update(Status::FINISHED, format!("{detail} Process was shut down."))
                    .await;
            }
            Err(err) => {
                warn!(target: TARGET, error = %err, "heartbeat loop did not exit cleanly");
            }
        }
    }

    /// True once a `stop` call has completed.
    pub async fn is_stopped(&self) -> bool {
        matches!(*self.state.lock().await, State::Stopped)
    }
}

impl Drop for PeriodicHeartbeat {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
        if let State::Running { handle, .. } =
            std::mem::replace(self.state.get_mut(), State::Stopped)
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_period_is_rejected() {
        assert!(HeartbeatConfig::every_secs(0).validate().is_err());
    }

    #[test]
    fn zero_tick_is_rejected() {
        let config = HeartbeatConfig::every_secs(5).with_tick(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn tick_longer_than_period_is_rejected() {
        let config = HeartbeatConfig::every_secs(1).with_tick(Duration::from_secs(2));
        assert!(config.validate().is_err());
    }

    #[test]
    fn ticks_per_beat_rounds_down() {
        let config = HeartbeatConfig::every_secs(5);
        assert_eq!(config.ticks_per_beat(), 5);

        let config = HeartbeatConfig {
            period: Duration::from_millis(250),
            tick: Duration::from_millis(100),
        };
        assert_eq!(config.ticks_per_beat(), 2);
    }
}
