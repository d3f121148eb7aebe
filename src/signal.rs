//! Interrupt delivery: translate an OS signal into the same `stop()` call
//! any programmatic caller would make.

use crate::heartbeat::PeriodicHeartbeat;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Stop `heartbeat` when the process receives Ctrl-C or, on unix, SIGTERM.
///
/// The waiter goes through the public [`PeriodicHeartbeat::stop`] path, so
/// an interrupt racing a programmatic stop still yields exactly one
/// terminal update. The returned handle finishes once the stop completes;
/// callers that exit on their own can simply drop it.
pub fn stop_on_interrupt(heartbeat: Arc<PeriodicHeartbeat>) -> JoinHandle<()> {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!(target: "proclog", "interrupt received, stopping heartbeat");
        heartbeat.stop().await;
    })
}

/// Resolve when the process is asked to shut down.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target: "proclog", error = %err, "unable to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target: "proclog", error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
