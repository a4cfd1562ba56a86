//! Background maintenance timer.
//!
//! Runs a tick callback at a fixed cadence on a dedicated thread. The
//! memory engine uses it to invoke `optimize` at the configured interval;
//! `stop` (or drop) interrupts the wait and joins the thread.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

/// Handle to a recurring maintenance thread.
pub(crate) struct MaintenanceTimer {
    shutdown: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl MaintenanceTimer {
    /// Spawn a thread calling `tick` every `interval` until stopped.
    pub(crate) fn start(interval: Duration, tick: impl Fn() + Send + 'static) -> Self {
        let (shutdown, rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("recall-maintenance".to_string())
            .spawn(move || loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => tick(),
                    // Explicit stop or engine dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .expect("failed to spawn maintenance thread");
        debug!(interval_ms = interval.as_millis() as u64, "maintenance timer started");
        MaintenanceTimer {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Interrupt the wait and join the thread.
    pub(crate) fn stop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("maintenance timer stopped");
        }
    }
}

impl Drop for MaintenanceTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_ticks_fire_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let mut timer = MaintenanceTimer::start(Duration::from_millis(10), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        std::thread::sleep(Duration::from_millis(80));
        timer.stop();
        let at_stop = count.load(Ordering::SeqCst);
        assert!(at_stop >= 2, "expected at least 2 ticks, got {}", at_stop);

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), at_stop);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = MaintenanceTimer::start(Duration::from_secs(60), || {});
        timer.stop();
        timer.stop();
    }
}
