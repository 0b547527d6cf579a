//! Connectivity signal
//!
//! Publishes whether the API is reachable through a `watch` channel. The
//! monitor probes on an interval in a background task and only notifies
//! subscribers on transitions.

use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::info;

/// Timeout for a single reachability probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Signal fixed at `online`, for `--offline` and tests
pub fn fixed(online: bool) -> watch::Receiver<bool> {
    let (_tx, rx) = watch::channel(online);
    rx
}

/// Handle for the background connectivity monitor
pub struct ConnectivityMonitor {
    receiver: watch::Receiver<bool>,
    shutdown_tx: mpsc::Sender<()>,
}

impl ConnectivityMonitor {
    /// Spawns a monitor that probes `probe_url` with an HTTP HEAD request
    ///
    /// Any response, whatever its status, counts as online; transport errors
    /// and timeouts count as offline.
    pub fn spawn(client: reqwest::Client, probe_url: String, interval: Duration) -> Self {
        Self::spawn_with_probe(interval, move || {
            let client = client.clone();
            let url = probe_url.clone();
            async move {
                client
                    .head(&url)
                    .timeout(PROBE_TIMEOUT)
                    .send()
                    .await
                    .is_ok()
            }
        })
    }

    /// Spawns a monitor driven by an arbitrary probe
    ///
    /// The signal starts out online; the first probe runs immediately.
    pub fn spawn_with_probe<P, F>(interval: Duration, probe: P) -> Self
    where
        P: Fn() -> F + Send + 'static,
        F: Future<Output = bool> + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(true);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let online = probe().await;
                        state_tx.send_if_modified(|current| {
                            if *current == online {
                                return false;
                            }
                            info!(online, "connectivity changed");
                            *current = online;
                            true
                        });
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            receiver: state_rx,
            shutdown_tx,
        }
    }

    /// A receiver observing the signal
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.receiver.clone()
    }

    /// Stops the background probe
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_fixed_signal_keeps_value_after_sender_dropped() {
        let offline = fixed(false);
        assert!(!*offline.borrow());

        let online = fixed(true);
        assert!(*online.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_publishes_transitions() {
        let reachable = Arc::new(AtomicBool::new(false));
        let probe_flag = reachable.clone();
        let monitor = ConnectivityMonitor::spawn_with_probe(Duration::from_secs(10), move || {
            let flag = probe_flag.clone();
            async move { flag.load(Ordering::SeqCst) }
        });
        let mut rx = monitor.subscribe();
        assert!(*monitor.subscribe().borrow(), "starts optimistic");

        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());

        reachable.store(true, Ordering::SeqCst);
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
        assert!(*monitor.subscribe().borrow());

        monitor.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_does_not_notify_without_transition() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let monitor = ConnectivityMonitor::spawn_with_probe(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { true }
        });
        let rx = monitor.subscribe();

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert!(probes.load(Ordering::SeqCst) >= 3);
        assert!(!rx.has_changed().unwrap());
        monitor.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_probing() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let monitor = ConnectivityMonitor::spawn_with_probe(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { true }
        });
        tokio::time::sleep(Duration::from_millis(1500)).await;

        monitor.shutdown().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let after_shutdown = probes.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(probes.load(Ordering::SeqCst), after_shutdown);
    }
}
