//! Cooperative cancellation for the crawl loop
//!
//! Signal handlers never touch crawl state. They flip a `watch` channel via
//! `ShutdownHandle::trigger`, and the controller observes it through
//! `ShutdownSignal` at its safe points.

use tokio::sync::watch;

/// Sending side, held by whoever may request shutdown
#[derive(Debug)]
pub struct ShutdownHandle {
    sender: watch::Sender<bool>,
}

/// Receiving side, observed by the controller
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

/// Creates a connected handle and signal
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownHandle { sender }, ShutdownSignal { receiver })
}

impl ShutdownHandle {
    /// Requests shutdown; later calls are no-ops
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl ShutdownSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_, signal) = shutdown_channel();
        signal
    }

    pub fn is_requested(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes once shutdown has been requested
    ///
    /// If every handle is dropped without triggering, this never completes.
    pub async fn requested(&mut self) {
        loop {
            if *self.receiver.borrow_and_update() {
                return;
            }
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Exit status used when a second signal aborts the process
pub const FORCED_EXIT_CODE: i32 = 130;

/// Spawns a task that triggers shutdown on Ctrl-C or SIGTERM
///
/// The first signal requests a graceful stop. A second one exits the
/// process immediately with [`FORCED_EXIT_CODE`], skipping the checkpoint.
pub fn listen_for_signals(handle: ShutdownHandle) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown requested, finishing current page and saving checkpoint");
        handle.trigger();

        wait_for_signal().await;
        tracing::warn!("Second shutdown request, exiting without saving a checkpoint");
        std::process::exit(FORCED_EXIT_CODE);
    });
}

/// Completes when a shutdown signal arrives
///
/// A handler that cannot be installed never completes, so a registration
/// failure is never mistaken for a signal.
#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                if stream.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            Err(e) => {
                tracing::warn!("Could not install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c() => {}
        _ = terminate => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    completed_or_pending(tokio::signal::ctrl_c(), "Ctrl-C").await
}

/// Awaits a signal listener; a listener that fails never completes
async fn completed_or_pending<E: std::fmt::Display>(
    listener: impl std::future::Future<Output = Result<(), E>>,
    name: &str,
) {
    if let Err(e) = listener.await {
        tracing::warn!("Could not listen for {}: {}", name, e);
        std::future::pending::<()>().await;
    }
}
