//! Serving with a bounded graceful shutdown

use std::{future::Future, io, sync::Arc, time::Duration};

use axum::Router;
use tokio::{net::TcpListener, sync::Notify};
use tracing::{info, warn};

/// How the server stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished
    Drained,
    /// Requests were still running when the drain timeout expired
    TimedOut,
}

/// Serve `app` until `signal` resolves, then drain for at most `drain_timeout`
///
/// Connections still open once the timeout expires are dropped.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    signal: impl Future<Output = ()> + Send + 'static,
    drain_timeout: Duration,
) -> io::Result<ShutdownOutcome> {
    let draining = Arc::new(Notify::new());
    let notify = Arc::clone(&draining);

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                notify.notify_one();
            })
            .await
    });

    let deadline = async {
        draining.notified().await;
        info!("Waiting up to {:?} for connections to close...", drain_timeout);
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        joined = &mut server => {
            joined.map_err(io::Error::other)??;
            Ok(ShutdownOutcome::Drained)
        }
        () = deadline => {
            warn!(timeout = ?drain_timeout, "Graceful shutdown timed out, dropping open connections");
            server.abort();
            Ok(ShutdownOutcome::TimedOut)
        }
    }
}
