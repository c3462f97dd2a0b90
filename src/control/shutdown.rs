//! # OS termination-signal handling.
//!
//! [`wait_for_termination`] completes when the process receives a shutdown
//! request: SIGINT/SIGTERM (Unix) or Ctrl-C elsewhere. Each call installs
//! independent listeners.

/// Waits for a termination signal.
///
/// Returns `Ok(())` when a signal arrives, or `Err` if listener registration
/// fails.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal (Ctrl-C).
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
