use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Resolve on SIGTERM, SIGINT or Ctrl+C.
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("shutdown: SIGTERM received"),
            _ = sigint.recv() => tracing::info!("shutdown: SIGINT received"),
            res = tokio::signal::ctrl_c() => {
                res?;
                tracing::info!("shutdown: ctrl-c received");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown: ctrl-c received");
    }

    Ok(())
}

/// Token cancelled on the first shutdown signal. Signal listener errors
/// cancel the token as well, so the server never outlives a broken listener.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            tracing::error!(error = %e, "shutdown: signal listener failed");
        }
        trigger.cancel();
    });
    token
}
