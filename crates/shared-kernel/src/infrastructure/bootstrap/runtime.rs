// crates/shared-kernel/src/infrastructure/bootstrap/runtime.rs

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Logs structurés, niveau piloté par `RUST_LOG` (défaut `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Déjà installé (tests, double appel) : on garde le premier
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Canal d'arrêt basculé à `true` sur Ctrl+C ou SIGTERM (arrêt d'un container).
pub fn shutdown_channel() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Enregistré avant le spawn : un SIGTERM reçu juste après l'appel est déjà capté
    #[cfg(unix)]
    let terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate());

    tokio::spawn(async move {
        #[cfg(unix)]
        let received = wait_for_signal(terminate).await;
        #[cfg(not(unix))]
        let received = tokio::signal::ctrl_c().await.map(|()| "Ctrl+C");

        match received {
            Ok(signal) => {
                tracing::info!(signal, "🛑 Shutdown signal received, finishing in-flight work...");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                tracing::error!("❌ Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    shutdown_rx
}

#[cfg(unix)]
async fn wait_for_signal(
    terminate: std::io::Result<tokio::signal::unix::Signal>,
) -> std::io::Result<&'static str> {
    match terminate {
        Ok(mut sigterm) => tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|()| "SIGINT"),
            _ = sigterm.recv() => Ok("SIGTERM"),
        },
        Err(err) => {
            tracing::warn!("SIGTERM handler unavailable, listening for Ctrl+C only: {}", err);
            tokio::signal::ctrl_c().await.map(|()| "SIGINT")
        }
    }
}
