//! OS signal handling.

use std::future::Future;

use tokio::task::{JoinError, JoinHandle};

/// Resolve on Ctrl+C, or SIGTERM on unix.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received"),
        _ = terminate => tracing::info!("SIGTERM received"),
    }
}

/// Wait for `signal` unless `task` exits first.
///
/// Returns `None` when the signal won; the task is left running so the
/// caller can shut it down in order. Otherwise returns the task's outcome.
pub async fn until_signal_or_exit<T, S>(
    signal: S,
    task: &mut JoinHandle<T>,
) -> Option<Result<T, JoinError>>
where
    S: Future<Output = ()>,
{
    tokio::select! {
        _ = signal => None,
        joined = task => Some(joined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn failed_task_ends_the_wait() {
        let mut task = tokio::spawn(async {
            Err::<(), _>(std::io::Error::new(std::io::ErrorKind::AddrInUse, "bind failed"))
        });

        let outcome = until_signal_or_exit(std::future::pending(), &mut task).await;

        let served = outcome.expect("task exit should end the wait").unwrap();
        assert_eq!(served.unwrap_err().kind(), std::io::ErrorKind::AddrInUse);
    }

    #[tokio::test]
    async fn signal_leaves_task_running() {
        let mut task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });

        assert!(until_signal_or_exit(async {}, &mut task).await.is_none());
        assert!(!task.is_finished());
        task.abort();
    }
}
