//! Background purge for stores without native key expiry.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::domain::repositories::UrlStore;

/// Periodically deletes expired records until `shutdown` flips to `true`.
///
/// Failures are logged and the next tick tries again; the sweep is
/// idempotent so a missed run only delays reclamation.
pub async fn run_expiry_sweeper(
    store: Arc<dyn UrlStore>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        backend = store.backend(),
        interval_secs = every.as_secs(),
        "Expiry sweeper started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match store.purge_expired().await {
                    Ok(0) => debug!("Expiry sweep: nothing to purge"),
                    Ok(removed) => info!(removed, "Expiry sweep purged expired short URLs"),
                    Err(e) => error!(error = %e, "Expiry sweep failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Expiry sweeper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ShortUrl;
    use crate::infrastructure::store::MemoryUrlStore;
    use chrono::{Duration as ChronoDuration, Utc};

    #[tokio::test]
    async fn test_sweeper_purges_and_stops() {
        let store = Arc::new(MemoryUrlStore::new());
        store
            .put_if_absent(ShortUrl::new(
                "old".into(),
                "https://example.com".into(),
                Some(Utc::now() - ChronoDuration::seconds(1)),
            ))
            .await
            .unwrap();

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_expiry_sweeper(
            store.clone(),
            Duration::from_millis(10),
            rx,
        ));

        // The first tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.is_empty().await);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
