use tokio::sync::watch;

/// Publishes "something under the body changed" notifications.
///
/// Notifications carry no payload; subscribers re-run their own lookup.
#[derive(Debug)]
pub struct MutationFeed {
    tx: watch::Sender<u64>,
}

impl MutationFeed {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    pub fn notify(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    #[must_use]
    pub fn subscribe(&self) -> MutationSubscription {
        MutationSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of subscriptions currently connected.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MutationFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected mutation observer. Disconnects when dropped.
#[derive(Debug)]
pub struct MutationSubscription {
    rx: watch::Receiver<u64>,
}

impl MutationSubscription {
    /// Waits for the next mutation. Returns `false` once the feed is gone and
    /// no further notifications can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl Drop for MutationSubscription {
    fn drop(&mut self) {
        tracing::trace!("mutation observer disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscription_sees_notifications_after_subscribing() {
        let feed = MutationFeed::new();
        feed.notify();
        let mut sub = feed.subscribe();
        feed.notify();
        assert!(sub.changed().await);
    }

    #[test]
    fn dropping_subscription_disconnects_it() {
        let feed = MutationFeed::new();
        let sub = feed.subscribe();
        assert_eq!(feed.observer_count(), 1);
        drop(sub);
        assert_eq!(feed.observer_count(), 0);
    }

    #[tokio::test]
    async fn changed_reports_closed_feed() {
        let feed = MutationFeed::new();
        let mut sub = feed.subscribe();
        drop(feed);
        assert!(!sub.changed().await);
    }
}
