//! Cancellation tied to the lifetime of a game view.
//!
//! A [`ViewScope`] is owned by whatever shows a game to the user. Every
//! remote call and poller started for that view holds a [`CancelToken`]
//! derived from it; closing or dropping the scope cancels them all.

use std::future::Future;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ViewScope {
    tx: watch::Sender<bool>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: Some(self.tx.subscribe()),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

/// Cheap handle observing a [`ViewScope`]
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelToken {
    /// Token that is never cancelled
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.rx {
            Some(rx) => *rx.borrow() || rx.has_changed().is_err(),
            None => false,
        }
    }

    /// Resolves once the owning scope is cancelled or dropped
    pub async fn cancelled(&self) {
        match &self.rx {
            Some(rx) => {
                let mut rx = rx.clone();
                // A closed channel means the scope is gone
                let _ = rx.wait_for(|cancelled| *cancelled).await;
            }
            None => std::future::pending().await,
        }
    }

    /// Drive `fut` to completion unless the scope is cancelled first
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = fut => Some(output),
        }
    }
}
