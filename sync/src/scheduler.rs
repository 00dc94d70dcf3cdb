//! Interval polling of the remote record while a game view is open.
//!
//! The first fetch happens as soon as the poller starts. Each later tick
//! issues one `query_state` under the client's request timeout. Results are
//! cached by the client and published as [`SyncEvent`]s tagged with the
//! generation of the view that started the poller, so a consumer can drop
//! results that arrive after it navigated away.
//!
//! A failing store produces one error notice per failure streak. Polling
//! continues regardless; the next tick is the retry.

use crate::client::{ClientError, GameClient};
use crate::notify::Notice;
use crate::remote::{PlayerId, TransportError};
use crate::scope::CancelToken;
use crate::snapshot::GameSnapshot;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Buffered events per poller
const EVENT_BUFFER: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Fetched(Option<GameSnapshot>),
    Failed(TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub generation: u64,
    pub opponent: PlayerId,
    pub outcome: PollOutcome,
}

#[derive(Clone)]
pub struct SyncScheduler {
    client: GameClient,
    poll_interval: Duration,
}

impl SyncScheduler {
    pub fn new(client: GameClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll the game with `opponent` until `token` is cancelled
    pub fn spawn(&self, opponent: PlayerId, generation: u64, token: CancelToken) -> PollHandle {
        let (tx, events) = mpsc::channel(EVENT_BUFFER);
        let client = self.client.clone();
        let poll_interval = self.poll_interval;

        info!(
            caller = %client.caller(),
            %opponent,
            generation,
            "Starting poller every {:?}",
            poll_interval
        );

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut failing = false;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                debug!(%opponent, generation, "Polling remote state");

                let outcome = match client.refresh(&opponent, &token).await {
                    Ok(snapshot) => {
                        if failing {
                            info!(%opponent, "Remote store reachable again");
                        }
                        failing = false;
                        PollOutcome::Fetched(snapshot)
                    }
                    Err(ClientError::Cancelled) => break,
                    Err(ClientError::Transport(e)) => {
                        if !failing {
                            warn!(%opponent, error = %e, "Polling failed");
                            client.notify(Notice::error(format!(
                                "Lost contact with the game against {}: {}",
                                opponent, e
                            )));
                        }
                        failing = true;
                        PollOutcome::Failed(e)
                    }
                    Err(e) => {
                        warn!(%opponent, error = %e, "Unexpected poll error");
                        continue;
                    }
                };

                let event = SyncEvent {
                    generation,
                    opponent: opponent.clone(),
                    outcome,
                };
                match token.run(tx.send(event)).await {
                    Some(Ok(())) => {}
                    // Cancelled, or nobody is listening any more
                    None | Some(Err(_)) => break,
                }
            }

            debug!(%opponent, generation, "Poller stopped");
        });

        PollHandle { events, task }
    }
}

/// Running poller and its event stream
#[derive(Debug)]
pub struct PollHandle {
    events: mpsc::Receiver<SyncEvent>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Next event, `None` once the poller has stopped and the buffer is empty
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.events.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the poller task to exit
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!("Poller task failed: {}", e);
        }
    }
}
