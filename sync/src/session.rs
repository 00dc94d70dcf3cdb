//! Immutable client session.
//!
//! A [`Session`] is only ever replaced, never mutated: every change goes
//! through [`Session::reduce`]. Each opened game view gets a new generation
//! number, and results carrying any other generation are dropped. This is
//! what keeps a slow fetch for a previous opponent from landing on the
//! current board.

use crate::remote::PlayerId;
use crate::scheduler::{PollOutcome, SyncEvent};
use crate::snapshot::GameSnapshot;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveView {
    pub generation: u64,
    pub opponent: PlayerId,
}

/// What the active view currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GameView {
    #[default]
    Loading,
    NoGame,
    Loaded(GameSnapshot),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncHealth {
    #[default]
    Idle,
    Healthy,
    Degraded { failures: u32, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SignedIn(PlayerId),
    SignedOut,
    OpponentSelected(PlayerId),
    OpponentCleared,
    ViewOpened,
    ViewClosed,
    RecordFetched {
        generation: u64,
        snapshot: Option<GameSnapshot>,
    },
    SyncFailed {
        generation: u64,
        message: String,
    },
}

impl From<SyncEvent> for SessionAction {
    fn from(event: SyncEvent) -> Self {
        match event.outcome {
            PollOutcome::Fetched(snapshot) => SessionAction::RecordFetched {
                generation: event.generation,
                snapshot,
            },
            PollOutcome::Failed(e) => SessionAction::SyncFailed {
                generation: event.generation,
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    identity: Option<PlayerId>,
    opponent: Option<PlayerId>,
    view: Option<ActiveView>,
    game: GameView,
    health: SyncHealth,
    /// Last generation handed out; survives sign-out
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&PlayerId> {
        self.identity.as_ref()
    }

    pub fn opponent(&self) -> Option<&PlayerId> {
        self.opponent.as_ref()
    }

    pub fn view(&self) -> Option<&ActiveView> {
        self.view.as_ref()
    }

    pub fn game(&self) -> &GameView {
        &self.game
    }

    pub fn health(&self) -> &SyncHealth {
        &self.health
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        match &self.game {
            GameView::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Whether the signed-in player is to move in the shown game
    pub fn is_my_turn(&self) -> bool {
        match (&self.identity, self.snapshot()) {
            (Some(me), Some(snapshot)) => snapshot.is_turn_of(me),
            _ => false,
        }
    }

    pub fn reduce(&self, action: SessionAction) -> Session {
        let mut next = self.clone();
        match action {
            SessionAction::SignedIn(identity) => {
                if next.identity.as_ref() != Some(&identity) {
                    next.opponent = None;
                    next.close_view();
                }
                next.identity = Some(identity);
            }
            SessionAction::SignedOut => {
                next.identity = None;
                next.opponent = None;
                next.close_view();
            }
            SessionAction::OpponentSelected(opponent) => {
                if next.opponent.as_ref() != Some(&opponent) {
                    next.close_view();
                }
                next.opponent = Some(opponent);
            }
            SessionAction::OpponentCleared => {
                next.opponent = None;
                next.close_view();
            }
            SessionAction::ViewOpened => match (&next.identity, &next.opponent) {
                (Some(_), Some(opponent)) => {
                    next.generation += 1;
                    next.view = Some(ActiveView {
                        generation: next.generation,
                        opponent: opponent.clone(),
                    });
                    next.game = GameView::Loading;
                    next.health = SyncHealth::Idle;
                }
                _ => debug!("Cannot open a game view without identity and opponent"),
            },
            SessionAction::ViewClosed => next.close_view(),
            SessionAction::RecordFetched {
                generation,
                snapshot,
            } => {
                if !next.is_current(generation) {
                    return next;
                }
                next.health = SyncHealth::Healthy;
                match snapshot {
                    None => next.game = GameView::NoGame,
                    Some(snapshot) => {
                        let regressed = matches!(
                            &next.game,
                            GameView::Loaded(shown) if shown.revision > snapshot.revision
                        );
                        if regressed {
                            debug!(revision = snapshot.revision, "Discarding older snapshot");
                        } else {
                            next.game = GameView::Loaded(snapshot);
                        }
                    }
                }
            }
            SessionAction::SyncFailed {
                generation,
                message,
            } => {
                if !next.is_current(generation) {
                    return next;
                }
                let failures = match &next.health {
                    SyncHealth::Degraded { failures, .. } => failures + 1,
                    _ => 1,
                };
                next.health = SyncHealth::Degraded { failures, message };
            }
        }
        next
    }

    fn is_current(&self, generation: u64) -> bool {
        let current = self.view.as_ref().map(|v| v.generation) == Some(generation);
        if !current {
            debug!(generation, "Discarding result for a closed view");
        }
        current
    }

    fn close_view(&mut self) {
        self.view = None;
        self.game = GameView::Loading;
        self.health = SyncHealth::Idle;
    }
}
