//! Game synchronization over an opaque remote game store.
//!
//! The remote store keeps one record per pair of players and trusts its
//! callers completely. This crate holds the client half of the system:
//!
//! - [`remote`]: the store boundary and its wire record
//! - [`memory`]: an in-process store with fault injection
//! - [`client`]: rule enforcement, caching and read-your-own-write
//! - [`scheduler`]: interval polling bound to a view's lifetime
//! - [`session`]: the immutable session state and its reducer
//! - [`notify`]: transient user notices
//!
//! # Example
//!
//! ```rust,no_run
//! use game_sync::{CancelToken, GameClient, MemoryBackend, TracingSink};
//! use engine_core::GameType;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), game_sync::ClientError> {
//! let backend = MemoryBackend::new();
//! let alice = GameClient::new(
//!     Arc::new(backend.connect("alice")),
//!     Arc::new(TracingSink),
//!     Duration::from_secs(10),
//! );
//! let token = CancelToken::never();
//! alice.challenge(&"bob".into(), GameType::ConnectFour, &token).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod memory;
pub mod notify;
pub mod remote;
pub mod scheduler;
pub mod scope;
pub mod session;
pub mod snapshot;

pub use client::{ClientError, GameClient, MoveOutcome, Rejection};
pub use memory::{MemoryBackend, MemoryStore};
pub use notify::{ChannelSink, Notice, NoticeLevel, NotificationSink, TracingSink};
pub use remote::{Challenge, PlayerId, RemoteGameRecord, RemoteGameStore, TransportError};
pub use scheduler::{PollHandle, PollOutcome, SyncEvent, SyncScheduler};
pub use scope::{CancelToken, ViewScope};
pub use session::{ActiveView, GameView, Session, SessionAction, SyncHealth};
pub use snapshot::GameSnapshot;
