//! Player sessions for Noughts.
//!
//! UDP has no connections, so a session is keyed by the sender's address.
//! This crate tracks who has joined, which room each player sits in, and
//! when each one was last heard from:
//!
//! 1. **Registration**: a Join from an unknown address creates a [`Player`]
//! 2. **Liveness**: every packet refreshes `last_seen`
//!    ([`SessionRegistry::touch`])
//! 3. **Expiry**: players silent for longer than the liveness timeout are
//!    reported by [`SessionRegistry::expired`] for the caller to evict
//!
//! # How it fits in the stack
//!
//! ```text
//! Lobby (above)  ← dispatches commands, owns this registry and the rooms
//!     ↕
//! Session Layer (this crate)  ← player identity and liveness
//!     ↕
//! Protocol Layer (below)  ← provides PeerId, PlayerId, PlayerName
//! ```

mod error;
mod player;
mod registry;

pub use error::SessionError;
pub use player::{Player, SessionConfig};
pub use registry::SessionRegistry;
