//! # Noughts
//!
//! A tic-tac-toe session server over UDP.
//!
//! Players join by name, open rooms, challenge open rooms and play to a
//! result. The server tracks every peer by its source address, evicts peers
//! that go silent, and keeps idle players informed of which rooms are open.
//!
//! ## Layers
//!
//! ```text
//! noughts-transport   UDP socket, bounded receive
//! noughts-protocol    packets ⇄ Command / Response
//! noughts-session     who is registered, last heard from when
//! noughts-room        rooms and the game state machine
//! noughts-tick        wall-clock cadence
//! noughts (here)      Lobby (dispatch), Scheduler, NoughtsServer (loop)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use noughts::prelude::*;
//!
//! # async fn demo() -> Result<(), NoughtsError> {
//! let server = NoughtsServer::builder()
//!     .config(ServerConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod lobby;
mod scheduler;
mod server;

pub use config::ServerConfig;
pub use error::NoughtsError;
pub use lobby::{Lobby, Outbound};
pub use scheduler::Scheduler;
pub use server::{NoughtsServer, NoughtsServerBuilder};

pub mod prelude {
    pub use crate::{
        Lobby, NoughtsError, NoughtsServer, NoughtsServerBuilder, Outbound,
        Scheduler, ServerConfig,
    };
    pub use noughts_protocol::{
        BinaryCodec, CellCode, Codec, Command, PeerId, PlayerId, PlayerName,
        Response, RoomId,
    };
}
