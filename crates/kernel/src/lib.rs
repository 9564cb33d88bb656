//! Session kernel: authoritative exploration state for one player.
//!
//! # Invariants
//! - Player position changes only through validated movement.
//! - Exploration memory and sign memory only grow.
//! - Visibility is derived on demand and never stored.

pub mod config;
pub mod memory;
pub mod session;
pub mod visibility;

pub use config::{ConfigError, TerrainTile, WorldConfig};
pub use memory::{ExplorationMemory, RememberedSign, SignMemory};
pub use session::{MoveOutcome, PlayerState, Session, SessionError, SessionFlag, SessionFlags};
pub use visibility::{VisibilityClass, classify};
