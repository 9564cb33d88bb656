//! Asynchronous abstraction over the remote data service.
//!
//! The client never owns world content; it asks a [`DataGateway`] for it.
//! Implementations can talk to the real service, serve a fixture file, or
//! inject failures in tests.

use async_trait::async_trait;
use fieldwalk_common::{
    CellRect, CorridorMap, ObservationBatch, SignCatalogEntry, TimeOfDay, ViewportBatch,
    WorldPosition,
};
use fieldwalk_kernel::WorldConfig;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway unreachable: {0}")]
    Transport(String),

    #[error("malformed {what} response: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("position {0} is outside the world")]
    OutOfBounds(WorldPosition),

    #[error("terrain window {requested:?} answered with {served:?}")]
    WindowMismatch { requested: CellRect, served: CellRect },
}

/// Everything the client needs from the data service.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// World dimensions, spawn, radius and terrain table.
    async fn config(&self) -> Result<WorldConfig>;

    /// Terrain ids covering exactly `window` (already clipped to the world).
    async fn terrain_window(&self, window: CellRect) -> Result<ViewportBatch>;

    /// What can be perceived from `at`.
    async fn observations(&self, at: WorldPosition) -> Result<ObservationBatch>;

    /// All corridors, for the god-mode overlay. Static for the session.
    async fn corridors(&self) -> Result<CorridorMap>;

    /// All signs grouped by type, for the god-mode overlay. Static for the session.
    async fn all_signs(&self) -> Result<Vec<SignCatalogEntry>>;

    /// Change the session-wide time of day; returns the value now in effect.
    async fn set_time_of_day(&self, time: TimeOfDay) -> Result<TimeOfDay>;
}
