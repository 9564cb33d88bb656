use fieldwalk_common::{CellRect, ObservationBatch, ViewportBatch, WorldPosition};
use tracing::Instrument;

use crate::gateway::{DataGateway, GatewayError, Result};

/// One view update: the player position it was issued for and the terrain
/// window it asks for. `seq` increases with every request a cache issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRequest {
    pub seq: u64,
    pub position: WorldPosition,
    pub window: CellRect,
}

/// Matched terrain window and observation batch for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedView {
    pub request: ViewRequest,
    pub terrain: ViewportBatch,
    pub observations: ObservationBatch,
}

impl ViewRequest {
    /// Issue both gateway calls concurrently and wait for both.
    ///
    /// Either call failing fails the whole request; a half-answered request
    /// is never handed back.
    pub async fn fetch<G>(&self, gateway: &G) -> Result<FetchedView>
    where
        G: DataGateway + ?Sized,
    {
        let span = tracing::info_span!("fetch_view", seq = self.seq, at = %self.position);
        async {
            let (terrain, observations) = tokio::join!(
                gateway.terrain_window(self.window),
                gateway.observations(self.position)
            );
            let terrain = terrain?;
            let observations = observations?;
            self.check_window(&terrain)?;

            tracing::trace!(
                rows = terrain.rows(),
                species = observations.observations.len(),
                signs = observations.signs.len(),
                "view fetched"
            );
            Ok::<_, GatewayError>(FetchedView {
                request: *self,
                terrain,
                observations,
            })
        }
        .instrument(span)
        .await
    }

    fn check_window(&self, terrain: &ViewportBatch) -> Result<()> {
        let served = terrain.rect();
        if served.min_x != self.window.min_x
            || served.min_y != self.window.min_y
            || terrain.rows() != self.window.height() as usize
        {
            return Err(GatewayError::WindowMismatch {
                requested: self.window,
                served,
            });
        }
        if terrain
            .cells
            .iter()
            .any(|row| row.len() != self.window.width() as usize)
        {
            return Err(GatewayError::Malformed {
                what: "terrain window",
                reason: format!("rows must be {} cells wide", self.window.width()),
            });
        }
        Ok(())
    }
}
