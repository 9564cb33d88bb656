use fieldwalk_common::{
    CellRect, CorridorMap, ObservationBatch, SignCatalogEntry, ViewportBatch, WorldPosition,
};

use crate::gateway::{DataGateway, GatewayError};
use crate::request::{FetchedView, ViewRequest};

/// The terrain window and observation batch from one applied request.
///
/// Only ever replaced as a whole, so the renderer never sees terrain from one
/// update with observations from another.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrame {
    pub request: ViewRequest,
    pub terrain: ViewportBatch,
    pub observations: ObservationBatch,
}

impl ViewFrame {
    /// Position the frame was fetched for.
    pub fn position(&self) -> WorldPosition {
        self.request.position
    }
}

/// What happened to a fetched view handed to [`ViewportCache::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { seq: u64 },
    /// A newer request was issued or the player has moved since.
    Stale { seq: u64, latest: u64 },
}

/// Counters for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub issued: u64,
    pub applied: u64,
    pub stale_dropped: u64,
    pub failed: u64,
}

/// Holds the latest applied [`ViewFrame`] and sequences view requests.
///
/// A response is applied only if it answers the most recently issued request
/// and was fetched for the position the player is at now. Anything else is
/// dropped; in-flight requests are never cancelled.
#[derive(Debug, Default)]
pub struct ViewportCache {
    current: Option<ViewFrame>,
    next_seq: u64,
    latest: Option<u64>,
    stats: CacheStats,
}

impl ViewportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request for `position`. Supersedes every earlier one.
    pub fn issue(&mut self, position: WorldPosition, window: CellRect) -> ViewRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest = Some(seq);
        self.stats.issued += 1;
        tracing::debug!(seq, at = %position, "view request issued");
        ViewRequest {
            seq,
            position,
            window,
        }
    }

    /// Swap in a fetched view if it is still current.
    pub fn apply(&mut self, fetched: FetchedView, player: WorldPosition) -> ApplyOutcome {
        let seq = fetched.request.seq;
        let latest = self.latest.unwrap_or(seq);
        if seq != latest || fetched.request.position != player {
            self.stats.stale_dropped += 1;
            tracing::debug!(
                seq,
                latest,
                fetched_at = %fetched.request.position,
                player = %player,
                "dropping stale view"
            );
            return ApplyOutcome::Stale { seq, latest };
        }
        self.current = Some(ViewFrame {
            request: fetched.request,
            terrain: fetched.terrain,
            observations: fetched.observations,
        });
        self.stats.applied += 1;
        ApplyOutcome::Applied { seq }
    }

    /// Note a failed request. The current frame is kept.
    pub fn record_failure(&mut self, request: &ViewRequest, error: &GatewayError) {
        self.stats.failed += 1;
        tracing::warn!(seq = request.seq, at = %request.position, %error, "view update failed");
    }

    pub fn current(&self) -> Option<&ViewFrame> {
        self.current.as_ref()
    }

    /// The current frame, but only if it was fetched for `player`.
    pub fn current_for(&self, player: WorldPosition) -> Option<&ViewFrame> {
        self.current.as_ref().filter(|f| f.position() == player)
    }

    pub fn latest_issued(&self) -> Option<u64> {
        self.latest
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Session-long cache of the static god-mode datasets.
#[derive(Debug, Default)]
pub struct GodModeCache {
    corridors: Option<CorridorMap>,
    signs: Option<Vec<SignCatalogEntry>>,
    fetches: u32,
}

impl GodModeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.corridors.is_some() && self.signs.is_some()
    }

    /// Fetch both datasets unless they are already cached.
    ///
    /// Returns `Ok(true)` if a fetch happened. On failure nothing is cached,
    /// so the next activation tries again.
    pub async fn ensure_loaded<G>(&mut self, gateway: &G) -> Result<bool, GatewayError>
    where
        G: DataGateway + ?Sized,
    {
        if self.is_loaded() {
            return Ok(false);
        }
        let (corridors, signs) = tokio::join!(gateway.corridors(), gateway.all_signs());
        let (corridors, signs) = (corridors?, signs?);
        self.fetches += 1;
        tracing::debug!(
            corridors = corridors.len(),
            sign_types = signs.len(),
            "god-mode data cached"
        );
        self.corridors = Some(corridors);
        self.signs = Some(signs);
        Ok(true)
    }

    pub fn corridors(&self) -> Option<&CorridorMap> {
        self.corridors.as_ref()
    }

    pub fn signs(&self) -> Option<&[SignCatalogEntry]> {
        self.signs.as_deref()
    }

    /// Number of successful loads. Never exceeds one.
    pub fn fetches(&self) -> u32 {
        self.fetches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwalk_common::TerrainRef;

    fn fetched(request: ViewRequest, terrain_id: u16) -> FetchedView {
        FetchedView {
            request,
            terrain: ViewportBatch {
                min_x: request.window.min_x,
                min_y: request.window.min_y,
                cells: vec![
                    vec![terrain_id; request.window.width() as usize];
                    request.window.height() as usize
                ],
            },
            observations: ObservationBatch {
                location: request.position,
                current_terrain: TerrainRef {
                    id: terrain_id,
                    name: String::new(),
                    color: fieldwalk_common::Rgb::FALLBACK,
                },
                visible_terrains: vec![],
                signs: vec![],
                observations: vec![],
                corridors: vec![],
                time_of_day: None,
                season: None,
            },
        }
    }

    fn window(x: i32) -> CellRect {
        CellRect {
            min_x: x - 1,
            min_y: 0,
            max_x: x + 2,
            max_y: 2,
        }
    }

    #[test]
    fn applies_latest_request() {
        let mut cache = ViewportCache::new();
        let at = WorldPosition::new(5, 1);
        let req = cache.issue(at, window(5));
        assert_eq!(cache.apply(fetched(req, 3), at), ApplyOutcome::Applied { seq: 0 });
        assert_eq!(cache.current().unwrap().terrain.cells[0][0], 3);
        assert!(cache.current_for(at).is_some());
        assert!(cache.current_for(WorldPosition::new(6, 1)).is_none());
    }

    #[test]
    fn out_of_order_response_is_dropped() {
        let mut cache = ViewportCache::new();
        let first = cache.issue(WorldPosition::new(5, 1), window(5));
        let second = cache.issue(WorldPosition::new(6, 1), window(6));
        let player = WorldPosition::new(6, 1);

        assert_eq!(
            cache.apply(fetched(second, 2), player),
            ApplyOutcome::Applied { seq: 1 }
        );
        assert_eq!(
            cache.apply(fetched(first, 1), player),
            ApplyOutcome::Stale { seq: 0, latest: 1 }
        );
        assert_eq!(cache.current().unwrap().request, second);
        assert_eq!(cache.stats().stale_dropped, 1);
        assert_eq!(cache.stats().applied, 1);
    }

    #[test]
    fn early_response_for_superseded_request_is_dropped() {
        let mut cache = ViewportCache::new();
        let first = cache.issue(WorldPosition::new(5, 1), window(5));
        let _second = cache.issue(WorldPosition::new(6, 1), window(6));
        let outcome = cache.apply(fetched(first, 1), WorldPosition::new(6, 1));
        assert!(matches!(outcome, ApplyOutcome::Stale { .. }));
        assert!(cache.current().is_none());
    }

    #[test]
    fn response_for_abandoned_position_is_dropped() {
        let mut cache = ViewportCache::new();
        let req = cache.issue(WorldPosition::new(5, 1), window(5));
        let outcome = cache.apply(fetched(req, 1), WorldPosition::new(4, 1));
        assert!(matches!(outcome, ApplyOutcome::Stale { .. }));
    }

    #[test]
    fn failure_keeps_current_frame() {
        let mut cache = ViewportCache::new();
        let at = WorldPosition::new(5, 1);
        let req = cache.issue(at, window(5));
        cache.apply(fetched(req, 7), at);
        let next = cache.issue(WorldPosition::new(6, 1), window(6));
        cache.record_failure(&next, &GatewayError::Transport("timeout".into()));
        assert_eq!(cache.current().unwrap().terrain.cells[0][0], 7);
        assert_eq!(cache.stats().failed, 1);
    }
}
