use fieldwalk_common::{CellRect, Direction, ScreenTransform, SpeciesId, TimeOfDay, WorldPosition};
use fieldwalk_input::{Action, click_step, hover_cell};
use fieldwalk_kernel::{MoveOutcome, Session, SessionFlag};
use fieldwalk_observe::{CorridorLegend, ObservationPanel, PanelView, PredatorNotice, predator_notices};
use fieldwalk_render::{FrameStyle, Raster, RasterRenderer, Renderer, Scene, TextRenderer};
use fieldwalk_stream::{
    ApplyOutcome, CacheStats, DataGateway, FetchedView, GatewayError, GodModeCache, ViewFrame,
    ViewRequest, ViewportCache,
};
use glam::Vec2;

use crate::error::{ClientError, InitError};
use crate::options::ClientOptions;

/// What the caller should refresh after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Map and panel changed.
    Redraw,
    /// Only the panel changed (focus).
    PanelOnly,
    Unchanged,
}

/// Owns one exploration session and everything derived from it.
///
/// All state changes go through [`Controller::dispatch`] or the split
/// [`step`](Controller::step) / [`fetch`](Controller::fetch) /
/// [`apply`](Controller::apply) sequence, which lets several view updates be
/// in flight at once.
pub struct Controller<G> {
    gateway: G,
    options: ClientOptions,
    session: Session,
    cache: ViewportCache,
    overlays: GodModeCache,
    renderer: RasterRenderer,
    panel: ObservationPanel,
    focus: Option<SpeciesId>,
    last_frame: Option<Raster>,
}

impl<G: DataGateway> Controller<G> {
    /// Fetch the world config, start the session and load the first view.
    pub async fn connect(gateway: G, options: ClientOptions) -> Result<Self, ClientError> {
        options.validate()?;
        let config = gateway.config().await.map_err(InitError::Config)?;
        let session = Session::start(config).map_err(InitError::from)?;

        let mut controller = Self {
            renderer: RasterRenderer::new(
                options.canvas_width,
                options.canvas_height,
                FrameStyle::with_cell_size(options.cell_size as f32),
            ),
            panel: ObservationPanel::new(options.panel_mode),
            gateway,
            options,
            session,
            cache: ViewportCache::new(),
            overlays: GodModeCache::new(),
            focus: None,
            last_frame: None,
        };

        let request = controller.issue();
        let fetched = controller
            .fetch(request)
            .await
            .map_err(InitError::FirstView)?;
        controller.apply(fetched);
        tracing::info!(at = %controller.session.position(), "client connected");
        Ok(controller)
    }

    /// Terrain window for the current player position.
    pub fn view_window(&self) -> CellRect {
        self.session
            .bounds()
            .window_around(self.session.position(), self.options.view_radius)
    }

    pub fn transform(&self) -> ScreenTransform {
        ScreenTransform::new(
            self.session.position(),
            Vec2::new(
                self.options.canvas_width as f32,
                self.options.canvas_height as f32,
            ),
            self.options.cell_size as f32,
        )
    }

    fn issue(&mut self) -> ViewRequest {
        let window = self.view_window();
        self.cache.issue(self.session.position(), window)
    }

    /// Move one cell. Returns the view request to fetch, or `None` if the
    /// move was rejected.
    pub fn step(&mut self, direction: Direction) -> Option<ViewRequest> {
        match self.session.try_move(direction) {
            MoveOutcome::Moved { .. } => Some(self.issue()),
            MoveOutcome::Rejected { .. } => None,
        }
    }

    /// Fetch a view. Borrows the controller immutably, so requests can be
    /// awaited concurrently.
    pub async fn fetch(&self, request: ViewRequest) -> Result<FetchedView, GatewayError> {
        request.fetch(&self.gateway).await
    }

    /// Hand a fetched view to the cache. Stale views are dropped.
    pub fn apply(&mut self, fetched: FetchedView) -> ApplyOutcome {
        let outcome = self.cache.apply(fetched, self.session.position());
        if let ApplyOutcome::Applied { .. } = outcome {
            if let Some(frame) = self.cache.current() {
                let new_signs = self.session.remember_signs(&frame.observations.signs);
                tracing::debug!(new_signs, "signs remembered");
            }
            self.recompose();
        }
        outcome
    }

    /// Note a failed fetch. The last frame stays on screen.
    pub fn fail(&mut self, request: &ViewRequest, error: GatewayError) -> ClientError {
        self.cache.record_failure(request, &error);
        ClientError::Fetch(error)
    }

    /// Issue, fetch and apply a view for the current position.
    pub async fn refresh(&mut self) -> Result<ApplyOutcome, ClientError> {
        let request = self.issue();
        self.complete(request).await
    }

    async fn complete(&mut self, request: ViewRequest) -> Result<ApplyOutcome, ClientError> {
        match self.fetch(request).await {
            Ok(fetched) => Ok(self.apply(fetched)),
            Err(error) => Err(self.fail(&request, error)),
        }
    }

    pub async fn dispatch(&mut self, action: Action) -> Result<Response, ClientError> {
        tracing::trace!(?action, "dispatch");
        match action {
            Action::Move(direction) => self.walk(direction).await,
            Action::StepToward(point) => match click_step(point, &self.transform()) {
                Some(direction) => self.walk(direction).await,
                None => Ok(Response::Unchanged),
            },
            Action::Hover(point) => {
                let cell = hover_cell(point, &self.transform());
                Ok(self.set_focus(self.species_at(cell)))
            }
            Action::HoverExit => Ok(self.set_focus(None)),
            Action::Toggle(flag) => self.toggle(flag).await,
            Action::SetTimeOfDay(time) => self.set_time_of_day(time).await,
            Action::Noop => Ok(Response::Unchanged),
        }
    }

    async fn walk(&mut self, direction: Direction) -> Result<Response, ClientError> {
        let Some(request) = self.step(direction) else {
            return Ok(Response::Unchanged);
        };
        self.complete(request).await?;
        Ok(Response::Redraw)
    }

    async fn toggle(&mut self, flag: SessionFlag) -> Result<Response, ClientError> {
        let enabled = self.session.toggle(flag);
        let loaded = if flag == SessionFlag::GodMode && enabled {
            self.overlays.ensure_loaded(&self.gateway).await
        } else {
            Ok(false)
        };
        self.recompose();
        match loaded {
            Ok(_) => Ok(Response::Redraw),
            Err(error) => {
                tracing::warn!(%error, "god-mode data unavailable");
                Err(ClientError::Fetch(error))
            }
        }
    }

    async fn set_time_of_day(&mut self, time: TimeOfDay) -> Result<Response, ClientError> {
        let acknowledged = self.gateway.set_time_of_day(time).await?;
        self.session.set_time_of_day(acknowledged);
        tracing::info!(time = %acknowledged, "time of day changed");
        self.refresh().await?;
        Ok(Response::Redraw)
    }

    /// Species with a visible location at `cell`, in the current batch.
    fn species_at(&self, cell: WorldPosition) -> Option<SpeciesId> {
        if !self.session.is_visible(cell) {
            return None;
        }
        self.current_frame()?
            .observations
            .observations
            .iter()
            .find(|s| s.is_at(cell))
            .map(|s| s.id.clone())
    }

    fn set_focus(&mut self, focus: Option<SpeciesId>) -> Response {
        if self.focus == focus {
            return Response::Unchanged;
        }
        tracing::debug!(?focus, "focus changed");
        self.focus = focus;
        Response::PanelOnly
    }

    fn scene(&self) -> Option<Scene<'_>> {
        self.current_frame()
            .map(|frame| Scene::new(&self.session, frame).with_overlays(&self.overlays))
    }

    /// Re-render if the cached frame belongs to the current position;
    /// otherwise the previous raster stays.
    fn recompose(&mut self) {
        if let Some(raster) = self.scene().map(|scene| self.renderer.render(&scene)) {
            self.last_frame = Some(raster);
        }
    }

    /// Frame matching the player's current position.
    pub fn current_frame(&self) -> Option<&ViewFrame> {
        self.cache.current_for(self.session.position())
    }

    /// Most recent rendered map.
    pub fn redraw(&self) -> Option<&Raster> {
        self.last_frame.as_ref()
    }

    pub fn text_frame(&self) -> Option<String> {
        self.scene().map(|scene| TextRenderer::new().render(&scene))
    }

    /// Panel for the last applied batch.
    pub fn panel(&self) -> PanelView {
        self.panel.render(
            self.cache.current().map(|f| &f.observations),
            self.focus.as_ref(),
        )
    }

    /// Corridor legend, once god mode is on and its data is cached.
    pub fn legend(&self) -> Option<CorridorLegend> {
        if !self.session.flags().god_mode {
            return None;
        }
        self.overlays.corridors().map(CorridorLegend::from_corridors)
    }

    pub fn predator_notices(&self) -> Vec<PredatorNotice> {
        if !self.session.flags().god_mode {
            return Vec::new();
        }
        predator_notices(self.session.config())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn focus(&self) -> Option<&SpeciesId> {
        self.focus.as_ref()
    }

    pub fn overlays(&self) -> &GodModeCache {
        &self.overlays
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}
