//! Fixed z-order composition of one map frame.

use fieldwalk_common::{CorridorMap, Rgb, ScreenTransform, SignCatalogEntry};
use fieldwalk_kernel::{Session, VisibilityClass};
use fieldwalk_stream::{GodModeCache, ViewFrame};
use glam::Vec2;

use crate::glyphs;
use crate::surface::Surface;

/// Compositor layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Terrain,
    Corridors,
    SignOverlay,
    DiscoveredSigns,
    Species,
    Player,
    Ring,
}

impl Layer {
    pub const ALL: [Layer; 8] = [
        Layer::Background,
        Layer::Terrain,
        Layer::Corridors,
        Layer::SignOverlay,
        Layer::DiscoveredSigns,
        Layer::Species,
        Layer::Player,
        Layer::Ring,
    ];
}

/// Colors and sizes for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub cell_size: f32,
    pub background: Rgb,
    pub fog: Rgb,
    /// Per-channel factor for revealed but not visible cells.
    pub dim_factor: f64,
    pub player: Rgb,
    pub ring: Rgb,
    pub ring_alpha: f32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            cell_size: 8.0,
            background: Rgb::new(0x1a, 0x1a, 0x2e),
            fog: Rgb::new(0x2a, 0x2a, 0x3e),
            dim_factor: 0.6,
            player: Rgb::new(0xef, 0x44, 0x44),
            ring: Rgb::WHITE,
            ring_alpha: 0.3,
        }
    }
}

impl FrameStyle {
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }
}

/// Everything one frame is drawn from. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub session: &'a Session,
    pub frame: &'a ViewFrame,
    pub corridors: Option<&'a CorridorMap>,
    pub sign_catalog: Option<&'a [SignCatalogEntry]>,
}

impl<'a> Scene<'a> {
    pub fn new(session: &'a Session, frame: &'a ViewFrame) -> Self {
        Self {
            session,
            frame,
            corridors: None,
            sign_catalog: None,
        }
    }

    /// Attach whatever god-mode data has been cached.
    pub fn with_overlays(mut self, cache: &'a GodModeCache) -> Self {
        self.corridors = cache.corridors();
        self.sign_catalog = cache.signs();
        self
    }
}

/// Draws a [`Scene`] layer by layer onto a [`Surface`].
///
/// Output depends only on the scene and the style, so composing the same
/// inputs twice yields identical surfaces.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    style: FrameStyle,
}

impl Compositor {
    pub fn new(style: FrameStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    pub fn compose<S: Surface + ?Sized>(&self, scene: &Scene<'_>, surface: &mut S) {
        let (width, height) = surface.size();
        let view = ScreenTransform::new(
            scene.session.position(),
            Vec2::new(width as f32, height as f32),
            self.style.cell_size,
        );
        let seq = scene.frame.request.seq;
        let _span = tracing::info_span!("compose", at = %view.player, seq).entered();

        surface.begin_layer(Layer::Background);
        surface.clear(self.style.background);

        surface.begin_layer(Layer::Terrain);
        self.terrain(scene, &view, surface);

        surface.begin_layer(Layer::Corridors);
        if scene.session.flags().corridor_overlay() {
            self.corridors(scene, &view, surface);
        }

        surface.begin_layer(Layer::SignOverlay);
        if scene.session.flags().sign_overlay() {
            self.sign_overlay(scene, &view, surface);
        }

        surface.begin_layer(Layer::DiscoveredSigns);
        self.discovered_signs(scene, &view, surface);

        surface.begin_layer(Layer::Species);
        let species = self.species(scene, &view, surface);

        let center = view.center();
        surface.begin_layer(Layer::Player);
        surface.fill_circle(center, self.style.cell_size / 2.0 + 2.0, self.style.player);

        surface.begin_layer(Layer::Ring);
        surface.stroke_circle(
            center,
            scene.session.visibility_radius() as f32 * self.style.cell_size,
            self.style.ring,
            self.style.ring_alpha,
        );

        tracing::trace!(species, signs = scene.session.signs().len(), "frame composed");
    }

    /// Color of one terrain cell given its visibility class.
    pub fn terrain_color(&self, scene: &Scene<'_>, class: VisibilityClass, base: Rgb) -> Rgb {
        if scene.session.flags().show_all_terrain {
            return base;
        }
        match class {
            VisibilityClass::Visible => base,
            VisibilityClass::Revealed => base.dim(self.style.dim_factor),
            VisibilityClass::Unknown => self.style.fog,
        }
    }

    fn terrain<S: Surface + ?Sized>(
        &self,
        scene: &Scene<'_>,
        view: &ScreenTransform,
        surface: &mut S,
    ) {
        let cs = self.style.cell_size;
        let config = scene.session.config();
        for (cell, id) in scene.frame.terrain.iter() {
            let origin = view.cell_origin(cell);
            if !view.is_on_screen(origin, cs) {
                continue;
            }
            let color =
                self.terrain_color(scene, scene.session.classify(cell), config.terrain_color(id));
            surface.fill_rect(origin, Vec2::splat(cs - 1.0), color);
        }
    }

    fn corridors<S: Surface + ?Sized>(
        &self,
        scene: &Scene<'_>,
        view: &ScreenTransform,
        surface: &mut S,
    ) {
        let Some(corridors) = scene.corridors else {
            return;
        };
        let cs = self.style.cell_size;
        for corridor in corridors.values() {
            for cell in &corridor.cells {
                let origin = view.cell_origin(*cell);
                if view.is_on_screen(origin, cs) {
                    surface.fill_rect(origin + Vec2::ONE, Vec2::splat(cs - 3.0), corridor.color);
                }
            }
        }
    }

    fn sign_overlay<S: Surface + ?Sized>(
        &self,
        scene: &Scene<'_>,
        view: &ScreenTransform,
        surface: &mut S,
    ) {
        let Some(catalog) = scene.sign_catalog else {
            return;
        };
        for entry in catalog {
            for cell in &entry.locations {
                let center = view.world_to_screen(*cell);
                if view.is_on_screen(center, 0.0) {
                    surface.draw_glyph(center, self.style.cell_size, &entry.glyph, entry.color);
                }
            }
        }
    }

    fn discovered_signs<S: Surface + ?Sized>(
        &self,
        scene: &Scene<'_>,
        view: &ScreenTransform,
        surface: &mut S,
    ) {
        for (cell, sign) in scene.session.signs().iter() {
            let center = view.world_to_screen(cell);
            if view.is_on_screen(center, 0.0) {
                surface.draw_glyph(center, self.style.cell_size + 2.0, &sign.glyph, sign.color);
            }
        }
    }

    /// Returns how many species glyphs were drawn.
    fn species<S: Surface + ?Sized>(
        &self,
        scene: &Scene<'_>,
        view: &ScreenTransform,
        surface: &mut S,
    ) -> usize {
        let mut drawn = 0;
        for species in &scene.frame.observations.observations {
            let symbol = glyphs::species_symbol(species.category);
            let tint = glyphs::species_tint(species.category);
            for cell in species.locations() {
                if !scene.session.is_visible(*cell) {
                    continue;
                }
                let center = view.world_to_screen(*cell);
                if view.is_on_screen(center, 0.0) {
                    surface.draw_glyph(center, self.style.cell_size, symbol, tint);
                    drawn += 1;
                }
            }
        }
        drawn
    }
}
