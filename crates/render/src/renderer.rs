use fieldwalk_common::WorldPosition;
use fieldwalk_kernel::VisibilityClass;

use crate::compositor::{Compositor, FrameStyle, Scene};
use crate::glyphs;
use crate::surface::Raster;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads a scene and produces output. It never mutates session
/// state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene.
    fn render(&self, scene: &Scene<'_>) -> Self::Output;
}

/// Composes scenes into a fixed-size [`Raster`].
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    compositor: Compositor,
    width: u32,
    height: u32,
}

impl RasterRenderer {
    pub fn new(width: u32, height: u32, style: FrameStyle) -> Self {
        Self {
            compositor: Compositor::new(style),
            width,
            height,
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }
}

impl Renderer for RasterRenderer {
    type Output = Raster;

    fn render(&self, scene: &Scene<'_>) -> Raster {
        let mut raster = Raster::new(self.width, self.height);
        self.compositor.compose(scene, &mut raster);
        raster
    }
}

/// One character per cell of the fetched terrain window, for terminals.
///
/// Later layers win a cell the same way they overdraw on a raster:
/// terrain, corridor `=`, catalogued sign, discovered sign, species letter,
/// and `@` for the player. Terrain shows the first letter of its name,
/// upper case when visible (or when all terrain is shown), lower case when
/// remembered, and `.` for fog.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn terrain_char(scene: &Scene<'_>, cell: WorldPosition, id: u16) -> char {
        let letter = scene
            .session
            .config()
            .terrain(id)
            .and_then(|t| t.name.chars().find(|c| c.is_alphabetic()))
            .unwrap_or('?');
        if scene.session.flags().show_all_terrain {
            return letter.to_ascii_uppercase();
        }
        match scene.session.classify(cell) {
            VisibilityClass::Visible => letter.to_ascii_uppercase(),
            VisibilityClass::Revealed => letter.to_ascii_lowercase(),
            VisibilityClass::Unknown => '.',
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene<'_>) -> String {
        let session = scene.session;
        let terrain = &scene.frame.terrain;
        let rect = terrain.rect();
        let flags = session.flags();

        let mut grid: Vec<Vec<char>> = terrain
            .iter()
            .fold(Vec::new(), |mut rows, (cell, id)| {
                let row = (cell.y - rect.min_y) as usize;
                if rows.len() <= row {
                    rows.push(Vec::new());
                }
                rows[row].push(Self::terrain_char(scene, cell, id));
                rows
            });
        let mut put = |cell: WorldPosition, ch: char| {
            if rect.contains(cell) {
                let (row, col) = ((cell.y - rect.min_y) as usize, (cell.x - rect.min_x) as usize);
                if let Some(slot) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *slot = ch;
                }
            }
        };

        if flags.corridor_overlay() {
            for corridor in scene.corridors.into_iter().flat_map(|c| c.values()) {
                corridor.cells.iter().for_each(|cell| put(*cell, '='));
            }
        }
        if flags.sign_overlay() {
            for entry in scene.sign_catalog.unwrap_or_default() {
                let ch = glyphs::first_char(&entry.glyph);
                entry.locations.iter().for_each(|cell| put(*cell, ch));
            }
        }
        for (cell, sign) in session.signs().iter() {
            put(cell, glyphs::first_char(&sign.glyph));
        }
        for species in &scene.frame.observations.observations {
            let ch = glyphs::species_letter(species.category);
            for cell in species.locations() {
                if session.is_visible(*cell) {
                    put(*cell, ch);
                }
            }
        }
        put(session.position(), '@');

        let mut out = format!(
            "=== {} (seq={}, radius={}) ===\n",
            session.position(),
            scene.frame.request.seq,
            session.visibility_radius()
        );
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::testing;
    use fieldwalk_common::Direction;
    use fieldwalk_kernel::SessionFlag;

    #[test]
    fn raster_renderer_uses_its_size() {
        let session = testing::session();
        let frame = testing::frame(&session, vec![]);
        let renderer = RasterRenderer::new(120, 80, FrameStyle::default());
        let raster = renderer.render(&Scene::new(&session, &frame));
        assert_eq!((raster.width(), raster.height()), (120, 80));
        assert_eq!(raster.pixel(60, 40), Some(renderer.compositor().style().player));
    }

    #[test]
    fn text_renderer_marks_player_and_fog() {
        let session = testing::session();
        let frame = testing::frame(&session, vec![testing::species("deer", &[(51, 50)])]);
        let text = TextRenderer::new().render(&Scene::new(&session, &frame));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=== [50, 50] (seq=0, radius=3) ===");
        // Window is x 40..61, y 40..61; the player's row is line 11.
        let row: Vec<char> = lines[11].chars().collect();
        assert_eq!(row.len(), 21);
        assert_eq!(row[10], '@');
        assert_eq!(row[11], 'H');
        assert_eq!(row[12], 'G');
        assert_eq!(row[0], '.');
        assert_eq!(row[7], 'G');
    }

    #[test]
    fn text_renderer_lowercases_remembered_cells() {
        let mut session = testing::session();
        for _ in 0..5 {
            session.try_move(Direction::East);
        }
        let frame = testing::frame(&session, vec![]);
        let text = TextRenderer::new().render(&Scene::new(&session, &frame));
        let row: Vec<char> = text.lines().nth(11).unwrap().chars().collect();
        // Player at column 10 is (55,50); (48,50) sits at column 3.
        assert_eq!(row[3], 'g');
        assert_eq!(row[0], '.');

        session.toggle(SessionFlag::AllTerrain);
        let text = TextRenderer::new().render(&Scene::new(&session, &frame));
        let row: Vec<char> = text.lines().nth(11).unwrap().chars().collect();
        assert_eq!(row[0], 'S');
        assert_eq!(row[3], 'G');
    }
}
