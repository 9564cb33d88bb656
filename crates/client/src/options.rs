use fieldwalk_observe::PanelMode;

use crate::error::InitError;

/// Client-side presentation settings. World settings come from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Pixels per cell edge.
    pub cell_size: u32,
    /// Cells fetched on each side of the player.
    pub view_radius: u32,
    pub panel_mode: PanelMode,
}

/// Largest accepted `view_radius`, in cells.
pub const MAX_VIEW_RADIUS: u32 = 512;

/// Largest accepted canvas edge, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            canvas_width: 408,
            canvas_height: 408,
            cell_size: 8,
            view_radius: 25,
            panel_mode: PanelMode::default(),
        }
    }
}

impl ClientOptions {
    /// Square canvas that fits the whole fetched window.
    pub fn fitted(
        view_radius: u32,
        cell_size: u32,
        panel_mode: PanelMode,
    ) -> Result<Self, InitError> {
        let side = view_radius
            .checked_mul(2)
            .and_then(|cells| cells.checked_add(1))
            .and_then(|cells| cells.checked_mul(cell_size))
            .ok_or(InitError::Options("canvas size overflows"))?;
        let options = Self {
            canvas_width: side,
            canvas_height: side,
            cell_size,
            view_radius,
            panel_mode,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), InitError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(InitError::Options("canvas must be at least 1x1 pixels"));
        }
        if self.cell_size < 3 {
            return Err(InitError::Options("cell size must be at least 3 pixels"));
        }
        if self.view_radius > MAX_VIEW_RADIUS {
            return Err(InitError::Options("view radius must be at most 512 cells"));
        }
        if self.canvas_width > MAX_CANVAS_SIDE || self.canvas_height > MAX_CANVAS_SIDE {
            return Err(InitError::Options("canvas must be at most 16384 pixels per side"));
        }
        Ok(())
    }
}
