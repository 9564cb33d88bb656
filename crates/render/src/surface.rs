//! Drawing targets for the compositor.

use fieldwalk_common::Rgb;
use glam::Vec2;
use std::io::{self, Write};

use crate::compositor::Layer;

/// Minimal 2-D drawing interface. Coordinates are pixels, origin top-left.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Marks the start of a compositor layer. Surfaces that do not care
    /// ignore it.
    fn begin_layer(&mut self, _layer: Layer) {}

    fn clear(&mut self, color: Rgb);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// One-pixel outline, mixed onto what is underneath at `alpha`.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);

    /// A text glyph centred on `center`, `size` pixels tall.
    fn draw_glyph(&mut self, center: Vec2, size: f32, glyph: &str, color: Rgb);
}

/// RGB pixel buffer.
///
/// No font is loaded, so glyphs rasterise as solid pips in the glyph color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Write the buffer as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let bytes: Vec<u8> = self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
        out.write_all(&bytes)?;
        out.flush()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height) {
            let i = self.index(x as u32, y as u32);
            self.pixels[i] = color;
        }
    }

    fn mix(&mut self, x: i64, y: i64, color: Rgb, alpha: f32) {
        if x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height) {
            let i = self.index(x as u32, y as u32);
            self.pixels[i] = self.pixels[i].blend(color, alpha);
        }
    }

    /// Pixel bounds of the square reaching `reach` px around `center`,
    /// clipped to the buffer.
    fn circle_span(&self, center: Vec2, reach: f32) -> (i64, i64, i64, i64) {
        let x0 = ((center.x - reach).floor() as i64).max(0);
        let y0 = ((center.y - reach).floor() as i64).max(0);
        let x1 = ((center.x + reach).ceil() as i64).min(i64::from(self.width));
        let y1 = ((center.y + reach).ceil() as i64).min(i64::from(self.height));
        (x0, y0, x1, y1)
    }
}

impl Surface for Raster {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let x0 = origin.x.round() as i64;
        let y0 = origin.y.round() as i64;
        let x1 = (origin.x + size.x).round() as i64;
        let y1 = (origin.y + size.y).round() as i64;
        for y in y0.max(0)..y1.min(i64::from(self.height)) {
            for x in x0.max(0)..x1.min(i64::from(self.width)) {
                self.put(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let (x0, y0, x1, y1) = self.circle_span(center, radius);
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        let (x0, y0, x1, y1) = self.circle_span(center, radius + 1.0);
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if (d.length() - radius).abs() <= 0.5 {
                    self.mix(x, y, color, alpha);
                }
            }
        }
    }

    fn draw_glyph(&mut self, center: Vec2, size: f32, _glyph: &str, color: Rgb) {
        self.fill_circle(center, size * 0.3, color);
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Layer(Layer),
    Clear(Rgb),
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Rgb,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
    },
    Ring {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Glyph {
        center: Vec2,
        size: f32,
        glyph: String,
        color: Rgb,
    },
}

/// Surface that records calls instead of drawing them.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Layer markers in the order they were started.
    pub fn layers(&self) -> Vec<Layer> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Calls issued between the marker for `layer` and the next marker.
    pub fn ops_in(&self, layer: Layer) -> &[DrawOp] {
        let Some(start) = self.ops.iter().position(|op| *op == DrawOp::Layer(layer)) else {
            return &[];
        };
        let rest = &self.ops[start + 1..];
        let end = rest
            .iter()
            .position(|op| matches!(op, DrawOp::Layer(_)))
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

impl Surface for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_layer(&mut self, layer: Layer) {
        self.ops.push(DrawOp::Layer(layer));
    }

    fn clear(&mut self, color: Rgb) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb) {
        self.ops.push(DrawOp::Rect {
            origin,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.ops.push(DrawOp::Ring {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn draw_glyph(&mut self, center: Vec2, size: f32, glyph: &str, color: Rgb) {
        self.ops.push(DrawOp::Glyph {
            center,
            size,
            glyph: glyph.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_buffer() {
        let mut raster = Raster::new(10, 10);
        let red = Rgb::new(255, 0, 0);
        raster.fill_rect(Vec2::new(-4.0, 8.0), Vec2::new(7.0, 7.0), red);
        assert_eq!(raster.pixel(0, 8), Some(red));
        assert_eq!(raster.pixel(2, 9), Some(red));
        assert_eq!(raster.pixel(3, 9), Some(Rgb::BLACK));
        assert_eq!(raster.pixel(0, 7), Some(Rgb::BLACK));
        assert_eq!(raster.pixel(10, 9), None);
    }

    #[test]
    fn stroke_blends_over_background() {
        let mut raster = Raster::new(40, 40);
        raster.clear(Rgb::BLACK);
        raster.stroke_circle(Vec2::new(20.0, 20.0), 10.0, Rgb::WHITE, 0.3);
        // (29.5, 20.5) sits 9.51 px from the centre.
        let ring = raster.pixel(29, 20).unwrap();
        assert_eq!(ring, Rgb::new(77, 77, 77));
        assert_eq!(raster.pixel(20, 20), Some(Rgb::BLACK));
    }

    #[test]
    fn ppm_header_and_payload() {
        let mut raster = Raster::new(2, 1);
        raster.clear(Rgb::new(1, 2, 3));
        let mut out = Vec::new();
        raster.write_ppm(&mut out).unwrap();
        assert_eq!(&out[..11], b"P6\n2 1\n255\n");
        assert_eq!(&out[11..], &[1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn draw_list_groups_by_layer() {
        let mut list = DrawList::new(8, 8);
        list.begin_layer(Layer::Background);
        list.clear(Rgb::BLACK);
        list.begin_layer(Layer::Player);
        list.fill_circle(Vec2::splat(4.0), 2.0, Rgb::WHITE);
        list.fill_circle(Vec2::splat(4.0), 1.0, Rgb::WHITE);

        assert_eq!(list.layers(), vec![Layer::Background, Layer::Player]);
        assert_eq!(list.ops_in(Layer::Player).len(), 2);
        assert!(list.ops_in(Layer::Ring).is_empty());
    }
}
