//! The persistent paint layer strokes are committed to.
//!
//! [`RasterSurface`] is the seam between the stroke logic and pixels: the
//! recorder and the history manager only ever talk to this trait, so tests can
//! swap in a counting or failing surface. [`Canvas`] is the real one: a
//! transparent RGBA buffer that sits on top of the camera frame.
//!
//! Snapshots are PNG bytes. PNG is lossless, so undo/redo reproduce the canvas
//! byte for byte.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::Error;
use crate::types::{Color, ScreenPoint};

/// What the stroke pipeline needs from a paint layer.
pub trait RasterSurface {
    /// Opaque copy of the full surface contents.
    type Snapshot;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Paint a round-capped segment. `from == to` paints a dot.
    fn draw_line_segment(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, width: f32);

    /// Erase everything back to transparent.
    fn clear(&mut self);

    fn serialize(&self) -> Result<Self::Snapshot, Error>;

    fn restore(&mut self, snapshot: &Self::Snapshot) -> Result<(), Error>;
}

/// PNG-encoded canvas contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngSnapshot(Vec<u8>);

impl PngSnapshot {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Transparent RGBA paint layer (straight alpha).
#[derive(Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    /// Raw pixels for compositing.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel at (x,y), `None` when outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Count of pixels with any paint on them.
    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p[3] > 0).count()
    }

    /// Write the drawing to disk as PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.image
            .save_with_format(path.as_ref(), ImageFormat::Png)
            .map_err(|e| Error::Export(format!("{}: {e}", path.as_ref().display())))
    }
}

impl RasterSurface for Canvas {
    type Snapshot = PngSnapshot;

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn draw_line_segment(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, width: f32) {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let radius = width.max(1.0) * 0.5;
        let pad = radius + 1.0;

        // Only scan the segment's padded bounding box, clipped to the canvas.
        let min_x = ((from.x.min(to.x) - pad).floor() as i64).max(0);
        let max_x = ((from.x.max(to.x) + pad).ceil() as i64).min(w as i64 - 1);
        let min_y = ((from.y.min(to.y) - pad).floor() as i64).max(0);
        let max_y = ((from.y.max(to.y) + pad).ceil() as i64).min(h as i64 - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let centre = ScreenPoint::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = distance_to_segment(centre, from, to);
                // One pixel of soft edge around the capsule.
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage.is_nan() || coverage <= 0.0 {
                    continue;
                }
                blend_over(self.image.get_pixel_mut(x as u32, y as u32), color, coverage);
            }
        }
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn serialize(&self) -> Result<PngSnapshot, Error> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| Error::Snapshot(e.to_string()))?;
        Ok(PngSnapshot(bytes))
    }

    fn restore(&mut self, snapshot: &PngSnapshot) -> Result<(), Error> {
        let decoded = image::load_from_memory_with_format(snapshot.as_bytes(), ImageFormat::Png)
            .map_err(|e| Error::Restore(e.to_string()))?
            .into_rgba8();

        // A snapshot taken at another size is stretched over the whole canvas.
        self.image = if decoded.dimensions() == self.image.dimensions() {
            decoded
        } else {
            imageops::resize(&decoded, self.image.width(), self.image.height(), FilterType::Nearest)
        };
        Ok(())
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0 // degenerate segment: distance to the single point
    };
    let (cx, cy) = (a.x + abx * t, a.y + aby * t);
    (p.x - cx).hypot(p.y - cy)
}

/// Source-over with straight alpha: `color` at `coverage` on top of `dst`.
fn blend_over(dst: &mut Rgba<u8>, color: Color, coverage: f32) {
    let da = dst[3] as f32 / 255.0;
    let out_a = coverage + da * (1.0 - coverage);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let mix = |s: u8, d: u8| {
        ((s as f32 * coverage + d as f32 * da * (1.0 - coverage)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}
