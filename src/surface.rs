//! Bitmap surface – an owned pixel buffer with the drawing operations the
//! decode stage needs: background fill, rectangle fill/stroke, image blit,
//! pixel readback, and PNG export.
//!
//! Backed by a tiny-skia `Pixmap`. A 0×0 (or unallocatable) surface is
//! degenerate: it keeps its dimensions but every drawing operation is a
//! no-op, so zero-sized jobs flow through the pipeline without being
//! rejected.

use tiny_skia::{Paint, Pixmap, PixmapPaint, Rect, Stroke, Transform};

use crate::error::RasterError;
use crate::style::Color;

pub struct Surface {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl Surface {
    /// Allocate a surface. Zero dimensions yield a degenerate surface.
    pub fn new(width: u32, height: u32) -> Self {
        let pixmap = if width == 0 || height == 0 {
            None
        } else {
            let pm = Pixmap::new(width, height);
            if pm.is_none() {
                log::warn!("could not allocate {width}x{height} surface; treating as degenerate");
            }
            pm
        };
        Self {
            width,
            height,
            pixmap,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the surface holds no pixels (0×0 job).
    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    /// Flood-fill the whole surface with a color.
    pub fn fill(&mut self, color: Color) {
        if let Some(pm) = &mut self.pixmap {
            pm.fill(to_skia_color(color));
        }
    }

    /// Fill an axis-aligned rectangle. Composites over existing content.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(pm) = &mut self.pixmap else {
            return;
        };
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(to_skia_color(color));
        paint.anti_alias = false;
        pm.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Stroke a rectangle outline centered on its edges.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, color: Color) {
        let Some(pm) = &mut self.pixmap else {
            return;
        };
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let path = tiny_skia::PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color(to_skia_color(color));
        paint.anti_alias = false;
        let stroke = Stroke {
            width: line_width,
            ..Stroke::default()
        };
        pm.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Blit straight-alpha RGBA pixels, scaled to fit the destination
    /// rectangle.
    pub fn blit_rgba(
        &mut self,
        pixels: &[u8],
        src_width: u32,
        src_height: u32,
        dest_x: f32,
        dest_y: f32,
        dest_w: f32,
        dest_h: f32,
    ) {
        let Some(pm) = &mut self.pixmap else {
            return;
        };
        if src_width == 0 || src_height == 0 || dest_w <= 0.0 || dest_h <= 0.0 {
            return;
        }
        if pixels.len() != (src_width * src_height * 4) as usize {
            log::warn!("blit skipped: pixel buffer length does not match dimensions");
            return;
        }

        // tiny-skia stores premultiplied alpha.
        let mut premul = Vec::with_capacity(pixels.len());
        for px in pixels.chunks_exact(4) {
            let a = px[3] as u32;
            premul.push(((px[0] as u32 * a) / 255) as u8);
            premul.push(((px[1] as u32 * a) / 255) as u8);
            premul.push(((px[2] as u32 * a) / 255) as u8);
            premul.push(px[3]);
        }
        let Some(size) = tiny_skia::IntSize::from_wh(src_width, src_height) else {
            return;
        };
        let Some(src) = Pixmap::from_vec(premul, size) else {
            return;
        };

        let sx = dest_w / src_width as f32;
        let sy = dest_h / src_height as f32;
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, dest_x, dest_y);
        pm.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &PixmapPaint::default(),
            transform,
            None,
        );
    }

    /// Read back one pixel as straight-alpha RGBA. `None` when out of
    /// bounds or the surface is degenerate.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pm = self.pixmap.as_ref()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let data = pm.data();
        let px = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];

        // Convert premultiplied to straight alpha.
        let a = px[3];
        if a == 0 {
            Some([0, 0, 0, 0])
        } else if a == 255 {
            Some(px)
        } else {
            let alpha_f = a as f32 / 255.0;
            Some([
                (px[0] as f32 / alpha_f).min(255.0) as u8,
                (px[1] as f32 / alpha_f).min(255.0) as u8,
                (px[2] as f32 / alpha_f).min(255.0) as u8,
                a,
            ])
        }
    }

    /// Straight-alpha RGB bytes (alpha dropped) for JPEG encoding.
    pub fn to_rgb8(&self) -> Option<Vec<u8>> {
        self.pixmap.as_ref()?;
        let mut out = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let px = self.pixel(x, y)?;
                out.extend_from_slice(&px[..3]);
            }
        }
        Some(out)
    }

    /// Encode the surface as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, RasterError> {
        let pm = self.pixmap.as_ref().ok_or(RasterError::EmptySurface)?;
        pm.encode_png()
            .map_err(|e| RasterError::PngEncode(e.to_string()))
    }
}

fn to_skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        c.r.clamp(0.0, 1.0),
        c.g.clamp(0.0, 1.0),
        c.b.clamp(0.0, 1.0),
        c.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::BLACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_every_pixel() {
        let mut s = Surface::new(4, 4);
        s.fill(Color::WHITE);
        assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(3, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn fill_rect_composites_over_background() {
        let mut s = Surface::new(4, 4);
        s.fill(Color::WHITE);
        let red = crate::style::parse_color("#ff0000").unwrap();
        s.fill_rect(0.0, 0.0, 2.0, 2.0, red);
        assert_eq!(s.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(3, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn semi_transparent_fill_blends() {
        let mut s = Surface::new(2, 2);
        s.fill(Color::WHITE);
        let half_red = crate::style::parse_color("rgba(255, 0, 0, 0.5)").unwrap();
        s.fill_rect(0.0, 0.0, 2.0, 2.0, half_red);
        let px = s.pixel(0, 0).unwrap();
        assert_eq!(px[3], 255);
        assert!(px[0] > 200, "red should dominate: {px:?}");
        assert!(px[1] > 100 && px[1] < 160, "green half-faded: {px:?}");
    }

    #[test]
    fn degenerate_surface_is_noop() {
        let mut s = Surface::new(0, 0);
        assert!(s.is_empty());
        s.fill(Color::WHITE);
        s.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);
        assert_eq!(s.pixel(0, 0), None);
        assert!(s.to_png().is_err());
        assert!(s.to_rgb8().is_none());
    }

    #[test]
    fn blit_scales_to_destination() {
        let mut s = Surface::new(4, 4);
        s.fill(Color::WHITE);
        // 1×1 opaque blue source scaled to 4×4.
        s.blit_rgba(&[0, 0, 255, 255], 1, 1, 0.0, 0.0, 4.0, 4.0);
        assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(s.pixel(3, 3), Some([0, 0, 255, 255]));
    }
}
