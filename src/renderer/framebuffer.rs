//! Software RGBA canvas
//!
//! The whole scene is rasterized on the CPU at the logical resolution, then
//! uploaded once per frame. Rect coordinates are fractional like a 2D canvas
//! API; edges snap to the nearest pixel boundary and everything is clipped.

use super::font::{GLYPH_H, GLYPH_W, glyph_advance, glyph_rows};

pub type Rgba = [u8; 4];

/// Opaque color from 0xRRGGBB
pub const fn rgb(hex: u32) -> Rgba {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Tightly packed RGBA8 rows, ready for a texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.pixels[idx] = color;
    }

    /// Snap `[start, start + len)` to pixel indices clipped to `[0, limit)`
    fn span(start: f32, len: f32, limit: u32) -> Option<(usize, usize)> {
        // f32::max/min would swallow a NaN and light whole rows
        if !start.is_finite() || !len.is_finite() {
            return None;
        }
        let lo = start.round().max(0.0);
        let hi = (start + len).round().min(limit as f32);
        if !(lo < hi) {
            return None;
        }
        Some((lo as usize, hi as usize))
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(x, w, self.width),
            Self::span(y, h, self.height),
        ) else {
            return;
        };
        let stride = self.width as usize;
        for row in y0..y1 {
            self.pixels[row * stride + x0..row * stride + x1].fill(color);
        }
    }

    /// Alpha-blend `color` over the existing pixels
    pub fn blend_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba, alpha: u8) {
        match alpha {
            0 => return,
            255 => return self.fill_rect(x, y, w, h, color),
            _ => {}
        }
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(x, w, self.width),
            Self::span(y, h, self.height),
        ) else {
            return;
        };

        let a = u32::from(alpha);
        let inv = 255 - a;
        let stride = self.width as usize;
        for row in y0..y1 {
            for px in &mut self.pixels[row * stride + x0..row * stride + x1] {
                for c in 0..3 {
                    px[c] = ((u32::from(px[c]) * inv + u32::from(color[c]) * a + 127) / 255) as u8;
                }
                px[3] = 255;
            }
        }
    }

    /// Draw text with the built-in block font, top-left at (x, y)
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgba, scale: u32) {
        let scale = scale.max(1) as i32;
        let mut cursor = x;
        for ch in text.chars() {
            if let Some(rows) = glyph_rows(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_W {
                        if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                            continue;
                        }
                        let px = cursor + col as i32 * scale;
                        let py = y + row as i32 * scale;
                        for dy in 0..scale {
                            for dx in 0..scale {
                                self.set_pixel(px + dx, py + dy, color);
                            }
                        }
                    }
                }
            }
            cursor += glyph_advance(scale as u32) as i32;
        }
    }
}

/// Width in pixels of `text` drawn at `scale` (no trailing spacing)
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    (n - 1) * glyph_advance(scale) + GLYPH_W * scale.max(1)
}

/// Height in pixels of one text line at `scale`
pub fn text_height(scale: u32) -> u32 {
    GLYPH_H * scale.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = rgb(0xff0000);

    #[test]
    fn test_rgb_unpacks_channels() {
        assert_eq!(rgb(0x2a2e52), [0x2a, 0x2e, 0x52, 255]);
    }

    #[test]
    fn test_fill_rect_clips_to_canvas() {
        let mut fb = Framebuffer::new(8, 4);
        fb.fill_rect(-3.0, 2.0, 5.0, 10.0, RED);
        assert_eq!(fb.pixel(0, 2), Some(RED));
        assert_eq!(fb.pixel(1, 3), Some(RED));
        assert_eq!(fb.pixel(2, 3), Some([0, 0, 0, 255]));
        assert_eq!(fb.pixel(0, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_fractional_one_pixel_line() {
        let mut fb = Framebuffer::new(8, 1);
        // a 1px line centered on x = 4.2 covers exactly one column
        fb.fill_rect(4.2 - 0.5, 0.0, 1.0, 1.0, RED);
        let lit: Vec<_> = (0..8).filter(|&x| fb.pixel(x, 0) == Some(RED)).collect();
        assert_eq!(lit, vec![4]);
    }

    #[test]
    fn test_degenerate_rects_draw_nothing() {
        let mut fb = Framebuffer::new(4, 4);
        let before = fb.clone();
        fb.fill_rect(1.0, 1.0, 0.0, 2.0, RED);
        fb.fill_rect(10.0, 1.0, 2.0, 2.0, RED);
        fb.fill_rect(f32::NAN, 1.0, 2.0, 2.0, RED);
        assert_eq!(fb, before);
    }

    #[test]
    fn test_non_finite_rects_draw_nothing() {
        let mut fb = Framebuffer::new(4, 4);
        let before = fb.clone();
        fb.fill_rect(0.0, f32::NAN, 2.0, 2.0, RED);
        fb.fill_rect(0.0, 0.0, f32::INFINITY, 2.0, RED);
        fb.fill_rect(f32::NEG_INFINITY, 0.0, f32::INFINITY, 4.0, RED);
        fb.blend_rect(f32::NAN, 0.0, 4.0, 4.0, RED, 128);
        assert_eq!(fb, before);
    }

    #[test]
    fn test_blend_rect_mixes() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(rgb(0xffffff));
        fb.blend_rect(0.0, 0.0, 2.0, 2.0, rgb(0x000000), 153);
        assert_eq!(fb.pixel(1, 1), Some([102, 102, 102, 255]));
    }

    #[test]
    fn test_text_metrics() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 3);
        assert_eq!(text_width("AB", 2), 14);
        assert_eq!(text_height(2), 10);
    }

    #[test]
    fn test_draw_text_sets_glyph_pixels() {
        let mut fb = Framebuffer::new(16, 8);
        fb.draw_text(0, 0, "1", RED, 1);
        // '1' has its stem in the middle column on every row
        for y in 0..5 {
            assert_eq!(fb.pixel(1, y), Some(RED));
        }
        assert_eq!(fb.as_bytes().len(), 16 * 8 * 4);
    }
}
