//! CPU framebuffer and the two primitives the scene needs.
//!
//! Balls are drawn as filled discs rasterized directly into an RGBA pixel
//! buffer; the buffer is later uploaded to a GPU texture as a whole.

use crate::ball::Rgba;

/// Row-major RGBA pixel buffer with a top-left origin.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::default(); width as usize * height as usize],
        }
    }

    /// Change the size. Existing contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgba::default());
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Fill the disc of radius `r` centered on `(cx, cy)`.
    ///
    /// Covers every `(cx + dx, cy + dy)` with `dx, dy` in `(-r, r]` and
    /// `dx² + dy² <= r²`. Each row of the disc is written as one span.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgba) {
        if r <= 0 {
            return;
        }
        let r_sq = r as i64 * r as i64;
        for dy in (-r + 1)..=r {
            let y = cy + dy;
            if y < 0 || y >= self.height as i32 {
                continue;
            }
            let remaining = r_sq - dy as i64 * dy as i64;
            let half = isqrt(remaining) as i32;
            // dx is bounded below by -r + 1 as well.
            let x0 = cx + (-half).max(-r + 1);
            let x1 = cx + half;
            self.fill_span(y, x0, x1, color);
        }
    }

    /// Draw a one pixel outline around `x..x + w`, `y..y + h`.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        if w <= 0 || h <= 0 {
            return;
        }
        let right = x + w - 1;
        let bottom = y + h - 1;
        self.fill_span(y, x, right, color);
        self.fill_span(bottom, x, right, color);
        for row in y..=bottom {
            self.put_pixel(x, row, color);
            self.put_pixel(right, row, color);
        }
    }

    /// Raw bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Fill `x0..=x1` on row `y`, clipped to the canvas.
    fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Rgba) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i32 - 1);
        if x0 > x1 {
            return;
        }
        let row = y as usize * self.width as usize;
        self.pixels[row + x0 as usize..=row + x1 as usize].fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

/// Largest `s` with `s * s <= n`.
fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut s = (n as f64).sqrt() as i64;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}
