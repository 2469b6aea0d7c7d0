//! Pixel bitmaps and the compositing primitives the layout stages use.
//!
//! A [`Bitmap`] is a row-major grid of [`Rgba`] pixels. Tokens, lines and the
//! layout buffer's destination image are all bitmaps; they are combined with
//! [`Bitmap::blit`] (alpha "over" compositing) and [`Bitmap::copy_region`]
//! (direct replacement).

use crate::color::Rgba;
use crate::geometry::Rect;

/// A 2D pixel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    /// Create a new bitmap filled with transparent black.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Create a new bitmap filled with `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let size = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            pixels: vec![color; size],
        }
    }

    /// Get bitmap dimensions.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bounding rectangle anchored at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }

    /// Compute pixel index with overflow protection.
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row_offset = (y as usize).checked_mul(self.width as usize)?;
        let idx = row_offset.checked_add(x as usize)?;
        (idx < self.pixels.len()).then_some(idx)
    }

    /// Get pixel at (x, y).
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixel_index(x, y).map(|idx| self.pixels[idx])
    }

    /// Set pixel at (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(idx) = self.pixel_index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Fill entire bitmap with a color.
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fill the part of `rect` that overlaps the bitmap.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some(area) = rect.intersect(&self.bounds()) else {
            return;
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x as u32, y as u32, color);
            }
        }
    }

    /// Composite `src` over this bitmap with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside this bitmap are clipped.
    pub fn blit(&mut self, src: &Bitmap, x: i32, y: i32) {
        self.blit_region(src, src.bounds(), x, y);
    }

    /// Composite the `area` of `src` over this bitmap at `(x, y)`.
    pub fn blit_region(&mut self, src: &Bitmap, area: Rect, x: i32, y: i32) {
        self.transfer(src, area, x, y, Rgba::blend_over);
    }

    /// Copy the `area` of `src` into this bitmap at `(x, y)`, replacing pixels.
    pub fn copy_region(&mut self, src: &Bitmap, area: Rect, x: i32, y: i32) {
        self.transfer(src, area, x, y, |top, _| top);
    }

    fn transfer(
        &mut self,
        src: &Bitmap,
        area: Rect,
        x: i32,
        y: i32,
        combine: impl Fn(Rgba, Rgba) -> Rgba,
    ) {
        let Some(area) = area.intersect(&src.bounds()) else {
            return;
        };
        for sy in area.y..area.bottom() {
            let dy = y + (sy - area.y);
            if dy < 0 {
                continue;
            }
            for sx in area.x..area.right() {
                let dx = x + (sx - area.x);
                if dx < 0 {
                    continue;
                }
                let (dx, dy) = (dx as u32, dy as u32);
                let Some(idx) = self.pixel_index(dx, dy) else {
                    continue;
                };
                if let Some(top) = src.get(sx as u32, sy as u32) {
                    self.pixels[idx] = combine(top, self.pixels[idx]);
                }
            }
        }
    }

    /// Return a copy resampled to `width` x `height` (nearest neighbour).
    #[must_use]
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(height)) as u32;
            for x in 0..width {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(width)) as u32;
                if let Some(color) = self.get(sx, sy) {
                    out.set(x, y, color);
                }
            }
        }
        out
    }

    /// Shift the contents up by `amount` rows, filling the vacated rows.
    pub fn scroll_up(&mut self, amount: u32, fill: Rgba) {
        let amount = amount.min(self.height) as usize;
        let row = self.width as usize;
        self.pixels.rotate_left(amount * row);
        let keep = self.pixels.len() - amount * row;
        self.pixels[keep..].fill(fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_creation() {
        let bmp = Bitmap::new(10, 4);
        assert_eq!(bmp.size(), (10, 4));
        assert_eq!(bmp.get(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(bmp.get(10, 0), None);
    }

    #[test]
    fn test_bitmap_get_set() {
        let mut bmp = Bitmap::new(10, 10);
        bmp.set(5, 5, Rgba::RED);
        assert_eq!(bmp.get(5, 5), Some(Rgba::RED));
        bmp.set(50, 50, Rgba::RED);
    }

    #[test]
    fn test_blit_offsets_and_clips() {
        let mut dest = Bitmap::filled(4, 4, Rgba::BLACK);
        let src = Bitmap::filled(2, 2, Rgba::WHITE);
        dest.blit(&src, 3, 3);
        assert_eq!(dest.get(3, 3), Some(Rgba::WHITE));
        assert_eq!(dest.get(2, 2), Some(Rgba::BLACK));

        dest.blit(&src, -1, -1);
        assert_eq!(dest.get(0, 0), Some(Rgba::WHITE));
        assert_eq!(dest.get(1, 1), Some(Rgba::BLACK));
    }

    #[test]
    fn test_blit_transparent_keeps_destination() {
        let mut dest = Bitmap::filled(2, 2, Rgba::BLUE);
        dest.blit(&Bitmap::new(2, 2), 0, 0);
        assert_eq!(dest.get(1, 1), Some(Rgba::BLUE));
    }

    #[test]
    fn test_copy_region_replaces() {
        let mut dest = Bitmap::filled(4, 4, Rgba::BLUE);
        let src = Bitmap::new(4, 4);
        dest.copy_region(&src, Rect::new(1, 1, 2, 2), 1, 1);
        assert_eq!(dest.get(1, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(dest.get(0, 0), Some(Rgba::BLUE));
        assert_eq!(dest.get(3, 3), Some(Rgba::BLUE));
    }

    #[test]
    fn test_scaled_dimensions() {
        let mut src = Bitmap::new(2, 1);
        src.set(0, 0, Rgba::RED);
        src.set(1, 0, Rgba::GREEN);
        let out = src.scaled(6, 2);
        assert_eq!(out.size(), (6, 2));
        assert_eq!(out.get(0, 1), Some(Rgba::RED));
        assert_eq!(out.get(2, 0), Some(Rgba::RED));
        assert_eq!(out.get(3, 0), Some(Rgba::GREEN));
        assert_eq!(out.get(5, 1), Some(Rgba::GREEN));
    }

    #[test]
    fn test_scaled_from_empty() {
        let out = Bitmap::new(0, 3).scaled(5, 3);
        assert_eq!(out.size(), (5, 3));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut bmp = Bitmap::new(3, 3);
        bmp.fill_rect(Rect::new(2, 2, 5, 5), Rgba::RED);
        assert_eq!(bmp.get(2, 2), Some(Rgba::RED));
        assert_eq!(bmp.get(1, 1), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_scroll_up() {
        let mut bmp = Bitmap::new(1, 3);
        bmp.set(0, 2, Rgba::RED);
        bmp.scroll_up(2, Rgba::BLACK);
        assert_eq!(bmp.get(0, 0), Some(Rgba::RED));
        assert_eq!(bmp.get(0, 1), Some(Rgba::BLACK));
        assert_eq!(bmp.get(0, 2), Some(Rgba::BLACK));
    }
}
