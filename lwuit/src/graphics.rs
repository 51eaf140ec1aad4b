//! Offscreen drawing target.
//!
//! [`Graphics`] draws into a borrowed [`RgbaImage`] with a translation and a
//! clip, the two pieces of state transitions and surfaces rely on. All
//! drawing is clipped to the image as well as the clip rectangle.

use image::{Rgba, RgbaImage};

use crate::primitives::{Color, Point, Rect};

/// Translation and clip, saved and restored around nested painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsState {
    translation: Point,
    clip: Rect,
}

pub struct Graphics<'a> {
    target: &'a mut RgbaImage,
    translation: Point,
    /// Device coordinates.
    clip: Rect,
}

impl<'a> Graphics<'a> {
    pub fn new(target: &'a mut RgbaImage) -> Self {
        let clip = image_rect(target);
        Self {
            target,
            translation: Point::ORIGIN,
            clip,
        }
    }

    pub fn width(&self) -> i32 {
        self.target.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.target.height() as i32
    }

    pub fn image(&self) -> &RgbaImage {
        &*self.target
    }

    /// Shift the origin for subsequent drawing.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.translation = self.translation + Point::new(dx, dy);
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    /// The clip in the current (translated) coordinates.
    pub fn clip(&self) -> Rect {
        self.clip.translate(Point::ORIGIN - self.translation)
    }

    /// Replace the clip. `rect` is in translated coordinates.
    pub fn set_clip(&mut self, rect: Rect) {
        let device = rect.translate(self.translation);
        self.clip = device
            .intersection(&image_rect(self.target))
            .unwrap_or(Rect::ZERO);
    }

    /// Narrow the clip to its intersection with `rect`.
    pub fn clip_rect(&mut self, rect: Rect) {
        let device = rect.translate(self.translation);
        self.clip = self.clip.intersection(&device).unwrap_or(Rect::ZERO);
    }

    pub fn save(&self) -> GraphicsState {
        GraphicsState {
            translation: self.translation,
            clip: self.clip,
        }
    }

    pub fn restore(&mut self, state: GraphicsState) {
        self.translation = state.translation;
        self.clip = state.clip;
    }

    /// Device-space pixels of `rect` that survive the clip.
    fn visible(&self, rect: Rect) -> Option<Rect> {
        rect.translate(self.translation).intersection(&self.clip)
    }

    /// Fill with a color, blending when it is translucent.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(area) = self.visible(rect) else {
            return;
        };
        let src = color.to_pixel();
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let dst = self.target.get_pixel_mut(x as u32, y as u32);
                *dst = if color.a == u8::MAX { src } else { blend(*dst, src, u8::MAX) };
            }
        }
    }

    /// Draw an image with its top-left corner at `at`.
    pub fn draw_image(&mut self, image: &RgbaImage, at: Point) {
        self.draw_image_alpha(image, at, u8::MAX);
    }

    /// Draw an image with extra opacity applied to every pixel.
    pub fn draw_image_alpha(&mut self, image: &RgbaImage, at: Point, alpha: u8) {
        self.draw_image_region(image, image_rect(image), at, alpha);
    }

    /// Draw the `region` of `image` (in image pixels) with its top-left
    /// corner at `at`.
    pub fn draw_image_region(&mut self, image: &RgbaImage, region: Rect, at: Point, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let Some(clipped) = region.intersection(&image_rect(image)) else {
            return;
        };
        // Pixels of `region` outside the image still take up space.
        let at = at + (clipped.origin() - region.origin());
        let region = clipped;
        let Some(area) = self.visible(Rect::from_origin_size(at, region.size())) else {
            return;
        };
        // Device origin of the region's top-left pixel.
        let origin = at + self.translation;
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let sx = (region.x + x - origin.x) as u32;
                let sy = (region.y + y - origin.y) as u32;
                let src = *image.get_pixel(sx, sy);
                let dst = self.target.get_pixel_mut(x as u32, y as u32);
                *dst = if alpha == u8::MAX && src.0[3] == u8::MAX {
                    src
                } else {
                    blend(*dst, src, alpha)
                };
            }
        }
    }
}

impl std::fmt::Debug for Graphics<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graphics")
            .field("size", &(self.target.width(), self.target.height()))
            .field("translation", &self.translation)
            .field("clip", &self.clip)
            .finish()
    }
}

fn image_rect(image: &RgbaImage) -> Rect {
    Rect::new(0, 0, image.width() as i32, image.height() as i32)
}

/// Source-over blend of `src`, scaled by `alpha`, onto `dst`.
pub fn blend(dst: Rgba<u8>, src: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = u32::from(src.0[3]) * u32::from(alpha) / 255;
    let inv = 255 - a;
    let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * inv) / 255) as u8;
    Rgba([
        mix(src.0[0], dst.0[0]),
        mix(src.0[1], dst.0[1]),
        mix(src.0[2], dst.0[2]),
        (a + u32::from(dst.0[3]) * inv / 255) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &RgbaImage, x: u32, y: u32) -> Color {
        Color::from_pixel(*image.get_pixel(x, y))
    }

    #[test]
    fn test_fill_respects_translation_and_clip() {
        let mut image = RgbaImage::new(10, 10);
        let mut g = Graphics::new(&mut image);
        g.translate(2, 2);
        g.set_clip(Rect::new(0, 0, 3, 3));
        g.fill_rect(Rect::new(-5, -5, 50, 50), Color::RED);

        assert_eq!(pixel(&image, 2, 2), Color::RED);
        assert_eq!(pixel(&image, 4, 4), Color::RED);
        assert_eq!(pixel(&image, 5, 5), Color::TRANSPARENT);
        assert_eq!(pixel(&image, 1, 1), Color::TRANSPARENT);
    }

    #[test]
    fn test_save_and_restore() {
        let mut image = RgbaImage::new(4, 4);
        let mut g = Graphics::new(&mut image);
        let state = g.save();
        g.translate(1, 1);
        g.clip_rect(Rect::new(0, 0, 1, 1));
        assert_eq!(g.clip(), Rect::new(0, 0, 1, 1));
        g.restore(state);
        assert_eq!(g.clip(), Rect::new(0, 0, 4, 4));
        assert_eq!(g.translation(), Point::ORIGIN);
    }

    #[test]
    fn test_draw_image_clips_at_edges() {
        let src = RgbaImage::from_pixel(4, 4, Color::BLUE.to_pixel());
        let mut image = RgbaImage::from_pixel(6, 6, Color::WHITE.to_pixel());
        Graphics::new(&mut image).draw_image(&src, Point::new(4, -2));

        assert_eq!(pixel(&image, 5, 0), Color::BLUE);
        assert_eq!(pixel(&image, 5, 1), Color::BLUE);
        assert_eq!(pixel(&image, 5, 2), Color::WHITE);
        assert_eq!(pixel(&image, 3, 0), Color::WHITE);
    }

    #[test]
    fn test_region_outside_image_keeps_its_offset() {
        let mut src = RgbaImage::from_pixel(4, 4, Color::BLUE.to_pixel());
        src.put_pixel(0, 0, Color::RED.to_pixel());
        let mut image = RgbaImage::from_pixel(6, 6, Color::WHITE.to_pixel());
        // Only the image's top-left 2x2 falls in the region, two pixels in.
        let region = Rect::new(-2, -2, 4, 4);
        Graphics::new(&mut image).draw_image_region(&src, region, Point::new(0, 0), 255);

        assert_eq!(pixel(&image, 1, 1), Color::WHITE);
        assert_eq!(pixel(&image, 2, 2), Color::RED);
        assert_eq!(pixel(&image, 3, 3), Color::BLUE);
        assert_eq!(pixel(&image, 4, 4), Color::WHITE);
    }

    #[test]
    fn test_alpha_blend() {
        let black = Color::BLACK.to_pixel();
        let white = Color::WHITE.to_pixel();
        assert_eq!(blend(black, white, 0), black);
        assert_eq!(blend(black, white, 255), white);

        let half = Color::from_pixel(blend(black, white, 128));
        assert_eq!(half.r, 128);
        assert_eq!(half.a, 255);
    }
}
