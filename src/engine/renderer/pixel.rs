// Software rasterizer surface backed by an RGBA image

use glam::{Affine2, Vec2};
use image::{Rgba, RgbaImage};

use super::{Color, Surface};
use crate::engine::assets::SpriteImage;

/// Width of stroked outlines in surface units
const STROKE_WIDTH: f32 = 1.0;

/// A CPU drawing surface.
///
/// Rectangles are rasterized by mapping each pixel center back through the
/// inverse of the current transform, so rotated shapes come out right without
/// any polygon clipping.
pub struct PixelSurface {
    image: RgbaImage,
    transform: Affine2,
    fill: Color,
    stroke: Color,
}

#[derive(Clone, Copy)]
enum Paint<'a> {
    Clear,
    Solid(Color),
    Outline(Color),
    Image(&'a RgbaImage),
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            transform: Affine2::IDENTITY,
            fill: Color::BLACK,
            stroke: Color::BLACK,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Color of the pixel at (x, y), if inside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(Color::rgba(r, g, b, a))
    }

    fn paint_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint<'_>) {
        let (min_x, max_x) = (x.min(x + w), x.max(x + w));
        let (min_y, max_y) = (y.min(y + h), y.max(y + h));

        let corners = [
            Vec2::new(min_x, min_y),
            Vec2::new(max_x, min_y),
            Vec2::new(max_x, max_y),
            Vec2::new(min_x, max_y),
        ]
        .map(|c| self.transform.transform_point2(c));

        let lo = corners.iter().fold(Vec2::splat(f32::INFINITY), |acc, c| acc.min(*c));
        let hi = corners
            .iter()
            .fold(Vec2::splat(f32::NEG_INFINITY), |acc, c| acc.max(*c));

        let width = self.image.width() as f32;
        let height = self.image.height() as f32;
        let x0 = lo.x.floor().clamp(0.0, width) as u32;
        let y0 = lo.y.floor().clamp(0.0, height) as u32;
        let x1 = hi.x.ceil().clamp(0.0, width) as u32;
        let y1 = hi.y.ceil().clamp(0.0, height) as u32;

        let inverse = self.transform.inverse();
        let inside = |p: Vec2, inset: f32| {
            p.x >= min_x + inset && p.x < max_x - inset && p.y >= min_y + inset && p.y < max_y - inset
        };

        for py in y0..y1 {
            for px in x0..x1 {
                let local = inverse.transform_point2(Vec2::new(px as f32 + 0.5, py as f32 + 0.5));
                let color = match paint {
                    Paint::Clear if inside(local, 0.0) => Some(Color::TRANSPARENT),
                    Paint::Solid(color) if inside(local, 0.0) => Some(color),
                    // the outline band lies just inside the rectangle
                    Paint::Outline(color)
                        if inside(local, 0.0) && !inside(local, STROKE_WIDTH) =>
                    {
                        Some(color)
                    }
                    Paint::Image(source)
                        if inside(local, 0.0) && source.width() > 0 && source.height() > 0 =>
                    {
                        let u = (local.x - min_x) / (max_x - min_x);
                        let v = (local.y - min_y) / (max_y - min_y);
                        let sx = ((u * source.width() as f32) as u32).min(source.width() - 1);
                        let sy = ((v * source.height() as f32) as u32).min(source.height() - 1);
                        let [r, g, b, a] = source.get_pixel(sx, sy).0;
                        Some(Color::rgba(r, g, b, a))
                    }
                    _ => None,
                };

                if let Some(color) = color {
                    self.write(px, py, color, matches!(paint, Paint::Clear));
                }
            }
        }
    }

    fn write(&mut self, x: u32, y: u32, color: Color, replace: bool) {
        let pixel = self.image.get_pixel_mut(x, y);
        if replace || color.a == 255 {
            *pixel = Rgba(color.to_rgba());
            return;
        }
        *pixel = Rgba(blend_over(color, pixel.0));
    }
}

/// Source-over alpha compositing of `src` onto `dst`
fn blend_over(src: Color, dst: [u8; 4]) -> [u8; 4] {
    let sa = src.a as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mix = |s: u8, d: u8| {
        let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    [
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

impl Surface for PixelSurface {
    fn width(&self) -> f32 {
        self.image.width() as f32
    }

    fn height(&self) -> f32 {
        self.image.height() as f32
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.paint_rect(x, y, w, h, Paint::Clear);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.paint_rect(x, y, w, h, Paint::Solid(self.fill));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.paint_rect(x, y, w, h, Paint::Outline(self.stroke));
    }

    fn draw_image(&mut self, image: &SpriteImage, x: f32, y: f32, w: f32, h: f32) {
        self.paint_rect(x, y, w, h, Paint::Image(image.pixels()));
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.transform = self.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.transform = self.transform * Affine2::from_angle(radians);
    }

    fn snapshot(&self) -> Option<RgbaImage> {
        Some(self.image.clone())
    }
}
