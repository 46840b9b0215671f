// Drawing surfaces
//
// The engine never talks to a graphics API directly. Layers draw through the
// `Surface` trait, which mirrors a 2D canvas context: clear, fill, stroke,
// image blit and a translate/rotate transform stack.

mod color;
mod pixel;
mod present;
mod recording;

pub use color::Color;
pub use pixel::PixelSurface;
pub use present::{PresentError, Presenter};
pub use recording::{DrawCall, DrawLog, RecordingSurface};

use image::RgbaImage;

use crate::engine::assets::SpriteImage;

/// A 2D drawing target owned by one layer.
///
/// Every `translate`/`rotate` an entity issues during its draw phase is undone
/// by an equal and opposite call before the phase returns.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn draw_image(&mut self, image: &SpriteImage, x: f32, y: f32, w: f32, h: f32);

    fn translate(&mut self, x: f32, y: f32);

    /// Rotate the transform stack (radians, clockwise on screen)
    fn rotate(&mut self, radians: f32);

    /// Wipe the whole surface
    fn clear(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.clear_rect(0.0, 0.0, w, h);
    }

    /// Current contents, for surfaces that keep pixels
    fn snapshot(&self) -> Option<RgbaImage> {
        None
    }
}
