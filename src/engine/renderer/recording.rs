// Surface that records every call instead of drawing

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Affine2, Vec2};

use super::{Color, Surface};
use crate::engine::assets::SpriteImage;

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    SetFillColor(Color),
    SetStrokeColor(Color),
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    StrokeRect { x: f32, y: f32, w: f32, h: f32 },
    DrawImage { source: String, x: f32, y: f32, w: f32, h: f32 },
    Translate { x: f32, y: f32 },
    Rotate(f32),
}

impl DrawCall {
    /// True for calls that put pixels on the surface
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            DrawCall::FillRect { .. } | DrawCall::StrokeRect { .. } | DrawCall::DrawImage { .. }
        )
    }
}

#[derive(Debug)]
struct Recording {
    calls: Vec<DrawCall>,
    transform: Affine2,
}

/// Shared view of what a [`RecordingSurface`] has received.
///
/// The surface itself is usually boxed inside a layer, so tests keep this
/// handle to inspect it afterwards.
#[derive(Debug, Clone)]
pub struct DrawLog {
    inner: Rc<RefCell<Recording>>,
}

impl DrawLog {
    pub fn calls(&self) -> Vec<DrawCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().calls.is_empty()
    }

    /// Forget recorded calls; the transform state is kept
    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// The accumulated translate/rotate state
    pub fn transform(&self) -> Affine2 {
        self.inner.borrow().transform
    }

    /// True when every translate/rotate has been undone
    pub fn transform_is_identity(&self) -> bool {
        self.transform().abs_diff_eq(Affine2::IDENTITY, 1e-3)
    }
}

/// Test and debugging surface that only records
#[derive(Debug)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    log: DrawLog,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> (Self, DrawLog) {
        let log = DrawLog {
            inner: Rc::new(RefCell::new(Recording {
                calls: Vec::new(),
                transform: Affine2::IDENTITY,
            })),
        };
        let surface = Self {
            width,
            height,
            log: log.clone(),
        };
        (surface, log)
    }

    fn record(&mut self, call: DrawCall) {
        self.log.inner.borrow_mut().calls.push(call);
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.record(DrawCall::ClearRect { x, y, w, h });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.record(DrawCall::SetFillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.record(DrawCall::SetStrokeColor(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.record(DrawCall::FillRect { x, y, w, h });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.record(DrawCall::StrokeRect { x, y, w, h });
    }

    fn draw_image(&mut self, image: &SpriteImage, x: f32, y: f32, w: f32, h: f32) {
        self.record(DrawCall::DrawImage {
            source: image.source().to_string(),
            x,
            y,
            w,
            h,
        });
    }

    fn translate(&mut self, x: f32, y: f32) {
        {
            let mut inner = self.log.inner.borrow_mut();
            inner.transform = inner.transform * Affine2::from_translation(Vec2::new(x, y));
        }
        self.record(DrawCall::Translate { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        {
            let mut inner = self.log.inner.borrow_mut();
            inner.transform = inner.transform * Affine2::from_angle(radians);
        }
        self.record(DrawCall::Rotate(radians));
    }
}
