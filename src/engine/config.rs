// Engine-wide defaults

use super::physics::{AccelerationMode, PhysicsBody};
use super::renderer::Color;

pub const DEFAULT_LAYER_WIDTH: u32 = 640;
pub const DEFAULT_LAYER_HEIGHT: u32 = 480;

/// Fill color of entities drawn without a sprite
pub const DEFAULT_ENTITY_COLOR: Color = Color::rgb(0xff, 0xba, 0xd2);
pub const DEFAULT_STROKE_COLOR: Color = Color::BLACK;

/// Extra border cleared around a moving body before it is redrawn
pub const DEFAULT_CLEAR_MARGIN: f32 = 5.0;

/// Keyboard movement speed in units per frame
pub const DEFAULT_MOVEMENT_SPEED: f32 = 4.0;

/// Tunables shared by layers and scenes
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub layer_width: u32,
    pub layer_height: u32,
    pub entity_color: Color,
    pub stroke_color: Color,
    pub clear_margin: f32,
    pub movement_speed: f32,
    pub acceleration_mode: AccelerationMode,
}

impl EngineConfig {
    pub fn with_layer_size(mut self, width: u32, height: u32) -> Self {
        self.layer_width = width;
        self.layer_height = height;
        self
    }

    pub fn with_entity_color(mut self, color: Color) -> Self {
        self.entity_color = color;
        self
    }

    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn with_clear_margin(mut self, margin: f32) -> Self {
        self.clear_margin = margin;
        self
    }

    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_acceleration_mode(mut self, mode: AccelerationMode) -> Self {
        self.acceleration_mode = mode;
        self
    }

    /// A unit-mass body following the configured acceleration policy
    pub fn body(&self) -> PhysicsBody {
        PhysicsBody::default().with_mode(self.acceleration_mode)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layer_width: DEFAULT_LAYER_WIDTH,
            layer_height: DEFAULT_LAYER_HEIGHT,
            entity_color: DEFAULT_ENTITY_COLOR,
            stroke_color: DEFAULT_STROKE_COLOR,
            clear_margin: DEFAULT_CLEAR_MARGIN,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            acceleration_mode: AccelerationMode::default(),
        }
    }
}
