// Mouse capability: pointer position, movement and held buttons

use std::collections::HashSet;

use winit::event::MouseButton;

use super::{InputEvent, TargetId};
use crate::core::Vector2;

#[derive(Debug, Clone, PartialEq)]
pub struct MouseController {
    pub enabled: bool,
    target: TargetId,
    position: Vector2,
    velocity: Vector2,
    buttons: HashSet<MouseButton>,
    clicks: u32,
}

impl MouseController {
    pub fn new(target: TargetId) -> Self {
        Self {
            enabled: true,
            target,
            position: Vector2::ZERO,
            velocity: Vector2::ZERO,
            buttons: HashSet::new(),
            clicks: 0,
        }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Movement since the previous pointer event
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn handle(&mut self, event: &InputEvent) -> bool {
        if !self.enabled || !event.is_mouse() {
            return false;
        }
        if let Some(position) = event.position() {
            self.velocity = position - self.position;
            self.position = position;
        }
        match *event {
            InputEvent::MouseDown { button, .. } => {
                self.buttons.insert(button);
            }
            InputEvent::MouseUp { button, .. } => {
                self.buttons.remove(&button);
            }
            InputEvent::Click { .. } => self.clicks += 1,
            _ => {}
        }
        true
    }

    /// Bind to another target, dropping pointer state
    pub fn rebind(self, target: TargetId) -> Self {
        Self {
            enabled: self.enabled,
            ..Self::new(target)
        }
    }
}
