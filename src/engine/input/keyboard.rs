// Keyboard capability: the set of keys currently held

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use super::{InputEvent, TargetId};

#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardController {
    pub enabled: bool,
    target: TargetId,
    pressed: HashSet<KeyCode>,
}

impl KeyboardController {
    /// Create an enabled keyboard bound to `target`
    pub fn new(target: TargetId) -> Self {
        Self {
            enabled: true,
            target,
            pressed: HashSet::new(),
        }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn keys_down(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed.iter().copied()
    }

    /// Update the pressed set; returns true when the event was consumed
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::KeyDown(key) => {
                self.pressed.insert(key);
                true
            }
            InputEvent::KeyUp(key) => {
                self.pressed.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Bind to another target, forgetting held keys
    pub fn rebind(self, target: TargetId) -> Self {
        Self {
            enabled: self.enabled,
            ..Self::new(target)
        }
    }
}
