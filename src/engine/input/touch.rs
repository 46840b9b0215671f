// Touch capability: active touch points by id

use std::collections::HashMap;

use super::{InputEvent, TargetId};
use crate::core::Vector2;

#[derive(Debug, Clone, PartialEq)]
pub struct TouchController {
    pub enabled: bool,
    target: TargetId,
    touches: HashMap<u64, Vector2>,
}

impl TouchController {
    pub fn new(target: TargetId) -> Self {
        Self {
            enabled: true,
            target,
            touches: HashMap::new(),
        }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn touch(&self, id: u64) -> Option<Vector2> {
        self.touches.get(&id).copied()
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn handle(&mut self, event: &InputEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::TouchStart { id, position } | InputEvent::TouchMove { id, position } => {
                self.touches.insert(id, position);
                true
            }
            InputEvent::TouchEnd { id, .. } | InputEvent::TouchCancel { id } => {
                self.touches.remove(&id);
                true
            }
            _ => false,
        }
    }

    pub fn rebind(self, target: TargetId) -> Self {
        Self {
            enabled: self.enabled,
            ..Self::new(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_lifecycle() {
        let mut touch = TouchController::new(TargetId(0));
        touch.handle(&InputEvent::TouchStart {
            id: 1,
            position: Vector2::new(3.0, 3.0),
        });
        touch.handle(&InputEvent::TouchStart {
            id: 2,
            position: Vector2::ZERO,
        });
        touch.handle(&InputEvent::TouchMove {
            id: 1,
            position: Vector2::new(5.0, 3.0),
        });
        assert_eq!(touch.touch(1), Some(Vector2::new(5.0, 3.0)));
        assert_eq!(touch.active_touches(), 2);

        touch.handle(&InputEvent::TouchCancel { id: 2 });
        touch.handle(&InputEvent::TouchEnd {
            id: 1,
            position: Vector2::ZERO,
        });
        assert_eq!(touch.active_touches(), 0);
    }

    #[test]
    fn test_rebind_drops_touches() {
        let mut touch = TouchController::new(TargetId(0));
        touch.handle(&InputEvent::TouchStart {
            id: 9,
            position: Vector2::ONE,
        });
        let touch = touch.rebind(TargetId(1));
        assert_eq!(touch.active_touches(), 0);
    }
}
