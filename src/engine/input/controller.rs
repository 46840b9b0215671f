// Input capabilities attached to entities

use super::{InputEvent, KeyboardController, MouseController, TouchController};

/// Identifies the window or surface a controller listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetId(pub u64);

impl From<winit::window::WindowId> for TargetId {
    fn from(id: winit::window::WindowId) -> Self {
        Self(u64::from(id))
    }
}

/// Which kind of device a controller represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    Keyboard,
    Mouse,
    Touch,
}

/// An input capability bound to one target.
///
/// Entities hold a list of these and query them by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    Keyboard(KeyboardController),
    Mouse(MouseController),
    Touch(TouchController),
}

impl Controller {
    pub fn keyboard(target: TargetId) -> Self {
        Self::Keyboard(KeyboardController::new(target))
    }

    pub fn mouse(target: TargetId) -> Self {
        Self::Mouse(MouseController::new(target))
    }

    pub fn touch(target: TargetId) -> Self {
        Self::Touch(TouchController::new(target))
    }

    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::Keyboard(_) => ControllerKind::Keyboard,
            Self::Mouse(_) => ControllerKind::Mouse,
            Self::Touch(_) => ControllerKind::Touch,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Self::Keyboard(c) => c.enabled,
            Self::Mouse(c) => c.enabled,
            Self::Touch(c) => c.enabled,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Self::Keyboard(c) => c.enabled = enabled,
            Self::Mouse(c) => c.enabled = enabled,
            Self::Touch(c) => c.enabled = enabled,
        }
    }

    pub fn target(&self) -> TargetId {
        match self {
            Self::Keyboard(c) => c.target(),
            Self::Mouse(c) => c.target(),
            Self::Touch(c) => c.target(),
        }
    }

    /// Feed an event addressed to `target`; returns true when consumed
    pub fn handle(&mut self, target: TargetId, event: &InputEvent) -> bool {
        if target != self.target() {
            return false;
        }
        match self {
            Self::Keyboard(c) => c.handle(event),
            Self::Mouse(c) => c.handle(event),
            Self::Touch(c) => c.handle(event),
        }
    }

    /// Unbind from the current target and bind to `target`
    pub fn rebind(self, target: TargetId) -> Self {
        log::debug!(
            "Rebinding {:?} controller from {:?} to {:?}",
            self.kind(),
            self.target(),
            target
        );
        match self {
            Self::Keyboard(c) => Self::Keyboard(c.rebind(target)),
            Self::Mouse(c) => Self::Mouse(c.rebind(target)),
            Self::Touch(c) => Self::Touch(c.rebind(target)),
        }
    }

    pub fn as_keyboard(&self) -> Option<&KeyboardController> {
        match self {
            Self::Keyboard(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_mouse(&self) -> Option<&MouseController> {
        match self {
            Self::Mouse(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_touch(&self) -> Option<&TouchController> {
        match self {
            Self::Touch(c) => Some(c),
            _ => None,
        }
    }
}
