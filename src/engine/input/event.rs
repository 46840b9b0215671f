// Input events delivered to controllers

use winit::event::{ElementState, KeyEvent, MouseButton, TouchPhase};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::core::Vector2;

/// One input event from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseMove { position: Vector2 },
    MouseDown { button: MouseButton, position: Vector2 },
    MouseUp { button: MouseButton, position: Vector2 },
    Click { button: MouseButton, position: Vector2 },
    TouchStart { id: u64, position: Vector2 },
    TouchMove { id: u64, position: Vector2 },
    TouchEnd { id: u64, position: Vector2 },
    TouchCancel { id: u64 },
}

impl InputEvent {
    /// Translate a winit keyboard event. Key repeats and unidentified keys are dropped.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        Self::from_key(event.physical_key, event.state, event.repeat)
    }

    pub fn from_key(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<Self> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        match state {
            ElementState::Pressed if repeat => None,
            ElementState::Pressed => Some(Self::KeyDown(code)),
            ElementState::Released => Some(Self::KeyUp(code)),
        }
    }

    pub fn from_mouse_button(button: MouseButton, state: ElementState, position: Vector2) -> Self {
        match state {
            ElementState::Pressed => Self::MouseDown { button, position },
            ElementState::Released => Self::MouseUp { button, position },
        }
    }

    pub fn from_touch(id: u64, phase: TouchPhase, position: Vector2) -> Self {
        match phase {
            TouchPhase::Started => Self::TouchStart { id, position },
            TouchPhase::Moved => Self::TouchMove { id, position },
            TouchPhase::Ended => Self::TouchEnd { id, position },
            TouchPhase::Cancelled => Self::TouchCancel { id },
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, Self::KeyDown(_) | Self::KeyUp(_))
    }

    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            Self::MouseMove { .. } | Self::MouseDown { .. } | Self::MouseUp { .. } | Self::Click { .. }
        )
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchStart { .. }
                | Self::TouchMove { .. }
                | Self::TouchEnd { .. }
                | Self::TouchCancel { .. }
        )
    }

    /// Pointer position carried by the event, if any
    pub fn position(&self) -> Option<Vector2> {
        match *self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. }
            | Self::Click { position, .. }
            | Self::TouchStart { position, .. }
            | Self::TouchMove { position, .. }
            | Self::TouchEnd { position, .. } => Some(position),
            _ => None,
        }
    }
}
