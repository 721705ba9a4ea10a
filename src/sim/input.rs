//! Held-key state for steering
//!
//! Physical key codes are mapped onto a closed set of logical controls at the
//! event boundary; the tick only ever sees the boolean array.

/// Logical steering controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
}

impl Control {
    pub const COUNT: usize = 2;

    #[inline]
    fn index(self) -> usize {
        match self {
            Control::Left => 0,
            Control::Right => 1,
        }
    }

    /// Map a `KeyboardEvent.code` to a control (unknown codes are ignored)
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Control::Left),
            "ArrowRight" | "KeyD" => Some(Control::Right),
            _ => None,
        }
    }
}

/// Which controls are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; Control::COUNT],
}

impl InputState {
    pub fn set(&mut self, control: Control, pressed: bool) {
        self.held[control.index()] = pressed;
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held[control.index()]
    }

    /// Apply a raw key event; returns false if the key isn't bound
    pub fn apply_key(&mut self, code: &str, pressed: bool) -> bool {
        match Control::from_key_code(code) {
            Some(control) => {
                self.set(control, pressed);
                true
            }
            None => false,
        }
    }

    /// Release everything (window blur, reset)
    pub fn clear(&mut self) {
        self.held = [false; Control::COUNT];
    }

    /// Net steering direction: -1 left, 1 right, 0 for none or both
    pub fn steer(&self) -> f32 {
        match (self.is_held(Control::Left), self.is_held(Control::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
