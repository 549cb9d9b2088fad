//! Input events the host forwards to the view.
//!
//! These are deliberately small: the host translates its platform events into
//! [`KeyPress`] and [`MouseEvent`] and passes them to
//! [`MainWindow::key_press`](crate::MainWindow::key_press) and
//! [`MainWindow::mouse_event`](crate::MainWindow::mouse_event).

use horizon_dataview_core::Point;

/// Keys the view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Space,
    Tab,
    Escape,
    F2,
    /// Any other printable character.
    Char(char),
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub ctrl: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// What happened with the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    DoubleClick(MouseButton),
    Move,
    /// The pointer left the view.
    Leave,
}

/// A mouse event in view coordinates (scroll offset not applied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub position: Point,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, position: impl Into<Point>) -> Self {
        Self {
            kind,
            position: position.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn press(button: MouseButton, position: impl Into<Point>) -> Self {
        Self::new(MouseEventKind::Press(button), position)
    }

    pub fn release(button: MouseButton, position: impl Into<Point>) -> Self {
        Self::new(MouseEventKind::Release(button), position)
    }

    pub fn double_click(button: MouseButton, position: impl Into<Point>) -> Self {
        Self::new(MouseEventKind::DoubleClick(button), position)
    }

    pub fn moved(position: impl Into<Point>) -> Self {
        Self::new(MouseEventKind::Move, position)
    }

    pub fn leave() -> Self {
        Self::new(MouseEventKind::Leave, Point::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers() {
        assert!(Modifiers::NONE.none());
        assert!(Modifiers::SHIFT.any());
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }

    #[test]
    fn test_mouse_event_constructors() {
        let event = MouseEvent::press(MouseButton::Left, (3.0, 4.0)).with_modifiers(Modifiers::CTRL);
        assert_eq!(event.kind, MouseEventKind::Press(MouseButton::Left));
        assert_eq!(event.position, Point::new(3.0, 4.0));
        assert!(event.modifiers.ctrl);
        assert_eq!(KeyPress::from(Key::F2).modifiers, Modifiers::NONE);
    }
}
