// ============================================================================
// input.rs — Sketchbook
// Window events forwarded to demos, and the held-direction bitset used by
// the arcade games.
// ============================================================================

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::{Key, NamedKey};

/// Window events a demo reacts to. Positions are physical pixels with the
/// origin at the top-left corner of the window.
#[derive(Clone, Debug, PartialEq)]
pub enum DemoEvent {
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool, position: Vec2 },
    MouseMoved { position: Vec2 },
    Wheel { delta: f32 },
}

bitflags::bitflags! {
    /// Directions (and fire) currently held down.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Input: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const DOWN = 1 << 2;
        const UP = 1 << 3;
        const FIRE = 1 << 4;
    }
}

impl Input {
    /// Bits controlled by a key: Space fires, arrows and WASD steer.
    pub fn from_key(key: &Key) -> Input {
        match key {
            Key::Named(NamedKey::Space) => Input::FIRE,
            Key::Named(NamedKey::ArrowUp) => Input::UP,
            Key::Named(NamedKey::ArrowDown) => Input::DOWN,
            Key::Named(NamedKey::ArrowLeft) => Input::LEFT,
            Key::Named(NamedKey::ArrowRight) => Input::RIGHT,
            Key::Character(c) => match c.as_str() {
                "w" | "W" => Input::UP,
                "s" | "S" => Input::DOWN,
                "a" | "A" => Input::LEFT,
                "d" | "D" => Input::RIGHT,
                _ => Input::empty(),
            },
            _ => Input::empty(),
        }
    }

    /// Bits controlled by a mouse button: left fires, right thrusts up.
    pub fn from_mouse(button: MouseButton) -> Input {
        match button {
            MouseButton::Left => Input::FIRE,
            MouseButton::Right => Input::UP,
            _ => Input::empty(),
        }
    }

    /// Set or clear the bits an event controls. Returns true if the event
    /// was an input event at all.
    pub fn apply(&mut self, event: &DemoEvent) -> bool {
        let (bits, pressed) = match event {
            DemoEvent::Key { key, pressed } => (Input::from_key(key), *pressed),
            DemoEvent::MouseButton {
                button, pressed, ..
            } => (Input::from_mouse(*button), *pressed),
            _ => return false,
        };
        if bits.is_empty() {
            return false;
        }
        self.set(bits, pressed);
        true
    }

    /// Axis-aligned unit direction. Later checks win: LEFT, RIGHT, UP, DOWN.
    pub fn direction(self) -> Vec2 {
        let mut direction = Vec2::ZERO;
        if self.contains(Input::LEFT) {
            direction = Vec2::NEG_X;
        }
        if self.contains(Input::RIGHT) {
            direction = Vec2::X;
        }
        if self.contains(Input::UP) {
            direction = Vec2::Y;
        }
        if self.contains(Input::DOWN) {
            direction = Vec2::NEG_Y;
        }
        direction
    }
}

/// True if `key` is the named key or the given letter in either case.
pub fn key_is(key: &Key, named: NamedKey, letter: Option<&str>) -> bool {
    match key {
        Key::Named(n) => *n == named,
        Key::Character(c) => letter.is_some_and(|l| c.eq_ignore_ascii_case(l)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn key(name: NamedKey, pressed: bool) -> DemoEvent {
        DemoEvent::Key {
            key: Key::Named(name),
            pressed,
        }
    }

    fn letter(c: &str, pressed: bool) -> DemoEvent {
        DemoEvent::Key {
            key: Key::Character(SmolStr::new(c)),
            pressed,
        }
    }

    #[test]
    fn arrows_and_wasd_share_bits() {
        let mut input = Input::empty();
        assert!(input.apply(&key(NamedKey::ArrowUp, true)));
        assert_eq!(input, Input::UP);

        input.apply(&letter("W", false));
        assert!(input.is_empty());

        input.apply(&letter("a", true));
        input.apply(&key(NamedKey::Space, true));
        assert_eq!(input, Input::LEFT | Input::FIRE);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut input = Input::UP;
        assert!(!input.apply(&letter("x", true)));
        assert!(!input.apply(&key(NamedKey::Enter, true)));
        assert!(!input.apply(&DemoEvent::Wheel { delta: 1.0 }));
        assert_eq!(input, Input::UP);
    }

    #[test]
    fn mouse_buttons_map_to_fire_and_up() {
        let mut input = Input::empty();
        input.apply(&DemoEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
            position: Vec2::ZERO,
        });
        input.apply(&DemoEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
            position: Vec2::ZERO,
        });
        assert_eq!(input, Input::FIRE | Input::UP);

        input.apply(&DemoEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
            position: Vec2::ZERO,
        });
        assert_eq!(input, Input::UP);
    }

    #[test]
    fn direction_priority_prefers_down() {
        assert_eq!(Input::empty().direction(), Vec2::ZERO);
        assert_eq!(Input::LEFT.direction(), Vec2::NEG_X);
        assert_eq!((Input::LEFT | Input::RIGHT).direction(), Vec2::X);
        assert_eq!((Input::RIGHT | Input::UP).direction(), Vec2::Y);
        assert_eq!((Input::UP | Input::DOWN | Input::LEFT).direction(), Vec2::NEG_Y);
        assert_eq!(Input::FIRE.direction(), Vec2::ZERO);
    }

    #[test]
    fn key_is_matches_named_and_letters() {
        assert!(key_is(&Key::Named(NamedKey::ArrowUp), NamedKey::ArrowUp, Some("w")));
        assert!(key_is(&Key::Character(SmolStr::new("W")), NamedKey::ArrowUp, Some("w")));
        assert!(!key_is(&Key::Character(SmolStr::new("q")), NamedKey::ArrowUp, Some("w")));
        assert!(!key_is(&Key::Character(SmolStr::new("w")), NamedKey::ArrowUp, None));
    }
}
