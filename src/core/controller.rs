use glam::Vec2;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    MouseMiddle,
    Shift,
    Control,
    Escape,
}

/// Controller - pointer and button state accumulated between frames
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];

    /// Pointer movement in physical pixels since the last reset
    fn pointer_delta(&self) -> Vec2;

    /// Wheel movement in lines since the last reset; positive scrolls away from the user
    fn scroll_delta(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_button_hash() {
        let mut set = HashSet::new();
        set.insert(Button::MouseLeft);
        set.insert(Button::Shift);
        set.insert(Button::MouseLeft);

        assert!(set.contains(&Button::MouseLeft));
        assert!(!set.contains(&Button::MouseRight));
        assert_eq!(set.len(), 2);
    }

    struct MockController {
        pressed: Vec<Button>,
        delta: Vec2,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.pressed
        }

        fn pointer_delta(&self) -> Vec2 {
            self.delta
        }

        fn scroll_delta(&self) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::MouseLeft, Button::Shift],
            delta: Vec2::new(3.0, -1.0),
        };

        assert!(controller.is_down(Button::MouseLeft));
        assert!(controller.is_down(Button::Shift));
        assert!(!controller.is_down(Button::MouseRight));
        assert_eq!(controller.get_down_keys().len(), 2);
        assert_eq!(controller.pointer_delta(), Vec2::new(3.0, -1.0));
    }
}
