use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Keyboard and focus state of the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,
    keys_down: HashSet<Key>,
}

impl InputState {
    /// Folds `ev` into the held state and records the per-frame delta.
    ///
    /// A press only counts once until the key is released, so auto-repeat
    /// never reaches `keys_pressed`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(focused) => {
                self.focused = focused;
                frame.focus_changed = Some(focused);
                if !focused {
                    // releases are not delivered to an unfocused window
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state: KeyState::Pressed } => {
                if self.keys_down.insert(key) {
                    frame.keys_pressed.insert(key);
                }
            }

            InputEvent::Key { key, state: KeyState::Released } => {
                self.keys_down.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state }
    }

    #[test]
    fn press_is_reported_once_while_held() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        assert!(frame.keys_pressed.contains(&Key::Space));

        // auto-repeat
        frame.clear();
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        assert!(!frame.keys_pressed.contains(&Key::Space));

        state.apply_event(&mut frame, key(Key::Space, KeyState::Released));
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        assert!(frame.keys_pressed.contains(&Key::Space));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, key(Key::C, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.focused);
        assert!(state.keys_down.is_empty());
        assert_eq!(frame.focus_changed, Some(false));

        frame.clear();
        assert!(frame.keys_pressed.is_empty());
        assert_eq!(frame.focus_changed, None);
    }
}
