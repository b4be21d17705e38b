use std::collections::HashSet;

use super::types::Key;

/// Input collected since the previous frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys that went down this frame. Repeats are not included.
    pub keys_pressed: HashSet<Key>,

    /// Last focus change seen this frame.
    pub focus_changed: Option<bool>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.focus_changed = None;
    }
}
