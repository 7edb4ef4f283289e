//! # Input Module
//!
//! Keyboard handling for the dungeon viewer.

use macroquad::prelude::*;

/// Inputs the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerInput {
    /// Highlight the next room
    AdvanceRoom,
    /// Throw the dungeon away and build a new one
    Regenerate,
    /// Close the viewer
    Quit,
}

impl ViewerInput {
    /// Key bindings, checked in this order.
    pub const BINDINGS: [(KeyCode, ViewerInput); 3] = [
        (KeyCode::Escape, ViewerInput::Quit),
        (KeyCode::Space, ViewerInput::AdvanceRoom),
        (KeyCode::R, ViewerInput::Regenerate),
    ];

    /// Maps a key to its input, if it is bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use macroquad::prelude::KeyCode;
    /// use warren::ViewerInput;
    ///
    /// assert_eq!(ViewerInput::from_key(KeyCode::R), Some(ViewerInput::Regenerate));
    /// assert_eq!(ViewerInput::from_key(KeyCode::Q), None);
    /// ```
    pub fn from_key(key: KeyCode) -> Option<Self> {
        Self::BINDINGS
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, input)| *input)
    }
}

/// Polls macroquad for viewer input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler.
    pub fn new() -> Self {
        Self
    }

    /// Gets the input for any bound key pressed this frame.
    pub fn poll(&self) -> Option<ViewerInput> {
        ViewerInput::BINDINGS
            .iter()
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, input)| *input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            ViewerInput::from_key(KeyCode::Space),
            Some(ViewerInput::AdvanceRoom)
        );
        assert_eq!(
            ViewerInput::from_key(KeyCode::Escape),
            Some(ViewerInput::Quit)
        );
        assert_eq!(
            ViewerInput::from_key(KeyCode::R),
            Some(ViewerInput::Regenerate)
        );
        assert_eq!(ViewerInput::from_key(KeyCode::W), None);
    }
}
