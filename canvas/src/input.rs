//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Modifiers` and `Button` capture the user's intent at the time of a
//! pointer event. `InputState` is the active gesture being tracked between
//! pointer-down and pointer-up, carrying the context needed to turn the next
//! pointer-move into a mutation.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::GRID_CELL_SIZE;
use crate::doc::InstanceId;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether a primary-button press should pan instead of select.
    /// Shift is not a pan modifier.
    #[must_use]
    pub fn pans(self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Delete or Backspace.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    /// Hovering a sprite that can be picked up.
    Grab,
    /// Dragging a sprite.
    Grabbing,
    /// Panning the view.
    Move,
}

impl Cursor {
    /// CSS cursor keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Move => "move",
        }
    }
}

/// Background grid settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Whether the grid is drawn.
    pub visible: bool,
    /// Spacing between grid lines in world units.
    pub cell_size: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { visible: true, cell_size: GRID_CELL_SIZE }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected sprite, if any.
    pub selected_id: Option<InstanceId>,
    /// The sprite under the pointer while idle, if any.
    pub hovered_id: Option<InstanceId>,
    /// Background grid settings.
    pub grid: GridConfig,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the view.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is moving a sprite across the board.
    Dragging {
        /// Id of the sprite being dragged.
        id: InstanceId,
        /// World-space offset from the sprite's top-left corner to the pointer
        /// at pointer-down; kept constant for the whole drag.
        grab_offset: Point,
    },
}
