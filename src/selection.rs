//! Two-click selection state.

/// Pending first click of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Pending(usize),
}

impl Selection {
    pub fn pending(&self) -> Option<usize> {
        match *self {
            Selection::Idle => None,
            Selection::Pending(p) => Some(p),
        }
    }

    /// Return the current state and reset to `Idle`.
    pub fn take(&mut self) -> Selection {
        std::mem::take(self)
    }
}

/// What the second click of a pair does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Primary button: move the pending tile in front of the clicked one.
    Insert,
    /// Secondary button: trade places with the clicked tile.
    Swap,
}

/// Result of feeding one click to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(usize),
    Moved { kind: MoveKind, src: usize, dst: usize },
    /// Clicked outside the palette; any pending selection was dropped.
    Cancelled,
}
