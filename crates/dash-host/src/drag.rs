// ABOUTME: Drag gesture tracking for a single panel.
// ABOUTME: Normalizes incremental and absolute pointer moves into an absolute top-left position.

use dash_core::Point;

/// Pointer movement reported by the drag capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMove {
    /// Offset since the previous move (or since drag start).
    Delta { dx: f32, dy: f32 },
    /// New top-left position in container coordinates.
    Absolute { x: f32, y: f32 },
}

/// State of an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    current: Point,
}

impl DragTracker {
    pub fn start(origin: Point) -> Self {
        Self { current: origin }
    }

    /// Apply a move and return the new absolute position.
    pub fn apply(&mut self, movement: DragMove) -> Point {
        self.current = match movement {
            DragMove::Delta { dx, dy } => Point::new(self.current.x + dx, self.current.y + dy),
            DragMove::Absolute { x, y } => Point::new(x, y),
        };
        self.current
    }

    pub fn current(&self) -> Point {
        self.current
    }
}
