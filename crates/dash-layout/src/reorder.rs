// ABOUTME: Processing order for placement passes.
// ABOUTME: Sorts panels into top-left reading order, letting a dragged panel claim its drop slot.

use std::sync::Arc;

use dash_core::Position;

/// Panel currently being dragged and its live rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOverride {
    pub index: usize,
    pub provisional: Position,
}

/// Order panels by their previous `(top, left)`.
///
/// Panels without a previous position go last, in input order. The drag
/// override replaces one panel's position for sorting only.
pub fn processing_order(previous: &[Option<Position>], drag: Option<DragOverride>) -> Vec<usize> {
    let key = |index: usize| -> Option<Position> {
        match drag {
            Some(d) if d.index == index => Some(d.provisional),
            _ => previous[index],
        }
    };

    let mut order: Vec<usize> = (0..previous.len()).collect();
    // Stable sort keeps input order for ties and for unplaced panels.
    order.sort_by(|&a, &b| match (key(a), key(b)) {
        (Some(pa), Some(pb)) => pa
            .top()
            .total_cmp(&pb.top())
            .then(pa.left().total_cmp(&pb.left())),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    order
}

/// Current processing order, shared with readers by reference.
///
/// Recomputing an order equal to the current one keeps the existing `Arc`,
/// so consumers comparing by pointer see no change.
#[derive(Debug, Clone)]
pub struct ProcessingOrder {
    current: Arc<[usize]>,
}

impl ProcessingOrder {
    /// Input order for `panels` panels.
    pub fn identity(panels: usize) -> Self {
        Self {
            current: (0..panels).collect(),
        }
    }

    pub fn current(&self) -> &Arc<[usize]> {
        &self.current
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.current
    }

    /// Recompute from `previous` positions; returns true if the order changed.
    pub fn update(&mut self, previous: &[Option<Position>], drag: Option<DragOverride>) -> bool {
        let next = processing_order(previous, drag);
        if *self.current == *next {
            return false;
        }
        tracing::trace!("Processing order changed: {:?} -> {:?}", self.current, next);
        self.current = next.into();
        true
    }
}
