// ABOUTME: Candidate anchor points for the next panel placement.
// ABOUTME: Grows right and below corners around each placed panel and prunes useless ones.

use dash_core::{overlaps, Point, Position, Size};
use serde::Serialize;

/// Candidate top-left anchor for a panel.
///
/// The adjacency fields name the panels (by input index) whose edges
/// produced this corner: the panel directly above and the panel directly
/// to the left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Corner {
    pub x: f32,
    pub y: f32,
    pub top_adjacent: Option<usize>,
    pub left_adjacent: Option<usize>,
}

impl Corner {
    pub const SEED: Self = Self {
        x: 0.0,
        y: 0.0,
        top_adjacent: None,
        left_adjacent: None,
    };

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn reading_order(&self, other: &Corner) -> std::cmp::Ordering {
        self.y.total_cmp(&other.y).then(self.x.total_cmp(&other.x))
    }
}

/// A panel that already has a position in the current pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub index: usize,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct Frontier {
    corners: Vec<Corner>,
    usable_width: f32,
    gap: f32,
}

impl Frontier {
    /// Fresh frontier holding only the `(0, 0)` corner.
    pub fn seeded(usable_width: f32, gap: f32) -> Self {
        Self {
            corners: vec![Corner::SEED],
            usable_width,
            gap,
        }
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Insert a corner unless it duplicates an existing one, starts at or past
    /// the usable width, or sits inside the gap-expanded area of a placed panel.
    pub fn add_corner(&mut self, corner: Corner, placed: &[Placed]) -> bool {
        if corner.x >= self.usable_width {
            return false;
        }
        if self
            .corners
            .iter()
            .any(|c| c.x == corner.x && c.y == corner.y)
        {
            return false;
        }
        let point = corner.point();
        if placed
            .iter()
            .any(|p| p.position.contains_point(point, self.gap))
        {
            return false;
        }
        self.corners.push(corner);
        true
    }

    /// Remove and return the first corner in `(y, x)` order where a panel of
    /// `size` fits without overlapping anything already placed.
    ///
    /// Only corners at `x == 0` may overflow the right edge.
    pub fn take_fitting(&mut self, size: Size, placed: &[Placed]) -> Option<Corner> {
        let best = self
            .corners
            .iter()
            .enumerate()
            .filter(|(_, corner)| self.fits(corner, size, placed))
            .min_by(|(_, a), (_, b)| a.reading_order(b))
            .map(|(i, _)| i)?;
        Some(self.corners.swap_remove(best))
    }

    fn fits(&self, corner: &Corner, size: Size, placed: &[Placed]) -> bool {
        let rect = Position::at(corner.point(), size);
        if !rect.fits_within(self.usable_width) && corner.x != 0.0 {
            return false;
        }
        !placed
            .iter()
            .any(|p| overlaps(&p.position, &rect, self.gap))
    }

    /// Generate the right and below corners around a freshly placed panel.
    /// `placed` must already contain `new`.
    pub fn extend_from(&mut self, new: Placed, placed: &[Placed]) {
        self.add_right_corners(new, placed);
        self.add_below_corners(new, placed);
    }

    fn add_right_corners(&mut self, new: Placed, placed: &[Placed]) {
        let r = new.position;
        let gap = self.gap;
        let mut above: Vec<Placed> = placed
            .iter()
            .filter(|p| {
                r.right() + gap < p.position.right() && p.position.bottom() < r.bottom() + gap
            })
            .copied()
            .collect();
        above.sort_by(|a, b| {
            b.position
                .bottom()
                .total_cmp(&a.position.bottom())
                .then(a.position.left().total_cmp(&b.position.left()))
                .then(a.index.cmp(&b.index))
        });

        let x = r.right() + gap;
        let mut min_left = f32::INFINITY;
        for p in above {
            if p.position.left() < min_left {
                min_left = p.position.left();
                self.add_corner(
                    Corner {
                        x,
                        y: p.position.bottom() + gap,
                        top_adjacent: Some(p.index),
                        left_adjacent: Some(new.index),
                    },
                    placed,
                );
            }
            // This panel covers the column right of `r`; anything higher is hidden behind it.
            if p.position.left() <= r.right() {
                break;
            }
        }

        self.add_corner(
            Corner {
                x,
                y: 0.0,
                top_adjacent: None,
                left_adjacent: Some(new.index),
            },
            placed,
        );
    }

    fn add_below_corners(&mut self, new: Placed, placed: &[Placed]) {
        let r = new.position;
        let gap = self.gap;
        let mut beside: Vec<Placed> = placed
            .iter()
            .filter(|p| {
                r.bottom() + gap < p.position.bottom() && p.position.right() < r.right() + gap
            })
            .copied()
            .collect();
        beside.sort_by(|a, b| {
            b.position
                .right()
                .total_cmp(&a.position.right())
                .then(a.position.top().total_cmp(&b.position.top()))
                .then(a.index.cmp(&b.index))
        });

        let y = r.bottom() + gap;
        let mut min_top = f32::INFINITY;
        for p in beside {
            if p.position.top() < min_top {
                min_top = p.position.top();
                self.add_corner(
                    Corner {
                        x: p.position.right() + gap,
                        y,
                        top_adjacent: Some(new.index),
                        left_adjacent: Some(p.index),
                    },
                    placed,
                );
            }
            if p.position.top() <= r.bottom() {
                break;
            }
        }

        self.add_corner(
            Corner {
                x: 0.0,
                y,
                top_adjacent: Some(new.index),
                left_adjacent: None,
            },
            placed,
        );
    }

    /// Remaining corners in `(y, x)` order.
    pub fn into_corners(mut self) -> Vec<Corner> {
        self.corners.sort_by(Corner::reading_order);
        self.corners
    }
}
