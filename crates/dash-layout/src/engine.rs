// ABOUTME: Placement engine that packs measured panels into a container width.
// ABOUTME: Each pass rebuilds the corner frontier and places panels greedily in processing order.

use dash_core::{LayoutConfig, Position, Size};
use serde::Serialize;

use crate::frontier::{Corner, Frontier, Placed};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Processing order has {order} entries but there are {panels} panels")]
    OrderLength { order: usize, panels: usize },

    #[error("Processing order references panel {index} but there are only {panels} panels")]
    OrderIndexOutOfRange { index: usize, panels: usize },

    #[error("Panel {0} appears more than once in the processing order")]
    DuplicateOrderIndex(usize),
}

/// Result of one placement pass.
///
/// `positions` is index-aligned with the panel sequence that was packed;
/// `None` means the panel is unmeasured or did not fit in this pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    positions: Vec<Option<Position>>,
    corners: Vec<Corner>,
}

impl Layout {
    /// Layout for `panels` panels with nothing placed yet.
    pub fn unplaced(panels: usize) -> Self {
        Self {
            positions: vec![None; panels],
            corners: Vec::new(),
        }
    }

    pub fn positions(&self) -> &[Option<Position>] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<Position> {
        self.positions.get(index).copied().flatten()
    }

    /// Frontier corners left unused at the end of the pass.
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn placed_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }

    /// Bottom edge of the lowest placed panel, i.e. the content height.
    pub fn content_height(&self) -> f32 {
        self.positions
            .iter()
            .flatten()
            .map(Position::bottom)
            .fold(0.0, f32::max)
    }
}

/// Greedy corner-based packer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packer {
    gap: f32,
}

impl Default for Packer {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl Packer {
    pub fn new(gap: f32) -> Self {
        Self { gap: gap.max(0.0) }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.gap)
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Place every measured panel, visiting them in `order`.
    ///
    /// `order` must be a permutation of `0..sizes.len()`. Anything else is a
    /// broken caller contract and aborts the pass.
    pub fn pack(
        &self,
        sizes: &[Size],
        order: &[usize],
        container_width: f32,
    ) -> Result<Layout, LayoutError> {
        if let Err(err) = validate_order(order, sizes.len()) {
            tracing::warn!("Rejected placement pass: {}", err);
            return Err(err);
        }

        let mut pass = Pass::new(sizes.len(), container_width, self.gap);
        for &index in order {
            pass.place(index, sizes[index]);
        }
        let layout = pass.finish();

        tracing::debug!(
            "Placement pass: {} of {} panels placed, {} corners left, width {}",
            layout.placed_count(),
            layout.len(),
            layout.corners().len(),
            container_width
        );
        Ok(layout)
    }

    /// Place panels in their input order.
    pub fn pack_in_order(&self, sizes: &[Size], container_width: f32) -> Layout {
        let mut pass = Pass::new(sizes.len(), container_width, self.gap);
        for (index, size) in sizes.iter().enumerate() {
            pass.place(index, *size);
        }
        pass.finish()
    }
}

fn validate_order(order: &[usize], panels: usize) -> Result<(), LayoutError> {
    if order.len() != panels {
        return Err(LayoutError::OrderLength {
            order: order.len(),
            panels,
        });
    }
    let mut seen = vec![false; panels];
    for &index in order {
        let slot = seen
            .get_mut(index)
            .ok_or(LayoutError::OrderIndexOutOfRange { index, panels })?;
        if *slot {
            return Err(LayoutError::DuplicateOrderIndex(index));
        }
        *slot = true;
    }
    Ok(())
}

/// Accumulator for a single pass. Never outlives `Packer::pack`.
struct Pass {
    frontier: Frontier,
    placed: Vec<Placed>,
    positions: Vec<Option<Position>>,
}

impl Pass {
    fn new(panels: usize, container_width: f32, gap: f32) -> Self {
        // NaN and negative widths behave like an unmeasured container.
        let usable_width = container_width.max(0.0);
        Self {
            frontier: Frontier::seeded(usable_width, gap),
            placed: Vec::with_capacity(panels),
            positions: vec![None; panels],
        }
    }

    fn place(&mut self, index: usize, size: Size) {
        if !size.is_measured() {
            return;
        }
        let Some(corner) = self.frontier.take_fitting(size, &self.placed) else {
            tracing::trace!(
                "No fitting corner for panel {} ({}x{})",
                index,
                size.width,
                size.height
            );
            return;
        };

        let new = Placed {
            index,
            position: Position::at(corner.point(), size),
        };
        tracing::trace!("Placed panel {} at ({}, {})", index, corner.x, corner.y);
        self.placed.push(new);
        self.frontier.extend_from(new, &self.placed);
        self.positions[index] = Some(new.position);
    }

    fn finish(self) -> Layout {
        Layout {
            positions: self.positions,
            corners: self.frontier.into_corners(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::{overlaps, Point};
    use proptest::prelude::*;

    const GAP: f32 = 16.0;

    fn sizes(dims: &[(f32, f32)]) -> Vec<Size> {
        dims.iter().map(|&(w, h)| Size::new(w, h)).collect()
    }

    fn top_left(layout: &Layout, index: usize) -> Option<Point> {
        layout.position(index).map(|p| p.top_left())
    }

    #[test]
    fn three_panels_wrap_to_second_row() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(&sizes(&[(200.0, 100.0); 3]), 500.0);

        assert_eq!(top_left(&layout, 0), Some(Point::new(0.0, 0.0)));
        assert_eq!(top_left(&layout, 1), Some(Point::new(216.0, 0.0)));
        assert_eq!(top_left(&layout, 2), Some(Point::new(0.0, 116.0)));
    }

    #[test]
    fn narrow_container_leaves_no_room_beside_second_panel() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(&sizes(&[(200.0, 100.0); 3]), 432.0);

        assert_eq!(top_left(&layout, 0), Some(Point::new(0.0, 0.0)));
        assert_eq!(top_left(&layout, 1), Some(Point::new(216.0, 0.0)));
        assert_eq!(top_left(&layout, 2), Some(Point::new(0.0, 116.0)));
        // The right corner of panel 1 lands exactly on the container edge.
        assert!(!layout.corners().iter().any(|c| c.x == 432.0));
    }

    #[test]
    fn panel_ending_exactly_at_container_edge_fits() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(&sizes(&[(200.0, 100.0); 2]), 416.0);
        assert_eq!(top_left(&layout, 1), Some(Point::new(216.0, 0.0)));

        let layout = packer.pack_in_order(&sizes(&[(200.0, 100.0); 2]), 415.0);
        assert_eq!(top_left(&layout, 1), Some(Point::new(0.0, 116.0)));
    }

    #[test]
    fn unmeasured_panels_are_skipped() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(
            &sizes(&[(0.0, 0.0), (200.0, 100.0), (200.0, 0.0)]),
            500.0,
        );
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.position(0), None);
        assert_eq!(top_left(&layout, 1), Some(Point::ORIGIN));
        assert_eq!(layout.position(2), None);
    }

    #[test]
    fn oversized_panel_is_anchored_at_left_edge() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(&sizes(&[(100.0, 50.0), (800.0, 50.0)]), 300.0);
        assert_eq!(top_left(&layout, 1), Some(Point::new(0.0, 66.0)));
        assert!(!layout.position(1).unwrap().fits_within(300.0));
    }

    #[test]
    fn unmeasured_container_places_only_the_first_panel() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(&sizes(&[(100.0, 50.0); 3]), 0.0);
        assert_eq!(top_left(&layout, 0), Some(Point::ORIGIN));
        assert_eq!(layout.position(1), None);
        assert_eq!(layout.position(2), None);
    }

    #[test]
    fn short_panel_fills_gap_beside_taller_one() {
        // A tall panel on the left, a short one on the right, then a panel
        // that fits under the short one without going below the tall one.
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(
            &sizes(&[(200.0, 300.0), (200.0, 100.0), (200.0, 100.0)]),
            500.0,
        );
        assert_eq!(top_left(&layout, 1), Some(Point::new(216.0, 0.0)));
        assert_eq!(top_left(&layout, 2), Some(Point::new(216.0, 116.0)));
    }

    #[test]
    fn processing_order_changes_which_panel_goes_first() {
        let packer = Packer::new(GAP);
        let dims = sizes(&[(200.0, 100.0), (200.0, 50.0)]);
        let layout = packer.pack(&dims, &[1, 0], 300.0).unwrap();
        assert_eq!(top_left(&layout, 1), Some(Point::ORIGIN));
        assert_eq!(top_left(&layout, 0), Some(Point::new(0.0, 66.0)));
    }

    #[test]
    fn remaining_corners_are_reported() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(&sizes(&[(200.0, 100.0); 3]), 500.0);
        let pts: Vec<_> = layout.corners().iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(pts, vec![(432.0, 0.0), (216.0, 116.0), (0.0, 232.0)]);
    }

    #[test]
    fn content_height_is_lowest_bottom() {
        let packer = Packer::new(GAP);
        let layout = packer.pack_in_order(&sizes(&[(200.0, 100.0); 3]), 500.0);
        assert_eq!(layout.content_height(), 216.0);
        assert_eq!(Layout::unplaced(2).content_height(), 0.0);
    }

    #[test]
    fn order_with_wrong_length_is_rejected() {
        let packer = Packer::new(GAP);
        let err = packer
            .pack(&sizes(&[(10.0, 10.0); 2]), &[0], 100.0)
            .unwrap_err();
        assert_eq!(err, LayoutError::OrderLength { order: 1, panels: 2 });
    }

    #[test]
    fn order_with_out_of_range_index_is_rejected() {
        let packer = Packer::new(GAP);
        let err = packer
            .pack(&sizes(&[(10.0, 10.0); 2]), &[0, 5], 100.0)
            .unwrap_err();
        assert_eq!(err, LayoutError::OrderIndexOutOfRange { index: 5, panels: 2 });
    }

    #[test]
    fn order_with_duplicate_index_is_rejected() {
        let packer = Packer::new(GAP);
        let err = packer
            .pack(&sizes(&[(10.0, 10.0); 2]), &[1, 1], 100.0)
            .unwrap_err();
        assert_eq!(err, LayoutError::DuplicateOrderIndex(1));
    }

    #[test]
    fn repacking_example_in_reading_order_is_stable() {
        let packer = Packer::new(GAP);
        // The third panel ends up in row 0 beside the first, ahead of the
        // second panel which wrapped to row 1.
        let dims = sizes(&[(300.0, 100.0), (300.0, 50.0), (150.0, 50.0)]);
        let first = packer.pack_in_order(&dims, 500.0);

        let mut order: Vec<usize> = (0..dims.len()).collect();
        order.sort_by(|&a, &b| {
            let pa = first.position(a).unwrap();
            let pb = first.position(b).unwrap();
            pa.top()
                .total_cmp(&pb.top())
                .then(pa.left().total_cmp(&pb.left()))
        });
        assert_eq!(order, vec![0, 2, 1]);
        let second = packer.pack(&dims, &order, 500.0).unwrap();

        assert_eq!(first.positions(), second.positions());
    }

    fn arb_sizes() -> impl Strategy<Value = Vec<Size>> {
        prop::collection::vec(
            prop_oneof![
                1 => Just(Size::UNMEASURED),
                6 => (1u32..=5, 10u32..400).prop_map(|(span, h)| {
                    Size::new(128.0 + 144.0 * (span - 1) as f32, h as f32)
                }),
            ],
            0..16,
        )
    }

    proptest! {
        #[test]
        fn placed_panels_never_overlap(dims in arb_sizes(), width in 1u32..2000) {
            let layout = Packer::new(GAP).pack_in_order(&dims, width as f32);
            let placed: Vec<Position> = layout.positions().iter().flatten().copied().collect();
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    prop_assert!(!overlaps(a, b, GAP), "{:?} overlaps {:?}", a, b);
                }
            }
        }

        #[test]
        fn placed_panels_fit_or_start_at_left_edge(dims in arb_sizes(), width in 1u32..2000) {
            let width = width as f32;
            let layout = Packer::new(GAP).pack_in_order(&dims, width);
            for pos in layout.positions().iter().flatten() {
                prop_assert!(pos.fits_within(width) || pos.left() == 0.0);
            }
        }

        #[test]
        fn every_measured_panel_is_placed(dims in arb_sizes(), width in 1u32..2000) {
            let layout = Packer::new(GAP).pack_in_order(&dims, width as f32);
            prop_assert_eq!(layout.len(), dims.len());
            for (size, pos) in dims.iter().zip(layout.positions()) {
                prop_assert_eq!(size.is_measured(), pos.is_some());
            }
        }

        #[test]
        fn packing_is_deterministic(dims in arb_sizes(), width in 1u32..2000) {
            let packer = Packer::new(GAP);
            let order: Vec<usize> = (0..dims.len()).rev().collect();
            let a = packer.pack(&dims, &order, width as f32).unwrap();
            let b = packer.pack(&dims, &order, width as f32).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn wide_container_places_everything_in_first_row(dims in arb_sizes()) {
            let total: f32 = dims.iter().map(|s| s.width + GAP).sum();
            let layout = Packer::new(GAP).pack_in_order(&dims, total + 1.0);
            for pos in layout.positions().iter().flatten() {
                prop_assert_eq!(pos.top(), 0.0);
            }
        }

        // Only holds for same-size panels: with mixed sizes a repack in reading
        // order can visit a panel before the neighbour whose corner it used.
        #[test]
        fn same_size_panels_repack_without_drift(count in 1usize..20, width in 1u32..2000) {
            let packer = Packer::new(GAP);
            let dims = vec![Size::new(128.0, 90.0); count];
            let first = packer.pack_in_order(&dims, width as f32);

            let mut order: Vec<usize> = (0..count).collect();
            order.sort_by(|&a, &b| {
                let pa = first.position(a).unwrap();
                let pb = first.position(b).unwrap();
                pa.top().total_cmp(&pb.top()).then(pa.left().total_cmp(&pb.left()))
            });
            let second = packer.pack(&dims, &order, width as f32).unwrap();
            prop_assert_eq!(first.positions(), second.positions());
        }
    }
}
