use std::iter;
use std::ops::ControlFlow;

use crate::distribution::DistributionItem;

use super::scale::side_length;

/// What to do with an instance that would cross the bottom margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Stop the whole pass: nothing after the first overflowing instance is placed.
    #[default]
    StopPass,
    /// Drop the rest of the overflowing item but keep trying later (smaller) items.
    SkipItem,
}

/// Usable region and spacing for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfBounds {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub gutter: f64,
}

impl ShelfBounds {
    fn right(&self) -> f64 {
        self.width - self.margin
    }

    fn bottom(&self) -> f64 {
        self.height - self.margin
    }
}

/// Cursor threaded through the fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackerState {
    pub x: f64,
    pub y: f64,
    pub row_max_height: f64,
    pub shelf: usize,
    /// Item whose remaining instances are being dropped (`SkipItem` only).
    skipping: Option<usize>,
}

impl PackerState {
    pub fn start(margin: f64) -> Self {
        Self {
            x: margin,
            y: margin,
            row_max_height: 0.0,
            shelf: 0,
            skipping: None,
        }
    }

    /// Open a new shelf under the tallest square of this one if `side` doesn't fit.
    pub fn wrap(self, side: f64, bounds: &ShelfBounds) -> Self {
        if self.x + side > bounds.right() {
            Self {
                x: bounds.margin,
                y: self.y + self.row_max_height + bounds.gutter,
                row_max_height: 0.0,
                shelf: self.shelf + 1,
                ..self
            }
        } else {
            self
        }
    }

    pub fn fits_vertically(&self, side: f64, bounds: &ShelfBounds) -> bool {
        !(self.y + side > bounds.bottom())
    }

    /// Move past a square just placed at the cursor.
    pub fn advance(self, side: f64, bounds: &ShelfBounds) -> Self {
        Self {
            x: self.x + side + bounds.gutter,
            row_max_height: self.row_max_height.max(side),
            ..self
        }
    }
}

/// A square position before colors and labels are attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub item_index: usize,
    pub x: f64,
    pub y: f64,
    pub side: f64,
    pub shelf: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Packing {
    pub placements: Vec<Placement>,
    pub final_state: PackerState,
    /// Item index at which a `StopPass` overflow ended the pass.
    pub stopped_at: Option<usize>,
}

/// Greedy left-to-right, top-to-bottom shelf fill over every requested instance.
pub fn pack(
    items: &[DistributionItem],
    scale: f64,
    bounds: &ShelfBounds,
    policy: OverflowPolicy,
) -> Packing {
    let mut instances = items
        .iter()
        .enumerate()
        .flat_map(|(index, item)| iter::repeat_n((index, item), item.quantity as usize));

    let mut placements = Vec::new();
    let flow = instances.try_fold(PackerState::start(bounds.margin), |state, (index, item)| {
        if state.skipping == Some(index) {
            return ControlFlow::Continue(state);
        }

        let side = side_length(item.area, scale);
        let state = state.wrap(side, bounds);

        if !state.fits_vertically(side, bounds) {
            return match policy {
                OverflowPolicy::StopPass => ControlFlow::Break((state, index)),
                OverflowPolicy::SkipItem => ControlFlow::Continue(PackerState {
                    skipping: Some(index),
                    ..state
                }),
            };
        }

        placements.push(Placement {
            item_index: index,
            x: state.x,
            y: state.y,
            side,
            shelf: state.shelf,
        });
        ControlFlow::Continue(state.advance(side, bounds))
    });

    let (final_state, stopped_at) = match flow {
        ControlFlow::Continue(state) => (state, None),
        ControlFlow::Break((state, index)) => (state, Some(index)),
    };

    tracing::debug!(
        "Shelf pass placed {} squares on {} shelves (stopped_at={:?})",
        placements.len(),
        if placements.is_empty() { 0 } else { final_state.shelf + 1 },
        stopped_at
    );

    Packing {
        placements,
        final_state,
        stopped_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ItemId;
    use approx::assert_relative_eq;

    fn bounds(width: f64, height: f64) -> ShelfBounds {
        ShelfBounds {
            width,
            height,
            margin: 20.0,
            gutter: 10.0,
        }
    }

    fn item(id: i64, area: f64, quantity: u32) -> DistributionItem {
        DistributionItem::new(ItemId::Num(id), format!("item {id}"), area, quantity)
    }

    #[test]
    fn fills_left_to_right_then_wraps() {
        // 100px squares in a 360px wide canvas: 20, 130, 240 then wrap.
        let items = vec![item(1, 1.0, 4)];
        let packing = pack(&items, 100.0, &bounds(360.0, 1000.0), OverflowPolicy::StopPass);
        let xs: Vec<f64> = packing.placements.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = packing.placements.iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![20.0, 130.0, 240.0, 20.0]);
        assert_eq!(ys, vec![20.0, 20.0, 20.0, 130.0]);
        assert_eq!(packing.placements[3].shelf, 1);
        assert_eq!(packing.stopped_at, None);
    }

    #[test]
    fn next_shelf_starts_below_tallest_square() {
        // Row of a 100px and a 50px square, then a 300px square forces a wrap.
        let items = vec![item(1, 1.0, 1), item(2, 0.25, 1), item(3, 9.0, 1)];
        let packing = pack(&items, 100.0, &bounds(400.0, 1000.0), OverflowPolicy::StopPass);
        let last = packing.placements[2];
        assert_relative_eq!(last.side, 300.0);
        assert_eq!(last.x, 20.0);
        assert_eq!(last.y, 20.0 + 100.0 + 10.0);
    }

    #[test]
    fn stop_pass_drops_everything_after_overflow() {
        // Only one 100px shelf fits vertically in 160px.
        let items = vec![item(1, 1.0, 5), item(2, 0.01, 3)];
        let packing = pack(&items, 100.0, &bounds(360.0, 160.0), OverflowPolicy::StopPass);
        assert_eq!(packing.placements.len(), 3);
        assert!(packing.placements.iter().all(|p| p.item_index == 0));
        assert_eq!(packing.stopped_at, Some(0));
    }

    #[test]
    fn skip_item_continues_with_later_items() {
        let items = vec![item(1, 1.0, 5), item(2, 0.01, 3)];
        let packing = pack(&items, 100.0, &bounds(360.0, 170.0), OverflowPolicy::SkipItem);
        // The wrap stays in effect: y=130 leaves room for 10px squares only.
        let small: Vec<&Placement> = packing
            .placements
            .iter()
            .filter(|p| p.item_index == 1)
            .collect();
        assert_eq!(packing.placements.len(), 6);
        assert_eq!(small.len(), 3);
        assert_eq!(small[0].y, 130.0);
        assert_eq!(small[0].x, 20.0);
        assert_eq!(packing.stopped_at, None);
    }

    #[test]
    fn zero_quantity_items_place_nothing() {
        let items = vec![item(1, 1.0, 0), item(2, 1.0, 1)];
        let packing = pack(&items, 50.0, &bounds(900.0, 650.0), OverflowPolicy::StopPass);
        assert_eq!(packing.placements.len(), 1);
        assert_eq!(packing.placements[0].item_index, 1);
        assert_eq!(packing.placements[0].x, 20.0);
    }

    #[test]
    fn square_touching_margin_exactly_is_placed() {
        // Right and bottom limits are both 140 - 20 = 120, reached exactly.
        let items = vec![item(1, 1.0, 1)];
        let packing = pack(&items, 100.0, &bounds(140.0, 140.0), OverflowPolicy::StopPass);
        assert_eq!(packing.placements.len(), 1);
    }

    #[test]
    fn reference_canvas_places_prefix_and_stops_on_oversized_item() {
        let scale = crate::layout::scale::scale_factor(900.0, 650.0, 50.0, 0.85).unwrap();
        let items = vec![item(1, 1.0, 3), item(2, 4.0, 1), item(3, 100.0, 1)];
        let packing = pack(&items, scale, &bounds(900.0, 650.0), OverflowPolicy::StopPass);

        let xs: Vec<f64> = packing.placements.iter().map(|p| p.x).collect();
        assert_eq!(xs.len(), 4);
        assert_relative_eq!(xs[1], 20.0 + scale + 10.0, epsilon = 1e-9);
        assert_relative_eq!(xs[3], 20.0 + 3.0 * (scale + 10.0), epsilon = 1e-9);
        assert_relative_eq!(xs[3], 325.82, epsilon = 0.01);
        assert!(packing.placements.iter().all(|p| p.shelf == 0));
        assert_eq!(packing.stopped_at, Some(2));
        assert_eq!(packing.final_state.shelf, 1);
    }
}
