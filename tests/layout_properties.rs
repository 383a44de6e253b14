use approx::assert_relative_eq;
use proptest::prelude::*;

use distview_rs::distribution::{DistributionItem, ItemId};
use distview_rs::layout::palette::item_colors;
use distview_rs::layout::{
    compute_layout, ApproxMeasure, LayoutConfig, LayoutResult, OverflowPolicy,
};

fn make_items(specs: &[(f64, u32)]) -> Vec<DistributionItem> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(area, quantity))| {
            let id = ItemId::Num(i as i64 + 1);
            DistributionItem::new(id, format!("item {}", i + 1), area, quantity)
        })
        .collect()
}

fn layout_with(items: &[DistributionItem], config: &LayoutConfig) -> LayoutResult {
    compute_layout(items, config, &ApproxMeasure::default()).expect("valid config")
}

/// Item index of every requested instance, in placement order.
fn expanded_instances(items: &[DistributionItem]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .flat_map(|(i, item)| std::iter::repeat(i).take(item.quantity as usize))
        .collect()
}

// Areas stay small enough that one square always fits the usable width.
fn item_specs() -> impl Strategy<Value = Vec<(f64, u32)>> {
    prop::collection::vec((0.01f64..20.0, 0u32..12), 0..14)
}

proptest! {
    #[test]
    fn layout_is_deterministic(specs in item_specs()) {
        let items = make_items(&specs);
        let config = LayoutConfig::default();
        prop_assert_eq!(layout_with(&items, &config), layout_with(&items, &config));
    }

    #[test]
    fn side_follows_square_root_of_area(specs in item_specs()) {
        let items = make_items(&specs);
        let layout = layout_with(&items, &LayoutConfig::default());
        for square in &layout.squares {
            let expected = items[square.item_index].area.sqrt() * layout.scale;
            prop_assert!((square.side - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn squares_on_a_shelf_do_not_overlap(specs in item_specs()) {
        let items = make_items(&specs);
        let config = LayoutConfig::default();
        let layout = layout_with(&items, &config);
        for pair in layout.squares.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(b.shelf >= a.shelf);
            if a.shelf == b.shelf {
                prop_assert_eq!(a.y, b.y);
                prop_assert!(a.x + a.side + config.gutter <= b.x + 1e-9);
            } else {
                prop_assert!(b.y > a.y);
            }
        }
    }

    #[test]
    fn squares_stay_inside_margins(specs in item_specs(), height in 200.0f64..900.0) {
        let items = make_items(&specs);
        let config = LayoutConfig {
            canvas_height: height,
            ..LayoutConfig::default()
        };
        let layout = layout_with(&items, &config);
        let eps = 1e-9;
        for s in &layout.squares {
            prop_assert!(s.x >= config.margin - eps);
            prop_assert!(s.y >= config.margin - eps);
            prop_assert!(s.x + s.side <= config.canvas_width - config.margin + eps);
            prop_assert!(s.y + s.side <= config.canvas_height - config.margin + eps);
        }
    }

    #[test]
    fn stop_pass_places_a_prefix_of_instances(specs in item_specs(), height in 150.0f64..650.0) {
        let items = make_items(&specs);
        let config = LayoutConfig {
            canvas_height: height,
            ..LayoutConfig::default()
        };
        let layout = layout_with(&items, &config);
        let placed: Vec<usize> = layout.squares.iter().map(|s| s.item_index).collect();
        let expected = expanded_instances(&items);
        prop_assert_eq!(&placed[..], &expected[..placed.len()]);
        prop_assert_eq!(layout.truncation.requested, expected.len() as u64);
        prop_assert_eq!(layout.truncation.placed, placed.len() as u64);
    }

    #[test]
    fn skip_item_extends_the_stop_pass_prefix(specs in item_specs(), height in 150.0f64..650.0) {
        let items = make_items(&specs);
        let stop = LayoutConfig {
            canvas_height: height,
            ..LayoutConfig::default()
        };
        let skip = LayoutConfig {
            overflow: OverflowPolicy::SkipItem,
            ..stop.clone()
        };
        let stopped = layout_with(&items, &stop);
        let skipped = layout_with(&items, &skip);
        prop_assert!(skipped.squares.len() >= stopped.squares.len());
        prop_assert_eq!(&skipped.squares[..stopped.squares.len()], &stopped.squares[..]);
    }

    #[test]
    fn legend_lists_every_item_in_order(specs in item_specs()) {
        let items = make_items(&specs);
        let layout = layout_with(&items, &LayoutConfig::default());
        prop_assert_eq!(layout.legend.entries.len(), items.len());
        for (i, entry) in layout.legend.entries.iter().enumerate() {
            prop_assert_eq!(entry.item_index, i);
            prop_assert_eq!(entry.quantity, items[i].quantity);
            prop_assert_eq!(entry.colors, item_colors(i));
        }
    }
}

#[test]
fn larger_area_gives_larger_square() {
    let items = make_items(&[(0.25, 1), (1.0, 1), (2.25, 1)]);
    let layout = layout_with(&items, &LayoutConfig::default());
    let sides: Vec<f64> = layout.squares.iter().map(|s| s.side).collect();
    assert!(sides[0] < sides[1] && sides[1] < sides[2]);
    assert_relative_eq!(sides[2] / sides[0], 3.0, epsilon = 1e-9);
}

#[test]
fn colors_cycle_after_twelve_items() {
    let specs: Vec<(f64, u32)> = (0..13).map(|_| (0.04, 1)).collect();
    let items = make_items(&specs);
    let layout = layout_with(&items, &LayoutConfig::default());
    assert_eq!(layout.squares.len(), 13);
    assert_eq!(layout.squares[12].colors, layout.squares[0].colors);
    assert_ne!(layout.squares[11].colors, layout.squares[0].colors);
    assert_eq!(layout.legend.entries[12].colors, item_colors(0));
}

#[test]
fn empty_distribution_draws_only_chrome() {
    let layout = layout_with(&[], &LayoutConfig::default());
    assert!(layout.squares.is_empty());
    assert!(layout.legend.entries.is_empty());
    assert_eq!(layout.summary.subtitle, "Total area: 0.00 m²");
    assert!(!layout.truncation.is_truncated());
}
