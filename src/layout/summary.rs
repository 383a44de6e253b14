use compact_str::{format_compact, CompactString};

use crate::distribution::DistributionItem;

use super::LayoutRect;

const BANNER_W: f64 = 300.0;
const BANNER_H: f64 = 45.0;
const BANNER_TOP: f64 = 15.0;

/// Fixed banner at the top center of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBanner {
    pub bounds: LayoutRect,
    pub title: CompactString,
    pub subtitle: CompactString,
    /// Sum of `area_total` over every input item, placed or not.
    pub total_area: f64,
}

/// Sum of `area_total` over every item; `+0.0` when there are none.
pub fn total_area(items: &[DistributionItem]) -> f64 {
    items.iter().fold(0.0, |acc, item| acc + item.area_total())
}

pub fn layout_summary(
    items: &[DistributionItem],
    canvas_w: f64,
    title: &str,
    unit_suffix: &str,
) -> SummaryBanner {
    let total = total_area(items);
    SummaryBanner {
        bounds: LayoutRect {
            x: canvas_w / 2.0 - BANNER_W / 2.0,
            y: BANNER_TOP,
            w: BANNER_W,
            h: BANNER_H,
        },
        title: title.into(),
        subtitle: format_compact!("Total area: {total:.2} {unit_suffix}"),
        total_area: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ItemId;

    #[test]
    fn sums_requested_area_of_all_items() {
        let items = vec![
            DistributionItem::new(ItemId::Num(1), "a", 0.25, 20),
            DistributionItem::new(ItemId::Num(2), "b", 0.6, 2),
        ];
        let banner = layout_summary(&items, 900.0, "Optimal Distribution", "m²");
        assert!((banner.total_area - 6.2).abs() < 1e-9);
        assert_eq!(banner.subtitle, "Total area: 6.20 m²");
        assert_eq!(banner.bounds.x, 300.0);
        assert_eq!(banner.bounds.y, 15.0);
    }

    #[test]
    fn uses_caller_supplied_area_total() {
        let items = vec![DistributionItem::new(ItemId::Num(1), "a", 1.0, 3).with_area_total(5.0)];
        assert_eq!(total_area(&items), 5.0);
    }

    #[test]
    fn empty_distribution_prints_positive_zero() {
        let banner = layout_summary(&[], 900.0, "Optimal Distribution", "m²");
        assert!(banner.total_area.is_sign_positive());
        assert_eq!(banner.subtitle, "Total area: 0.00 m²");
    }
}
