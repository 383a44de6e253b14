use crate::distribution::DistributionItem;
use crate::layout::PlacedSquare;

/// Information to display in the tooltip when hovering over a square.
#[derive(Debug, PartialEq)]
pub struct TooltipInfo {
    pub name: String,
    pub lines: Vec<String>,
}

/// Build tooltip info for a placed square.
pub fn build_tooltip(
    items: &[DistributionItem],
    square: &PlacedSquare,
    unit_suffix: &str,
) -> Option<TooltipInfo> {
    let item = items.get(square.item_index)?;

    let mut lines = vec![
        format!("id {}", item.id),
        format!("Unit area: {}", format_area(item.area, unit_suffix)),
        format!(
            "Quantity: {} ({} total)",
            item.quantity,
            format_area(item.area_total(), unit_suffix)
        ),
    ];
    if item.profit_total != 0.0 {
        lines.push(format!("Profit: ${:.2}", item.profit_total));
    }

    Some(TooltipInfo {
        name: item.name.to_string(),
        lines,
    })
}

pub fn format_area(value: f64, unit_suffix: &str) -> String {
    format!("{value:.2} {unit_suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ItemId;
    use crate::layout::{compute_layout, ApproxMeasure, LayoutConfig};

    #[test]
    fn tooltip_describes_the_hovered_item() {
        let items = vec![
            DistributionItem::new(ItemId::Num(3), "Lavadora", 0.36, 3).with_profit(90.0),
            DistributionItem::new(ItemId::Num(6), "Licuadora", 0.04, 1),
        ];
        let layout =
            compute_layout(&items, &LayoutConfig::default(), &ApproxMeasure::default()).unwrap();

        let info = build_tooltip(&items, &layout.squares[0], "m²").unwrap();
        assert_eq!(info.name, "Lavadora");
        assert_eq!(info.lines[0], "id 3");
        assert_eq!(info.lines[1], "Unit area: 0.36 m²");
        assert_eq!(info.lines[2], "Quantity: 3 (1.08 m² total)");
        assert_eq!(info.lines[3], "Profit: $270.00");

        let info = build_tooltip(&items, &layout.squares[3], "m²").unwrap();
        assert_eq!(info.lines.len(), 3);
    }
}
