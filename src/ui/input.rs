use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

use crate::layout::PlacedSquare;

/// Mouse state tracking.
#[derive(Debug, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
}

/// Hit-test: index of the placed square under the given point.
pub fn hit_test(squares: &[PlacedSquare], x: f32, y: f32) -> Option<usize> {
    let (x, y) = (x as f64, y as f64);
    // Later squares are drawn on top.
    squares.iter().rposition(|s| s.bounds().contains(x, y))
}

/// Input action produced from raw input events.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Re-read the current result file
    Reload,
    /// Pick a different result file
    OpenFile,
    /// Open the settings dialog
    OpenSettings,
    ToggleLabels,
    /// Switch between the canvas and the convergence chart
    ToggleChart,
    /// Switch between the canvas and the results summary
    ToggleStats,
    Quit,
    /// No action
    None,
}

/// Process a keyboard event.
pub fn process_key(key: Key, state: ElementState) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match key.as_ref() {
        Key::Named(NamedKey::F2) => InputAction::OpenSettings,
        Key::Named(NamedKey::F5) => InputAction::Reload,
        Key::Named(NamedKey::Escape) => InputAction::Quit,
        Key::Character(c) if c.eq_ignore_ascii_case("r") => InputAction::Reload,
        Key::Character(c) if c.eq_ignore_ascii_case("o") => InputAction::OpenFile,
        Key::Character(c) if c.eq_ignore_ascii_case("l") => InputAction::ToggleLabels,
        Key::Character(c) if c.eq_ignore_ascii_case("c") => InputAction::ToggleChart,
        Key::Character(c) if c.eq_ignore_ascii_case("s") => InputAction::ToggleStats,
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{DistributionItem, ItemId};
    use crate::layout::{compute_layout, ApproxMeasure, LayoutConfig};

    #[test]
    fn hit_test_finds_square_under_cursor() {
        let items = vec![DistributionItem::new(ItemId::Num(1), "a", 1.0, 2)];
        let layout =
            compute_layout(&items, &LayoutConfig::default(), &ApproxMeasure::default()).unwrap();
        let second = &layout.squares[1];
        let hit = hit_test(&layout.squares, second.x as f32 + 5.0, second.y as f32 + 5.0);
        assert_eq!(hit, Some(1));
        // The gutter between squares is empty.
        let gap_x = (layout.squares[0].x + layout.squares[0].side + 5.0) as f32;
        assert_eq!(hit_test(&layout.squares, gap_x, 30.0), None);
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(
            process_key(Key::Character("r".into()), ElementState::Pressed),
            InputAction::Reload
        );
        assert_eq!(
            process_key(Key::Named(NamedKey::F2), ElementState::Pressed),
            InputAction::OpenSettings
        );
        assert_eq!(
            process_key(Key::Character("S".into()), ElementState::Pressed),
            InputAction::ToggleStats
        );
        assert_eq!(
            process_key(Key::Character("c".into()), ElementState::Pressed),
            InputAction::ToggleChart
        );
        assert_eq!(
            process_key(Key::Character("o".into()), ElementState::Released),
            InputAction::None
        );
    }
}
