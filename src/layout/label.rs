use compact_str::{format_compact, CompactString};

/// Squares wider than this get the name and unit area.
pub const FULL_LABEL_MIN_SIDE: f64 = 50.0;
/// Squares wider than this (but not a full label) get the name's initial.
pub const INITIAL_LABEL_MIN_SIDE: f64 = 30.0;

const NAME_TRUNCATE_OVER: usize = 15;
const NAME_KEEP: usize = 12;

/// Text drawn inside a placed square.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    TwoLine {
        title: CompactString,
        subtitle: CompactString,
    },
    Initial(char),
    None,
}

/// Decide the label for one square from its own side length.
pub fn label_for(side: f64, name: &str, unit_area: f64, unit_suffix: &str) -> Label {
    if side > FULL_LABEL_MIN_SIDE {
        Label::TwoLine {
            title: shorten_name(name),
            subtitle: format_compact!("{unit_area:.2} {unit_suffix}"),
        }
    } else if side > INITIAL_LABEL_MIN_SIDE {
        name.chars().next().map_or(Label::None, Label::Initial)
    } else {
        Label::None
    }
}

/// Names longer than 15 characters keep their first 12 plus an ellipsis.
pub fn shorten_name(name: &str) -> CompactString {
    if name.chars().count() > NAME_TRUNCATE_OVER {
        let mut short: CompactString = name.chars().take(NAME_KEEP).collect();
        short.push_str("...");
        short
    } else {
        CompactString::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(label_for(50.0, "Lavadora", 0.36, "m²"), Label::Initial('L'));
        assert!(matches!(
            label_for(50.01, "Lavadora", 0.36, "m²"),
            Label::TwoLine { .. }
        ));
        assert_eq!(label_for(30.0, "Lavadora", 0.36, "m²"), Label::None);
        assert_eq!(label_for(30.01, "Lavadora", 0.36, "m²"), Label::Initial('L'));
    }

    #[test]
    fn two_line_label_formats_area() {
        let label = label_for(92.0, "Lavadora", 0.36, "m²");
        assert_eq!(
            label,
            Label::TwoLine {
                title: "Lavadora".into(),
                subtitle: "0.36 m²".into(),
            }
        );
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(shorten_name("Aire acondicionado"), "Aire acondic...");
        assert_eq!(shorten_name("Extractor cocina"), "Extractor co...");
        // Exactly 15 characters stays intact.
        assert_eq!(shorten_name("Horno eléctrico"), "Horno eléctrico");
    }

    #[test]
    fn initial_uses_first_scalar_and_handles_empty_names() {
        assert_eq!(label_for(40.0, "Éter", 1.0, "m²"), Label::Initial('É'));
        assert_eq!(label_for(40.0, "", 1.0, "m²"), Label::None);
    }
}
