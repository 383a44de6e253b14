use std::collections::HashSet;
use std::fmt;

use super::{DistributionItem, ItemId};

/// How much the aggregate area may drift from `area × quantity` before we flag it.
const AREA_TOTAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// Problems a caller should catch before handing items to the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    NonFiniteArea { index: usize, area: f64 },
    NonPositiveArea { index: usize, area: f64 },
    EmptyName { index: usize },
    DuplicateId { index: usize, id: ItemId },
    AreaTotalMismatch { index: usize, expected: f64, actual: f64 },
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::NonFiniteArea { .. } | ValidationIssue::NonPositiveArea { .. } => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ValidationIssue::NonFiniteArea { index, .. }
            | ValidationIssue::NonPositiveArea { index, .. }
            | ValidationIssue::EmptyName { index }
            | ValidationIssue::DuplicateId { index, .. }
            | ValidationIssue::AreaTotalMismatch { index, .. } => *index,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NonFiniteArea { index, area } => {
                write!(f, "item #{index}: area {area} is not a finite number")
            }
            ValidationIssue::NonPositiveArea { index, area } => {
                write!(f, "item #{index}: area {area} must be positive")
            }
            ValidationIssue::EmptyName { index } => write!(f, "item #{index}: empty name"),
            ValidationIssue::DuplicateId { index, id } => {
                write!(f, "item #{index}: id {id} already used by an earlier item")
            }
            ValidationIssue::AreaTotalMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "item #{index}: areaTotal {actual:.4} differs from area × quantity {expected:.4}"
            ),
        }
    }
}

/// Check a distribution for malformed records. The engine itself never does this.
pub fn validate(items: &[DistributionItem]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if !item.area.is_finite() {
            issues.push(ValidationIssue::NonFiniteArea {
                index,
                area: item.area,
            });
        } else if item.area <= 0.0 {
            issues.push(ValidationIssue::NonPositiveArea {
                index,
                area: item.area,
            });
        } else {
            let expected = item.area * item.quantity as f64;
            let actual = item.area_total();
            if (expected - actual).abs() > AREA_TOTAL_TOLERANCE * expected.max(1.0) {
                issues.push(ValidationIssue::AreaTotalMismatch {
                    index,
                    expected,
                    actual,
                });
            }
        }

        if item.name.trim().is_empty() {
            issues.push(ValidationIssue::EmptyName { index });
        }

        if !seen.insert(&item.id) {
            issues.push(ValidationIssue::DuplicateId {
                index,
                id: item.id.clone(),
            });
        }
    }

    issues
}

pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity() == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, area: f64, quantity: u32) -> DistributionItem {
        DistributionItem::new(ItemId::Num(id), name, area, quantity)
    }

    #[test]
    fn clean_distribution_has_no_issues() {
        let items = vec![item(1, "Lavadora", 0.36, 3), item(2, "Plancha", 0.06, 12)];
        assert!(validate(&items).is_empty());
    }

    #[test]
    fn flags_bad_area_as_error() {
        let items = vec![item(1, "a", -1.0, 1), item(2, "b", f64::NAN, 1), item(3, "c", 0.0, 2)];
        let issues = validate(&items);
        assert_eq!(issues.len(), 3);
        assert!(has_errors(&issues));
        assert!(matches!(issues[1], ValidationIssue::NonFiniteArea { index: 1, .. }));
    }

    #[test]
    fn duplicate_ids_and_names_are_warnings() {
        let items = vec![item(7, "x", 1.0, 1), item(7, "  ", 1.0, 1)];
        let issues = validate(&items);
        assert_eq!(
            issues,
            vec![
                ValidationIssue::EmptyName { index: 1 },
                ValidationIssue::DuplicateId {
                    index: 1,
                    id: ItemId::Num(7)
                },
            ]
        );
        assert!(!has_errors(&issues));
    }

    #[test]
    fn detects_area_total_mismatch() {
        let items = vec![item(1, "x", 0.5, 4).with_area_total(3.0)];
        let issues = validate(&items);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert_eq!(issues[0].index(), 0);
    }
}
