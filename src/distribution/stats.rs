use compact_str::{format_compact, CompactString};

use super::{OptimizationResult, RunParameters};

/// One row of the per-item results table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    pub name: CompactString,
    pub quantity: u32,
    pub area_total: f64,
    pub profit_total: f64,
}

/// Headline figures of an optimization run, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultStats {
    pub profit_total: f64,
    pub area_total: f64,
    /// Area the canvas stands for; utilization is relative to it.
    pub max_area: f64,
    /// Percent of `max_area` in use.
    pub utilization: f64,
    pub best_solution: Vec<u32>,
    pub generations_run: usize,
    pub best_fitness: Option<f64>,
    pub rows: Vec<StatsRow>,
    /// `label: value` pairs for the parameters the run reported.
    pub parameters: Vec<(&'static str, CompactString)>,
}

impl ResultStats {
    /// Summarize a result. Reported aggregates win; missing ones are derived from the items.
    pub fn from_result(result: &OptimizationResult, max_area: f64) -> Self {
        let items = &result.distribution;
        let area_total = result
            .area_total
            .unwrap_or_else(|| items.iter().fold(0.0, |acc, i| acc + i.area_total()));
        let profit_total = result
            .profit_total
            .unwrap_or_else(|| items.iter().fold(0.0, |acc, i| acc + i.profit_total));
        let utilization = result.area_utilization.unwrap_or(if max_area > 0.0 {
            area_total / max_area * 100.0
        } else {
            0.0
        });

        Self {
            profit_total,
            area_total,
            max_area,
            utilization,
            best_solution: result.best_solution.clone(),
            generations_run: result.fitness_history.len(),
            best_fitness: result
                .fitness_history
                .iter()
                .copied()
                .filter(|f| f.is_finite())
                .reduce(f64::max),
            rows: items
                .iter()
                .map(|item| StatsRow {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    area_total: item.area_total(),
                    profit_total: item.profit_total,
                })
                .collect(),
            parameters: parameter_lines(&result.parameters),
        }
    }

    /// Utilization as a progress-bar fill fraction.
    pub fn utilization_fraction(&self) -> f64 {
        (self.utilization / 100.0).clamp(0.0, 1.0)
    }

    /// Catalog slots the best solution selected at least once.
    pub fn selected_kinds(&self) -> usize {
        self.best_solution.iter().filter(|&&q| q > 0).count()
    }
}

fn parameter_lines(p: &RunParameters) -> Vec<(&'static str, CompactString)> {
    let mut lines = Vec::new();
    if let Some(v) = p.population_size {
        lines.push(("Population", format_compact!("{v}")));
    }
    if let Some(v) = p.generations {
        lines.push(("Generations", format_compact!("{v}")));
    }
    if let Some(v) = p.crossover_probability {
        lines.push(("Crossover", format_compact!("{v:.2}")));
    }
    if let Some(v) = p.mutation_probability {
        lines.push(("Mutation", format_compact!("{v:.2}")));
    }
    if let Some(v) = &p.selection {
        let value = match p.torneo_k {
            Some(k) => format_compact!("{v} (k={k})"),
            None => format_compact!("{v}"),
        };
        lines.push(("Selection", value));
    }
    if let Some(v) = p.elitism {
        lines.push(("Elitism", format_compact!("{v}")));
    }
    if let Some(v) = p.seed {
        lines.push(("Seed", format_compact!("{v}")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{parse_result, DistributionItem, ItemId};

    #[test]
    fn reported_aggregates_are_shown_as_is() {
        let result = parse_result(
            r#"{"distribucion": [
                    {"id": 1, "nombre": "Mini nevera", "cantidad": 3, "area": 0.25,
                     "gananciaTotal": 120},
                    {"id": 3, "nombre": "Lavadora", "cantidad": 0, "area": 0.36}],
                "mejorSolucion": [3, 0, 0],
                "areaTotal": 0.75, "gananciaTotal": 120, "utilizacionArea": 1.5,
                "historialFitness": [80.0, 120.0, 110.0],
                "parametros": {"tamPoblacion": 50, "tipoSeleccion": "torneo", "torneoK": 3}}"#,
        )
        .unwrap();
        let stats = ResultStats::from_result(&result, 50.0);

        assert_eq!(stats.profit_total, 120.0);
        assert_eq!(stats.area_total, 0.75);
        assert_eq!(stats.utilization, 1.5);
        assert_eq!(stats.selected_kinds(), 1);
        assert_eq!(stats.generations_run, 3);
        assert_eq!(stats.best_fitness, Some(120.0));
        assert_eq!(stats.rows[1].quantity, 0);
        assert_eq!(
            stats.parameters,
            vec![
                ("Population", CompactString::from("50")),
                ("Selection", CompactString::from("torneo (k=3)")),
            ]
        );
    }

    #[test]
    fn missing_aggregates_are_derived_from_items() {
        let result = OptimizationResult::from_items(vec![
            DistributionItem::new(ItemId::Num(1), "a", 2.0, 5).with_profit(10.0),
            DistributionItem::new(ItemId::Num(2), "b", 1.0, 5),
        ]);
        let stats = ResultStats::from_result(&result, 50.0);

        assert_eq!(stats.area_total, 15.0);
        assert_eq!(stats.profit_total, 50.0);
        assert!((stats.utilization - 30.0).abs() < 1e-9);
        assert!((stats.utilization_fraction() - 0.3).abs() < 1e-9);
        assert!(stats.parameters.is_empty());
        assert_eq!(stats.best_fitness, None);
    }

    #[test]
    fn utilization_bar_is_clamped() {
        let mut result = OptimizationResult::from_items(Vec::new());
        result.area_utilization = Some(140.0);
        let stats = ResultStats::from_result(&result, 50.0);
        assert_eq!(stats.utilization_fraction(), 1.0);
        assert_eq!(stats.area_total, 0.0);
        assert!(stats.area_total.is_sign_positive());
    }
}
