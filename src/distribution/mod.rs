pub mod stats;
pub mod validate;

use std::fmt;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::Deserialize;
use thiserror::Error;

/// Opaque item identifier as delivered by the optimizer (numeric or text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Num(i64),
    Text(CompactString),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Num(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// One selected catalog item and how many instances the optimizer assigned.
///
/// Field names follow the optimizer's JSON payload through serde renames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistributionItem {
    pub id: ItemId,
    #[serde(rename = "nombre")]
    pub name: CompactString,
    /// Real-world area of a single instance (m²).
    pub area: f64,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "areaTotal", default)]
    area_total: Option<f64>,
    #[serde(rename = "gananciaTotal", default)]
    pub profit_total: f64,
    #[serde(rename = "ganancia", default)]
    pub unit_profit: Option<f64>,
}

impl DistributionItem {
    pub fn new(id: ItemId, name: impl Into<CompactString>, area: f64, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            area,
            quantity,
            area_total: Some(area * quantity as f64),
            profit_total: 0.0,
            unit_profit: None,
        }
    }

    pub fn with_profit(mut self, unit_profit: f64) -> Self {
        self.unit_profit = Some(unit_profit);
        self.profit_total = unit_profit * self.quantity as f64;
        self
    }

    /// Override the caller-supplied aggregate area (it is not recomputed).
    pub fn with_area_total(mut self, area_total: f64) -> Self {
        self.area_total = Some(area_total);
        self
    }

    /// Aggregate area as supplied by the caller, derived when the payload omitted it.
    pub fn area_total(&self) -> f64 {
        self.area_total
            .unwrap_or_else(|| self.area * self.quantity as f64)
    }
}

/// Parameters the optimizer ran with; carried for display only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunParameters {
    #[serde(rename = "tamPoblacion")]
    pub population_size: Option<u32>,
    #[serde(rename = "numGeneraciones")]
    pub generations: Option<u32>,
    #[serde(rename = "probCruce")]
    pub crossover_probability: Option<f64>,
    #[serde(rename = "probMutacion")]
    pub mutation_probability: Option<f64>,
    #[serde(rename = "tipoSeleccion")]
    pub selection: Option<String>,
    pub torneo_k: Option<u32>,
    #[serde(rename = "elitismo")]
    pub elitism: Option<u32>,
    #[serde(rename = "semilla")]
    pub seed: Option<i64>,
}

/// Full optimization result payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptimizationResult {
    #[serde(rename = "distribucion")]
    pub distribution: Vec<DistributionItem>,
    #[serde(rename = "mejorSolucion", default)]
    pub best_solution: Vec<u32>,
    #[serde(rename = "areaTotal", default)]
    pub area_total: Option<f64>,
    #[serde(rename = "gananciaTotal", default)]
    pub profit_total: Option<f64>,
    #[serde(rename = "utilizacionArea", default)]
    pub area_utilization: Option<f64>,
    #[serde(rename = "historialFitness", default)]
    pub fitness_history: Vec<f64>,
    #[serde(rename = "parametros", default)]
    pub parameters: RunParameters,
}

impl OptimizationResult {
    pub fn from_items(distribution: Vec<DistributionItem>) -> Self {
        Self {
            distribution,
            ..Default::default()
        }
    }

    /// Total requested instances across the distribution.
    pub fn requested_instances(&self) -> u64 {
        self.distribution.iter().map(|i| i.quantity as u64).sum()
    }
}

/// Accepted on-disk shapes: the optimizer's full response, or just its distribution.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResultFile {
    Full(OptimizationResult),
    Items(Vec<DistributionItem>),
}

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid result JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a result from a JSON string.
pub fn parse_result(json: &str) -> Result<OptimizationResult, DistributionError> {
    let file: ResultFile = serde_json::from_str(json)?;
    Ok(match file {
        ResultFile::Full(result) => result,
        ResultFile::Items(items) => OptimizationResult::from_items(items),
    })
}

/// Load a result file from disk.
pub fn load_result(path: &Path) -> Result<OptimizationResult, DistributionError> {
    let json = std::fs::read_to_string(path).map_err(|source| DistributionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let result = parse_result(&json)?;
    tracing::info!(
        "Loaded {} distribution items ({} instances) from {}",
        result.distribution.len(),
        result.requested_instances(),
        path.display()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "mejorSolucion": [3, 0, 1],
        "distribucion": [
            {"id": 1, "nombre": "Mini nevera", "cantidad": 3, "area": 0.25,
             "ganancia": 40, "areaTotal": 0.75, "gananciaTotal": 120},
            {"id": 3, "nombre": "Lavadora", "cantidad": 1, "area": 0.36,
             "ganancia": 90, "areaTotal": 0.36, "gananciaTotal": 90}
        ],
        "areaTotal": 1.11,
        "gananciaTotal": 210,
        "utilizacionArea": 2.22,
        "historialFitness": [150.0, 190.0, 210.0],
        "parametros": {"tamPoblacion": 100, "numGeneraciones": 3, "probCruce": 0.6,
                       "probMutacion": 0.15, "tipoSeleccion": "torneo", "torneoK": 3,
                       "elitismo": 2, "semilla": 42}
    }"#;

    #[test]
    fn parses_full_optimizer_response() {
        let result = parse_result(RESPONSE).unwrap();
        assert_eq!(result.distribution.len(), 2);
        assert_eq!(result.distribution[0].name, "Mini nevera");
        assert_eq!(result.distribution[0].id, ItemId::Num(1));
        assert_eq!(result.distribution[1].quantity, 1);
        assert_eq!(result.fitness_history, vec![150.0, 190.0, 210.0]);
        assert_eq!(result.parameters.torneo_k, Some(3));
        assert_eq!(result.parameters.selection.as_deref(), Some("torneo"));
        assert_eq!(result.requested_instances(), 4);
    }

    #[test]
    fn parses_bare_item_array_and_derives_area_total() {
        let json = r#"[{"id": "a", "nombre": "Plancha", "cantidad": 4, "area": 0.5}]"#;
        let result = parse_result(json).unwrap();
        let item = &result.distribution[0];
        assert_eq!(item.id, ItemId::Text("a".into()));
        assert_eq!(item.area_total(), 2.0);
        assert_eq!(item.profit_total, 0.0);
        assert!(result.fitness_history.is_empty());
    }

    #[test]
    fn rejects_negative_quantity() {
        let json = r#"[{"id": 1, "nombre": "x", "cantidad": -1, "area": 1.0}]"#;
        assert!(matches!(parse_result(json), Err(DistributionError::Json(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_result(Path::new("/nonexistent/result.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/result.json"));
    }
}
