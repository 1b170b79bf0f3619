use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::allometry::AGE_FLOOR;
use crate::models::{StandRecord, StandResult, TreeSpecies};

/// Batch-level totals over enriched result rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_stands: usize,
    /// Rows with at least the current volume defined
    pub computed_stands: usize,
    pub failed_stands: usize,
    pub stands_with_maturity: usize,
    pub total_volume: f64,
    pub total_volume_at_maturity: f64,
    pub total_carbon_stored: f64,
    pub total_carbon_captured_next_year: f64,
    pub mean_years_to_maturity: Option<f64>,
    /// Sample standard deviation; needs at least two stands with a maturity year
    pub std_dev_years_to_maturity: Option<f64>,
}

impl BatchSummary {
    pub fn from_results(results: &[StandResult]) -> Self {
        let total = |f: fn(&StandResult) -> Option<f64>| results.iter().filter_map(f).sum::<f64>();
        let years: Vec<f64> = results
            .iter()
            .filter_map(|r| r.years_to_maturity)
            .map(f64::from)
            .collect();

        let mean_years_to_maturity = (!years.is_empty()).then(|| years.iter().mean());
        let std_dev_years_to_maturity = (years.len() >= 2).then(|| years.iter().std_dev());

        Self {
            total_stands: results.len(),
            computed_stands: results.iter().filter(|r| r.volume.is_some()).count(),
            failed_stands: results.iter().filter(|r| r.is_failed()).count(),
            stands_with_maturity: years.len(),
            total_volume: total(|r| r.volume),
            total_volume_at_maturity: total(|r| r.volume_at_maturity),
            total_carbon_stored: total(|r| r.carbon_stored),
            total_carbon_captured_next_year: total(|r| r.carbon_captured_next_year),
            mean_years_to_maturity,
            std_dev_years_to_maturity,
        }
    }
}

/// Pre-run overview of a snapshot: what the engine will be able to model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotOverview {
    pub total_stands: usize,
    pub spruce: usize,
    pub pine: usize,
    pub other: usize,
    /// Spruce and pine stands old enough for the growth equations
    pub modelled: usize,
    /// Stands younger than the allometric age floor
    pub too_young: usize,
    pub missing_age: usize,
    pub total_area_hectares: f64,
}

impl SnapshotOverview {
    pub fn from_records(records: &[StandRecord]) -> Self {
        let mut overview = Self {
            total_stands: records.len(),
            ..Default::default()
        };
        for record in records {
            let species = TreeSpecies::from_label(&record.treslag);
            match species {
                TreeSpecies::Spruce => overview.spruce += 1,
                TreeSpecies::Pine => overview.pine += 1,
                TreeSpecies::Other => overview.other += 1,
            }
            match record.alder {
                None => overview.missing_age += 1,
                Some(age) if age < AGE_FLOOR => overview.too_young += 1,
                Some(_) if species.has_growth_equations() => overview.modelled += 1,
                Some(_) => {}
            }
            if let Some(area) = record.arealm2.filter(|a| *a > 0.0) {
                overview.total_area_hectares += area / 10_000.0;
            }
        }
        overview
    }
}
