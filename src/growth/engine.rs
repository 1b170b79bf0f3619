use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::current_year::{compute_current_year, CurrentYearGrowth};
use super::maturity::{resolve_maturity, Maturity};
use super::site_index::SiteIndexTable;
use super::trajectory::{project_stand, StandProjection};
use crate::config::EngineConfig;
use crate::error::ForestError;
use crate::models::{Stand, StandRecord, StandResult};

/// Runs the full per-stand pipeline over a batch of snapshot rows.
///
/// Site-index lookup, current-year growth, the 100-year projection and the
/// maturity scan are applied to each stand independently. The lookup tables
/// are loaded once in [`GrowthEngine::new`] and only read afterwards.
#[derive(Debug, Clone)]
pub struct GrowthEngine {
    config: EngineConfig,
    site_index: SiteIndexTable,
}

impl GrowthEngine {
    /// Validate the configuration and load its site index tables.
    pub fn new(config: EngineConfig) -> Result<Self, ForestError> {
        config.validate()?;
        let site_index = config.build_site_index()?;
        Ok(Self { config, site_index })
    }

    /// Build an engine around an already loaded table.
    pub fn with_site_index(
        config: EngineConfig,
        site_index: SiteIndexTable,
    ) -> Result<Self, ForestError> {
        config.validate()?;
        Ok(Self { config, site_index })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn site_index(&self) -> &SiteIndexTable {
        &self.site_index
    }

    /// Evaluate a batch. The result has one row per input row, in input order.
    ///
    /// An empty batch, an empty `bestand_id` or a repeated `bestand_id` rejects
    /// the whole batch. Problems inside a single stand only fail that row.
    pub fn run(&self, records: &[StandRecord]) -> Result<Vec<StandResult>, ForestError> {
        if records.is_empty() {
            return Err(ForestError::MissingInput(
                "stand batch is empty".to_string(),
            ));
        }
        check_ids(records)?;

        info!(
            stands = records.len(),
            yield_requirement = self.config.yield_requirement,
            parallel = self.config.parallel,
            "evaluating stand batch"
        );
        let results: Vec<StandResult> = if self.config.parallel {
            records.par_iter().map(|r| self.evaluate(r)).collect()
        } else {
            records.iter().map(|r| self.evaluate(r)).collect()
        };

        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!(stands = results.len(), failed, "stand batch done");
        Ok(results)
    }

    /// Evaluate one stand. Never fails: a domain error leaves every computed
    /// column `None` and is recorded in the row's `error` column.
    pub fn evaluate(&self, record: &StandRecord) -> StandResult {
        let mut result = StandResult::from_record(record, self.config.yield_requirement);
        let stand = Stand::from_record(record);
        let ht40 = self.site_index.lookup(stand.species, stand.bonitet);
        result.height = stand.height;
        result.n_per_hectare = stand.n_per_hectare;
        result.g1 = stand.basal_area;
        result.ht40 = ht40;

        let outcome = record
            .validate()
            .and_then(|_| self.compute(&stand, ht40))
            .map_err(|e| e.for_stand(&stand.id));
        match outcome {
            Ok((growth, maturity)) => {
                apply_growth(&mut result, growth);
                if let Some(m) = maturity {
                    result.years_to_maturity = Some(m.years_to_maturity);
                    result.volume_at_maturity = m.volume_at_maturity;
                    result.volume_at_maturity_without_bark = m.volume_at_maturity_without_bark;
                }
            }
            Err(e) => {
                warn!(stand = %stand.id, error = %e, "stand failed");
                result.error = Some(e.to_string());
            }
        }
        result
    }

    /// Project one stand 100 years ahead from its current volume.
    pub fn project(&self, record: &StandRecord) -> Result<StandProjection, ForestError> {
        record.validate()?;
        let stand = Stand::from_record(record);
        let ht40 = self.site_index.lookup(stand.species, stand.bonitet);
        let settings = self.config.current_year_settings();
        let growth = compute_current_year(&stand, ht40, &settings)
            .map_err(|e| e.for_stand(&stand.id))?;
        project_stand(&stand, ht40, growth.volume_per_hectare).map_err(|e| e.for_stand(&stand.id))
    }

    fn compute(
        &self,
        stand: &Stand,
        ht40: Option<f64>,
    ) -> Result<(CurrentYearGrowth, Option<Maturity>), ForestError> {
        let settings = self.config.current_year_settings();
        let growth = compute_current_year(stand, ht40, &settings)?;
        debug!(stand = %stand.id, species = %stand.species, ?ht40, volume = ?growth.volume, "current year");

        let projection = project_stand(stand, ht40, growth.volume_per_hectare)?;
        debug!(
            stand = %stand.id,
            volume_years = projection.volume.defined_len(),
            "projected trajectory"
        );

        let maturity = resolve_maturity(
            stand,
            &projection,
            growth.volume_growth_next_year,
            self.config.yield_requirement,
            self.config.bark_factor,
        );
        debug!(stand = %stand.id, years_to_maturity = ?maturity.as_ref().map(|m| m.years_to_maturity), "maturity");
        Ok((growth, maturity))
    }
}

impl Default for GrowthEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            site_index: SiteIndexTable::default(),
        }
    }
}

fn check_ids(records: &[StandRecord]) -> Result<(), ForestError> {
    let mut seen = HashSet::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if record.bestand_id.trim().is_empty() {
            return Err(ForestError::ValidationError(format!(
                "row {}: bestand_id must not be empty",
                i + 1
            )));
        }
        if !seen.insert(record.bestand_id.as_str()) {
            return Err(ForestError::ValidationError(format!(
                "duplicate bestand_id '{}'",
                record.bestand_id
            )));
        }
    }
    Ok(())
}

fn apply_growth(result: &mut StandResult, growth: CurrentYearGrowth) {
    result.yearly_height_growth = growth.yearly_height_growth;
    result.delta_n_per_hectare = growth.delta_n_per_hectare;
    result.g2 = growth.g2;
    result.volume_per_hectare = growth.volume_per_hectare;
    result.volume_per_hectare_next_year = growth.volume_per_hectare_next_year;
    result.volume_per_hectare_without_bark = growth.volume_per_hectare_without_bark;
    result.volume = growth.volume;
    result.volume_next_year = growth.volume_next_year;
    result.volume_growth_next_year = growth.volume_growth_next_year;
    result.volume_growth_factor = growth.volume_growth_factor;
    result.saw_wood_portion = growth.saw_wood_portion;
    result.volume_without_bark = growth.volume_without_bark;
    result.carbon_stored = growth.carbon_stored;
    result.carbon_captured_next_year = growth.carbon_captured_next_year;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::carbon::carbon_dioxide_equivalent;
    use assert_approx_eq::assert_approx_eq;

    fn record(id: &str, treslag: &str, bonitet: f64) -> StandRecord {
        StandRecord {
            bestand_id: id.to_string(),
            treslag: treslag.to_string(),
            bonitet: Some(bonitet),
            arealm2: Some(10_000.0),
            alder: Some(40.0),
            srhoydeo: Some(120.0),
            srtrean: Some(800.0),
            srgrflate: Some(20.0),
            srvolmb: Some(150.0),
            ..Default::default()
        }
    }

    fn sequential() -> GrowthEngine {
        let config = EngineConfig {
            parallel: false,
            ..Default::default()
        };
        GrowthEngine::new(config).unwrap()
    }

    #[test]
    fn test_reference_spruce_stand() {
        let engine = sequential();
        let r = engine.evaluate(&record("1", "Gran", 17.0));
        assert!(r.error.is_none());
        assert_eq!(r.ht40, Some(14.4));
        assert_eq!(r.height, Some(12.0));
        assert_approx_eq!(r.yearly_height_growth.unwrap(), 0.238953637523991, 1e-9);
        assert_approx_eq!(r.volume.unwrap(), 102.67034104379515, 1e-9);
        assert_approx_eq!(r.volume_next_year.unwrap(), 108.81886701152128, 1e-6);
        assert_eq!(r.years_to_maturity, Some(22));
        assert_approx_eq!(r.volume_at_maturity.unwrap(), 254.78968199271375, 1e-4);
        assert_approx_eq!(
            r.carbon_stored.unwrap(),
            carbon_dioxide_equivalent(r.volume.unwrap()),
            1e-9
        );
        assert_eq!(r.yield_requirement, 0.03);
    }

    #[test]
    fn test_reference_pine_stand() {
        let engine = sequential();
        let r = engine.evaluate(&record("1", "Furu", 17.0));
        assert!(r.error.is_none());
        assert_eq!(r.ht40, Some(14.7));
        assert_approx_eq!(r.volume.unwrap(), 110.01109563394046, 1e-9);
        assert_eq!(r.years_to_maturity, Some(21));
    }

    #[test]
    fn test_other_species_passes_through() {
        let engine = sequential();
        let r = engine.evaluate(&record("1", "Bjørk / lauv", 17.0));
        assert!(r.error.is_none());
        assert_eq!(r.ht40, None);
        assert_eq!(r.yearly_height_growth, None);
        assert_eq!(r.g2, None);
        // Falls back to the snapshot volume.
        assert_eq!(r.volume_per_hectare, Some(150.0));
        assert_eq!(r.saw_wood_portion, Some(0.0));
        assert_eq!(r.years_to_maturity, None);
    }

    #[test]
    fn test_young_stand_has_no_growth() {
        let engine = sequential();
        let mut rec = record("1", "Gran", 17.0);
        rec.alder = Some(2.0);
        let r = engine.evaluate(&rec);
        assert!(r.error.is_none());
        assert_eq!(r.yearly_height_growth, None);
        assert_eq!(r.delta_n_per_hectare, None);
        assert_eq!(r.g2, None);
        assert_eq!(r.volume_per_hectare_next_year, None);
        assert_eq!(r.volume_growth_next_year, None);
        assert_eq!(r.years_to_maturity, None);
    }

    #[test]
    fn test_domain_error_fails_one_row() {
        let engine = sequential();
        let mut bad = record("bad", "Gran", 17.0);
        bad.srgrflate = Some(-5.0);
        let results = engine
            .run(&[record("ok", "Gran", 17.0), bad])
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].error.is_none());
        let failed = &results[1];
        assert!(failed.is_failed());
        assert!(failed.error.as_deref().unwrap().contains("bad"));
        assert_eq!(failed.volume, None);
        assert_eq!(failed.years_to_maturity, None);
        // Seeds still echo the input.
        assert_eq!(failed.g1, Some(-5.0));
    }

    #[test]
    fn test_non_finite_input_fails_one_row() {
        let engine = sequential();
        let mut bad = record("nan", "Furu", 14.0);
        bad.alder = Some(f64::NAN);
        let results = engine.run(&[bad]).unwrap();
        assert!(results[0].is_failed());
    }

    #[test]
    fn test_empty_batch() {
        let engine = sequential();
        assert!(matches!(engine.run(&[]), Err(ForestError::MissingInput(_))));
    }

    #[test]
    fn test_duplicate_ids() {
        let engine = sequential();
        let err = engine
            .run(&[record("7", "Gran", 17.0), record("7", "Furu", 14.0)])
            .unwrap_err();
        assert!(matches!(err, ForestError::ValidationError(_)));
    }

    #[test]
    fn test_empty_id() {
        let engine = sequential();
        let err = engine.run(&[record(" ", "Gran", 17.0)]).unwrap_err();
        assert!(matches!(err, ForestError::ValidationError(_)));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let records: Vec<StandRecord> = (0..40)
            .map(|i| {
                let mut r = record(&i.to_string(), if i % 2 == 0 { "Gran" } else { "Furu" }, 14.0);
                r.alder = Some(20.0 + i as f64);
                r
            })
            .collect();
        let seq = sequential().run(&records).unwrap();
        let par = GrowthEngine::new(EngineConfig::default())
            .unwrap()
            .run(&records)
            .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_yield_requirement_is_echoed() {
        let config = EngineConfig::default().with_yield_requirement(0.02).unwrap();
        let engine = GrowthEngine::new(config).unwrap();
        let r = engine.evaluate(&record("1", "Gran", 17.0));
        assert_eq!(r.yield_requirement, 0.02);
        // A lower requirement matures later.
        assert!(r.years_to_maturity.unwrap() > 22);
    }

    #[test]
    fn test_project_matches_evaluate() {
        let engine = sequential();
        let rec = record("1", "Gran", 17.0);
        let projection = engine.project(&rec).unwrap();
        let r = engine.evaluate(&rec);
        assert_eq!(projection.volume.get(0), r.volume_per_hectare);
        assert_eq!(projection.height.defined_len(), 101);
    }
}
