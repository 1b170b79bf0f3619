use serde::{Deserialize, Serialize};

use super::stand::StandRecord;

/// A snapshot row enriched with current-year and maturity metrics.
///
/// Every computed field is `None` when it could not be computed. Undefined
/// values stay distinct from zero; [`StandResult::filled_with_zero`] is the
/// caller's step, not the engine's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandResult {
    pub bestand_id: String,
    pub treslag: String,
    pub bonitet: Option<f64>,
    pub arealm2: Option<f64>,
    pub alder: Option<f64>,
    pub hogstkl_verdi: Option<f64>,
    pub srvolmb: Option<f64>,
    pub srvolub: Option<f64>,

    pub height: Option<f64>,
    #[serde(rename = "N_per_hectare")]
    pub n_per_hectare: Option<f64>,
    #[serde(rename = "G1")]
    pub g1: Option<f64>,
    #[serde(rename = "Ht40")]
    pub ht40: Option<f64>,

    pub yearly_height_growth: Option<f64>,
    #[serde(rename = "delta_N_per_hectare")]
    pub delta_n_per_hectare: Option<f64>,
    #[serde(rename = "G2")]
    pub g2: Option<f64>,
    pub volume_per_hectare: Option<f64>,
    pub volume_per_hectare_next_year: Option<f64>,
    pub volume_per_hectare_without_bark: Option<f64>,
    pub volume: Option<f64>,
    pub volume_next_year: Option<f64>,
    pub volume_growth_next_year: Option<f64>,
    pub volume_growth_factor: Option<f64>,
    pub saw_wood_portion: Option<f64>,
    pub volume_without_bark: Option<f64>,
    pub carbon_stored: Option<f64>,
    pub carbon_captured_next_year: Option<f64>,

    pub years_to_maturity: Option<u32>,
    pub volume_at_maturity: Option<f64>,
    pub volume_at_maturity_without_bark: Option<f64>,
    pub yield_requirement: f64,

    /// Set when a formula hit a numeric domain violation for this stand
    pub error: Option<String>,
}

impl StandResult {
    /// Start a result row from the snapshot row: passthrough columns only.
    pub fn from_record(record: &StandRecord, yield_requirement: f64) -> Self {
        Self {
            bestand_id: record.bestand_id.clone(),
            treslag: record.treslag.clone(),
            bonitet: record.bonitet,
            arealm2: record.arealm2,
            alder: record.alder,
            hogstkl_verdi: record.hogstkl_verdi,
            srvolmb: record.srvolmb,
            srvolub: record.srvolub,
            yield_requirement,
            ..Default::default()
        }
    }

    /// Whether this row failed with a domain error.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Copy of this row with every undefined numeric field replaced by zero.
    pub fn filled_with_zero(&self) -> Self {
        let z = |v: Option<f64>| Some(v.unwrap_or(0.0));
        Self {
            bestand_id: self.bestand_id.clone(),
            treslag: self.treslag.clone(),
            bonitet: z(self.bonitet),
            arealm2: z(self.arealm2),
            alder: z(self.alder),
            hogstkl_verdi: z(self.hogstkl_verdi),
            srvolmb: z(self.srvolmb),
            srvolub: z(self.srvolub),
            height: z(self.height),
            n_per_hectare: z(self.n_per_hectare),
            g1: z(self.g1),
            ht40: z(self.ht40),
            yearly_height_growth: z(self.yearly_height_growth),
            delta_n_per_hectare: z(self.delta_n_per_hectare),
            g2: z(self.g2),
            volume_per_hectare: z(self.volume_per_hectare),
            volume_per_hectare_next_year: z(self.volume_per_hectare_next_year),
            volume_per_hectare_without_bark: z(self.volume_per_hectare_without_bark),
            volume: z(self.volume),
            volume_next_year: z(self.volume_next_year),
            volume_growth_next_year: z(self.volume_growth_next_year),
            volume_growth_factor: z(self.volume_growth_factor),
            saw_wood_portion: z(self.saw_wood_portion),
            volume_without_bark: z(self.volume_without_bark),
            carbon_stored: z(self.carbon_stored),
            carbon_captured_next_year: z(self.carbon_captured_next_year),
            years_to_maturity: Some(self.years_to_maturity.unwrap_or(0)),
            volume_at_maturity: z(self.volume_at_maturity),
            volume_at_maturity_without_bark: z(self.volume_at_maturity_without_bark),
            yield_requirement: self.yield_requirement,
            error: self.error.clone(),
        }
    }
}
