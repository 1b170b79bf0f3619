use serde::{Deserialize, Serialize};

use super::species::TreeSpecies;
use crate::error::ForestError;

/// One row of the inventory snapshot, as delivered by the data store.
///
/// Field names follow the snapshot columns. Numeric fields may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandRecord {
    pub bestand_id: String,
    /// Species label, e.g. `Gran`, `Furu`, `Bjørk / lauv`
    #[serde(default)]
    pub treslag: String,
    /// Site productivity class
    #[serde(default)]
    pub bonitet: Option<f64>,
    /// Stand area in square meters
    #[serde(default)]
    pub arealm2: Option<f64>,
    /// Stand age in years
    #[serde(default)]
    pub alder: Option<f64>,
    /// Dominant height in decimeters
    #[serde(default)]
    pub srhoydeo: Option<f64>,
    /// Trees per hectare
    #[serde(default)]
    pub srtrean: Option<f64>,
    /// Basal area in m²/ha
    #[serde(default)]
    pub srgrflate: Option<f64>,
    /// Reference volume with bark in m³/ha
    #[serde(default)]
    pub srvolmb: Option<f64>,
    /// Cutting class, passed through untouched
    #[serde(default)]
    pub hogstkl_verdi: Option<f64>,
    /// Reference volume without bark in m³/ha, passed through untouched
    #[serde(default)]
    pub srvolub: Option<f64>,
}

impl StandRecord {
    /// Validate the fields the engine cannot do without.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.bestand_id.trim().is_empty() {
            return Err(ForestError::ValidationError(
                "bestand_id must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("bonitet", self.bonitet),
            ("arealm2", self.arealm2),
            ("alder", self.alder),
            ("srhoydeo", self.srhoydeo),
            ("srtrean", self.srtrean),
            ("srgrflate", self.srgrflate),
            ("srvolmb", self.srvolmb),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ForestError::ValidationError(format!(
                        "Stand {}: {name} must be finite, got {v}",
                        self.bestand_id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A stand seeded for simulation.
///
/// Seeds are derived once from the snapshot row and never mutated; every
/// projected quantity is computed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stand {
    pub id: String,
    pub species: TreeSpecies,
    pub bonitet: Option<f64>,
    pub area_m2: Option<f64>,
    pub age: Option<f64>,
    /// Dominant height in meters
    pub height: Option<f64>,
    /// Trees per hectare
    pub n_per_hectare: Option<f64>,
    /// Basal area in m²/ha
    pub basal_area: Option<f64>,
    /// Snapshot volume with bark (m³/ha), used when the volume equation is undefined
    pub reference_volume: Option<f64>,
}

impl Stand {
    /// Seed a stand from a snapshot row. Height arrives in decimeters.
    pub fn from_record(record: &StandRecord) -> Self {
        Self {
            id: record.bestand_id.clone(),
            species: TreeSpecies::from_label(&record.treslag),
            bonitet: record.bonitet,
            area_m2: record.arealm2,
            age: record.alder,
            height: record.srhoydeo.map(|dm| dm / 10.0),
            n_per_hectare: record.srtrean,
            basal_area: record.srgrflate,
            reference_volume: record.srvolmb,
        }
    }

    /// Area in hectares, defined only for a positive area.
    pub fn area_hectares(&self) -> Option<f64> {
        self.area_m2.filter(|a| *a > 0.0).map(|a| a / 10_000.0)
    }

    /// Convert a per-hectare quantity to a whole-stand quantity.
    pub fn per_hectare_to_absolute(&self, per_hectare: Option<f64>) -> Option<f64> {
        Some(per_hectare? * self.area_hectares()?)
    }
}
