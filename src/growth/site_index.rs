use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ForestError;
use crate::models::TreeSpecies;

/// One row of a bonitet table: site class and its reference height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteIndexRow {
    #[serde(alias = "H40")]
    pub bonitet: u32,
    #[serde(alias = "Ht40")]
    pub ht40: f64,
}

/// Built-in spruce table: H40 site class -> dominant height (m) at total age 40.
const SPRUCE_HT40: [(u32, f64); 8] = [
    (6, 4.5),
    (8, 6.2),
    (11, 8.9),
    (14, 11.6),
    (17, 14.4),
    (20, 17.3),
    (23, 20.2),
    (26, 23.1),
];

/// Built-in pine table: H40 site class -> dominant height (m) at total age 40.
const PINE_HT40: [(u32, f64); 7] = [
    (6, 4.8),
    (8, 6.5),
    (11, 9.2),
    (14, 11.9),
    (17, 14.7),
    (20, 17.5),
    (23, 20.3),
];

/// Static bonitet -> Ht40 tables, one per species with growth equations.
///
/// Loaded once at engine construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteIndexTable {
    spruce: BTreeMap<u32, f64>,
    pine: BTreeMap<u32, f64>,
}

impl Default for SiteIndexTable {
    fn default() -> Self {
        Self {
            spruce: SPRUCE_HT40.into_iter().collect(),
            pine: PINE_HT40.into_iter().collect(),
        }
    }
}

impl SiteIndexTable {
    /// Build a table from explicit rows. Duplicate site classes are rejected.
    pub fn from_rows(
        spruce: &[SiteIndexRow],
        pine: &[SiteIndexRow],
    ) -> Result<Self, ForestError> {
        Ok(Self {
            spruce: collect_rows("spruce", spruce)?,
            pine: collect_rows("pine", pine)?,
        })
    }

    /// Replace one species' table.
    pub fn set_rows(
        &mut self,
        species: TreeSpecies,
        rows: &[SiteIndexRow],
    ) -> Result<(), ForestError> {
        match species {
            TreeSpecies::Spruce => self.spruce = collect_rows("spruce", rows)?,
            TreeSpecies::Pine => self.pine = collect_rows("pine", rows)?,
            TreeSpecies::Other => {
                return Err(ForestError::Config(
                    "site index tables exist only for spruce and pine".to_string(),
                ))
            }
        }
        Ok(())
    }

    /// Look up Ht40 for a stand.
    ///
    /// Exact match only: a fractional bonitet, an unknown site class, or a
    /// species without a table yields `None`.
    pub fn lookup(&self, species: TreeSpecies, bonitet: Option<f64>) -> Option<f64> {
        let bonitet = bonitet?;
        if bonitet < 0.0 || bonitet.fract() != 0.0 || bonitet > u32::MAX as f64 {
            return None;
        }
        self.rows(species)?.get(&(bonitet as u32)).copied()
    }

    /// The table for a species, if it has one.
    pub fn rows(&self, species: TreeSpecies) -> Option<&BTreeMap<u32, f64>> {
        match species {
            TreeSpecies::Spruce => Some(&self.spruce),
            TreeSpecies::Pine => Some(&self.pine),
            TreeSpecies::Other => None,
        }
    }
}

fn collect_rows(name: &str, rows: &[SiteIndexRow]) -> Result<BTreeMap<u32, f64>, ForestError> {
    let mut map = BTreeMap::new();
    for row in rows {
        if !row.ht40.is_finite() || row.ht40 <= 0.0 {
            return Err(ForestError::Config(format!(
                "{name} site index for bonitet {} must be positive, got {}",
                row.bonitet, row.ht40
            )));
        }
        if map.insert(row.bonitet, row.ht40).is_some() {
            return Err(ForestError::Config(format!(
                "duplicate bonitet {} in {name} site index table",
                row.bonitet
            )));
        }
    }
    Ok(map)
}

fn parse_site_index_csv<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<SiteIndexRow>, ForestError> {
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: SiteIndexRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Read a bonitet table from a CSV file with columns `H40,Ht40`.
///
/// Extra columns are ignored, so exported calculation sheets load as-is.
pub fn read_site_index_csv(path: impl AsRef<Path>) -> Result<Vec<SiteIndexRow>, ForestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    parse_site_index_csv(&mut rdr)
}

/// Read a bonitet table from CSV bytes.
pub fn read_site_index_csv_from_bytes(data: &[u8]) -> Result<Vec<SiteIndexRow>, ForestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    parse_site_index_csv(&mut rdr)
}
