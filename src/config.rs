//! Engine configuration, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ForestError;
use crate::growth::{
    read_site_index_csv, CurrentYearSettings, SiteIndexRow, SiteIndexTable,
    DEFAULT_YIELD_REQUIREMENT,
};
use crate::models::TreeSpecies;

/// Settings for a growth engine run.
///
/// ```toml
/// yield_requirement = 0.025
/// parallel = false
///
/// [site_index]
/// spruce_csv = "tables/gran_h40.csv"
/// pine = [{ bonitet = 11, ht40 = 9.2 }, { bonitet = 14, ht40 = 11.9 }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Annual volume growth rate below which a stand counts as mature
    pub yield_requirement: f64,
    /// Age from which density, basal area and current volume are modelled
    pub current_year_age_floor: f64,
    /// Volume with bark to volume without bark
    pub bark_factor: f64,
    /// Evaluate stands on the rayon thread pool
    pub parallel: bool,
    pub site_index: SiteIndexConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let current_year = CurrentYearSettings::default();
        Self {
            yield_requirement: DEFAULT_YIELD_REQUIREMENT,
            current_year_age_floor: current_year.age_floor,
            bark_factor: current_year.bark_factor,
            parallel: true,
            site_index: SiteIndexConfig::default(),
        }
    }
}

/// Overrides for the built-in bonitet tables. Inline rows win over CSV files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteIndexConfig {
    pub spruce: Option<Vec<SiteIndexRow>>,
    pub pine: Option<Vec<SiteIndexRow>>,
    pub spruce_csv: Option<PathBuf>,
    pub pine_csv: Option<PathBuf>,
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ForestError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file. Relative table paths resolve against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ForestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent() {
            for csv_path in [
                &mut config.site_index.spruce_csv,
                &mut config.site_index.pine_csv,
            ]
            .into_iter()
            .flatten()
            {
                if csv_path.is_relative() {
                    *csv_path = dir.join(&*csv_path);
                }
            }
        }
        Ok(config)
    }

    /// Override the yield requirement, re-validating it.
    pub fn with_yield_requirement(mut self, yield_requirement: f64) -> Result<Self, ForestError> {
        self.yield_requirement = yield_requirement;
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ForestError> {
        if !(self.yield_requirement > 0.0 && self.yield_requirement < 1.0) {
            return Err(ForestError::Config(format!(
                "yield_requirement must be in (0, 1), got {}",
                self.yield_requirement
            )));
        }
        if !(self.bark_factor > 0.0 && self.bark_factor <= 1.0) {
            return Err(ForestError::Config(format!(
                "bark_factor must be in (0, 1], got {}",
                self.bark_factor
            )));
        }
        if !self.current_year_age_floor.is_finite() || self.current_year_age_floor < 0.0 {
            return Err(ForestError::Config(format!(
                "current_year_age_floor must be a non-negative number, got {}",
                self.current_year_age_floor
            )));
        }
        Ok(())
    }

    /// Settings handed to the current-year calculator.
    pub fn current_year_settings(&self) -> CurrentYearSettings {
        CurrentYearSettings {
            age_floor: self.current_year_age_floor,
            bark_factor: self.bark_factor,
        }
    }

    /// Build the site index tables: built-in defaults, then CSV files, then inline rows.
    pub fn build_site_index(&self) -> Result<SiteIndexTable, ForestError> {
        let mut table = SiteIndexTable::default();
        let sources = [
            (
                TreeSpecies::Spruce,
                &self.site_index.spruce_csv,
                &self.site_index.spruce,
            ),
            (
                TreeSpecies::Pine,
                &self.site_index.pine_csv,
                &self.site_index.pine,
            ),
        ];
        for (species, csv_path, rows) in sources {
            if let Some(path) = csv_path {
                let loaded = read_site_index_csv(path)?;
                tracing::debug!(%species, path = %path.display(), rows = loaded.len(), "loaded site index table");
                table.set_rows(species, &loaded)?;
            }
            if let Some(rows) = rows {
                table.set_rows(species, rows)?;
            }
        }
        Ok(table)
    }
}
