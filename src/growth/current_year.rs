use serde::{Deserialize, Serialize};

use super::allometry::{basal_area_at, density_at, height_at, volume_at, Thinning};
use super::carbon::carbon_dioxide_equivalent;
use crate::error::ForestError;
use crate::models::{Stand, TreeSpecies};

/// Saw-wood share of conifer volume at bonitet 0.
pub const SAW_WOOD_MIN: f64 = 0.5;
/// Saw-wood share of conifer volume at and above [`SAW_WOOD_FULL_BONITET`].
pub const SAW_WOOD_MAX: f64 = 0.7;
pub const SAW_WOOD_FULL_BONITET: f64 = 20.0;

/// Settings the current-year calculation depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentYearSettings {
    /// Density, basal area and current volume are only computed from this age on.
    pub age_floor: f64,
    /// Multiplier from volume with bark to volume without bark.
    pub bark_factor: f64,
}

impl Default for CurrentYearSettings {
    fn default() -> Self {
        Self {
            age_floor: 5.0,
            bark_factor: 0.86,
        }
    }
}

/// One year of growth from the snapshot state, plus derived value metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentYearGrowth {
    pub yearly_height_growth: Option<f64>,
    pub delta_n_per_hectare: Option<f64>,
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
}

/// Share of the volume sold as saw wood.
///
/// Zero for broadleaves; for conifers a linear ramp from 50 % at bonitet 0 to
/// 70 % at bonitet 20, flat above.
pub fn saw_wood_portion(species: TreeSpecies, bonitet: Option<f64>) -> Option<f64> {
    if !species.is_conifer() {
        return Some(0.0);
    }
    let bonitet = bonitet?;
    if bonitet >= SAW_WOOD_FULL_BONITET {
        Some(SAW_WOOD_MAX)
    } else {
        let share = bonitet.max(0.0) / SAW_WOOD_FULL_BONITET;
        Some(SAW_WOOD_MIN + (SAW_WOOD_MAX - SAW_WOOD_MIN) * share)
    }
}

/// Grow a stand from its current age to the next and derive volume, value
/// and carbon metrics.
///
/// Pure in the stand seed: calling it twice on the same stand gives the same
/// result. Errors only on numeric domain violations.
pub fn compute_current_year(
    stand: &Stand,
    ht40: Option<f64>,
    settings: &CurrentYearSettings,
) -> Result<CurrentYearGrowth, ForestError> {
    let species = stand.species;
    let age = stand.age;
    let next_age = age.map(|a| a + 1.0);
    let past_floor = age.is_some_and(|a| a >= settings.age_floor);

    let next_height = height_at(species, stand.height, age, next_age)?;
    let yearly_height_growth = diff(next_height, stand.height);

    let next_density = if past_floor {
        density_at(
            species,
            stand.n_per_hectare,
            age,
            next_age,
            ht40,
            Thinning::NONE,
        )?
    } else {
        None
    };
    let delta_n_per_hectare = diff(next_density, stand.n_per_hectare);

    let g2 = if past_floor {
        basal_area_at(
            species,
            stand.basal_area,
            age,
            next_age,
            stand.height,
            sum(stand.height, yearly_height_growth),
            stand.n_per_hectare,
            sum(stand.n_per_hectare, delta_n_per_hectare),
            Thinning::NONE,
        )?
    } else {
        None
    };

    let computed_volume = if past_floor {
        volume_at(species, stand.basal_area, stand.height, age, Thinning::NONE)?
    } else {
        None
    };
    let volume_per_hectare = computed_volume.or(stand.reference_volume);
    let volume_per_hectare_next_year = volume_at(
        species,
        g2,
        sum(stand.height, yearly_height_growth),
        next_age,
        Thinning::NONE,
    )?;

    let volume = stand.per_hectare_to_absolute(volume_per_hectare);
    let volume_next_year = stand.per_hectare_to_absolute(volume_per_hectare_next_year);
    let volume_growth_next_year = diff(volume_next_year, volume);
    let volume_growth_factor = match (volume_next_year, volume) {
        (Some(next), Some(current)) if current != 0.0 => Some(next / current - 1.0),
        _ => None,
    };

    Ok(CurrentYearGrowth {
        yearly_height_growth,
        delta_n_per_hectare,
        g2,
        volume_per_hectare,
        volume_per_hectare_next_year,
        volume_per_hectare_without_bark: volume_per_hectare.map(|v| v * settings.bark_factor),
        volume,
        volume_next_year,
        volume_growth_next_year,
        volume_growth_factor,
        saw_wood_portion: saw_wood_portion(species, stand.bonitet),
        volume_without_bark: volume.map(|v| v * settings.bark_factor),
        carbon_stored: volume.map(carbon_dioxide_equivalent),
        carbon_captured_next_year: volume_growth_next_year.map(carbon_dioxide_equivalent),
    })
}

fn diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

fn sum(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? + b?)
}
