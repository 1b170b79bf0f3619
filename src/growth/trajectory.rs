use serde::{Deserialize, Serialize};

use super::allometry::{basal_area_at, density_at, height_at, volume_at, Thinning};
use crate::error::ForestError;
use crate::models::Stand;

/// Number of projected years after the seed year.
pub const HORIZON: usize = 100;

/// A per-year sequence for one state variable, indexed 0..=[`HORIZON`].
///
/// Index 0 is the seed. Values are stored densely up to a cutoff: once a year
/// is undefined every later year is undefined too, and the type cannot
/// express anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: [f64; HORIZON + 1],
    defined: usize,
}

impl Series {
    /// Start a series from its seed value.
    pub fn seeded(seed: Option<f64>) -> Self {
        let mut series = Self {
            values: [f64::NAN; HORIZON + 1],
            defined: 0,
        };
        series.set(0, seed);
        series
    }

    /// Record year `year`. Only extends the series when every earlier year
    /// is defined; otherwise the value is dropped.
    fn set(&mut self, year: usize, value: Option<f64>) {
        if let Some(v) = value {
            if year == self.defined && year <= HORIZON {
                self.values[year] = v;
                self.defined += 1;
            }
        }
    }

    /// Value at `year`, `None` past the cutoff.
    pub fn get(&self, year: usize) -> Option<f64> {
        (year < self.defined).then(|| self.values[year])
    }

    /// Number of defined years, counting the seed. Also the first undefined index.
    pub fn defined_len(&self) -> usize {
        self.defined
    }

    /// The defined prefix.
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.defined]
    }

    /// All years, undefined ones as `None`.
    pub fn to_vec(&self) -> Vec<Option<f64>> {
        (0..=HORIZON).map(|year| self.get(year)).collect()
    }
}

/// The four coupled trajectories of one stand plus the derived growth rate.
#[derive(Debug, Clone, PartialEq)]
pub struct StandProjection {
    /// Stand age at index 0
    pub start_age: Option<f64>,
    pub height: Series,
    pub density: Series,
    pub basal_area: Series,
    pub volume: Series,
    /// Relative volume growth from year k-1 to k; index 0 is always `None`.
    pub growth_rate: Vec<Option<f64>>,
}

/// One projected year, flattened for display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedYear {
    pub year: usize,
    pub age: Option<f64>,
    pub height: Option<f64>,
    pub n_per_hectare: Option<f64>,
    pub basal_area: Option<f64>,
    pub volume_per_hectare: Option<f64>,
    pub growth_rate: Option<f64>,
}

impl StandProjection {
    /// Year-by-year rows for every index 0..=HORIZON.
    pub fn years(&self) -> Vec<ProjectedYear> {
        (0..=HORIZON)
            .map(|year| ProjectedYear {
                year,
                age: self.start_age.map(|a| a + year as f64),
                height: self.height.get(year),
                n_per_hectare: self.density.get(year),
                basal_area: self.basal_area.get(year),
                volume_per_hectare: self.volume.get(year),
                growth_rate: self.growth_rate[year],
            })
            .collect()
    }
}

/// Relative change between consecutive volumes.
///
/// Defined at `k >= 1` only when both volumes are defined and the earlier one
/// is non-zero.
pub fn growth_rates(volume: &Series) -> Vec<Option<f64>> {
    let mut rates = vec![None; HORIZON + 1];
    for (k, rate) in rates.iter_mut().enumerate().skip(1) {
        if let (Some(prev), Some(cur)) = (volume.get(k - 1), volume.get(k)) {
            if prev != 0.0 {
                *rate = Some((cur - prev) / prev);
            }
        }
    }
    rates
}

/// Project a stand [`HORIZON`] years ahead.
///
/// `ht40` is the stand's site index and `seed_volume` its current volume per
/// hectare (which may be the snapshot fallback volume). Years are computed
/// strictly in order; each depends on the one before.
pub fn project_stand(
    stand: &Stand,
    ht40: Option<f64>,
    seed_volume: Option<f64>,
) -> Result<StandProjection, ForestError> {
    let species = stand.species;
    let mut height = Series::seeded(stand.height);
    let mut density = Series::seeded(stand.n_per_hectare);
    let mut basal_area = Series::seeded(stand.basal_area);
    let mut volume = Series::seeded(seed_volume);

    for k in 1..=HORIZON {
        let a1 = stand.age.map(|a| a + (k - 1) as f64);
        let a2 = stand.age.map(|a| a + k as f64);

        let h = height_at(species, height.get(k - 1), a1, a2)?;
        height.set(k, h);

        let n = density_at(species, density.get(k - 1), a1, a2, ht40, Thinning::NONE)?;
        density.set(k, n);

        let g = basal_area_at(
            species,
            basal_area.get(k - 1),
            a1,
            a2,
            height.get(k - 1),
            height.get(k),
            density.get(k - 1),
            density.get(k),
            Thinning::NONE,
        )?;
        basal_area.set(k, g);

        // The volume series also needs its own previous year to stay contiguous.
        let v = if volume.get(k - 1).is_some() {
            volume_at(species, basal_area.get(k), height.get(k), a2, Thinning::NONE)?
        } else {
            None
        };
        volume.set(k, v);
    }

    let growth_rate = growth_rates(&volume);
    Ok(StandProjection {
        start_age: stand.age,
        height,
        density,
        basal_area,
        volume,
        growth_rate,
    })
}
