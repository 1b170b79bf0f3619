use serde::{Deserialize, Serialize};

use super::trajectory::{StandProjection, HORIZON};
use crate::models::Stand;

/// Default yield requirement: 3 % annual volume growth.
pub const DEFAULT_YIELD_REQUIREMENT: f64 = 0.03;

/// First growth-rate index the scan looks at.
///
/// Year 1 rates come out too high (the seed volume may be the snapshot's
/// reference volume rather than the modelled one), which would put most
/// stands at maturity year 1. The scan therefore starts at year 2.
pub const FIRST_SCANNED_YEAR: usize = 2;

/// Where a stand reaches maturity and how much wood it holds then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maturity {
    /// First year the growth rate drops below the yield requirement;
    /// 0 when no year in range does, i.e. the stand is already mature.
    pub years_to_maturity: u32,
    pub volume_at_maturity: Option<f64>,
    pub volume_at_maturity_without_bark: Option<f64>,
}

/// First year in `FIRST_SCANNED_YEAR..=HORIZON` whose growth rate is below
/// `yield_requirement`, or 0. Undefined rates never match.
pub fn find_maturity_year(growth_rate: &[Option<f64>], yield_requirement: f64) -> u32 {
    growth_rate
        .iter()
        .enumerate()
        .take(HORIZON + 1)
        .skip(FIRST_SCANNED_YEAR)
        .find(|(_, rate)| rate.is_some_and(|r| r < yield_requirement))
        .map_or(0, |(year, _)| year as u32)
}

/// Resolve maturity for a stand.
///
/// Returns `None` unless the stand has a defined volume growth for the
/// coming year. The volume at maturity is read from the volume trajectory at
/// the maturity index, so maturity year 0 reports the seed-year volume.
pub fn resolve_maturity(
    stand: &Stand,
    projection: &StandProjection,
    volume_growth_next_year: Option<f64>,
    yield_requirement: f64,
    bark_factor: f64,
) -> Option<Maturity> {
    if volume_growth_next_year.is_none() {
        return None;
    }
    let year = find_maturity_year(&projection.growth_rate, yield_requirement);
    let volume_at_maturity =
        stand.per_hectare_to_absolute(projection.volume.get(year as usize));
    Some(Maturity {
        years_to_maturity: year,
        volume_at_maturity,
        volume_at_maturity_without_bark: volume_at_maturity.map(|v| v * bark_factor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::trajectory::project_stand;
    use crate::models::TreeSpecies;
    use assert_approx_eq::assert_approx_eq;

    fn rates(values: &[(usize, f64)]) -> Vec<Option<f64>> {
        let mut r = vec![None; HORIZON + 1];
        for &(k, v) in values {
            r[k] = Some(v);
        }
        r
    }

    fn spruce() -> Stand {
        Stand {
            id: "M-1".to_string(),
            species: TreeSpecies::Spruce,
            bonitet: Some(17.0),
            area_m2: Some(20_000.0),
            age: Some(40.0),
            height: Some(12.0),
            n_per_hectare: Some(800.0),
            basal_area: Some(20.0),
            reference_volume: None,
        }
    }

    #[test]
    fn test_first_year_below_requirement() {
        let r = rates(&[(2, 0.05), (3, 0.04), (4, 0.029), (5, 0.01)]);
        assert_eq!(find_maturity_year(&r, 0.03), 4);
    }

    #[test]
    fn test_year_one_is_ignored() {
        let mut r = rates(&[(1, 0.001)]);
        for rate in r.iter_mut().skip(2) {
            *rate = Some(0.05);
        }
        assert_eq!(find_maturity_year(&r, 0.03), 0);
    }

    #[test]
    fn test_year_two_can_match() {
        let r = rates(&[(1, 0.001), (2, 0.002)]);
        assert_eq!(find_maturity_year(&r, 0.03), 2);
    }

    #[test]
    fn test_no_match_is_zero() {
        let r = rates(&[(2, 0.5), (50, 0.2), (100, 0.031)]);
        assert_eq!(find_maturity_year(&r, 0.03), 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let r = rates(&[(2, 0.03), (3, 0.0299)]);
        assert_eq!(find_maturity_year(&r, 0.03), 3);
    }

    #[test]
    fn test_last_year_matches() {
        let r = rates(&[(100, 0.0)]);
        assert_eq!(find_maturity_year(&r, 0.03), 100);
    }

    #[test]
    fn test_resolve_requires_volume_growth() {
        let stand = spruce();
        let p = project_stand(&stand, Some(14.4), Some(102.67034104379515)).unwrap();
        assert!(resolve_maturity(&stand, &p, None, 0.03, 0.86).is_none());
    }

    #[test]
    fn test_resolve_reference_stand() {
        let stand = spruce();
        let p = project_stand(&stand, Some(14.4), Some(102.67034104379515)).unwrap();
        let m = resolve_maturity(&stand, &p, Some(12.3), 0.03, 0.86).unwrap();
        assert_eq!(m.years_to_maturity, 22);
        // Two hectares.
        assert_approx_eq!(m.volume_at_maturity.unwrap(), 2.0 * 254.78968199271375, 1e-4);
        assert_approx_eq!(
            m.volume_at_maturity_without_bark.unwrap(),
            0.86 * m.volume_at_maturity.unwrap(),
            1e-12
        );
    }

    #[test]
    fn test_never_mature_reports_seed_volume() {
        let stand = spruce();
        let p = project_stand(&stand, Some(14.4), Some(102.67034104379515)).unwrap();
        // A requirement no rate can undercut.
        let m = resolve_maturity(&stand, &p, Some(1.0), -10.0, 0.86).unwrap();
        assert_eq!(m.years_to_maturity, 0);
        assert_approx_eq!(m.volume_at_maturity.unwrap(), 2.0 * 102.67034104379515, 1e-9);
    }
}
