//! Species-specific stand-level growth equations.
//!
//! Four families per species: dominant height, tree density, basal area and
//! volume per hectare. Each returns:
//!
//! - `Ok(Some(v))` for a computed value,
//! - `Ok(None)` when the equation does not apply (input undefined, age below
//!   [`AGE_FLOOR`], species without equations, the volume sentinel cases),
//! - `Err(ForestError::DomainError)` when defined inputs drive a formula out
//!   of its numeric domain, e.g. the logarithm of a non-positive basal area.
//!
//! The empirical constants live in the `*Params` structs below, one constant
//! per species and family, and are reproduced exactly as published in the
//! calculation sheets this model was calibrated from.

use crate::error::ForestError;
use crate::models::TreeSpecies;

/// Youngest stand age (years) any equation is evaluated for.
pub const AGE_FLOOR: f64 = 3.0;

/// Thinning state of a stand.
///
/// `ge` / `gf` are basal area after / before thinning (m²/ha) and
/// `dominant_height` the dominant height at thinning. The stand age at
/// thinning enters two equations whose published unthinned defaults differ,
/// so it is carried twice: `basal_area_age` for the pine basal-area term and
/// `volume_age` for the volume term.
/// No caller thins yet: everything passes [`Thinning::NONE`], which makes
/// every thinning factor in the equations evaluate to exactly 1 (or the
/// additive thinning term to 0). The parameters are kept so the equations
/// retain their published shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thinning {
    pub ge: f64,
    pub gf: f64,
    pub basal_area_age: f64,
    pub volume_age: f64,
    pub dominant_height: f64,
}

impl Thinning {
    /// No thinning. `basal_area_age` is 1 because it divides the pine
    /// basal-area thinning term; `volume_age` is 0.
    pub const NONE: Thinning = Thinning {
        ge: 1.0,
        gf: 1.0,
        basal_area_age: 1.0,
        volume_age: 0.0,
        dominant_height: 0.0,
    };

    fn ratio(&self) -> f64 {
        self.ge / self.gf
    }
}

impl Default for Thinning {
    fn default() -> Self {
        Thinning::NONE
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Pine height model (Chapman-Richards type, solved for a state variable X0).
#[derive(Debug, Clone, Copy)]
pub struct PineHeightParams {
    pub asymptote: f64,
    pub b1: f64,
    pub b2: f64,
}

pub const PINE_HEIGHT: PineHeightParams = PineHeightParams {
    asymptote: 68.418,
    b1: 24.041,
    b2: -1.470,
};

/// Spruce height model (logistic type with state variable X0).
#[derive(Debug, Clone, Copy)]
pub struct SpruceHeightParams {
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    /// Below this height (m) the spruce model is replaced by the pine model.
    pub min_height: f64,
}

pub const SPRUCE_HEIGHT: SpruceHeightParams = SpruceHeightParams {
    b1: 0.016,
    b2: 0.612,
    b3: 4.437,
    min_height: 7.0,
};

/// Density model: `N2 = (N1^p + k (GE/GF) (Ht40/c)^q (A2^r2 - A1^r1))^(1/p_outer)`.
///
/// `r1`/`r2` and `p`/`p_outer` are separate because the spruce sheet uses
/// 2.544 vs 2.554 and -1.009 vs -1.010. Both pairs are kept as published.
#[derive(Debug, Clone, Copy)]
pub struct DensityParams {
    pub p: f64,
    pub k: f64,
    pub c: f64,
    pub q: f64,
    pub r1: f64,
    pub r2: f64,
    pub p_outer: f64,
}

pub const SPRUCE_DENSITY: DensityParams = DensityParams {
    p: -1.009,
    k: 0.037,
    c: 1000.0,
    q: 3.762,
    r1: 2.544,
    r2: 2.554,
    p_outer: -1.010,
};

pub const PINE_DENSITY: DensityParams = DensityParams {
    p: -1.569,
    k: 0.003,
    c: 10000.0,
    q: 4.148,
    r1: 4.877,
    r2: 4.877,
    p_outer: -1.569,
};

/// Spruce basal area: `G2 = G1^(H1/H2) exp(b0 (N2/N1)^b1 (1 - H1/H2) (GE/GF)^(b2 HT/H2))`.
#[derive(Debug, Clone, Copy)]
pub struct SpruceBasalAreaParams {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
}

pub const SPRUCE_BASAL_AREA: SpruceBasalAreaParams = SpruceBasalAreaParams {
    b0: 4.777,
    b1: 0.310,
    b2: -0.148,
};

/// Pine basal area, log-linear in age, height and density ratios.
#[derive(Debug, Clone, Copy)]
pub struct PineBasalAreaParams {
    pub age: f64,
    pub height: f64,
    pub density: f64,
    pub density_change: f64,
    pub thinning: f64,
}

pub const PINE_BASAL_AREA: PineBasalAreaParams = PineBasalAreaParams {
    age: 1.466,
    height: 0.525,
    density: 0.177,
    density_change: 16.538,
    thinning: -386.717,
};

/// Volume: `V = b0 G^b1 H^b2 exp(b3 / A) (GE/GF)^(b4 AT / A)`.
#[derive(Debug, Clone, Copy)]
pub struct VolumeParams {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    /// Thinning exponent. Spruce volume has no thinning term.
    pub b4: f64,
}

pub const SPRUCE_VOLUME: VolumeParams = VolumeParams {
    b0: 0.250,
    b1: 1.150,
    b2: 1.012,
    b3: 2.320,
    b4: 0.0,
};

pub const PINE_VOLUME: VolumeParams = VolumeParams {
    b0: 0.654,
    b1: 0.969,
    b2: 0.915,
    b3: -2.053,
    b4: -0.069,
};

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

fn ln(x: f64, what: &str) -> Result<f64, ForestError> {
    if x > 0.0 && x.is_finite() {
        Ok(x.ln())
    } else {
        Err(ForestError::domain(format!(
            "logarithm of non-positive {what} ({x})"
        )))
    }
}

fn finite(x: f64, what: &str) -> Result<Option<f64>, ForestError> {
    if x.is_finite() {
        Ok(Some(x))
    } else {
        Err(ForestError::domain(format!("{what} evaluated to {x}")))
    }
}

fn below_floor(a1: f64) -> bool {
    a1.is_nan() || a1 < AGE_FLOOR
}

// ---------------------------------------------------------------------------
// Height
// ---------------------------------------------------------------------------

/// Pine dominant height at age `a2`, given height `h1` at age `a1`.
pub fn pine_height(h1: f64, a1: f64, a2: f64) -> Result<Option<f64>, ForestError> {
    if h1.is_nan() || a2.is_nan() || below_floor(a1) {
        return Ok(None);
    }
    let p = PINE_HEIGHT;
    let x0 = (h1 - p.asymptote) / (1.0 + p.b1 * h1 * a1.powf(p.b2));
    let h2 = (p.asymptote + x0) / (1.0 - p.b1 * x0 * a2.powf(p.b2));
    finite(h2, "pine height")
}

/// Spruce dominant height at age `a2`, given height `h1` at age `a1`.
///
/// Stands shorter than 7 m use the pine curve: the spruce model is fitted
/// on taller stands only.
pub fn spruce_height(h1: f64, a1: f64, a2: f64) -> Result<Option<f64>, ForestError> {
    if h1.is_nan() || a2.is_nan() || below_floor(a1) {
        return Ok(None);
    }
    let p = SPRUCE_HEIGHT;
    if h1 < p.min_height {
        return pine_height(h1, a1, a2);
    }
    let l = ln(1.0 - (-p.b1 * a1).exp(), "spruce age term")?;
    let base = ln(h1, "height")? + p.b2 * l;
    // The square root is squared as written in the calculation sheet, not
    // sqrt(base^2 - 4 b3 L) as in the usual form of this model.
    let x0 = 0.5 * (base + base.sqrt().powi(2) - 4.0 * p.b3 * l);
    let ratio = (1.0 - (-p.b1 * a2).exp()) / (1.0 - (-p.b1 * a1).exp());
    let h2 = h1 * ratio.powf(p.b2 + p.b3 / x0);
    finite(h2, "spruce height")
}

// ---------------------------------------------------------------------------
// Density
// ---------------------------------------------------------------------------

fn density(
    p: &DensityParams,
    n1: f64,
    a1: f64,
    a2: f64,
    ht40: f64,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    if n1.is_nan() || a2.is_nan() || ht40.is_nan() || below_floor(a1) {
        return Ok(None);
    }
    let inner = n1.powf(p.p)
        + p.k * thinning.ratio() * (ht40 / p.c).powf(p.q) * (a2.powf(p.r2) - a1.powf(p.r1));
    finite(inner.powf(1.0 / p.p_outer), "tree density")
}

/// Spruce trees per hectare at age `a2`.
pub fn spruce_density(
    n1: f64,
    a1: f64,
    a2: f64,
    ht40: f64,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    density(&SPRUCE_DENSITY, n1, a1, a2, ht40, thinning)
}

/// Pine trees per hectare at age `a2`.
pub fn pine_density(
    n1: f64,
    a1: f64,
    a2: f64,
    ht40: f64,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    density(&PINE_DENSITY, n1, a1, a2, ht40, thinning)
}

// ---------------------------------------------------------------------------
// Basal area
// ---------------------------------------------------------------------------

/// State of a stand at the start and end of a growth step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthStep {
    pub basal_area: f64,
    pub age1: f64,
    pub age2: f64,
    pub height1: f64,
    pub height2: f64,
    pub density1: f64,
    pub density2: f64,
}

impl GrowthStep {
    fn has_nan(&self) -> bool {
        [
            self.basal_area,
            self.age1,
            self.age2,
            self.height1,
            self.height2,
            self.density1,
            self.density2,
        ]
        .iter()
        .any(|v| v.is_nan())
    }
}

/// Spruce basal area (m²/ha) at the end of a growth step.
pub fn spruce_basal_area(step: &GrowthStep, thinning: Thinning) -> Result<Option<f64>, ForestError> {
    if step.has_nan() {
        return Ok(None);
    }
    let p = SPRUCE_BASAL_AREA;
    let height_ratio = step.height1 / step.height2;
    let growth = p.b0
        * (step.density2 / step.density1).powf(p.b1)
        * (1.0 - height_ratio)
        * thinning
            .ratio()
            .powf(p.b2 * thinning.dominant_height / step.height2);
    finite(
        step.basal_area.powf(height_ratio) * growth.exp(),
        "spruce basal area",
    )
}

/// Pine basal area (m²/ha) at the end of a growth step.
///
/// UNVERIFIED against the primary paper: the published form uses separate
/// age symbols in the `(AGE1 / AGE2)` term, which are replaced by the step
/// ages here, and the thinning term divides by the thinning age (1 when
/// unthinned). Kept as-is because downstream figures depend on it.
pub fn pine_basal_area(step: &GrowthStep, thinning: Thinning) -> Result<Option<f64>, ForestError> {
    if step.has_nan() {
        return Ok(None);
    }
    let p = PINE_BASAL_AREA;
    let r = step.age1 / step.age2;
    let ln_n1 = ln(step.density1, "tree density")?;
    let ln_n2 = ln(step.density2, "tree density")?;

    let carried = r * ln(step.basal_area, "basal area")?;
    let age = p.age * (1.0 - r);
    let height = p.height
        * (ln(step.height2, "height")? - r * ln(step.height1, "height")?);
    let density = p.density * (ln_n2 - r * ln_n1);
    let density_change = p.density_change * ((ln_n2 - ln_n1) / step.age2);
    let thinned = p.thinning
        * (((thinning.gf - thinning.ge) / thinning.gf) / thinning.basal_area_age
            * (1.0 / step.age2 - 1.0 / step.age1));

    finite(
        (carried + age + height + density + density_change + thinned).exp(),
        "pine basal area",
    )
}

// ---------------------------------------------------------------------------
// Volume
// ---------------------------------------------------------------------------

fn volume(
    p: &VolumeParams,
    basal_area: f64,
    height: f64,
    age: f64,
    thinning: Thinning,
    what: &str,
) -> Result<Option<f64>, ForestError> {
    if basal_area.is_nan() || height.is_nan() || age.is_nan() {
        return Ok(None);
    }
    // Sentinels: "not computable", distinct from a zero volume.
    if age <= 0.0 || basal_area < 0.0 {
        return Ok(None);
    }
    let v = p.b0
        * basal_area.powf(p.b1)
        * height.powf(p.b2)
        * (p.b3 / age).exp()
        * thinning.ratio().powf(p.b4 * (thinning.volume_age / age));
    finite(v, what)
}

/// Spruce standing volume with bark (m³/ha).
pub fn spruce_volume(
    basal_area: f64,
    height: f64,
    age: f64,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    volume(&SPRUCE_VOLUME, basal_area, height, age, thinning, "spruce volume")
}

/// Pine standing volume with bark (m³/ha).
pub fn pine_volume(
    basal_area: f64,
    height: f64,
    age: f64,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    volume(&PINE_VOLUME, basal_area, height, age, thinning, "pine volume")
}

// ---------------------------------------------------------------------------
// Species dispatch
// ---------------------------------------------------------------------------

type HeightFn = fn(f64, f64, f64) -> Result<Option<f64>, ForestError>;
type DensityFn = fn(f64, f64, f64, f64, Thinning) -> Result<Option<f64>, ForestError>;
type BasalAreaFn = fn(&GrowthStep, Thinning) -> Result<Option<f64>, ForestError>;
type VolumeFn = fn(f64, f64, f64, Thinning) -> Result<Option<f64>, ForestError>;

/// The equation set of one species.
#[derive(Clone, Copy)]
pub struct Allometry {
    pub height: HeightFn,
    pub density: DensityFn,
    pub basal_area: BasalAreaFn,
    pub volume: VolumeFn,
}

static SPRUCE: Allometry = Allometry {
    height: spruce_height,
    density: spruce_density,
    basal_area: spruce_basal_area,
    volume: spruce_volume,
};

static PINE: Allometry = Allometry {
    height: pine_height,
    density: pine_density,
    basal_area: pine_basal_area,
    volume: pine_volume,
};

impl Allometry {
    /// Equation set for a species, `None` for species without equations.
    pub fn for_species(species: TreeSpecies) -> Option<&'static Allometry> {
        match species {
            TreeSpecies::Spruce => Some(&SPRUCE),
            TreeSpecies::Pine => Some(&PINE),
            TreeSpecies::Other => None,
        }
    }
}

/// Dominant height at age `a2`. Undefined inputs give `Ok(None)`.
pub fn height_at(
    species: TreeSpecies,
    h1: Option<f64>,
    a1: Option<f64>,
    a2: Option<f64>,
) -> Result<Option<f64>, ForestError> {
    match (Allometry::for_species(species), h1, a1, a2) {
        (Some(set), Some(h1), Some(a1), Some(a2)) => (set.height)(h1, a1, a2),
        _ => Ok(None),
    }
}

/// Trees per hectare at age `a2`. Undefined inputs give `Ok(None)`.
pub fn density_at(
    species: TreeSpecies,
    n1: Option<f64>,
    a1: Option<f64>,
    a2: Option<f64>,
    ht40: Option<f64>,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    match (Allometry::for_species(species), n1, a1, a2, ht40) {
        (Some(set), Some(n1), Some(a1), Some(a2), Some(ht40)) => {
            (set.density)(n1, a1, a2, ht40, thinning)
        }
        _ => Ok(None),
    }
}

/// Basal area at the end of a step from partially known state.
#[allow(clippy::too_many_arguments)]
pub fn basal_area_at(
    species: TreeSpecies,
    basal_area: Option<f64>,
    age1: Option<f64>,
    age2: Option<f64>,
    height1: Option<f64>,
    height2: Option<f64>,
    density1: Option<f64>,
    density2: Option<f64>,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    let Some(set) = Allometry::for_species(species) else {
        return Ok(None);
    };
    let (
        Some(basal_area),
        Some(age1),
        Some(age2),
        Some(height1),
        Some(height2),
        Some(density1),
        Some(density2),
    ) = (basal_area, age1, age2, height1, height2, density1, density2)
    else {
        return Ok(None);
    };
    let step = GrowthStep {
        basal_area,
        age1,
        age2,
        height1,
        height2,
        density1,
        density2,
    };
    (set.basal_area)(&step, thinning)
}

/// Standing volume with bark (m³/ha). Undefined inputs give `Ok(None)`.
pub fn volume_at(
    species: TreeSpecies,
    basal_area: Option<f64>,
    height: Option<f64>,
    age: Option<f64>,
    thinning: Thinning,
) -> Result<Option<f64>, ForestError> {
    match (Allometry::for_species(species), basal_area, height, age) {
        (Some(set), Some(g), Some(h), Some(a)) => (set.volume)(g, h, a, thinning),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn step(basal_area: f64) -> GrowthStep {
        GrowthStep {
            basal_area,
            age1: 40.0,
            age2: 41.0,
            height1: 12.0,
            height2: 12.24,
            density1: 800.0,
            density2: 791.0,
        }
    }

    // --- Height ---

    #[test]
    fn test_pine_height_reference_value() {
        let h2 = pine_height(12.0, 40.0, 41.0).unwrap().unwrap();
        assert_approx_eq!(h2, 12.318272418520982, 1e-9);
    }

    #[test]
    fn test_spruce_height_reference_value() {
        let h2 = spruce_height(12.0, 40.0, 41.0).unwrap().unwrap();
        assert_approx_eq!(h2, 12.238953637523991, 1e-9);
    }

    #[test]
    fn test_short_spruce_uses_pine_curve() {
        for (h1, a1, a2) in [(5.0, 20.0, 21.0), (6.99, 15.0, 30.0), (1.5, 3.0, 4.0)] {
            let spruce = spruce_height(h1, a1, a2).unwrap();
            let pine = pine_height(h1, a1, a2).unwrap();
            assert_eq!(spruce, pine);
        }
    }

    #[test]
    fn test_height_below_age_floor() {
        assert_eq!(spruce_height(12.0, 2.0, 3.0).unwrap(), None);
        assert_eq!(pine_height(12.0, 2.99, 3.99).unwrap(), None);
        assert!(pine_height(12.0, 3.0, 4.0).unwrap().is_some());
    }

    #[test]
    fn test_height_nan_input() {
        assert_eq!(pine_height(f64::NAN, 40.0, 41.0).unwrap(), None);
        assert_eq!(spruce_height(12.0, 40.0, f64::NAN).unwrap(), None);
    }

    #[test]
    fn test_height_same_age_is_identity() {
        let h = spruce_height(15.0, 50.0, 50.0).unwrap().unwrap();
        assert_approx_eq!(h, 15.0, 1e-9);
        let h = pine_height(15.0, 50.0, 50.0).unwrap().unwrap();
        assert_approx_eq!(h, 15.0, 1e-9);
    }

    #[test]
    fn test_height_increases_with_age() {
        let h = spruce_height(12.0, 40.0, 60.0).unwrap().unwrap();
        assert!(h > 12.0);
    }

    #[test]
    fn test_zero_height_stays_zero() {
        // Short spruce goes through the pine curve, which keeps a zero height at zero.
        assert_eq!(spruce_height(0.0, 40.0, 41.0).unwrap(), Some(0.0));
    }

    // --- Density ---

    #[test]
    fn test_spruce_density_reference_value() {
        let n2 = spruce_density(800.0, 40.0, 41.0, 14.4, Thinning::NONE)
            .unwrap()
            .unwrap();
        assert_approx_eq!(n2, 791.088630737346, 1e-6);
    }

    #[test]
    fn test_pine_density_reference_value() {
        let n2 = pine_density(800.0, 40.0, 41.0, 14.7, Thinning::NONE)
            .unwrap()
            .unwrap();
        assert_approx_eq!(n2, 799.1883264276411, 1e-6);
    }

    #[test]
    fn test_density_decreases() {
        let n2 = pine_density(1500.0, 20.0, 40.0, 11.9, Thinning::NONE)
            .unwrap()
            .unwrap();
        assert!(n2 < 1500.0);
    }

    #[test]
    fn test_density_below_age_floor() {
        assert_eq!(
            spruce_density(800.0, 2.0, 3.0, 14.4, Thinning::NONE).unwrap(),
            None
        );
    }

    #[test]
    fn test_density_missing_site_index() {
        assert_eq!(
            density_at(TreeSpecies::Spruce, Some(800.0), Some(40.0), Some(41.0), None, Thinning::NONE)
                .unwrap(),
            None
        );
    }

    // --- Basal area ---

    #[test]
    fn test_spruce_basal_area_reference_value() {
        let s = GrowthStep {
            height2: 12.238953637523991,
            density2: 791.088630737346,
            ..step(20.0)
        };
        let g2 = spruce_basal_area(&s, Thinning::NONE).unwrap().unwrap();
        assert_approx_eq!(g2, 20.701092586344167, 1e-6);
    }

    #[test]
    fn test_pine_basal_area_reference_value() {
        let s = GrowthStep {
            height2: 12.318272418520982,
            density2: 799.1883264276411,
            ..step(20.0)
        };
        let g2 = pine_basal_area(&s, Thinning::NONE).unwrap().unwrap();
        assert_approx_eq!(g2, 20.74390450205203, 1e-6);
    }

    #[test]
    fn test_pine_basal_area_negative_g_is_domain_error() {
        let err = pine_basal_area(&step(-1.0), Thinning::NONE).unwrap_err();
        assert!(matches!(err, ForestError::DomainError { .. }));
        assert!(err.to_string().contains("basal area"));
    }

    #[test]
    fn test_spruce_basal_area_negative_g_is_domain_error() {
        let result = spruce_basal_area(&step(-5.0), Thinning::NONE);
        assert!(matches!(result, Err(ForestError::DomainError { .. })));
    }

    #[test]
    fn test_spruce_basal_area_zero_density_is_domain_error() {
        let s = GrowthStep {
            density1: 0.0,
            density2: 0.0,
            ..step(20.0)
        };
        assert!(spruce_basal_area(&s, Thinning::NONE).is_err());
    }

    #[test]
    fn test_thinning_neutral_defaults() {
        let t = Thinning::default();
        assert_eq!(t, Thinning::NONE);
        assert_eq!(t.ratio(), 1.0);
    }

    #[test]
    fn test_thinning_changes_pine_basal_area() {
        let s = step(20.0);
        let unthinned = pine_basal_area(&s, Thinning::NONE).unwrap().unwrap();
        let thinned = pine_basal_area(
            &s,
            Thinning {
                ge: 15.0,
                gf: 20.0,
                basal_area_age: 35.0,
                volume_age: 35.0,
                dominant_height: 11.0,
            },
        )
        .unwrap()
        .unwrap();
        assert!((thinned - unthinned).abs() > 1e-9);
    }

    #[test]
    fn test_unthinned_volume_has_zero_thinning_age() {
        assert_eq!(Thinning::NONE.volume_age, 0.0);
        assert_eq!(Thinning::NONE.basal_area_age, 1.0);
        // With a zero thinning age the ratio term vanishes even for a
        // thinned ratio, so the volume equals the unthinned value.
        let ratio_only = Thinning {
            ge: 15.0,
            gf: 20.0,
            ..Thinning::NONE
        };
        let v = pine_volume(20.0, 12.0, 40.0, ratio_only).unwrap().unwrap();
        assert_approx_eq!(v, 110.01109563394046, 1e-9);
    }

    #[test]
    fn test_thinning_age_changes_volume() {
        let thinned = Thinning {
            ge: 15.0,
            gf: 20.0,
            volume_age: 35.0,
            ..Thinning::NONE
        };
        let v = pine_volume(20.0, 12.0, 40.0, thinned).unwrap().unwrap();
        assert!((v - 110.01109563394046).abs() > 1e-6);
    }

    // --- Volume ---

    #[test]
    fn test_spruce_volume_reference_value() {
        let v = spruce_volume(20.0, 12.0, 40.0, Thinning::NONE).unwrap().unwrap();
        assert_approx_eq!(v, 102.67034104379515, 1e-9);
    }

    #[test]
    fn test_pine_volume_reference_value() {
        let v = pine_volume(20.0, 12.0, 40.0, Thinning::NONE).unwrap().unwrap();
        assert_approx_eq!(v, 110.01109563394046, 1e-9);
    }

    #[test]
    fn test_volume_sentinels() {
        assert_eq!(spruce_volume(20.0, 12.0, 0.0, Thinning::NONE).unwrap(), None);
        assert_eq!(pine_volume(20.0, 12.0, -3.0, Thinning::NONE).unwrap(), None);
        assert_eq!(pine_volume(-0.1, 12.0, 40.0, Thinning::NONE).unwrap(), None);
    }

    #[test]
    fn test_zero_basal_area_is_zero_volume() {
        assert_eq!(
            spruce_volume(0.0, 12.0, 40.0, Thinning::NONE).unwrap(),
            Some(0.0)
        );
    }

    // --- Dispatch ---

    #[test]
    fn test_other_species_has_no_equations() {
        assert!(Allometry::for_species(TreeSpecies::Other).is_none());
        assert_eq!(
            height_at(TreeSpecies::Other, Some(12.0), Some(40.0), Some(41.0)).unwrap(),
            None
        );
        assert_eq!(
            volume_at(TreeSpecies::Other, Some(20.0), Some(12.0), Some(40.0), Thinning::NONE)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_dispatch_matches_direct_call() {
        let direct = spruce_height(12.0, 40.0, 41.0).unwrap();
        let dispatched = height_at(TreeSpecies::Spruce, Some(12.0), Some(40.0), Some(41.0)).unwrap();
        assert_eq!(direct, dispatched);
    }

    #[test]
    fn test_basal_area_at_undefined_input() {
        let g = basal_area_at(
            TreeSpecies::Pine,
            Some(20.0),
            Some(40.0),
            Some(41.0),
            Some(12.0),
            None,
            Some(800.0),
            Some(799.0),
            Thinning::NONE,
        )
        .unwrap();
        assert_eq!(g, None);
    }
}
