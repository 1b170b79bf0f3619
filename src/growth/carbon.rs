//! Wood volume to CO2-equivalent conversion.

/// Dry wood density in kg/m³, shared by spruce and pine.
pub const WOOD_DENSITY: f64 = 450.0;
/// Carbon share of dry wood by weight.
pub const CARBON_FRACTION: f64 = 0.5;
/// kg CO2 per kg carbon (44/12).
pub const CO2_PER_CARBON: f64 = 3.67;
/// Stem wood is half of the tree biomass; branches, tops, roots and stump
/// add another 50 %, of which the above-ground part is counted.
pub const BIOMASS_EXPANSION: f64 = 1.5;

/// CO2-equivalent (kg) stored in, or captured by, a volume of stem wood (m³).
///
/// Linear in its argument, so it applies equally to standing volume and to
/// a year's volume growth.
pub fn carbon_dioxide_equivalent(volume_m3: f64) -> f64 {
    volume_m3 * WOOD_DENSITY * CARBON_FRACTION * CO2_PER_CARBON * BIOMASS_EXPANSION
}
