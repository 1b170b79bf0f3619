pub mod allometry;
mod carbon;
mod current_year;
mod engine;
mod maturity;
mod site_index;
mod summary;
mod trajectory;

pub use allometry::{Thinning, AGE_FLOOR};
pub use carbon::{
    carbon_dioxide_equivalent, BIOMASS_EXPANSION, CARBON_FRACTION, CO2_PER_CARBON, WOOD_DENSITY,
};
pub use current_year::{compute_current_year, saw_wood_portion, CurrentYearGrowth, CurrentYearSettings};
pub use engine::GrowthEngine;
pub use maturity::{
    find_maturity_year, resolve_maturity, Maturity, DEFAULT_YIELD_REQUIREMENT, FIRST_SCANNED_YEAR,
};
pub use site_index::{read_site_index_csv, read_site_index_csv_from_bytes, SiteIndexRow, SiteIndexTable};
pub use summary::{BatchSummary, SnapshotOverview};
pub use trajectory::{growth_rates, project_stand, ProjectedYear, Series, StandProjection, HORIZON};
