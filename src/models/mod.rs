mod species;
mod stand;
mod result;

pub use species::TreeSpecies;
pub use stand::{Stand, StandRecord};
pub use result::StandResult;
