pub mod config;
pub mod error;
pub mod growth;
pub mod io;
pub mod models;
pub mod visualization;

pub use config::EngineConfig;
pub use error::ForestError;
pub use growth::{BatchSummary, GrowthEngine, StandProjection};
pub use io::{ResultWriter, StandReader};
pub use models::{Stand, StandRecord, StandResult, TreeSpecies};
