use serde::{Deserialize, Serialize};

/// Main tree species of a stand.
///
/// Only spruce and pine carry growth equations. Birch and every other
/// broadleaf label fall into `Other` and pass through the engine with
/// undefined growth outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSpecies {
    Spruce,
    Pine,
    Other,
}

impl TreeSpecies {
    /// Map an inventory species label to a species.
    ///
    /// Accepts the Norwegian labels used by the national forest resource
    /// maps (`Gran`, `Furu`, `Bjørk / lauv`) and the English names.
    /// Unknown labels map to [`TreeSpecies::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "gran" | "spruce" | "norway spruce" => TreeSpecies::Spruce,
            "furu" | "pine" | "scots pine" => TreeSpecies::Pine,
            _ => TreeSpecies::Other,
        }
    }

    /// Whether the allometric library has equations for this species.
    pub fn has_growth_equations(&self) -> bool {
        !matches!(self, TreeSpecies::Other)
    }

    /// Conifers are the only species sold as saw wood.
    pub fn is_conifer(&self) -> bool {
        matches!(self, TreeSpecies::Spruce | TreeSpecies::Pine)
    }
}

impl std::fmt::Display for TreeSpecies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeSpecies::Spruce => write!(f, "Spruce"),
            TreeSpecies::Pine => write!(f, "Pine"),
            TreeSpecies::Other => write!(f, "Birch/Other"),
        }
    }
}
