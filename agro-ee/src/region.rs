use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Earth Engine table of Brazilian states (first-level regions).
pub const STATES_ASSET: &str = "projects/ee-sandrosenamachado/assets/BR_UF_2023";

/// Earth Engine table of Brazilian municipalities (second-level regions).
pub const MUNICIPALITIES_ASSET: &str = "projects/ee-sandrosenamachado/assets/BR_Municipios_2023";

/// Where the two administrative levels live in the remote catalog and which
/// feature properties hold their names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCatalog {
    pub states_asset: String,
    /// Name property on the states table.
    pub state_name_field: String,
    pub municipalities_asset: String,
    /// Name property on the municipalities table.
    pub municipality_name_field: String,
    /// Property on the municipalities table naming the parent state.
    pub parent_field: String,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self {
            states_asset: STATES_ASSET.to_string(),
            state_name_field: "NM_UF".to_string(),
            municipalities_asset: MUNICIPALITIES_ASSET.to_string(),
            municipality_name_field: "NM_MUN".to_string(),
            parent_field: "NM_UF".to_string(),
        }
    }
}

/// A chosen state/municipality pair. Names are matched exactly
/// (case-sensitive) against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionSelection {
    pub state: String,
    pub municipality: String,
}

impl RegionSelection {
    pub fn new(state: &str, municipality: &str) -> Result<Self, ValidationError> {
        if state.trim().is_empty() || municipality.trim().is_empty() {
            return Err(ValidationError::NoRegionSelected);
        }
        Ok(Self {
            state: state.to_string(),
            municipality: municipality.to_string(),
        })
    }

    /// Label used in chart titles, e.g. "Uberlândia - Minas Gerais".
    pub fn label(&self) -> String {
        format!("{} - {}", self.municipality, self.state)
    }
}

/// Sort names lexicographically and drop duplicates.
pub fn sorted_names(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_requires_both_names() {
        assert_eq!(
            RegionSelection::new("Minas Gerais", ""),
            Err(ValidationError::NoRegionSelected)
        );
        assert_eq!(
            RegionSelection::new("  ", "Uberlândia"),
            Err(ValidationError::NoRegionSelected)
        );
        let selection = RegionSelection::new("Minas Gerais", "Uberlândia").unwrap();
        assert_eq!(selection.label(), "Uberlândia - Minas Gerais");
    }

    #[test]
    fn sorted_names_sorts_and_dedups() {
        let names = vec![
            "Uberlândia".to_string(),
            "Araguari".to_string(),
            "Uberaba".to_string(),
            "Araguari".to_string(),
        ];
        assert_eq!(
            sorted_names(names),
            vec!["Araguari", "Uberaba", "Uberlândia"]
        );
    }

    #[test]
    fn default_catalog_uses_2023_boundaries() {
        let catalog = RegionCatalog::default();
        assert!(catalog.states_asset.ends_with("BR_UF_2023"));
        assert_eq!(catalog.parent_field, "NM_UF");
    }
}
