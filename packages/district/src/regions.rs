//! Region membership table.
//!
//! The default table for the city of Sao Paulo is embedded at compile time.
//! A TOML file with the same shape (`region = ["DISTRICT", ...]`) replaces
//! it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::{DistrictError, Region, normalize_district_name};

const SAO_PAULO_TOML: &str = include_str!("../regions/sao_paulo.toml");

/// Region to district names. Names are stored normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTable {
    regions: BTreeMap<Region, BTreeSet<String>>,
}

impl RegionTable {
    /// Parses a region table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DistrictError::Toml`] if the text is not a valid table, or
    /// [`DistrictError::UnknownRegion`] if a key is not a [`Region`].
    pub fn parse(toml_str: &str) -> Result<Self, DistrictError> {
        let raw: BTreeMap<String, Vec<String>> = toml::from_str(toml_str)?;

        let mut regions: BTreeMap<Region, BTreeSet<String>> = BTreeMap::new();
        for (key, names) in raw {
            let region: Region = key
                .parse()
                .map_err(|_| DistrictError::UnknownRegion(key.clone()))?;
            regions
                .entry(region)
                .or_default()
                .extend(names.iter().map(|n| normalize_district_name(n)));
        }

        Ok(Self { regions })
    }

    /// Reads a region table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DistrictError::Io`] if the file cannot be read, or
    /// [`DistrictError::Toml`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, DistrictError> {
        let contents = std::fs::read_to_string(path).map_err(|e| DistrictError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    /// The embedded Sao Paulo table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (covered by tests).
    #[must_use]
    pub fn sao_paulo() -> Self {
        Self::parse(SAO_PAULO_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded sao_paulo.toml: {e}"))
    }

    /// Region containing `district`, if any.
    #[must_use]
    pub fn region_of(&self, district: &str) -> Option<Region> {
        let name = normalize_district_name(district);
        self.regions
            .iter()
            .find(|(_, names)| names.contains(&name))
            .map(|(region, _)| *region)
    }

    /// Regions that contain at least one of `districts`.
    #[must_use]
    pub fn regions_present<S: AsRef<str>>(&self, districts: &[S]) -> Vec<Region> {
        let names: BTreeSet<String> = districts
            .iter()
            .map(|d| normalize_district_name(d.as_ref()))
            .collect();

        self.regions
            .iter()
            .filter(|(_, members)| !members.is_disjoint(&names))
            .map(|(region, _)| *region)
            .collect()
    }

    /// Every district in any of `regions`.
    #[must_use]
    pub fn districts_in(&self, regions: &[Region]) -> BTreeSet<String> {
        regions
            .iter()
            .filter_map(|region| self.regions.get(region))
            .flat_map(|names| names.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn district_count(&self) -> usize {
        self.regions.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sao_paulo_has_all_districts() {
        let table = RegionTable::sao_paulo();
        assert_eq!(table.district_count(), 96);
        assert_eq!(table.region_of("Sé"), Some(Region::Centro));
        assert_eq!(table.region_of("Tatuapé"), Some(Region::Leste));
        assert_eq!(table.region_of("Atlantis"), None);
    }

    #[test]
    fn regions_present_in_district_list() {
        let table = RegionTable::sao_paulo();
        let present = table.regions_present(&["Pinheiros", "LAPA", "Santana"]);
        assert_eq!(present, vec![Region::Norte, Region::Oeste]);
    }

    #[test]
    fn districts_in_regions() {
        let table = RegionTable::sao_paulo();
        let centro = table.districts_in(&[Region::Centro]);
        assert_eq!(centro.len(), 8);
        assert!(centro.contains("CONSOLACAO"));
        assert!(table.districts_in(&[]).is_empty());
    }

    #[test]
    fn parse_normalizes_names() {
        let table = RegionTable::parse("centro = [\"Consolação\", \"sé\"]").unwrap();
        assert_eq!(
            table.districts_in(&[Region::Centro]),
            BTreeSet::from(["CONSOLACAO".to_string(), "SE".to_string()])
        );
    }

    #[test]
    fn parse_rejects_unknown_region() {
        assert!(matches!(
            RegionTable::parse("nordeste = [\"X\"]"),
            Err(DistrictError::UnknownRegion(ref key)) if key == "nordeste"
        ));
    }
}
