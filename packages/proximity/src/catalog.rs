//! Shared, immutable point catalogs.
//!
//! A [`PointCatalog`] is loaded once and then cloned freely: clones share
//! the same `Arc<[CatalogPoint]>`, so concurrent queries read the same
//! snapshot without locking.

use std::collections::BTreeSet;
use std::sync::Arc;

use parcel_scout_proximity_models::{CatalogPoint, Coordinate, DistanceResult};

use crate::{NearestByCategory, find_within_radius, nearest_per_category};

/// Analysis radius used when the caller does not provide one (2 km).
pub const DEFAULT_RADIUS_METERS: f64 = 2_000.0;

/// Read-only snapshot of a point catalog.
#[derive(Debug, Clone, Default)]
pub struct PointCatalog {
    points: Arc<[CatalogPoint]>,
}

impl PointCatalog {
    #[must_use]
    pub fn new(points: Vec<CatalogPoint>) -> Self {
        Self {
            points: points.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[CatalogPoint] {
        &self.points
    }

    /// Distinct categories in the catalog, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.points
            .iter()
            .map(|p| p.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns a new snapshot containing only the given categories.
    ///
    /// An empty selection keeps nothing.
    #[must_use]
    pub fn select_categories<S: AsRef<str>>(&self, categories: &[S]) -> Self {
        let wanted: BTreeSet<&str> = categories.iter().map(AsRef::as_ref).collect();
        let points: Vec<CatalogPoint> = self
            .points
            .iter()
            .filter(|p| wanted.contains(p.category.as_str()))
            .cloned()
            .collect();

        log::debug!(
            "Selected {} of {} points across {} categories",
            points.len(),
            self.points.len(),
            wanted.len()
        );

        Self::new(points)
    }

    /// See [`find_within_radius`].
    #[must_use]
    pub fn within_radius(
        &self,
        references: &[Coordinate],
        radius_meters: f64,
    ) -> Vec<DistanceResult> {
        find_within_radius(&self.points, references, radius_meters)
    }

    /// Radius query followed by [`nearest_per_category`].
    #[must_use]
    pub fn nearest_within_radius(
        &self,
        references: &[Coordinate],
        radius_meters: f64,
    ) -> NearestByCategory {
        nearest_per_category(&self.within_radius(references, radius_meters))
    }
}

impl From<Vec<CatalogPoint>> for PointCatalog {
    fn from(points: Vec<CatalogPoint>) -> Self {
        Self::new(points)
    }
}

/// A reference set and radius, passed explicitly to each query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityQuery {
    pub references: Vec<Coordinate>,
    pub radius_meters: f64,
}

impl ProximityQuery {
    #[must_use]
    pub const fn new(references: Vec<Coordinate>, radius_meters: f64) -> Self {
        Self {
            references,
            radius_meters,
        }
    }

    #[must_use]
    pub fn run(&self, catalog: &PointCatalog) -> Vec<DistanceResult> {
        catalog.within_radius(&self.references, self.radius_meters)
    }

    #[must_use]
    pub fn nearest(&self, catalog: &PointCatalog) -> NearestByCategory {
        catalog.nearest_within_radius(&self.references, self.radius_meters)
    }
}

impl Default for ProximityQuery {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_RADIUS_METERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PointCatalog {
        PointCatalog::new(vec![
            CatalogPoint::new("Estacao de Metro", -23.55028, -46.63389).with_id("se"),
            CatalogPoint::new("Ponto de Onibus", -23.5510, -46.6340).with_id("bus-1"),
            CatalogPoint::new("Ponto de Onibus", -23.5600, -46.6500).with_id("bus-2"),
            CatalogPoint::new("Estacao de Trem", -23.5345, -46.6356).with_id("luz"),
        ])
    }

    #[test]
    fn clones_share_the_snapshot() {
        let a = catalog();
        let b = a.clone();
        assert!(std::ptr::eq(a.points().as_ptr(), b.points().as_ptr()));
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        assert_eq!(
            catalog().categories(),
            vec!["Estacao de Metro", "Estacao de Trem", "Ponto de Onibus"]
        );
    }

    #[test]
    fn select_categories_filters_points() {
        let selected = catalog().select_categories(&["Ponto de Onibus"]);
        assert_eq!(selected.len(), 2);
        assert!(selected.points().iter().all(|p| p.category == "Ponto de Onibus"));

        let none: [&str; 0] = [];
        assert!(catalog().select_categories(&none).is_empty());
    }

    #[test]
    fn query_nearest_picks_one_per_category() {
        let query = ProximityQuery::new(vec![Coordinate::new(-23.55028, -46.63389)], 5_000.0);
        let nearest = query.nearest(&catalog());

        assert_eq!(nearest.len(), 3);
        assert_eq!(nearest["Ponto de Onibus"].point_id, "bus-1");
        assert_eq!(nearest["Estacao de Metro"].point_id, "se");
    }

    #[test]
    fn default_query_uses_default_radius_and_matches_nothing() {
        let query = ProximityQuery::default();
        assert!((query.radius_meters - DEFAULT_RADIUS_METERS).abs() < f64::EPSILON);
        assert!(query.run(&catalog()).is_empty());
    }
}
