use std::collections::BTreeMap;

use geo::{BoundingRect, Geometry, Intersects};
use rstar::RTree;

use crate::polygon::{envelope, BoundingBox, Polygon};
use super::ConflictEvent;

/// True iff at least one event of `year` intersects the polygon.
/// Event magnitude and count are ignored.
pub fn label(polygon: &Polygon, year: i32, events: &[ConflictEvent]) -> bool {
    events.iter()
        .filter(|event| event.year == year)
        .any(|event| event.geometry.intersects(&polygon.geometry))
}

/// Events of one year, indexed by bounding box.
#[derive(Debug)]
struct YearIndex {
    geometries: Vec<Geometry<f64>>,
    rtree: RTree<BoundingBox>,
}

impl YearIndex {
    fn new(geometries: Vec<Geometry<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                geometries.iter().enumerate()
                    .filter_map(|(i, geometry)| BoundingBox::of(i, geometry))
                    .collect()
            ),
            geometries,
        }
    }
}

/// Labels polygons with conflict presence, with events indexed per year.
/// Gives the same answers as [`label`].
#[derive(Debug, Default)]
pub struct ConflictLabeler {
    years: BTreeMap<i32, YearIndex>,
}

impl ConflictLabeler {
    pub fn new(events: &[ConflictEvent]) -> Self {
        let mut by_year: BTreeMap<i32, Vec<Geometry<f64>>> = BTreeMap::new();
        for event in events {
            by_year.entry(event.year).or_default().push(event.geometry.clone());
        }
        Self {
            years: by_year.into_iter()
                .map(|(year, geometries)| (year, YearIndex::new(geometries)))
                .collect(),
        }
    }

    /// Whether any event of `year` intersects `polygon`.
    pub fn label(&self, polygon: &Polygon, year: i32) -> bool {
        let Some(index) = self.years.get(&year) else { return false };
        let Some(rect) = polygon.geometry.bounding_rect() else { return false };

        index.rtree.locate_in_envelope_intersecting(&envelope(&rect, 0.0))
            .any(|bbox| index.geometries[bbox.idx()].intersects(&polygon.geometry))
    }

    /// Number of events recorded for `year`.
    pub fn events_in(&self, year: i32) -> usize {
        self.years.get(&year).map_or(0, |index| index.geometries.len())
    }

    /// Years that have at least one event, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ { self.years.keys().copied() }
}
