//! Vector drivers: features carrying a numeric attribute.

use std::path::Path;

use geo::{Area, BooleanOps, BoundingRect, Geometry, Intersects, MultiPolygon};
use rstar::RTree;

use crate::{common, polygon::{envelope, BoundingBox}, Result};
use super::{Layer, Sample};

/// Features with one numeric value each, indexed by bounding box.
#[derive(Debug)]
pub struct VectorLayer {
    features: Vec<(Geometry<f64>, f64)>,
    rtree: RTree<BoundingBox>,
}

impl VectorLayer {
    pub fn new(features: Vec<(Geometry<f64>, f64)>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                features.iter().enumerate()
                    .filter_map(|(i, (geometry, _))| BoundingBox::of(i, geometry))
                    .collect()
            ),
            features,
        }
    }

    /// Read `field` from every feature of a shapefile.
    /// `Ok(None)` when the attribute table has no such field.
    /// Features with a null value or null shape are skipped.
    pub fn read(path: &Path, field: &str) -> Result<Option<Self>> {
        if !common::has_field(path, field)? {
            return Ok(None);
        }
        let items = common::read_shapefile(path)?;

        let mut features = Vec::with_capacity(items.len());
        for (shape, record) in items {
            let Some(value) = record.get(field).and_then(common::numeric_value) else { continue };
            if let Some(geometry) = common::shape_to_geometry(shape, path)? {
                features.push((geometry, value));
            }
        }
        Ok(Some(Self::new(features)))
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }
}

impl Layer for VectorLayer {
    /// Polygon features are weighted by their overlap area with the footprint;
    /// points and lines intersecting the footprint get unit weight.
    fn sample(&self, footprint: &MultiPolygon<f64>) -> Vec<Sample> {
        let Some(rect) = footprint.bounding_rect() else { return Vec::new() };

        let mut candidates: Vec<usize> = self.rtree
            .locate_in_envelope_intersecting(&envelope(&rect, 0.0))
            .map(BoundingBox::idx)
            .collect();
        candidates.sort_unstable();

        candidates.into_iter()
            .filter_map(|i| {
                let (geometry, value) = &self.features[i];
                let weight = match geometry {
                    Geometry::Polygon(polygon) => footprint.intersection(polygon).unsigned_area(),
                    Geometry::MultiPolygon(mp) => footprint.intersection(mp).unsigned_area(),
                    other => if other.intersects(footprint) { 1.0 } else { 0.0 },
                };
                (weight > 0.0).then_some(Sample { value: *value, weight })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use crate::{driver::ZonalStat, testutil::{square, write_points, write_squares}};

    fn layer() -> VectorLayer {
        VectorLayer::new(vec![
            (Geometry::MultiPolygon(square(0.0, 0.0, 2.0)), 10.0),
            (Geometry::MultiPolygon(square(2.0, 0.0, 2.0)), 20.0),
            (Geometry::Point(Point::new(10.5, 10.5)), 7.0),
            (Geometry::Point(Point::new(10.8, 10.2)), 3.0),
        ])
    }

    #[test]
    fn polygon_features_are_area_weighted() {
        // 3/4 of the footprint lies on the 10-valued feature, 1/4 on the 20-valued one.
        let samples = layer().sample(&square(0.5, 0.0, 2.0));
        assert_eq!(samples.len(), 2);
        let mean = ZonalStat::Mean.reduce(&samples).unwrap();
        assert!((mean - 12.5).abs() < 1e-9);
    }

    #[test]
    fn boundary_contact_has_no_weight() {
        let samples = layer().sample(&square(-2.0, 0.0, 2.0));
        assert!(samples.is_empty());
    }

    #[test]
    fn points_inside_footprint_count_once() {
        let samples = layer().sample(&square(10.0, 10.0, 1.0));
        assert_eq!(ZonalStat::Sum.reduce(&samples), Some(10.0));
        assert_eq!(ZonalStat::Count.reduce(&samples), Some(2.0));
    }

    #[test]
    fn read_takes_the_named_field_and_skips_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pop.shp");
        write_squares(&path, &["POP_2000", "POP_2001"], &[
            ((0.0, 0.0, 2.0), vec![Some(10.0), None]),
            ((2.0, 0.0, 2.0), vec![None, Some(30.0)]),
            ((10.0, 10.0, 1.0), vec![Some(5.0), Some(6.0)]),
        ]);

        let layer = VectorLayer::read(&path, "POP_2000").unwrap().unwrap();
        assert_eq!(layer.len(), 2);
        let samples = layer.sample(&square(0.0, 0.0, 4.0));
        assert_eq!(samples, vec![Sample { value: 10.0, weight: 4.0 }]);

        let layer = VectorLayer::read(&path, "POP_2001").unwrap().unwrap();
        assert_eq!(ZonalStat::Sum.reduce(&layer.sample(&square(0.0, 0.0, 4.0))), Some(30.0));
    }

    #[test]
    fn read_without_the_field_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pop.shp");
        write_squares(&path, &["POP_2000"], &[((0.0, 0.0, 1.0), vec![Some(1.0)])]);
        assert!(VectorLayer::read(&path, "POP_2005").unwrap().is_none());
    }

    #[test]
    fn read_points_from_shapefile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wells.shp");
        write_points(&path, &["depth"], &[((0.5, 0.5), vec![Some(3.0)]), ((1.5, 0.5), vec![Some(4.0)])]);

        let layer = VectorLayer::read(&path, "depth").unwrap().unwrap();
        assert_eq!(ZonalStat::Sum.reduce(&layer.sample(&square(0.0, 0.0, 1.0))), Some(3.0));
        assert_eq!(ZonalStat::Count.reduce(&layer.sample(&square(0.0, 0.0, 2.0))), Some(2.0));
    }

    #[test]
    fn no_overlap_is_empty() {
        assert!(layer().sample(&square(50.0, 50.0, 1.0)).is_empty());
    }
}
