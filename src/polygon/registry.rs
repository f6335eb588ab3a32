use std::{path::Path, sync::Arc};

use ahash::AHashMap;
use geo::{BoundingRect, MultiPolygon};
use rstar::RTree;

use crate::{common, CoproError, Result};
use super::{envelope, BoundingBox, Neighbors, PolygonId};

/// A spatial unit over which drivers are aggregated and conflict is labelled.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub id: PolygonId,
    pub name: Option<Arc<str>>,
    pub geometry: MultiPolygon<f64>,
}

impl Polygon {
    pub fn new(id: i64, geometry: MultiPolygon<f64>) -> Self {
        Self { id: PolygonId(id), name: None, geometry }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }
}

/// The finalized, read-only set of polygons, ordered by ascending id.
#[derive(Debug)]
pub struct PolygonRegistry {
    polygons: Vec<Polygon>,
    index: AHashMap<PolygonId, usize>, // Map between ids and positions in `polygons`.
    rtree: RTree<BoundingBox>,
}

impl PolygonRegistry {
    /// Register `polygons`, rejecting any id seen twice.
    pub fn new(mut polygons: Vec<Polygon>) -> Result<Self> {
        polygons.sort_by_key(|polygon| polygon.id);
        if let Some(pair) = polygons.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(CoproError::DuplicatePolygon(pair[0].id));
        }

        Ok(Self {
            index: polygons.iter().enumerate()
                .map(|(i, polygon)| (polygon.id, i))
                .collect(),
            rtree: RTree::bulk_load(
                polygons.iter().enumerate()
                    .filter_map(|(i, polygon)| BoundingBox::of(i, &polygon.geometry))
                    .collect()
            ),
            polygons,
        })
    }

    /// Loads polygons from a `.shp` file, taking ids (and optionally names) from attributes.
    pub fn from_shapefile(path: &Path, id_field: &str, name_field: Option<&str>) -> Result<Self> {
        let polygons = common::read_shapefile(path)?
            .into_iter()
            .map(|(shape, record)| {
                let id = common::integer_field(&record, id_field).ok_or_else(|| CoproError::input(
                    path,
                    format!("missing or non-integer id field {id_field:?}"),
                ))?;
                Ok(Polygon {
                    id: PolygonId(id),
                    name: name_field
                        .and_then(|field| common::character_field(&record, field))
                        .map(Arc::from),
                    geometry: common::shape_to_multipolygon(shape, path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("read {} polygons from {}", polygons.len(), path.display());
        Self::new(polygons)
    }

    /// Get the number of polygons.
    #[inline] pub fn len(&self) -> usize { self.polygons.len() }

    /// Check if there are no polygons.
    #[inline] pub fn is_empty(&self) -> bool { self.polygons.is_empty() }

    /// Iterate over polygons in ascending id order.
    #[inline] pub fn iter(&self) -> impl ExactSizeIterator<Item = &Polygon> { self.polygons.iter() }

    /// Iterate over `(id, geometry)` pairs in ascending id order.
    #[inline]
    pub fn iterate(&self) -> impl ExactSizeIterator<Item = (PolygonId, &MultiPolygon<f64>)> {
        self.polygons.iter().map(|polygon| (polygon.id, &polygon.geometry))
    }

    /// Look up a polygon by id.
    #[inline]
    pub fn get(&self, id: PolygonId) -> Option<&Polygon> {
        self.index.get(&id).map(|&i| &self.polygons[i])
    }

    /// Position of a polygon in iteration order.
    #[inline] pub fn position(&self, id: PolygonId) -> Option<usize> { self.index.get(&id).copied() }

    /// Polygon at a given position in iteration order.
    #[inline] pub fn at(&self, idx: usize) -> &Polygon { &self.polygons[idx] }

    /// Positions of polygons whose bounding boxes come within `tol` of polygon `idx`.
    pub(crate) fn candidates(&self, idx: usize, tol: f64) -> impl Iterator<Item = usize> + '_ {
        self.polygons[idx].geometry.bounding_rect()
            .into_iter()
            .flat_map(move |rect| self.rtree.locate_in_envelope_intersecting(&envelope(&rect, tol))
                .map(BoundingBox::idx)
                .collect::<Vec<_>>())
            .filter(move |&j| j != idx)
    }

    /// Compute which polygons touch each other.
    pub fn neighbors(&self) -> Neighbors { Neighbors::compute(self) }
}
