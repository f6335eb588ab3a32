use geo::{BoundingRect, Rect};
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a geometry by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding geometry in its owning vector
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Bounding box of `geometry`, or `None` for empty geometries.
    pub(crate) fn of<G: BoundingRect<f64>>(idx: usize, geometry: &G) -> Option<Self>
    where
        G::Output: Into<Option<Rect<f64>>>,
    {
        geometry.bounding_rect().into().map(|bbox| Self::new(idx, bbox))
    }

    /// Get the index of the corresponding geometry.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Search envelope of a rectangle, grown by `tol` on every side.
pub(crate) fn envelope(rect: &Rect<f64>, tol: f64) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [rect.min().x - tol, rect.min().y - tol],
        [rect.max().x + tol, rect.max().y + tol],
    )
}
