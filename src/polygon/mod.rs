mod bbox;
mod id;
mod neighbors;
mod registry;

pub(crate) use bbox::{envelope, BoundingBox};
pub use id::{PolygonId, MAX_EXACT_F64_ID};
pub use neighbors::Neighbors;
pub use registry::{Polygon, PolygonRegistry};
