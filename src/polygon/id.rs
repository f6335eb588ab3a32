use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a polygon, unchanged across years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolygonId(pub i64);

/// Largest id magnitude that an `f64` column holds exactly.
pub const MAX_EXACT_F64_ID: u64 = 1 << 53;

impl PolygonId {
    /// The id as a matrix value; `None` when it would lose precision.
    #[inline]
    pub fn to_f64(self) -> Option<f64> {
        (self.0.unsigned_abs() <= MAX_EXACT_F64_ID).then_some(self.0 as f64)
    }
}

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PolygonId {
    fn from(value: i64) -> Self { Self(value) }
}
