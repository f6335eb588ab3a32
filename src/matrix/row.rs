use crate::polygon::PolygonId;

/// Identifies a row: one polygon in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub year: i32,
    pub polygon_id: PolygonId,
}

/// One assembled (polygon, year) row before missing-value filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRow {
    pub key: RowKey,
    /// Driver values in driver order, followed by any lag features.
    pub values: Vec<Option<f64>>,
    /// Conflict presence; `None` when assembling projection samples.
    pub label: Option<bool>,
}

impl AssembledRow {
    /// A row is usable only when every value is present.
    #[inline] pub fn is_complete(&self) -> bool { self.values.iter().all(Option::is_some) }

    /// The values, if none is missing.
    pub fn complete_values(&self) -> Option<Vec<f64>> { self.values.iter().copied().collect() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<Option<f64>>) -> AssembledRow {
        AssembledRow { key: RowKey { year: 2000, polygon_id: PolygonId(1) }, values, label: Some(false) }
    }

    #[test]
    fn any_missing_value_makes_row_incomplete() {
        assert!(row(vec![Some(1.0), Some(2.0)]).is_complete());
        assert!(!row(vec![Some(1.0), None]).is_complete());
        assert_eq!(row(vec![Some(1.0), None]).complete_values(), None);
        assert_eq!(row(vec![Some(1.0), Some(2.0)]).complete_values(), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn keys_sort_by_year_then_polygon() {
        let a = RowKey { year: 2000, polygon_id: PolygonId(9) };
        let b = RowKey { year: 2001, polygon_id: PolygonId(1) };
        let c = RowKey { year: 2001, polygon_id: PolygonId(2) };
        assert!(a < b && b < c);
    }
}
