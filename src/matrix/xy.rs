use std::{fs::File, path::Path};

use ndarray::{Array1, Array2};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter, NamedFrom}};

use crate::{config::IdColumns, polygon::PolygonId, CoproError, Result};
use super::RowKey;

/// Name of the target column in exported tables.
pub const TARGET_COLUMN: &str = "conflict";

/// Samples matrix X and aligned conflict labels Y.
#[derive(Debug, Clone, PartialEq)]
pub struct XyPair {
    pub x: Array2<f64>,
    pub y: Array1<bool>,
}

impl XyPair {
    /// Pair `x` and `y`; `None` unless they have the same number of rows.
    pub fn try_new(x: Array2<f64>, y: Array1<bool>) -> Option<Self> {
        (x.nrows() == y.len()).then_some(Self { x, y })
    }

    #[inline] pub fn len(&self) -> usize { self.y.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.y.is_empty() }

    #[inline] pub fn n_columns(&self) -> usize { self.x.ncols() }

    /// Share of rows labelled as conflict, in percent.
    pub fn conflict_percentage(&self) -> f64 {
        if self.is_empty() { return 0.0 }
        100.0 * self.y.iter().filter(|&&y| y).count() as f64 / self.len() as f64
    }

    /// Row keys read back from the leading `poly_id` and `year` columns.
    /// `None` when X was built without identifier columns.
    pub fn keys(&self, id_columns: IdColumns) -> Option<Vec<RowKey>> {
        (id_columns == IdColumns::Keep && self.n_columns() >= 2).then(|| {
            self.x.rows().into_iter()
                .map(|row| RowKey { polygon_id: PolygonId(row[0] as i64), year: row[1] as i32 })
                .collect()
        })
    }

    /// X as named columns plus the target column.
    pub fn to_dataframe(&self, columns: &[String]) -> Result<DataFrame> {
        if columns.len() != self.n_columns() {
            return Err(CoproError::Configuration(format!(
                "{} column names given for {} columns", columns.len(), self.n_columns()
            )));
        }

        let mut series: Vec<Column> = columns.iter()
            .zip(self.x.columns())
            .map(|(name, values)| Column::new(name.as_str().into(), values.to_vec()))
            .collect();
        series.push(Column::new(TARGET_COLUMN.into(), self.y.to_vec()));

        Ok(DataFrame::new(series)?)
    }

    /// Write X and Y to a CSV file for inspection.
    pub fn write_csv(&self, columns: &[String], path: &Path) -> Result<()> {
        let mut df = self.to_dataframe(columns)?;
        let file = File::create(path)?;
        CsvWriter::new(file).finish(&mut df)?;
        Ok(())
    }
}
