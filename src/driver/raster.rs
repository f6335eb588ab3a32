//! ESRI ASCII grid rasters.

use std::{fs, path::Path};

use geo::{BoundingRect, Contains, MultiPolygon, Point};
use ndarray::Array2;

use crate::{CoproError, Result};
use super::{Layer, Sample};

const HEADER_KEYS: [&str; 8] = [
    "ncols", "nrows", "xllcorner", "yllcorner", "xllcenter", "yllcenter", "cellsize", "nodata_value",
];

/// A single-band raster, rows stored top to bottom.
#[derive(Debug, Clone)]
pub struct AsciiGrid {
    x_min: f64,
    y_max: f64,
    cellsize: f64,
    nodata: Option<f64>,
    values: Array2<f64>,
}

impl AsciiGrid {
    /// Build a grid from its lower left corner, cell size and `(nrows, ncols)` values.
    pub fn new(x_min: f64, y_min: f64, cellsize: f64, values: Array2<f64>, nodata: Option<f64>) -> Self {
        let y_max = y_min + values.nrows() as f64 * cellsize;
        Self { x_min, y_max, cellsize, nodata, values }
    }

    /// Read an `.asc` file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|message| CoproError::input(path, message))
    }

    /// Parse the text of an ASCII grid.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut ncols = None;
        let mut nrows = None;
        let mut x_corner = None;
        let mut y_corner = None;
        let mut x_center = None;
        let mut y_center = None;
        let mut cellsize = None;
        let mut nodata = None;

        let mut tokens = text.split_whitespace().peekable();
        while let Some(key) = tokens.next_if(|token| HEADER_KEYS.contains(&token.to_ascii_lowercase().as_str())) {
            let value = tokens.next().ok_or_else(|| format!("header key {key} has no value"))?;
            let number: f64 = value.parse().map_err(|_| format!("header {key} has invalid value {value:?}"))?;
            match key.to_ascii_lowercase().as_str() {
                "ncols" => ncols = Some(dimension(key, number)?),
                "nrows" => nrows = Some(dimension(key, number)?),
                "xllcorner" => x_corner = Some(number),
                "yllcorner" => y_corner = Some(number),
                "xllcenter" => x_center = Some(number),
                "yllcenter" => y_center = Some(number),
                "cellsize" => cellsize = Some(number),
                _ => nodata = Some(number),
            }
        }

        let ncols = ncols.ok_or("missing ncols")?;
        let nrows = nrows.ok_or("missing nrows")?;
        let cellsize = cellsize.filter(|c| *c > 0.0).ok_or("missing or non-positive cellsize")?;
        let x_min = x_corner.or(x_center.map(|x| x - cellsize / 2.0)).ok_or("missing xllcorner/xllcenter")?;
        let y_min = y_corner.or(y_center.map(|y| y - cellsize / 2.0)).ok_or("missing yllcorner/yllcenter")?;
        let cells = ncols.checked_mul(nrows).ok_or("grid dimensions overflow")?;

        let data = tokens
            .map(|token| token.parse::<f64>().map_err(|_| format!("invalid cell value {token:?}")))
            .collect::<Result<Vec<_>, _>>()?;
        if data.len() != cells {
            return Err(format!("expected {cells} cell values, found {}", data.len()));
        }
        let values = Array2::from_shape_vec((nrows, ncols), data).map_err(|e| e.to_string())?;

        Ok(Self::new(x_min, y_min, cellsize, values, nodata))
    }

    #[inline] pub fn nrows(&self) -> usize { self.values.nrows() }

    #[inline] pub fn ncols(&self) -> usize { self.values.ncols() }

    /// Centre of the cell at `(row, col)`.
    #[inline]
    fn cell_center(&self, row: usize, col: usize) -> Point<f64> {
        Point::new(
            self.x_min + (col as f64 + 0.5) * self.cellsize,
            self.y_max - (row as f64 + 0.5) * self.cellsize,
        )
    }

    #[inline]
    fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || self.nodata.is_some_and(|nodata| value == nodata)
    }
}

/// Grid dimensions must be non-negative whole numbers.
fn dimension(key: &str, number: f64) -> Result<usize, String> {
    if number >= 0.0 && number.fract() == 0.0 && number <= u32::MAX as f64 {
        Ok(number as usize)
    } else {
        Err(format!("header {key} must be a non-negative integer, found {number}"))
    }
}

impl Layer for AsciiGrid {
    /// Cells whose centre lies inside the footprint, excluding no-data cells.
    fn sample(&self, footprint: &MultiPolygon<f64>) -> Vec<Sample> {
        let Some(rect) = footprint.bounding_rect() else { return Vec::new() };

        let clamp = |v: f64, n: usize| v.max(0.0).min(n as f64) as usize;
        let col_start = clamp(((rect.min().x - self.x_min) / self.cellsize).floor(), self.ncols());
        let col_end = clamp(((rect.max().x - self.x_min) / self.cellsize).ceil(), self.ncols());
        let row_start = clamp(((self.y_max - rect.max().y) / self.cellsize).floor(), self.nrows());
        let row_end = clamp(((self.y_max - rect.min().y) / self.cellsize).ceil(), self.nrows());

        let mut samples = Vec::new();
        for row in row_start..row_end {
            for col in col_start..col_end {
                let value = self.values[[row, col]];
                if !self.is_nodata(value) && footprint.contains(&self.cell_center(row, col)) {
                    samples.push(Sample::unit(value));
                }
            }
        }
        samples
    }
}
