use std::{fs::File, path::Path};

use geo::{Geometry, Point};
use polars::{io::SerReader, prelude::{CsvReader, DataFrame, DataType}};

use crate::{common, config::ConflictConfig, CoproError, Result};

/// A located conflict event in a given year.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictEvent {
    pub year: i32,
    pub geometry: Geometry<f64>,
}

impl ConflictEvent {
    pub fn point(year: i32, lon: f64, lat: f64) -> Self {
        Self { year, geometry: Geometry::Point(Point::new(lon, lat)) }
    }
}

/// Read conflict events from a `.csv` table or a `.shp` file.
pub fn read_events(config: &ConflictConfig, path: &Path) -> Result<Vec<ConflictEvent>> {
    let events = match common::extension(path).as_deref() {
        Some("csv") => read_csv_events(path, config)?,
        Some("shp") => read_shapefile_events(path, &config.year_field)?,
        _ => return Err(CoproError::Configuration(format!(
            "conflict file {} must be .csv or .shp", path.display()
        ))),
    };
    tracing::info!("read {} conflict events from {}", events.len(), path.display());
    Ok(events)
}

/// Rows with a null year or coordinate are skipped.
fn read_csv_events(path: &Path, config: &ConflictConfig) -> Result<Vec<ConflictEvent>> {
    let file = File::open(path)?;
    let df = CsvReader::new(file).finish()?;
    events_from_dataframe(&df, config).map_err(|e| CoproError::input(path, e.to_string()))
}

fn events_from_dataframe(df: &DataFrame, config: &ConflictConfig) -> polars::error::PolarsResult<Vec<ConflictEvent>> {
    let years = df.column(&config.year_field)?.cast(&DataType::Int32)?;
    let lons = df.column(&config.lon_field)?.cast(&DataType::Float64)?;
    let lats = df.column(&config.lat_field)?.cast(&DataType::Float64)?;

    let events: Vec<ConflictEvent> = years.i32()?.into_iter()
        .zip(lons.f64()?.into_iter())
        .zip(lats.f64()?.into_iter())
        .filter_map(|((year, lon), lat)| Some(ConflictEvent::point(year?, lon?, lat?)))
        .collect();

    if events.len() < df.height() {
        tracing::debug!("skipped {} conflict rows with null fields", df.height() - events.len());
    }
    Ok(events)
}

/// Events of any geometry type, with the year taken from `year_field`.
fn read_shapefile_events(path: &Path, year_field: &str) -> Result<Vec<ConflictEvent>> {
    let mut events = Vec::new();
    for (shape, record) in common::read_shapefile(path)? {
        let year = common::integer_field(&record, year_field).ok_or_else(|| CoproError::input(
            path,
            format!("missing or non-integer year field {year_field:?}"),
        ))?;
        let year = i32::try_from(year).map_err(|_| CoproError::input(
            path,
            format!("year {year} in field {year_field:?} is out of range"),
        ))?;
        if let Some(geometry) = common::shape_to_geometry(shape, path)? {
            events.push(ConflictEvent { year, geometry });
        }
    }
    Ok(events)
}
