//! Predictor drivers and their per-polygon zonal aggregation.

mod aggregate;
mod raster;
mod source;
mod stat;
mod vector;

use std::{fmt, ops::RangeInclusive};

use geo::MultiPolygon;

pub use aggregate::{aggregate, YearLayers};
pub use raster::AsciiGrid;
pub use source::{FileSource, YearTemplate};
pub use stat::{Sample, ZonalStat};
pub use vector::VectorLayer;

use crate::{config::RunConfig, CoproError, Result};

/// A driver's data for one year, queried per polygon footprint.
pub trait Layer {
    /// Every value overlapping `footprint`, with its weight.
    fn sample(&self, footprint: &MultiPolygon<f64>) -> Vec<Sample>;
}

/// Resolves a driver's data per year.
pub trait LayerSource: fmt::Debug {
    /// Read the layer for `year`; `Ok(None)` when no data exists for that year.
    fn load(&self, year: i32) -> Result<Option<Box<dyn Layer>>>;

    /// Whether data for `year` can be resolved, without reading it.
    fn has_year(&self, year: i32) -> bool;

    /// Human-readable location, for messages.
    fn describe(&self) -> String;
}

/// A named predictor variable.
#[derive(Debug)]
pub struct Driver {
    name: String,
    stat: ZonalStat,
    source: Box<dyn LayerSource>,
}

impl Driver {
    pub fn new(name: impl Into<String>, stat: ZonalStat, source: impl LayerSource + 'static) -> Self {
        Self { name: name.into(), stat, source: Box::new(source) }
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn stat(&self) -> ZonalStat { self.stat }

    #[inline] pub fn source(&self) -> &dyn LayerSource { self.source.as_ref() }

    /// Fail unless at least one year of `years` resolves to data.
    pub fn ensure_resolvable(&self, years: RangeInclusive<i32>) -> Result<()> {
        if years.clone().any(|year| self.source.has_year(year)) {
            Ok(())
        } else {
            Err(CoproError::Configuration(format!(
                "driver {:?} has no resolvable source ({}) for any year in {}..={}",
                self.name, self.source.describe(), years.start(), years.end(),
            )))
        }
    }
}

/// Build every driver named in the configuration, in configuration order.
pub fn drivers_from_config(config: &RunConfig) -> Result<Vec<Driver>> {
    let input_dir = config.input_dir();
    config.drivers.iter()
        .map(|driver| Ok(Driver::new(
            driver.name.clone(),
            driver.stat,
            FileSource::new(&input_dir, &driver.path, driver.kind, driver.field.as_deref())?,
        )))
        .collect()
}
