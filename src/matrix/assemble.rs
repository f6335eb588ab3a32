use std::ops::RangeInclusive;

use ndarray::{Array1, Array2};

use crate::{
    config::{FeatureConfig, IdColumns},
    conflict::{ConflictEvent, ConflictLabeler},
    driver::{Driver, YearLayers},
    polygon::{Neighbors, PolygonRegistry, MAX_EXACT_F64_ID},
    CoproError, Result,
};
use super::{AssembledRow, BuildEvent, BuildObserver, LogObserver, RowKey, XyPair};

/// Walks years × polygons, aggregating drivers and labelling conflict.
pub struct Assembler<'a> {
    registry: &'a PolygonRegistry,
    drivers: &'a [Driver],
    labeler: &'a ConflictLabeler,
    features: FeatureConfig,
    neighbors: Option<Neighbors>,
}

impl<'a> Assembler<'a> {
    pub fn new(
        registry: &'a PolygonRegistry,
        drivers: &'a [Driver],
        labeler: &'a ConflictLabeler,
        features: &FeatureConfig,
    ) -> Self {
        Self {
            registry,
            drivers,
            labeler,
            features: features.clone(),
            neighbors: features.conflict_t_min_1_nb.then(|| registry.neighbors()),
        }
    }

    /// Names of the columns of X, in order.
    pub fn columns(&self) -> Vec<String> {
        column_names(&self.features, self.drivers.iter().map(Driver::name))
    }

    /// Lazily assemble every row for `years`, in (year, polygon id) order.
    /// Fails if a driver has no source for any of the years.
    pub fn rows(&self, years: RangeInclusive<i32>) -> Result<RowStream<'_>> {
        self.check_ids()?;
        self.check_drivers(&years)?;
        Ok(RowStream::new(self, years, self.features.uses_lag(), true))
    }

    /// Build X and Y for `years`, dropping rows with any missing value.
    pub fn build(&self, years: RangeInclusive<i32>, observer: &mut dyn BuildObserver) -> Result<XyPair> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let (total, dropped) = self.collect(self.rows(years)?, observer, |row, values| {
            rows.push(values);
            labels.push(row.label.unwrap_or(false));
        })?;

        let xy = XyPair { x: self.to_matrix(&rows), y: Array1::from(labels) };
        tracing::debug!("number of data points including missing values: {total}");
        tracing::debug!("number of data points excluding missing values: {}", total - dropped);
        tracing::debug!("{:.2} percent of the data points correspond to conflicts", xy.conflict_percentage());
        Ok(xy)
    }

    /// Build the samples of a single `year` without labels, for projections.
    /// Lag features read the conflicts of `year - 1` from the labeler.
    pub fn build_projection(&self, year: i32, observer: &mut dyn BuildObserver) -> Result<Array2<f64>> {
        self.check_ids()?;
        self.check_drivers(&(year..=year))?;
        let mut rows = Vec::new();
        let (total, dropped) = self.collect(
            RowStream::new(self, year..=year, false, false),
            observer,
            |_, values| rows.push(values),
        )?;
        tracing::debug!("projection for {year}: {} of {total} rows kept", total - dropped);
        Ok(self.to_matrix(&rows))
    }

    /// Kept id columns must hold every polygon id exactly.
    fn check_ids(&self) -> Result<()> {
        if self.features.id_columns == IdColumns::Drop { return Ok(()) }
        match self.registry.iter().find(|polygon| polygon.id.to_f64().is_none()) {
            Some(polygon) => Err(CoproError::Configuration(format!(
                "polygon id {} exceeds {MAX_EXACT_F64_ID} in magnitude and cannot be kept as a column of X; \
                 set features.id_columns = \"drop\"",
                polygon.id,
            ))),
            None => Ok(()),
        }
    }

    fn check_drivers(&self, years: &RangeInclusive<i32>) -> Result<()> {
        self.drivers.iter().try_for_each(|driver| driver.ensure_resolvable(years.clone()))
    }

    /// Drain `stream`, passing every complete row (with id columns applied) to `keep`.
    /// Returns (rows seen, rows dropped); fails when nothing survives.
    fn collect(
        &self,
        stream: RowStream<'_>,
        observer: &mut dyn BuildObserver,
        mut keep: impl FnMut(&AssembledRow, Vec<f64>),
    ) -> Result<(usize, usize)> {
        let mut total = 0;
        let mut dropped = 0;
        for event in stream {
            let event = event?;
            observer.on_event(&event);
            let BuildEvent::Row(row) = event else { continue };

            total += 1;
            match row.complete_values() {
                Some(values) => {
                    let mut full = Vec::with_capacity(values.len() + 2);
                    if self.features.id_columns == IdColumns::Keep {
                        // Exact: checked by `check_ids`.
                        full.extend([row.key.polygon_id.0 as f64, f64::from(row.key.year)]);
                    }
                    full.extend(values);
                    keep(&row, full);
                }
                None => dropped += 1,
            }
        }

        if total == dropped {
            return Err(CoproError::NoData { total, dropped });
        }
        Ok((total, dropped))
    }

    fn to_matrix(&self, rows: &[Vec<f64>]) -> Array2<f64> {
        let ncols = self.columns().len();
        Array2::from_shape_fn((rows.len(), ncols), |(i, j)| rows[i][j])
    }

    /// Assemble the row of the polygon at registry position `idx`.
    fn assemble_row(&self, layers: &YearLayers<'_>, idx: usize, with_label: bool) -> AssembledRow {
        let polygon = self.registry.at(idx);
        let year = layers.year();

        let mut values = layers.aggregate(polygon);
        if self.features.conflict_t_min_1 {
            values.push(Some(bool_value(self.labeler.label(polygon, year - 1))));
        }
        if let Some(neighbors) = &self.neighbors {
            let hit = neighbors.of(idx).iter()
                .any(|&j| self.labeler.label(self.registry.at(j), year - 1));
            values.push(Some(bool_value(hit)));
        }

        AssembledRow {
            key: RowKey { year, polygon_id: polygon.id },
            values,
            label: with_label.then(|| self.labeler.label(polygon, year)),
        }
    }
}

/// Column names of X for the given features and driver names.
pub fn column_names<'n>(features: &FeatureConfig, drivers: impl IntoIterator<Item = &'n str>) -> Vec<String> {
    let mut columns = Vec::new();
    if features.id_columns == IdColumns::Keep {
        columns.extend(["poly_id".to_string(), "year".to_string()]);
    }
    columns.extend(drivers.into_iter().map(str::to_string));
    if features.conflict_t_min_1 {
        columns.push("conflict_t_min_1".into());
    }
    if features.conflict_t_min_1_nb {
        columns.push("conflict_t_min_1_nb".into());
    }
    columns
}

#[inline]
fn bool_value(value: bool) -> f64 { if value { 1.0 } else { 0.0 } }

/// Lazy, finite, non-restartable sequence of build events.
///
/// Driver layers of a year are loaded when the year is entered and released
/// before the next year is loaded.
pub struct RowStream<'a> {
    assembler: &'a Assembler<'a>,
    years: RangeInclusive<i32>,
    current: Option<YearLayers<'a>>,
    next_polygon: usize,
    emitted: usize,
    warm_up: bool,
    with_labels: bool,
    finished: bool,
}

impl<'a> RowStream<'a> {
    fn new(assembler: &'a Assembler<'a>, years: RangeInclusive<i32>, warm_up: bool, with_labels: bool) -> Self {
        Self {
            assembler,
            years,
            current: None,
            next_polygon: 0,
            emitted: 0,
            warm_up,
            with_labels,
            finished: false,
        }
    }
}

impl Iterator for RowStream<'_> {
    type Item = Result<BuildEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished { return None }

        if let Some(layers) = &self.current {
            if self.next_polygon < self.assembler.registry.len() {
                let row = self.assembler.assemble_row(layers, self.next_polygon, self.with_labels);
                self.next_polygon += 1;
                self.emitted += 1;
                return Some(Ok(BuildEvent::Row(row)));
            }
            self.current = None;
        }

        let Some(year) = self.years.next() else {
            self.finished = true;
            return Some(Ok(BuildEvent::Finished { rows: self.emitted }));
        };

        if self.warm_up {
            self.warm_up = false;
            return Some(Ok(BuildEvent::YearSkipped { year }));
        }

        match YearLayers::load(self.assembler.drivers, year) {
            Ok(layers) => {
                let available = layers.available();
                self.current = Some(layers);
                self.next_polygon = 0;
                Some(Ok(BuildEvent::YearEntered { year, available, drivers: self.assembler.drivers.len() }))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Build X and Y from raw inputs, logging progress through `tracing`.
pub fn build(
    years: RangeInclusive<i32>,
    registry: &PolygonRegistry,
    drivers: &[Driver],
    events: &[ConflictEvent],
    features: &FeatureConfig,
) -> Result<XyPair> {
    let labeler = ConflictLabeler::new(events);
    Assembler::new(registry, drivers, &labeler, features).build(years, &mut LogObserver::new())
}
