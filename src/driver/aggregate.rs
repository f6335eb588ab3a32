use crate::{polygon::Polygon, Result};
use super::{Driver, Layer};

/// Zonal statistic of `driver` over `polygon` in `year`.
/// `None` when the source has no data that year or nothing overlaps the polygon.
pub fn aggregate(polygon: &Polygon, year: i32, driver: &Driver) -> Result<Option<f64>> {
    Ok(driver.source().load(year)?
        .and_then(|layer| driver.stat().reduce(&layer.sample(&polygon.geometry))))
}

/// Every driver's layer for one year, loaded once and released when dropped.
pub struct YearLayers<'a> {
    year: i32,
    layers: Vec<(&'a Driver, Option<Box<dyn Layer>>)>,
}

impl<'a> YearLayers<'a> {
    pub fn load(drivers: &'a [Driver], year: i32) -> Result<Self> {
        Ok(Self {
            year,
            layers: drivers.iter()
                .map(|driver| Ok((driver, driver.source().load(year)?)))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    #[inline] pub fn year(&self) -> i32 { self.year }

    /// Number of drivers with data this year.
    #[inline] pub fn available(&self) -> usize { self.layers.iter().filter(|(_, layer)| layer.is_some()).count() }

    /// One value per driver, in driver order.
    pub fn aggregate(&self, polygon: &Polygon) -> Vec<Option<f64>> {
        self.layers.iter()
            .map(|(driver, layer)| layer.as_ref()
                .and_then(|layer| driver.stat().reduce(&layer.sample(&polygon.geometry))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{driver::{tests::ConstSource, AsciiGrid, ZonalStat}, testutil::square};
    use crate::driver::{Layer, LayerSource};
    use ndarray::array;

    #[derive(Debug)]
    struct GridSource(AsciiGrid);

    impl LayerSource for GridSource {
        fn load(&self, _year: i32) -> Result<Option<Box<dyn Layer>>> {
            Ok(Some(Box::new(self.0.clone()) as Box<dyn Layer>))
        }
        fn has_year(&self, _year: i32) -> bool { true }
        fn describe(&self) -> String { "grid".into() }
    }

    #[test]
    fn aggregate_matches_year_layers() {
        let grid = AsciiGrid::new(0.0, 0.0, 1.0, array![[1.0, 2.0], [3.0, 4.0]], None);
        let drivers = vec![
            Driver::new("grid", ZonalStat::Max, GridSource(grid)),
            Driver::new("const", ZonalStat::Mean, ConstSource::with(&[(2000, 9.0)])),
        ];
        let polygon = Polygon::new(1, square(0.0, 0.0, 2.0));

        let layers = YearLayers::load(&drivers, 2000).unwrap();
        assert_eq!(layers.available(), 2);
        assert_eq!(layers.aggregate(&polygon), vec![Some(4.0), Some(9.0)]);
        assert_eq!(aggregate(&polygon, 2000, &drivers[0]).unwrap(), Some(4.0));
    }

    #[test]
    fn missing_year_and_missing_overlap_are_none() {
        let grid = AsciiGrid::new(0.0, 0.0, 1.0, array![[1.0]], None);
        let drivers = vec![
            Driver::new("grid", ZonalStat::Mean, GridSource(grid)),
            Driver::new("const", ZonalStat::Mean, ConstSource::with(&[(2000, 9.0)])),
        ];
        let far = Polygon::new(1, square(10.0, 10.0, 1.0));

        let layers = YearLayers::load(&drivers, 2001).unwrap();
        assert_eq!(layers.available(), 1);
        assert_eq!(layers.aggregate(&far), vec![None, None]);
        assert_eq!(aggregate(&far, 2001, &drivers[1]).unwrap(), None);
    }
}
