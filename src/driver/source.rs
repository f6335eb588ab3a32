use std::{fmt, path::{Path, PathBuf}};

use crate::{common, config::DriverKind, CoproError, Result};
use super::{AsciiGrid, Layer, LayerSource, VectorLayer};

const YEAR_PLACEHOLDER: &str = "{year}";

/// A file path or attribute name that may contain a `{year}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearTemplate(String);

impl YearTemplate {
    pub fn new(template: impl Into<String>) -> Self { Self(template.into()) }

    #[inline] pub fn is_year_indexed(&self) -> bool { self.0.contains(YEAR_PLACEHOLDER) }

    #[inline] pub fn render(&self, year: i32) -> String { self.0.replace(YEAR_PLACEHOLDER, &year.to_string()) }
}

impl fmt::Display for YearTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Driver data read from disk: an ASCII grid or a shapefile attribute.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
    path: YearTemplate,
    kind: DriverKind,
    field: Option<YearTemplate>,
}

impl FileSource {
    pub fn new(dir: &Path, path: &str, kind: DriverKind, field: Option<&str>) -> Result<Self> {
        let field = match (kind, field) {
            (DriverKind::Vector, Some(field)) => Some(YearTemplate::new(field)),
            (DriverKind::Vector, None) => return Err(CoproError::Configuration(format!(
                "vector driver {path} needs an attribute field"
            ))),
            (DriverKind::Raster, Some(_)) => return Err(CoproError::Configuration(format!(
                "raster driver {path} does not take an attribute field"
            ))),
            (DriverKind::Raster, None) => None,
        };
        if kind == DriverKind::Raster && common::extension(Path::new(path)).as_deref() != Some("asc") {
            return Err(CoproError::Configuration(format!(
                "raster driver {path} must be an ESRI ASCII grid (.asc)"
            )));
        }
        Ok(Self { dir: dir.to_path_buf(), path: YearTemplate::new(path), kind, field })
    }

    /// File holding the data for `year`.
    #[inline] pub fn path_for(&self, year: i32) -> PathBuf { self.dir.join(self.path.render(year)) }

    #[inline]
    pub fn is_year_indexed(&self) -> bool {
        self.path.is_year_indexed() || self.field.as_ref().is_some_and(YearTemplate::is_year_indexed)
    }
}

impl LayerSource for FileSource {
    fn load(&self, year: i32) -> Result<Option<Box<dyn Layer>>> {
        let path = self.path_for(year);
        if !path.is_file() { return Ok(None) }

        Ok(match (self.kind, &self.field) {
            (DriverKind::Raster, _) => Some(Box::new(AsciiGrid::read(&path)?) as Box<dyn Layer>),
            (DriverKind::Vector, Some(field)) => VectorLayer::read(&path, &field.render(year))?
                .map(|layer| Box::new(layer) as Box<dyn Layer>),
            (DriverKind::Vector, None) => None,
        })
    }

    /// Vector sources also need the year's field in the attribute table.
    /// An unreadable table counts as present, so loading reports the actual error.
    fn has_year(&self, year: i32) -> bool {
        let path = self.path_for(year);
        path.is_file() && match &self.field {
            Some(field) => common::has_field(&path, &field.render(year)).unwrap_or(true),
            None => true,
        }
    }

    fn describe(&self) -> String {
        match &self.field {
            Some(field) => format!("{} [{}]", self.dir.join(self.path.to_string()).display(), field),
            None => self.dir.join(self.path.to_string()).display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{driver::{Driver, ZonalStat}, testutil::write_squares};

    #[test]
    fn template_substitutes_every_placeholder() {
        let template = YearTemplate::new("rain/{year}/rain_{year}.asc");
        assert!(template.is_year_indexed());
        assert_eq!(template.render(2005), "rain/2005/rain_2005.asc");
        assert!(!YearTemplate::new("static.asc").is_year_indexed());
    }

    #[test]
    fn vector_needs_field_and_raster_needs_asc() {
        let dir = Path::new("/data");
        assert!(FileSource::new(dir, "pop.shp", DriverKind::Vector, None).is_err());
        assert!(FileSource::new(dir, "rain.tif", DriverKind::Raster, None).is_err());
        assert!(FileSource::new(dir, "rain.asc", DriverKind::Raster, Some("x")).is_err());
        let source = FileSource::new(dir, "pop.shp", DriverKind::Vector, Some("POP_{year}")).unwrap();
        assert!(source.is_year_indexed());
        assert_eq!(source.path_for(2001), PathBuf::from("/data/pop.shp"));
    }

    #[test]
    fn absent_file_is_missing_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path(), "rain_{year}.asc", DriverKind::Raster, None).unwrap();
        assert!(!source.has_year(2000));
        assert!(source.load(2000).unwrap().is_none());
    }

    #[test]
    fn present_raster_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rain_2000.asc"),
            "ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\n4.5\n",
        ).unwrap();
        let source = FileSource::new(dir.path(), "rain_{year}.asc", DriverKind::Raster, None).unwrap();
        assert!(source.has_year(2000));
        assert!(source.load(2000).unwrap().is_some());
        assert!(source.load(2001).unwrap().is_none());
    }

    #[test]
    fn vector_year_needs_its_field() {
        let dir = tempfile::tempdir().unwrap();
        write_squares(&dir.path().join("pop.shp"), &["POP_2000"], &[((0.0, 0.0, 1.0), vec![Some(12.0)])]);
        let source = FileSource::new(dir.path(), "pop.shp", DriverKind::Vector, Some("POP_{year}")).unwrap();

        assert!(source.has_year(2000));
        assert!(!source.has_year(2001));
        assert!(source.load(2000).unwrap().is_some());
        assert!(source.load(2001).unwrap().is_none());
    }

    #[test]
    fn vector_field_absent_every_year_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write_squares(&dir.path().join("pop.shp"), &["POP_1990"], &[((0.0, 0.0, 1.0), vec![Some(12.0)])]);
        let source = FileSource::new(dir.path(), "pop.shp", DriverKind::Vector, Some("POP_{year}")).unwrap();
        let driver = Driver::new("population", ZonalStat::Sum, source);

        assert!(matches!(driver.ensure_resolvable(2000..=2001), Err(CoproError::Configuration(_))));
    }

    #[test]
    fn corrupt_raster_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rain.asc"), "ncols 2\nnrows 1\n").unwrap();
        let source = FileSource::new(dir.path(), "rain.asc", DriverKind::Raster, None).unwrap();
        assert!(matches!(source.load(2000), Err(CoproError::Input { .. })));
    }
}
