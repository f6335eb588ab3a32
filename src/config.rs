//! Run configuration.
//!
//! A [`RunConfig`] is parsed once at startup and then passed by reference to
//! every component. Relative paths resolve against the directory holding the
//! configuration file (`root_dir`).

use std::{collections::HashSet, fs, ops::RangeInclusive, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::{driver::ZonalStat, CoproError, Result};

/// Default name of the persisted XY container under the output directory.
pub const XY_FILE_NAME: &str = "XY.npz";

/// Default name of the projection sample matrix under the output directory.
pub const X_FILE_NAME: &str = "X.npy";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory that relative paths resolve against; set by [`RunConfig::from_file`].
    #[serde(skip)]
    pub root_dir: PathBuf,
    #[serde(default)]
    pub general: GeneralConfig,
    pub settings: Settings,
    pub polygons: PolygonConfig,
    pub conflicts: ConflictConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub pre_calc: PreCalcConfig,
    #[serde(default)]
    pub drivers: Vec<DriverConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding polygon, conflict and driver files.
    #[serde(default)]
    pub input_dir: PathBuf,
    /// Directory receiving the XY file.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf { PathBuf::from("OUT") }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { input_dir: PathBuf::new(), output_dir: default_output_dir() }
    }
}

/// Simulation period, both ends inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Settings {
    pub y_start: i32,
    pub y_end: i32,
}

impl Settings {
    #[inline] pub fn years(&self) -> RangeInclusive<i32> { self.y_start..=self.y_end }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonConfig {
    /// Polygon shapefile, relative to the input directory.
    pub path: PathBuf,
    /// Attribute holding the stable integer id.
    pub id_field: String,
    #[serde(default)]
    pub name_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictConfig {
    /// Conflict events, `.csv` or `.shp`, relative to the input directory.
    pub path: PathBuf,
    #[serde(default = "default_year_field")]
    pub year_field: String,
    #[serde(default = "default_lon_field")]
    pub lon_field: String,
    #[serde(default = "default_lat_field")]
    pub lat_field: String,
}

fn default_year_field() -> String { "year".into() }
fn default_lon_field() -> String { "longitude".into() }
fn default_lat_field() -> String { "latitude".into() }

/// Whether `poly_id` and `year` stay in X as its two leading columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdColumns {
    #[default]
    Keep,
    Drop,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub id_columns: IdColumns,
    /// Conflict in the polygon itself during the previous year.
    #[serde(default)]
    pub conflict_t_min_1: bool,
    /// Conflict in any touching neighbour during the previous year.
    #[serde(default)]
    pub conflict_t_min_1_nb: bool,
}

impl FeatureConfig {
    /// Lag features need the previous year, so the first year only warms up.
    #[inline] pub fn uses_lag(&self) -> bool { self.conflict_t_min_1 || self.conflict_t_min_1_nb }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreCalcConfig {
    /// Previously saved XY file, relative to `root_dir`. Building is skipped when it loads.
    #[serde(default, rename = "XY", alias = "xy")]
    pub xy: Option<PathBuf>,
    /// Previously saved projection samples, relative to `root_dir`.
    #[serde(default, rename = "X", alias = "x")]
    pub x: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// ESRI ASCII grid.
    Raster,
    /// Shapefile with a numeric attribute.
    Vector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    pub name: String,
    /// File path relative to the input directory; `{year}` is substituted per year.
    pub path: String,
    pub kind: DriverKind,
    /// Attribute for vector drivers; `{year}` is substituted per year.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub stat: ZonalStat,
}

impl RunConfig {
    /// Parse a TOML configuration file and validate it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CoproError::Configuration(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::from_toml(&text)?;
        config.root_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse a TOML document; `root_dir` is left empty.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| CoproError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settings.y_start > self.settings.y_end {
            return Err(CoproError::Configuration(format!(
                "y_start ({}) is after y_end ({})", self.settings.y_start, self.settings.y_end
            )));
        }
        let mut seen = HashSet::new();
        for driver in &self.drivers {
            if driver.name.trim().is_empty() {
                return Err(CoproError::Configuration("driver with empty name".into()));
            }
            if !seen.insert(driver.name.as_str()) {
                return Err(CoproError::Configuration(format!("driver {:?} listed twice", driver.name)));
            }
        }
        Ok(())
    }

    #[inline] pub fn input_dir(&self) -> PathBuf { self.root_dir.join(&self.general.input_dir) }

    #[inline] pub fn output_dir(&self) -> PathBuf { self.root_dir.join(&self.general.output_dir) }

    #[inline] pub fn input_path(&self, rel: &Path) -> PathBuf { self.input_dir().join(rel) }

    /// Where a freshly built XY pair is saved.
    #[inline] pub fn xy_path(&self) -> PathBuf { self.output_dir().join(XY_FILE_NAME) }

    /// The configured precomputed XY file, if any.
    pub fn pre_calc_xy(&self) -> Option<PathBuf> { self.pre_calc_path(self.pre_calc.xy.as_ref()) }

    /// The configured precomputed projection samples, if any.
    pub fn pre_calc_x(&self) -> Option<PathBuf> { self.pre_calc_path(self.pre_calc.x.as_ref()) }

    fn pre_calc_path(&self, path: Option<&PathBuf>) -> Option<PathBuf> {
        path.filter(|path| !path.as_os_str().is_empty())
            .map(|path| self.root_dir.join(path))
    }
}
