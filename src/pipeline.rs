//! Top-level runs: load a precomputed XY file or build and save one.

use ndarray::Array2;

use crate::{
    cache, common,
    config::{RunConfig, X_FILE_NAME},
    conflict::{read_events, ConflictEvent, ConflictLabeler},
    driver::drivers_from_config,
    matrix::{column_names, Assembler, BuildObserver, XyPair},
    polygon::PolygonRegistry,
    Result,
};

/// Polygons and conflict events named by a configuration.
#[derive(Debug)]
pub struct Inputs {
    pub registry: PolygonRegistry,
    pub events: Vec<ConflictEvent>,
}

/// Read the polygon layer and the conflict events.
pub fn load_inputs(config: &RunConfig) -> Result<Inputs> {
    let polygons = config.input_path(&config.polygons.path);
    tracing::info!("reading polygons from {}", polygons.display());
    let registry = PolygonRegistry::from_shapefile(
        &polygons,
        &config.polygons.id_field,
        config.polygons.name_field.as_deref(),
    )?;
    tracing::info!("registered {} polygons", registry.len());

    let events = read_events(&config.conflicts, &config.input_path(&config.conflicts.path))?;
    Ok(Inputs { registry, events })
}

/// Column names of X for this configuration.
pub fn columns(config: &RunConfig) -> Vec<String> {
    column_names(&config.features, config.drivers.iter().map(|driver| driver.name.as_str()))
}

/// Load the precomputed XY file if one is configured and readable,
/// otherwise build X and Y and save them to the output directory.
pub fn create_xy(config: &RunConfig, inputs: &Inputs, observer: &mut dyn BuildObserver) -> Result<XyPair> {
    if let Some(path) = config.pre_calc_xy() {
        tracing::info!("loading XY data from file {}", path.display());
        if let Some(xy) = cache::load(&path) {
            return Ok(xy);
        }
    }

    let drivers = drivers_from_config(config)?;
    let labeler = ConflictLabeler::new(&inputs.events);
    let xy = Assembler::new(&inputs.registry, &drivers, &labeler, &config.features)
        .build(config.settings.years(), observer)?;

    common::ensure_dir_exists(&config.output_dir())?;
    let path = config.xy_path();
    tracing::info!("saving XY data by default to file {}", path.display());
    cache::save(&path, &xy)?;
    Ok(xy)
}

/// Load the precomputed projection samples if configured and readable,
/// otherwise build the samples of `year` and save them as `X.npy`.
pub fn create_x(
    config: &RunConfig,
    inputs: &Inputs,
    year: i32,
    observer: &mut dyn BuildObserver,
) -> Result<Array2<f64>> {
    if let Some(path) = config.pre_calc_x() {
        tracing::info!("loading X data from file {}", path.display());
        if let Some(x) = cache::load_samples(&path) {
            return Ok(x);
        }
    }

    let drivers = drivers_from_config(config)?;
    let labeler = ConflictLabeler::new(&inputs.events);
    let x = Assembler::new(&inputs.registry, &drivers, &labeler, &config.features)
        .build_projection(year, observer)?;

    common::ensure_dir_exists(&config.output_dir())?;
    let path = config.output_dir().join(X_FILE_NAME);
    tracing::info!("saving X data for {year} to file {}", path.display());
    cache::save_samples(&path, &x)?;
    Ok(x)
}
