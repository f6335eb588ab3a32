use anyhow::{Context, Result};
use copro::{pipeline, LogObserver, RunConfig};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ProjectArgs) -> Result<()> {
    let config = RunConfig::from_file(&args.config)
        .with_context(|| format!("[project] loading configuration {}", args.config.display()))?;

    let inputs = pipeline::load_inputs(&config)?;
    let x = pipeline::create_x(&config, &inputs, args.year, &mut LogObserver::new())?;
    println!("[project] {}: {} rows, {} columns", args.year, x.nrows(), x.ncols());

    Ok(())
}
