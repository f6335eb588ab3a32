use anyhow::{Context, Result};
use copro::{pipeline, LogObserver, RunConfig};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::XyArgs) -> Result<()> {
    let config = RunConfig::from_file(&args.config)
        .with_context(|| format!("[xy] loading configuration {}", args.config.display()))?;

    let inputs = pipeline::load_inputs(&config)?;
    let xy = pipeline::create_xy(&config, &inputs, &mut LogObserver::new())?;
    println!("[xy] {} rows, {} columns, {:.2}% conflict", xy.len(), xy.n_columns(), xy.conflict_percentage());

    if let Some(csv) = &args.csv {
        println!("[xy] writing table to {}", csv.display());
        xy.write_csv(&pipeline::columns(&config), csv)?;
    }

    Ok(())
}
