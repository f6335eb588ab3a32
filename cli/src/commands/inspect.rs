use anyhow::{Context, Result};
use copro::cache;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let xy = cache::load(&args.file)
        .with_context(|| format!("[inspect] no readable XY data in {}", args.file.display()))?;

    println!("[inspect] {}", args.file.display());
    println!("  rows:      {}", xy.len());
    println!("  columns:   {}", xy.n_columns());
    println!("  conflicts: {} ({:.2}%)", xy.y.iter().filter(|&&y| y).count(), xy.conflict_percentage());

    if cli.verbose > 0 {
        for (row, label) in xy.x.rows().into_iter().zip(&xy.y).take(10) {
            println!("  {row} -> {label}");
        }
    }

    Ok(())
}
