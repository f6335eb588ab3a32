use std::path::PathBuf;

/// Conflict-risk matrix builder
#[derive(clap::Parser, Debug)]
#[command(name = "copro", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build (or load) the XY data of a run and save it to the output directory
    Xy(XyArgs),

    /// Build the samples matrix of a single projection year
    Project(ProjectArgs),

    /// Summarize a saved XY file
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct XyArgs {
    /// Run configuration (TOML)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Also export X and Y as a CSV table
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub csv: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ProjectArgs {
    /// Run configuration (TOML)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Projection year
    #[arg(short, long)]
    pub year: i32,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Saved XY file, e.g. OUT/XY.npz
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,
}
