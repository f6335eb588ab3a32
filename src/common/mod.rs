mod fs;
mod shp;

pub(crate) use fs::*;
pub(crate) use shp::*;
