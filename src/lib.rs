#![doc = "copro: conflict-risk sample and target matrices per polygon and year"]
mod common;
mod error;
mod io;
#[cfg(test)]
mod testutil;

pub mod cache;
pub mod config;
pub mod conflict;
pub mod driver;
pub mod matrix;
pub mod pipeline;
pub mod polygon;

#[doc(inline)]
pub use error::{CoproError, Result};

#[doc(inline)]
pub use config::{IdColumns, RunConfig};

#[doc(inline)]
pub use matrix::{Assembler, BuildEvent, BuildObserver, LogObserver, XyPair};

#[doc(inline)]
pub use polygon::{Polygon, PolygonId, PolygonRegistry};
