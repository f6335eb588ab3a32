//! Assembly of the samples matrix (X) and target values (Y).

mod assemble;
mod event;
mod row;
mod xy;

pub use assemble::{build, column_names, Assembler, RowStream};
pub use event::{BuildEvent, BuildObserver, LogObserver};
pub use row::{AssembledRow, RowKey};
pub use xy::{XyPair, TARGET_COLUMN};
