//! Run orchestration: read the log, dump the record, build and launch the
//! recovery command.

pub mod controller_handler;

pub use controller_handler::{open_input, Controller, RunOutcome};
