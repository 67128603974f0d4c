//! CSV batch interface used by the `submit` command.

pub mod outcome_writer;
pub mod payment_reader;
