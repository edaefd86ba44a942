//! Engine commands

pub mod migrate;
