//! Migration data model

pub mod migration;
pub mod result;

pub use migration::Migration;
pub use result::MigrationResult;
