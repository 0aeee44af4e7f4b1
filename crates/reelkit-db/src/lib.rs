//! Sqlite persistence for wizard projects.

pub mod error;
pub mod gateway;
mod migration;
pub mod projects;
pub mod store;

pub use error::{Error, Result};
pub use gateway::SqliteGateway;
pub use projects::{ProjectRecord, Projects};
pub use store::Store;
