//! Infrastructure layer: table storage, realtime publishing, config, demo data.

pub mod config;
pub mod rows;
pub mod seed;
pub mod table;

pub use config::{AppConfig, ConfigError};
pub use rows::TableRow;
pub use table::{InMemoryTable, Patch, Query, RealtimeTable, StoreError, Table, Updated};

#[cfg(feature = "postgres")]
pub use table::PostgresTable;
