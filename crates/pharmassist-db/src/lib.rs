pub mod config;
pub mod error;
pub mod gateway;
pub mod render;

pub use config::ConnectionConfig;
pub use error::{DbError, Result};
pub use gateway::{DatabaseHandle, SqlDatabase};
pub use render::{CellValue, ColumnInfo, TableInfo};
