// Local persistence of downloaded series.

pub mod sqlite;

pub use sqlite::SqliteStorage;
