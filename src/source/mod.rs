// Market-data sources: everything that can produce a PriceSeries for a pair.

pub mod cached;
pub mod csv_snapshot;
pub mod kraken;
pub mod traits;

pub use cached::CachedSource;
pub use csv_snapshot::{CsvSource, write_snapshot};
pub use kraken::KrakenSource;
pub use traits::MarketDataSource;
