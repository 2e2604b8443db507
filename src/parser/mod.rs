// Parsers for market-data payloads.

pub mod kraken_parser;

pub use kraken_parser::{KrakenOhlcParser, Parser};
