pub mod provider;

pub use provider::{parse_pricing_table, WatchmodeConfig, WatchmodeProvider};
