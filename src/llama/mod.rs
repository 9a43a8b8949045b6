mod client;

pub use client::MarketDataClient;
pub use client::MarketDataSource;
