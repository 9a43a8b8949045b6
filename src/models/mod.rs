pub mod chart;
pub mod pool;
pub mod token;

pub use chart::ChartPoint;
pub use chart::ChartResponse;
pub use chart::PoolMetrics;
pub use pool::PoolListing;
pub use pool::PoolListingEntry;
pub use pool::PoolRecord;
pub use pool::PoolUpdate;
pub use pool::Rating;
pub use token::token_key;
pub use token::TokenKeyScheme;
pub use token::TokenRiskEntry;
