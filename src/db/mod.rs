mod catalog;
pub(crate) mod sqlite;
mod tokens;

pub use catalog::PoolCatalog;
pub use sqlite::Database;
pub use tokens::TokenRiskTable;
