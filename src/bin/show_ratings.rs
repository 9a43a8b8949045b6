use anyhow::Result;
use clap::Parser;

use yield_ranker::db::Database;
use yield_ranker::models::Rating;
use yield_ranker::utils::short_id;

#[derive(Parser)]
#[command(name = "show_ratings")]
#[command(about = "Print the current pool ratings from the catalog", long_about = None)]
struct Args {
    /// SQLite database path
    #[arg(short, long, default_value = "ratings.db")]
    database: String,

    /// Maximum number of pools to display
    #[arg(short, long, default_value = "20")]
    limit: usize,

    /// Include pools without a strategy rating
    #[arg(short, long)]
    all: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let db = Database::new(&args.database).await?;
    let catalog = db.pool_catalog();

    let mut pools = catalog.list_all().await?;
    pools.sort_by(|a, b| {
        b.strategy_rating
            .partial_cmp(&a.strategy_rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!(
        "{:<14} {:<12} {:<16} {:<14} {:>16} {:>12}",
        "POOL", "CHAIN", "PROTOCOL", "TOKENS", "RATING", "STRATEGY"
    );

    let mut shown = 0;
    for pool in &pools {
        if pool.strategy_rating.is_none() && !args.all {
            continue;
        }
        if shown >= args.limit {
            break;
        }

        let tokens = match (&pool.token1, &pool.token2) {
            (Some(t1), Some(t2)) if t1 == t2 => t1.clone(),
            (Some(t1), Some(t2)) => format!("{}/{}", t1, t2),
            _ => "-".to_string(),
        };
        let rating = pool
            .rating
            .as_deref()
            .map(|raw| match Rating::from_db_value(raw) {
                Rating::Score(value) => format!("{:.0}", value),
                _ => raw.to_string(),
            })
            .unwrap_or_else(|| "-".to_string());
        let strategy = pool
            .strategy_rating
            .map(|value| format!("{:.4}", value))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<14} {:<12} {:<16} {:<14} {:>16} {:>12}",
            short_id(&pool.pool_id),
            pool.chain.as_deref().unwrap_or("-"),
            pool.protocol.as_deref().unwrap_or("-"),
            tokens,
            rating,
            strategy
        );
        shown += 1;
    }

    println!("\n{} of {} pools shown", shown, pools.len());

    db.close().await;
    Ok(())
}
