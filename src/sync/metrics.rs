use crate::models::{ChartPoint, PoolMetrics};

/// Extract current metrics from an ordered chart series.
///
/// None means the upstream has no data for the pool, which is distinct
/// from a pool whose latest TVL or APY happens to be zero. The day span
/// is the ceiling of the real-valued distance between the first and
/// last timestamps, 0 when they coincide.
pub fn current_metrics(series: &[ChartPoint]) -> Option<PoolMetrics> {
    let first = series.first()?;
    let last = series.last()?;

    let span_ms = last
        .timestamp
        .signed_duration_since(first.timestamp)
        .num_milliseconds()
        .max(0);
    let elapsed_days = (span_ms as f64 / 86_400_000.0).ceil() as u64;

    Some(PoolMetrics {
        tvl_usd: last.tvl_usd.unwrap_or(0.0),
        apy: last.apy.unwrap_or(0.0),
        elapsed_days,
    })
}
