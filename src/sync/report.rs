use std::fmt;

/// Outcome of processing one pool within a batch
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Updated,
    Skipped(String),
    Failed(String),
}

/// Aggregate result of one batch stage, returned to the caller
/// rather than only logged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Updated => self.updated += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.updated + self.skipped + self.failed
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "updated={} skipped={} failed={}",
            self.updated, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_each_outcome_kind() {
        let mut report = BatchReport::default();
        report.record(&ItemOutcome::Updated);
        report.record(&ItemOutcome::Updated);
        report.record(&ItemOutcome::Skipped("no match".to_string()));
        report.record(&ItemOutcome::Failed("boom".to_string()));

        assert_eq!(report.updated, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 4);
        assert_eq!(report.to_string(), "updated=2 skipped=1 failed=1");
    }
}
