//! State shared by every page of one harvest run
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::normalization::ConversionRate;

/// Run identity, the fixed conversion rate, and the specification key union.
///
/// The union is the only value that grows during a run; it is mutated
/// through `&mut self` by the specification parser as pages are processed.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    conversion_rate: ConversionRate,
    spec_keys: BTreeSet<String>,
}

impl RunContext {
    pub fn new(conversion_rate: ConversionRate) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            conversion_rate,
            spec_keys: BTreeSet::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn conversion_rate(&self) -> ConversionRate {
        self.conversion_rate
    }

    /// Returns `true` the first time a key is seen in this run.
    pub fn register_spec_key(&mut self, key: &str) -> bool {
        if self.spec_keys.contains(key) {
            false
        } else {
            self.spec_keys.insert(key.to_string())
        }
    }

    pub fn spec_keys(&self) -> &BTreeSet<String> {
        &self.spec_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_grows_monotonically() {
        let mut ctx = RunContext::new(ConversionRate::new(0.73).unwrap());
        assert!(ctx.register_spec_key("print_speed"));
        assert!(ctx.register_spec_key("encoding"));
        assert!(!ctx.register_spec_key("print_speed"));

        let keys: Vec<&str> = ctx.spec_keys().iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["encoding", "print_speed"]);
    }

    #[test]
    fn test_runs_get_distinct_ids() {
        let rate = ConversionRate::new(1.0).unwrap();
        assert_ne!(RunContext::new(rate).run_id(), RunContext::new(rate).run_id());
    }
}
