// file: src/pipeline/budget.rs
// description: per-item time budget seeded from input size and revised when a phase overruns
// reference: adaptive estimate used only to interpolate progress

use crate::config::BudgetConfig;
use std::time::Duration;

/// Share of the item budget assumed to be spent extracting text.
pub const EXTRACTION_SHARE: f64 = 0.3;

/// How far past the configured cap a revised budget may grow.
const REVISION_HEADROOM: f64 = 2.0;

const BYTES_PER_MB: f64 = 1_048_576.0;

#[derive(Debug, Clone)]
pub struct BudgetPolicy {
    config: BudgetConfig,
}

impl BudgetPolicy {
    pub fn new(config: BudgetConfig) -> Self {
        Self { config }
    }

    /// `base + per_mb * size`, capped at `max_secs`.
    pub fn initial(&self, size_bytes: u64) -> TimeBudget {
        let size_mb = size_bytes as f64 / BYTES_PER_MB;
        let secs = (self.config.base_secs + self.config.secs_per_mb * size_mb)
            .min(self.config.max_secs)
            .max(f64::EPSILON);

        TimeBudget {
            total_secs: secs,
            limit_secs: self.config.max_secs.max(secs) * REVISION_HEADROOM,
        }
    }
}

/// Expected processing time for one item. Lives only while that item is
/// being processed.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBudget {
    total_secs: f64,
    limit_secs: f64,
}

impl TimeBudget {
    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    pub fn extraction_secs(&self) -> f64 {
        self.total_secs * EXTRACTION_SHARE
    }

    pub fn analysis_secs(&self) -> f64 {
        self.total_secs * (1.0 - EXTRACTION_SHARE)
    }

    /// Grows the budget in proportion to how far extraction overran its
    /// share. Never shrinks. Returns whether the budget changed.
    pub fn revise_after_extraction(&mut self, actual: Duration) -> bool {
        let assumed = self.extraction_secs();
        let actual = actual.as_secs_f64();
        if assumed <= 0.0 || actual <= assumed {
            return false;
        }

        let revised = (self.total_secs * (actual / assumed)).min(self.limit_secs);
        if revised > self.total_secs {
            self.total_secs = revised;
            true
        } else {
            false
        }
    }

    /// Hard deadline for one collaborator call covering `phase_secs` of the
    /// budget.
    pub fn call_timeout(&self, phase_secs: f64, factor: f64, min_secs: f64) -> Duration {
        Duration::from_secs_f64((phase_secs * factor).max(min_secs).max(0.001))
    }
}
