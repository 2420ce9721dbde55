//! # Statistics
//!
//! Counters that are kept while the handler runs, for reporting by an embedding application.
use std::fmt;
use std::time::Duration;

use enum_map::EnumMap;

use crate::settings::DualBoundMethod;

/// Calls of a single dual bounding method.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct MethodStatistics {
    /// Number of times the method was run.
    pub calls: u64,
    /// Number of times the method produced a bound.
    pub successes: u64,
    /// Total time spent in the method.
    pub time: Duration,
}

/// Counters of the exact handler.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statistics {
    /// Per dual bounding method; `Automatic` is never recorded, the resolved method is.
    pub methods: EnumMap<DualBoundMethod, MethodStatistics>,
    /// Number of exact solves of the relaxation.
    pub exact_lp_solves: u64,
    /// Certifications of a relaxation that was solved to optimality.
    pub feasible_lp_certifications: u64,
    /// Certifications of a relaxation that was reported infeasible.
    pub infeasible_lp_certifications: u64,
    /// Nodes that were cut off because of a certified bound.
    pub cutoffs: u64,
    /// Number of times two children were created.
    pub branchings: u64,
    /// Exact solutions that were handed to the search.
    pub stored_solutions: u64,
    /// Time spent building the interior point.
    pub interior_point_time: Duration,
}

impl Statistics {
    /// Record a call of a dual bounding method.
    pub fn record(&mut self, method: DualBoundMethod, success: bool, time: Duration) {
        let entry = &mut self.methods[method];
        entry.calls += 1;
        if success {
            entry.successes += 1;
        }
        entry.time += time;
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<28} {:>10} {:>10} {:>12}", "dual bound method", "calls", "successes", "time (s)")?;
        for (method, entry) in &self.methods {
            if entry.calls > 0 {
                writeln!(
                    f, "{:<28} {:>10} {:>10} {:>12.3}",
                    format!("{method:?}"), entry.calls, entry.successes, entry.time.as_secs_f64(),
                )?;
            }
        }
        writeln!(f, "exact LP solves: {}", self.exact_lp_solves)?;
        writeln!(
            f, "certified relaxations: {} feasible, {} infeasible",
            self.feasible_lp_certifications, self.infeasible_lp_certifications,
        )?;
        writeln!(f, "cutoffs: {}, branchings: {}", self.cutoffs, self.branchings)?;
        writeln!(f, "stored solutions: {}", self.stored_solutions)?;
        write!(f, "interior point time: {:.3} s", self.interior_point_time.as_secs_f64())
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use crate::settings::DualBoundMethod;
    use crate::statistics::Statistics;

    #[test]
    fn record_and_display() {
        let mut statistics = Statistics::default();
        statistics.record(DualBoundMethod::ProjectAndShift, true, Duration::from_millis(2));
        statistics.record(DualBoundMethod::ProjectAndShift, false, Duration::from_millis(1));

        let entry = statistics.methods[DualBoundMethod::ProjectAndShift];
        assert_eq!(entry.calls, 2);
        assert_eq!(entry.successes, 1);
        assert_eq!(entry.time, Duration::from_millis(3));
        assert_eq!(statistics.methods[DualBoundMethod::VerifyBasis].calls, 0);

        let text = statistics.to_string();
        assert!(text.contains("ProjectAndShift"));
        assert!(!text.contains("VerifyBasis"));
    }
}
