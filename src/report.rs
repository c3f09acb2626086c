use std::fmt::{self, Formatter};
use std::sync::Mutex;

/// Bucket used when a check arrives without a usable label.
pub const UNLABELED: &str = "unlabeled";

/// Label under which worker-level transport failures are tallied.
pub const TRANSPORT_ERROR: &str = "transport-error";

/// Outcome of a single check against one HTTP response. Folded into the
/// recorder immediately after the response is received, never retained.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub label: &'static str,
    pub passed: bool,
}

impl CheckResult {
    pub fn new(label: &'static str, passed: bool) -> Self {
        Self { label, passed }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelTally {
    pub label: String,
    pub pass: u64,
    pub total: u64,
}

/// Shared pass/fail tally, keyed by check label in first-seen order.
///
/// This is the only state mutated by more than one worker, so increments go
/// through a mutex. Recording never fails; a poisoned lock is recovered and
/// an empty label falls into the [UNLABELED] bucket.
#[derive(Debug, Default)]
pub struct CheckRecorder {
    tallies: Mutex<Vec<LabelTally>>,
}

impl CheckRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &str, passed: bool) {
        let label = if label.trim().is_empty() {
            UNLABELED
        } else {
            label
        };

        let mut tallies = self
            .tallies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match tallies.iter_mut().find(|tally| tally.label == label) {
            Some(tally) => {
                tally.total += 1;
                if passed {
                    tally.pass += 1;
                }
            }
            None => tallies.push(LabelTally {
                label: label.to_owned(),
                pass: passed as u64,
                total: 1,
            }),
        }
    }

    pub fn record_check(&self, check: &CheckResult) {
        self.record(check.label, check.passed);
    }

    /// Snapshot the tallies accumulated so far.
    pub fn report(&self) -> Report {
        let tallies = self
            .tallies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Report {
            tallies: tallies.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    tallies: Vec<LabelTally>,
}

impl Report {
    pub fn tallies(&self) -> &[LabelTally] {
        &self.tallies
    }

    pub fn tally(&self, label: &str) -> Option<&LabelTally> {
        self.tallies.iter().find(|tally| tally.label == label)
    }

    pub fn total(&self) -> u64 {
        self.tallies.iter().map(|tally| tally.total).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.tallies.iter().all(|tally| tally.pass == tally.total)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.tallies.is_empty() {
            return write!(f, "checks: none recorded");
        }

        write!(f, "checks:")?;
        for tally in &self.tallies {
            let percent = tally.pass as f64 / tally.total as f64 * 100.0;
            write!(
                f,
                "\n  {}: pass={}/{} ({:.1}%)",
                tally.label, tally.pass, tally.total, percent
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn tally_accumulation_test() {
        let recorder = CheckRecorder::new();
        recorder.record("a", true);
        recorder.record("a", false);
        recorder.record("a", true);
        recorder.record("b", false);

        let report = recorder.report();
        assert_eq!(
            report.tallies(),
            &[
                LabelTally {
                    label: "a".to_owned(),
                    pass: 2,
                    total: 3
                },
                LabelTally {
                    label: "b".to_owned(),
                    pass: 0,
                    total: 1
                },
            ]
        );
        assert_eq!(report.total(), 4);
        assert!(!report.all_passed());
    }

    #[test]
    fn unlabeled_bucket_test() {
        let recorder = CheckRecorder::new();
        recorder.record("", true);
        recorder.record("   ", false);

        let report = recorder.report();
        let tally = report.tally(UNLABELED).unwrap();
        assert_eq!((tally.pass, tally.total), (1, 2));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        // 30 writers mirrors the worst case of both pools running at once.
        let recorder = Arc::new(CheckRecorder::new());
        let per_thread = 1_000u64;

        let handles = (0..30)
            .map(|i| {
                let recorder = recorder.clone();
                thread::spawn(move || {
                    let label = if i % 2 == 0 { "even" } else { "odd" };
                    for _ in 0..per_thread {
                        recorder.record(label, true);
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        let report = recorder.report();
        assert_eq!(report.total(), 30 * per_thread);
        assert_eq!(report.tally("even").unwrap().total, 15 * per_thread);
        assert_eq!(report.tally("odd").unwrap().total, 15 * per_thread);
        assert!(report.all_passed());
    }

    #[test]
    fn report_display_test() {
        let recorder = CheckRecorder::new();
        recorder.record("GET / status 200", true);
        recorder.record("GET / status 200", false);

        assert_eq!(
            format!("{}", recorder.report()),
            "checks:\n  GET / status 200: pass=1/2 (50.0%)"
        );
        assert_eq!(
            format!("{}", CheckRecorder::new().report()),
            "checks: none recorded"
        );
    }
}
