//! Polled progress reporting.

/// Host-provided progress sink, polled by long-running operations.
///
/// The selection engine calls this between module-processing steps to
/// name the unit of work in flight; it is never a concurrency primitive.
pub trait ProgressReporter {
    /// A task with `total` units of work is starting.
    fn begin_task(&mut self, name: &str, total: usize) {
        let _ = (name, total);
    }

    /// The named sub-unit (e.g., a module) is now being processed.
    fn subtask(&mut self, name: &str) {
        let _ = name;
    }

    /// `units` units of work completed since the last call.
    fn worked(&mut self, units: usize) {
        let _ = units;
    }

    /// The task finished (successfully or not).
    fn done(&mut self) {}
}

/// Progress reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {}
