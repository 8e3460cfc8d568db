//! Progress reporting seam between the numeric pipeline and its host.

use serde::{Deserialize, Serialize};

/// A single progress update. Percentages are monotonically
/// non-decreasing within a phase; a new phase resets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub text: String,
    pub percent: u8,
}

impl TaskProgress {
    pub fn new(text: impl Into<String>, percent: u8) -> Self {
        Self {
            text: text.into(),
            percent,
        }
    }
}

/// Sink for progress updates. Invoked from the worker running the
/// mesher or solver; implementations may forward elsewhere but must not
/// block the worker for long.
pub trait Progress {
    fn report(&mut self, progress: TaskProgress);
}

impl<F: FnMut(TaskProgress)> Progress for F {
    fn report(&mut self, progress: TaskProgress) {
        self(progress);
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn report(&mut self, _progress: TaskProgress) {}
}

/// Records every report; used by tests to assert reporting behaviour.
#[derive(Debug, Default)]
pub struct CollectingProgress {
    pub reports: Vec<TaskProgress>,
}

impl Progress for CollectingProgress {
    fn report(&mut self, progress: TaskProgress) {
        self.reports.push(progress);
    }
}
