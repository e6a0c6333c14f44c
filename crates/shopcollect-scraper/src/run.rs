//! State of one start-to-finish collection run.

use shopcollect_core::ShopRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Collecting,
    Completed,
    Failed,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::Collecting => write!(f, "collecting"),
            RunPhase::Completed => write!(f, "completed"),
            RunPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Mutable run state owned by a single collector.
#[derive(Debug)]
pub(crate) struct CollectionRun {
    /// 1-based.
    pub current_page: u32,
    pub target_pages: u32,
    pub is_collecting: bool,
    /// Terminal latch: once set, no further status is reported for this run.
    pub is_completed: bool,
    /// Durable buffer. Only replaced when a run finishes successfully.
    pub records: Vec<ShopRecord>,
    pub phase: RunPhase,
}

impl Default for CollectionRun {
    fn default() -> Self {
        Self {
            current_page: 1,
            target_pages: 1,
            is_collecting: false,
            is_completed: false,
            records: Vec::new(),
            phase: RunPhase::Idle,
        }
    }
}

impl CollectionRun {
    /// Resets counters and the buffer for a new run.
    pub fn begin(&mut self, target_pages: u32) {
        self.current_page = 1;
        self.target_pages = target_pages.max(1);
        self.is_collecting = true;
        self.is_completed = false;
        self.records.clear();
        self.phase = RunPhase::Collecting;
    }

    pub fn finish(&mut self, phase: RunPhase) {
        self.is_collecting = false;
        self.phase = phase;
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            phase: self.phase,
            current_page: self.current_page,
            target_pages: self.target_pages,
            is_collecting: self.is_collecting,
            is_completed: self.is_completed,
            record_count: self.records.len(),
        }
    }
}

/// Read-only copy of a run's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSnapshot {
    pub phase: RunPhase,
    pub current_page: u32,
    pub target_pages: u32,
    pub is_collecting: bool,
    pub is_completed: bool,
    pub record_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_previous_run() {
        let mut run = CollectionRun {
            current_page: 4,
            target_pages: 4,
            is_completed: true,
            records: vec![ShopRecord::default()],
            phase: RunPhase::Completed,
            ..CollectionRun::default()
        };
        run.begin(0);
        assert_eq!(
            run.snapshot(),
            RunSnapshot {
                phase: RunPhase::Collecting,
                current_page: 1,
                target_pages: 1,
                is_collecting: true,
                is_completed: false,
                record_count: 0,
            }
        );
    }

    #[test]
    fn finish_clears_collecting_flag() {
        let mut run = CollectionRun::default();
        run.begin(2);
        run.finish(RunPhase::Failed);
        assert!(!run.is_collecting);
        assert_eq!(run.phase, RunPhase::Failed);
    }
}
