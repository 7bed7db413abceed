use std::collections::VecDeque;
use trellis_core::CandidateInit;

/// FIFO buffer for connectivity candidates that arrive before the
/// session has a remote description to apply them against. Never
/// reorders; drained exactly once, dropped with its session.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    queued: VecDeque<CandidateInit>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: CandidateInit) {
        self.queued.push_back(candidate);
    }

    /// Empties the queue, yielding candidates in arrival order.
    pub fn drain(&mut self) -> Vec<CandidateInit> {
        self.queued.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}
