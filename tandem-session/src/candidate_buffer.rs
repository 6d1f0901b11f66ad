use std::collections::VecDeque;
use tandem_core::CandidateInit;

/// FIFO of connectivity candidates that arrived before the remote
/// description was applied. Flushed exactly once, right after the remote
/// description is set; candidates arriving later bypass the buffer and
/// are applied directly.
#[derive(Debug, Default)]
pub struct CandidateBuffer {
    queue: VecDeque<CandidateInit>,
}

impl CandidateBuffer {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, candidate: CandidateInit) {
        self.queue.push_back(candidate);
    }

    /// Remove and return all buffered candidates in arrival order.
    pub fn take_all(&mut self) -> Vec<CandidateInit> {
        self.queue.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
