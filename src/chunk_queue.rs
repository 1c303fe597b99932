//! Bounded multi-producer/multi-consumer FIFO of chunks.
//!
//! The partitioner is the single producer and enqueues at most `N` chunks
//! before closing the queue, so `enqueue` never has to block. `dequeue`
//! blocks until a chunk is available or the queue is closed and empty.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::partition::Chunk;

struct State<'a> {
    queue: VecDeque<Chunk<'a>>,
    closed: bool,
}

pub struct ChunkQueue<'a> {
    state: Mutex<State<'a>>,
    not_empty: Condvar,
}

impl<'a> ChunkQueue<'a> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Enqueue a chunk. The single producer calling this never blocks.
    pub fn enqueue(&self, chunk: Chunk<'a>) {
        let mut state = self.state.lock().expect("chunk queue mutex poisoned");
        state.queue.push_back(chunk);
        self.not_empty.notify_one();
    }

    /// Signal that no more chunks will be enqueued. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock().expect("chunk queue mutex poisoned");
        state.closed = true;
        self.not_empty.notify_all();
    }

    /// Block until a chunk is available, or return `None` once the queue
    /// is closed and drained.
    pub fn dequeue(&self) -> Option<Chunk<'a>> {
        let mut state = self.state.lock().expect("chunk queue mutex poisoned");
        loop {
            if let Some(chunk) = state.queue.pop_front() {
                return Some(chunk);
            }
            if state.closed {
                return None;
            }
            state = self
                .not_empty
                .wait(state)
                .expect("chunk queue condvar poisoned");
        }
    }
}

impl<'a> Default for ChunkQueue<'a> {
    fn default() -> Self {
        Self::new()
    }
}
