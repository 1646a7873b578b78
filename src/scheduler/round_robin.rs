use std::{collections::VecDeque, num::NonZeroU64};

use super::{ProcId, RunCtx, Scheduler, Ticks};

pub struct RoundRobinScheduler {
    quantum: Ticks,
    queue: VecDeque<ProcId>,
    current: Option<ProcId>,
    slice_left: Ticks,
}

impl RoundRobinScheduler {
    pub fn new(quantum: NonZeroU64) -> Self {
        Self {
            quantum: quantum.get(),
            queue: VecDeque::new(),
            current: None,
            slice_left: 0,
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    fn enqueue(&mut self, _ctx: &mut RunCtx, proc: ProcId) {
        self.queue.push_back(proc);
    }

    fn dispatch(&mut self, _ctx: &mut RunCtx) -> Option<ProcId> {
        if self.current.is_none() {
            self.current = self.queue.pop_front();
            self.slice_left = self.quantum;
        }
        self.current
    }

    fn stopping(&mut self, _ctx: &mut RunCtx, proc: ProcId, completed: bool) {
        self.slice_left -= 1;
        if completed {
            self.current = None;
        } else if self.slice_left == 0 {
            // Slice expired: back of the line, behind anything that just arrived
            self.queue.push_back(proc);
            self.current = None;
        }
    }
}
