use std::cmp::Reverse;

use keyed_priority_queue::KeyedPriorityQueue;

use super::{ProcId, RunCtx, Scheduler, Ticks};

/// Shortest process next. The queue is a max-heap, so ordering is flipped;
/// the process index breaks ties in listed order.
pub struct SpnScheduler {
    ready: KeyedPriorityQueue<ProcId, Reverse<(Ticks, ProcId)>>,
    current: Option<ProcId>,
}

impl SpnScheduler {
    pub fn new() -> Self {
        Self {
            ready: KeyedPriorityQueue::new(),
            current: None,
        }
    }
}

impl Default for SpnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SpnScheduler {
    fn enqueue(&mut self, ctx: &mut RunCtx, proc: ProcId) {
        let service = ctx.proc(proc).service_time;
        self.ready.push(proc, Reverse((service, proc)));
    }

    fn dispatch(&mut self, _ctx: &mut RunCtx) -> Option<ProcId> {
        if self.current.is_none() {
            self.current = self.ready.pop().map(|(proc, _)| proc);
        }
        self.current
    }

    fn stopping(&mut self, _ctx: &mut RunCtx, _proc: ProcId, completed: bool) {
        if completed {
            self.current = None;
        }
    }
}
