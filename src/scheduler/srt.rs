use std::cmp::Reverse;

use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;

use super::{ProcId, RunCtx, Scheduler, Ticks};

/// Shortest remaining time. Re-evaluated every tick, so a shorter arrival
/// takes the CPU on the tick it arrives. Equal remaining times go to the
/// process admitted first, so the one running keeps the CPU on a tie.
pub struct SrtScheduler {
    ready: KeyedPriorityQueue<ProcId, Reverse<(Ticks, u64)>>,
    admitted: FxHashMap<ProcId, u64>,
}

impl SrtScheduler {
    pub fn new() -> Self {
        Self {
            ready: KeyedPriorityQueue::new(),
            admitted: FxHashMap::default(),
        }
    }

    fn key(&self, ctx: &RunCtx, proc: ProcId) -> Reverse<(Ticks, u64)> {
        let seq = self.admitted.get(&proc).copied().unwrap_or(u64::MAX);
        Reverse((ctx.proc(proc).remaining_time, seq))
    }
}

impl Default for SrtScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SrtScheduler {
    fn enqueue(&mut self, ctx: &mut RunCtx, proc: ProcId) {
        let seq = self.admitted.len() as u64;
        self.admitted.insert(proc, seq);
        let key = self.key(ctx, proc);
        self.ready.push(proc, key);
    }

    fn dispatch(&mut self, _ctx: &mut RunCtx) -> Option<ProcId> {
        self.ready.peek().map(|(&proc, _)| proc)
    }

    fn stopping(&mut self, ctx: &mut RunCtx, proc: ProcId, completed: bool) {
        if completed {
            self.ready.remove(&proc);
            return;
        }
        let key = self.key(ctx, proc);
        let updated = self.ready.set_priority(&proc, key);
        debug_assert!(updated.is_ok(), "running process {proc} missing from ready queue");
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        Policy,
        testing::{finishes, run, trace},
    };

    #[test]
    fn shorter_arrival_preempts_immediately() {
        let ctx = run(Policy::Srt, &[('A', 0, 5), ('B', 2, 2)]);
        assert_eq!(trace(&ctx, 0), "**..***");
        assert_eq!(trace(&ctx, 1), "  **   ");
        assert_eq!(finishes(&ctx), [7, 4]);
    }

    #[test]
    fn equal_remaining_keeps_the_running_process() {
        // At tick 1 both have two ticks left
        let ctx = run(Policy::Srt, &[('A', 0, 3), ('B', 1, 2)]);
        assert_eq!(finishes(&ctx), [3, 5]);
        assert_eq!(trace(&ctx, 1), " ..**");
    }

    #[test]
    fn earlier_listed_arrival_does_not_win_a_tie() {
        let ctx = run(Policy::Srt, &[('B', 1, 2), ('C', 2, 6), ('A', 0, 3)]);
        assert_eq!(trace(&ctx, 2), "***        ");
        assert_eq!(trace(&ctx, 0), " ..**      ");
        assert_eq!(trace(&ctx, 1), "  ...******");
        assert_eq!(finishes(&ctx), [5, 11, 3]);
    }

    #[test]
    fn waiting_ties_follow_admission_order() {
        // B and C both wait with two ticks left; C was admitted first
        let ctx = run(Policy::Srt, &[('A', 0, 3), ('B', 2, 2), ('C', 1, 2)]);
        assert_eq!(finishes(&ctx), [3, 7, 5]);
    }
}
