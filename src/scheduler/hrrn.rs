use std::cmp::Ordering;

use super::{ProcId, RunCtx, Scheduler, Ticks};
use crate::core::Process;

/// Highest response ratio next, non-preemptive.
pub struct HrrnScheduler {
    ready: Vec<ProcId>,
    current: Option<ProcId>,
}

impl HrrnScheduler {
    pub fn new() -> Self {
        Self {
            ready: Vec::new(),
            current: None,
        }
    }
}

impl Default for HrrnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

// Compares (wait + service) / service exactly by cross-multiplying
fn cmp_ratio(a: &Process, b: &Process, now: Ticks) -> Ordering {
    let a_num = (a.waited(now) + a.service_time) as u128 * b.service_time as u128;
    let b_num = (b.waited(now) + b.service_time) as u128 * a.service_time as u128;
    a_num.cmp(&b_num)
}

impl Scheduler for HrrnScheduler {
    fn enqueue(&mut self, _ctx: &mut RunCtx, proc: ProcId) {
        self.ready.push(proc);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Option<ProcId> {
        if self.current.is_some() {
            return self.current;
        }

        let now = ctx.now;
        for &id in &self.ready {
            let p = ctx.proc_mut(id);
            p.wait_time = p.waited(now);
            p.ratio = p.response_ratio(now);
        }

        // Highest ratio wins; the earlier-listed process wins a tie
        let (pos, _) = self.ready.iter().enumerate().max_by(|&(_, &a), &(_, &b)| {
            cmp_ratio(ctx.proc(a), ctx.proc(b), now).then_with(|| b.cmp(&a))
        })?;
        let proc = self.ready.swap_remove(pos);
        self.current = Some(proc);
        self.current
    }

    fn stopping(&mut self, _ctx: &mut RunCtx, _proc: ProcId, completed: bool) {
        if completed {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        Policy,
        testing::{finishes, run, trace},
    };

    #[test]
    fn short_waiter_overtakes_long_waiter() {
        // At tick 3: B ratio (2 + 6) / 6, C ratio (1 + 1) / 1
        let ctx = run(Policy::Hrrn, &[('A', 0, 3), ('B', 1, 6), ('C', 2, 1)]);
        assert_eq!(finishes(&ctx), [3, 10, 4]);
        assert_eq!(trace(&ctx, 1), " ...******");
        assert_eq!(ctx.proc(1).wait_time, 3);
        assert_eq!(ctx.proc(1).ratio, 1.5);
    }

    #[test]
    fn long_waiter_is_not_starved() {
        let mut procs = vec![('A', 0, 3), ('J', 1, 8)];
        procs.extend((0..14u8).map(|i| ((b'a' + i) as char, 2 + i as u64, 1)));
        let ctx = run(Policy::Hrrn, &procs);

        // J's ratio climbs by 1/8 per tick and ties the fresh arrivals at tick 9
        assert_eq!(ctx.proc(1).start_time, Some(9));
        assert_eq!(ctx.proc(1).finish_time, Some(17));
        assert_eq!(ctx.proc(8).start_time, Some(17));
    }
}
