use super::{ProcId, RunCtx, Scheduler};

/// Non-preemptive, strictly in listed order. A later-listed process never
/// overtakes an earlier one, even if the earlier one has not arrived yet.
pub struct FcfsScheduler {
    next: ProcId,
}

impl FcfsScheduler {
    pub fn new() -> Self {
        Self { next: 0 }
    }
}

impl Default for FcfsScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for FcfsScheduler {
    fn enqueue(&mut self, _ctx: &mut RunCtx, _proc: ProcId) {}

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Option<ProcId> {
        while self.next < ctx.procs.len() && ctx.proc(self.next).is_finished() {
            self.next += 1;
        }
        let proc = ctx.procs.get(self.next)?;
        proc.has_arrived(ctx.now).then_some(self.next)
    }
}
