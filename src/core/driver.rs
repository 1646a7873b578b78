use tracing::trace;

use super::{
    event::SchedEvent,
    observer::Observer,
    state::{RunCtx, Ticks},
};
use crate::scheduler::Scheduler;

/// Drives one policy run tick by tick, calling into the scheduler's hooks.
pub struct SchedCore<S: Scheduler> {
    pub ctx: RunCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(ctx: RunCtx, scheduler: S) -> Self {
        let mut core = Self {
            ctx,
            scheduler,
            observer: Observer::new(),
        };
        core.handle_arrivals();
        core
    }

    /// Simulate a single tick. Returns the events it produced.
    pub fn step(&mut self) -> Vec<SchedEvent> {
        let first_event = self.ctx.events.len();

        match self.scheduler.dispatch(&mut self.ctx) {
            Some(proc) => {
                let completed = self.ctx.execute(proc);
                // Arrivals at the new instant are queued before the scheduler
                // decides what to do with the process that just ran
                self.handle_arrivals();
                self.scheduler.stopping(&mut self.ctx, proc, completed);
            }
            None => {
                self.ctx.idle();
                self.handle_arrivals();
            }
        }

        self.observer.observe(&self.ctx);

        let events = self.ctx.events[first_event..].to_vec();
        for event in &events {
            trace!(now = self.ctx.now, ?event, "sched event");
        }
        events
    }

    fn handle_arrivals(&mut self) {
        for proc in self.ctx.admit_arrivals() {
            self.scheduler.enqueue(&mut self.ctx, proc);
        }
    }

    pub fn all_finished(&self) -> bool {
        self.ctx.all_finished()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Step until every process has finished and hand back the run state.
    pub fn run(mut self) -> RunCtx {
        while !self.all_finished() {
            self.step();
        }
        self.ctx
    }
}
