use std::collections::VecDeque;

use super::{ProcId, RunCtx, Scheduler, Ticks};
use crate::core::SchedEvent;

/// How long a process may hold the CPU at a given queue level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceRule {
    /// One tick at every level.
    Fixed,
    /// `2^level` ticks.
    Exponential,
}

impl SliceRule {
    pub fn quantum(self, level: usize) -> Ticks {
        match self {
            Self::Fixed => 1,
            Self::Exponential => 2u64.saturating_pow(u32::try_from(level).unwrap_or(u32::MAX)),
        }
    }
}

/// Multi-level feedback queue. Level 0 is the highest priority and levels
/// are created as processes are demoted into them.
///
/// A slice always runs to its end. Processes arriving during it are held
/// back and join level 0 in listed order once the slice is over.
///
/// A process whose slice ends with work left is demoted only once the run is
/// contended, i.e. some process has arrived while another held the CPU.
/// Before that it keeps the head of its level. Contention is never cleared.
pub struct FeedbackScheduler {
    rule: SliceRule,
    levels: Vec<VecDeque<ProcId>>,
    held: Vec<ProcId>,
    current: Option<ProcId>,
    slice_left: Ticks,
    contended: bool,
}

impl FeedbackScheduler {
    pub fn new(rule: SliceRule) -> Self {
        Self {
            rule,
            levels: vec![VecDeque::new()],
            held: Vec::new(),
            current: None,
            slice_left: 0,
            contended: false,
        }
    }

    fn admit(&mut self, ctx: &mut RunCtx, proc: ProcId) {
        self.levels[0].push_back(proc);
        let p = ctx.proc_mut(proc);
        p.queue_level = Some(0);
        p.quantum = self.rule.quantum(0);
    }

    fn demote(&mut self, ctx: &mut RunCtx, proc: ProcId, level: usize) {
        let popped = self.levels[level].pop_front();
        debug_assert_eq!(popped, Some(proc), "demoted process was not at the head");

        let next = level + 1;
        if next == self.levels.len() {
            self.levels.push(VecDeque::new());
        }
        self.levels[next].push_back(proc);

        let p = ctx.proc_mut(proc);
        p.queue_level = Some(next);
        p.quantum = self.rule.quantum(next);

        let at = ctx.now;
        ctx.emit(SchedEvent::Demote {
            proc,
            from: level,
            to: next,
            at,
        });
    }
}

impl Scheduler for FeedbackScheduler {
    fn enqueue(&mut self, ctx: &mut RunCtx, proc: ProcId) {
        if self.current.is_some() {
            self.contended = true;
            self.held.push(proc);
        } else {
            self.admit(ctx, proc);
        }
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Option<ProcId> {
        if self.current.is_none() {
            let head = self.levels.iter().find_map(|queue| queue.front().copied())?;
            self.slice_left = ctx.proc(head).quantum;
            self.current = Some(head);
        }
        self.current
    }

    fn stopping(&mut self, ctx: &mut RunCtx, proc: ProcId, completed: bool) {
        self.slice_left -= 1;
        let level = ctx.proc(proc).queue_level.unwrap_or_default();

        if completed {
            self.levels[level].pop_front();
        } else if self.slice_left == 0 {
            if self.contended {
                self.demote(ctx, proc, level);
            } else {
                ctx.proc_mut(proc).quantum = self.rule.quantum(level);
            }
        } else {
            return;
        }

        self.current = None;
        let mut held = std::mem::take(&mut self.held);
        held.sort_unstable();
        for proc in held {
            self.admit(ctx, proc);
        }
    }
}
