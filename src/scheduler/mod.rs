pub mod fcfs;
pub mod feedback;
pub mod hrrn;
pub mod round_robin;
pub mod spn;
pub mod srt;

use std::{fmt, num::NonZeroU64};

use crate::{
    core::{ProcId, RunCtx, SchedCore, Ticks},
    error::ParseError,
};
pub use fcfs::FcfsScheduler;
pub use feedback::{FeedbackScheduler, SliceRule};
pub use hrrn::HrrnScheduler;
pub use round_robin::RoundRobinScheduler;
pub use spn::SpnScheduler;
pub use srt::SrtScheduler;

/// Hooks a policy implements. `SchedCore` owns the clock and the timelines;
/// a scheduler only decides who holds the CPU.
pub trait Scheduler {
    /// A process arrived and was admitted at `ctx.now`.
    fn enqueue(&mut self, ctx: &mut RunCtx, proc: ProcId);

    /// Pick the process that runs during the tick at `ctx.now`, or `None` to idle.
    fn dispatch(&mut self, ctx: &mut RunCtx) -> Option<ProcId>;

    /// `proc` just ran one tick. Arrivals at the new `ctx.now` are already enqueued.
    fn stopping(&mut self, _ctx: &mut RunCtx, _proc: ProcId, _completed: bool) {}
}

/// The closed set of scheduling policies, numbered as in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Fcfs,
    RoundRobin { quantum: NonZeroU64 },
    Spn,
    Srt,
    Hrrn,
    /// Multi-level feedback, one tick per slice.
    Feedback,
    /// Multi-level feedback, `2^level` ticks per slice.
    FeedbackExp,
}

impl Policy {
    /// Round Robin with the given quantum, or `None` for a zero quantum.
    pub fn round_robin(quantum: Ticks) -> Option<Self> {
        NonZeroU64::new(quantum).map(|quantum| Self::RoundRobin { quantum })
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Fcfs => 1,
            Self::RoundRobin { .. } => 2,
            Self::Spn => 3,
            Self::Srt => 4,
            Self::Hrrn => 5,
            Self::Feedback => 6,
            Self::FeedbackExp => 7,
        }
    }

    pub fn is_preemptive(self) -> bool {
        !matches!(self, Self::Fcfs | Self::Spn | Self::Hrrn)
    }

    /// Parse one selector of a policy list: a bare code, or `2-<quantum>`.
    /// Unknown codes yield `Ok(None)`.
    pub fn parse_selector(selector: &str) -> Result<Option<Self>, ParseError> {
        let selector = selector.trim();
        let (code, quantum) = match selector.split_once('-') {
            Some((code, quantum)) => (code.trim(), Some(quantum.trim())),
            None => (selector, None),
        };

        let policy = match code {
            "1" => Self::Fcfs,
            "2" => {
                let raw = quantum.unwrap_or_default();
                raw.parse::<Ticks>()
                    .ok()
                    .and_then(Self::round_robin)
                    .ok_or_else(|| ParseError::InvalidQuantum(raw.to_string()))?
            }
            "3" => Self::Spn,
            "4" => Self::Srt,
            "5" => Self::Hrrn,
            "6" => Self::Feedback,
            "7" => Self::FeedbackExp,
            _ => return Ok(None),
        };
        Ok(Some(policy))
    }

    /// Run this policy to completion over a freshly reset context.
    pub fn simulate(self, ctx: RunCtx) -> RunCtx {
        match self {
            Self::Fcfs => SchedCore::new(ctx, FcfsScheduler::new()).run(),
            Self::RoundRobin { quantum } => {
                SchedCore::new(ctx, RoundRobinScheduler::new(quantum)).run()
            }
            Self::Spn => SchedCore::new(ctx, SpnScheduler::new()).run(),
            Self::Srt => SchedCore::new(ctx, SrtScheduler::new()).run(),
            Self::Hrrn => SchedCore::new(ctx, HrrnScheduler::new()).run(),
            Self::Feedback => SchedCore::new(ctx, FeedbackScheduler::new(SliceRule::Fixed)).run(),
            Self::FeedbackExp => {
                SchedCore::new(ctx, FeedbackScheduler::new(SliceRule::Exponential)).run()
            }
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::RoundRobin { quantum } => write!(f, "RR-{quantum}"),
            Self::Spn => write!(f, "SPN"),
            Self::Srt => write!(f, "SRT"),
            Self::Hrrn => write!(f, "HRRN"),
            Self::Feedback => write!(f, "FB-1"),
            Self::FeedbackExp => write!(f, "FB-2i"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::{
        core::{RunCtx, Ticks},
        sim::ProcessSpec,
    };

    use super::Policy;

    pub fn run(policy: Policy, procs: &[(char, Ticks, Ticks)]) -> RunCtx {
        let specs: Vec<ProcessSpec> = procs
            .iter()
            .map(|&(name, arrival, service)| ProcessSpec::new(name, arrival, service))
            .collect();
        policy.simulate(RunCtx::new(&specs, 32))
    }

    pub fn finishes(ctx: &RunCtx) -> Vec<Ticks> {
        ctx.procs.iter().filter_map(|p| p.finish_time).collect()
    }

    pub fn trace(ctx: &RunCtx, id: usize) -> String {
        let p = &ctx.procs[id];
        p.timeline
            .window(ctx.makespan())
            .map(|m| m.glyph())
            .collect()
    }
}
