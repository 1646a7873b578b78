use super::state::{Mark, Process, RunCtx, Ticks};
use crate::error::AuditError;

/// Per-tick sanity checks while a run executes. Compiled out of release builds.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    // Called after the clock advanced; inspects the tick that just ended
    pub fn observe(&mut self, ctx: &RunCtx) {
        self.step += 1;
        let Some(tick) = ctx.now.checked_sub(1) else {
            return;
        };

        let running = ctx
            .procs
            .iter()
            .filter(|p| p.timeline.get(tick) == Mark::Running)
            .count();
        debug_assert!(running <= 1, "{running} processes running at tick {tick}");

        for p in &ctx.procs {
            debug_assert!(
                p.remaining_time <= p.service_time,
                "process {} has more work left than it started with",
                p.name
            );
            debug_assert!(
                p.has_arrived(tick) || p.timeline.get(tick) == Mark::Unset,
                "process {} marked at tick {tick} before arriving",
                p.name
            );
        }

        if let Some(id) = ctx.current {
            debug_assert!(
                !ctx.proc(id).is_finished(),
                "finished process {} still holds the CPU",
                ctx.proc(id).name
            );
        }
    }
}

/// Check a finished run against the timeline invariants.
pub fn audit(procs: &[Process]) -> Result<(), AuditError> {
    for p in procs {
        let finish = p.finish_time.ok_or(AuditError::Unfinished(p.name))?;
        let start = p.start_time.ok_or(AuditError::Unfinished(p.name))?;

        let ran = p.timeline.count(Mark::Running) as Ticks;
        if ran != p.service_time || p.remaining_time != 0 {
            return Err(AuditError::ServiceMismatch {
                name: p.name,
                ran,
                service: p.service_time,
            });
        }

        if start < p.arrival_time || start >= finish {
            return Err(AuditError::StartOutOfRange {
                name: p.name,
                start,
                arrival: p.arrival_time,
                finish,
            });
        }

        if p.timeline.first(Mark::Running) != Some(start)
            || p.timeline.last(Mark::Running).map(|t| t + 1) != Some(finish)
        {
            return Err(AuditError::TimelineDisagrees { name: p.name });
        }

        let early = (0..p.arrival_time).find(|&t| p.timeline.get(t) != Mark::Unset);
        if let Some(tick) = early {
            return Err(AuditError::MarkedBeforeArrival { name: p.name, tick });
        }

        let late = (finish..p.timeline.len() as Ticks).find(|&t| p.timeline.get(t) != Mark::Unset);
        if let Some(tick) = late {
            return Err(AuditError::MarkedAfterFinish { name: p.name, tick });
        }
    }

    let width = procs.iter().map(|p| p.timeline.len()).max().unwrap_or(0) as Ticks;
    for tick in 0..width {
        let running = procs
            .iter()
            .filter(|p| p.timeline.get(tick) == Mark::Running)
            .count();
        if running > 1 {
            return Err(AuditError::DoubleOccupancy { tick, running });
        }
    }

    Ok(())
}
