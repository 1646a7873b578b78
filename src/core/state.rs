use std::fmt;

use super::event::SchedEvent;
use crate::sim::ProcessSpec;

// Index into the process Vec; stable for the whole run
pub type ProcId = usize;
pub type Ticks = u64;

/// What a process was doing during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    /// Not arrived yet, already finished, or beyond the run.
    #[default]
    Unset,
    Waiting,
    Running,
}

impl Mark {
    pub fn glyph(self) -> char {
        match self {
            Self::Unset => ' ',
            Self::Waiting => '.',
            Self::Running => '*',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Most cells reserved up front; anything longer grows as it is written.
const RESERVED_CELLS: usize = 4096;

/// One cell per tick, holding only ticks up to the last mark written. Reads
/// past the end are `Unset`, so a run may outlive its horizon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    cells: Vec<Mark>,
}

impl Timeline {
    pub fn new(horizon: Ticks) -> Self {
        let reserve = usize::try_from(horizon).map_or(RESERVED_CELLS, |h| h.min(RESERVED_CELLS));
        Self {
            cells: Vec::with_capacity(reserve),
        }
    }

    pub fn set(&mut self, tick: Ticks, mark: Mark) {
        let idx = tick as usize;
        if idx >= self.cells.len() {
            self.cells.resize(idx + 1, Mark::Unset);
        }
        debug_assert_eq!(
            self.cells[idx],
            Mark::Unset,
            "tick {tick} written twice in one run"
        );
        self.cells[idx] = mark;
    }

    pub fn get(&self, tick: Ticks) -> Mark {
        self.cells.get(tick as usize).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Exactly `width` cells, padding with `Unset` past the end.
    pub fn window(&self, width: Ticks) -> impl Iterator<Item = Mark> + '_ {
        (0..width).map(|tick| self.get(tick))
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&m| m == mark).count()
    }

    pub fn first(&self, mark: Mark) -> Option<Ticks> {
        self.cells
            .iter()
            .position(|&m| m == mark)
            .map(|idx| idx as Ticks)
    }

    pub fn last(&self, mark: Mark) -> Option<Ticks> {
        self.cells
            .iter()
            .rposition(|&m| m == mark)
            .map(|idx| idx as Ticks)
    }
}

/// Immutable description plus the mutable state of one process for one run.
#[derive(Debug, Clone)]
pub struct Process {
    pub name: char,
    pub arrival_time: Ticks,
    pub service_time: Ticks,

    pub remaining_time: Ticks,
    pub start_time: Option<Ticks>,
    pub finish_time: Option<Ticks>,
    pub admitted: bool,

    // HRRN ranking, refreshed at every decision point the process is eligible for
    pub wait_time: Ticks,
    pub ratio: f64,

    // Feedback queue bookkeeping
    pub queue_level: Option<usize>,
    pub quantum: Ticks,

    pub timeline: Timeline,
}

impl Process {
    pub fn new(spec: &ProcessSpec, horizon: Ticks) -> Self {
        Self {
            name: spec.name,
            arrival_time: spec.arrival_time,
            service_time: spec.service_time,
            remaining_time: spec.service_time,
            start_time: None,
            finish_time: None,
            admitted: false,
            wait_time: 0,
            ratio: 0.0,
            queue_level: None,
            quantum: 0,
            timeline: Timeline::new(horizon),
        }
    }

    pub fn has_arrived(&self, now: Ticks) -> bool {
        self.arrival_time <= now
    }

    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    /// Arrived and not finished; the set a policy may choose from.
    pub fn is_ready(&self, now: Ticks) -> bool {
        self.has_arrived(now) && !self.is_finished()
    }

    pub fn waited(&self, now: Ticks) -> Ticks {
        now.saturating_sub(self.arrival_time)
    }

    /// Response ratio `(wait + service) / service` as of `now`.
    pub fn response_ratio(&self, now: Ticks) -> f64 {
        (self.waited(now) + self.service_time) as f64 / self.service_time as f64
    }
}

/// Everything a policy run mutates. One per run; never shared between runs.
#[derive(Debug)]
pub struct RunCtx {
    pub now: Ticks,
    pub horizon: Ticks,
    pub procs: Vec<Process>,
    pub current: Option<ProcId>,
    pub events: Vec<SchedEvent>,

    finished: usize,
}

impl RunCtx {
    pub fn new(specs: &[ProcessSpec], horizon: Ticks) -> Self {
        Self {
            now: 0,
            horizon,
            procs: specs.iter().map(|spec| Process::new(spec, horizon)).collect(),
            current: None,
            events: Vec::new(),
            finished: 0,
        }
    }

    pub fn proc(&self, id: ProcId) -> &Process {
        &self.procs[id]
    }

    pub fn proc_mut(&mut self, id: ProcId) -> &mut Process {
        &mut self.procs[id]
    }

    pub fn emit(&mut self, event: SchedEvent) {
        self.events.push(event);
    }

    pub fn all_finished(&self) -> bool {
        self.finished == self.procs.len()
    }

    /// Admit every process that has arrived by `now`, in listed order.
    pub fn admit_arrivals(&mut self) -> Vec<ProcId> {
        let now = self.now;
        let arrivals: Vec<ProcId> = self
            .procs
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.admitted && p.has_arrived(now))
            .map(|(id, _)| id)
            .collect();

        for &id in &arrivals {
            self.procs[id].admitted = true;
            self.events.push(SchedEvent::Admit { proc: id, at: now });
        }
        arrivals
    }

    /// Mark every ready process except `running` as waiting at `now`.
    fn mark_waiting(&mut self, running: Option<ProcId>) {
        let now = self.now;
        for (id, p) in self.procs.iter_mut().enumerate() {
            if Some(id) != running && p.is_ready(now) {
                p.timeline.set(now, Mark::Waiting);
            }
        }
    }

    /// Run `id` for the tick at `now` and advance the clock.
    /// Returns true if the process completed on this tick.
    pub fn execute(&mut self, id: ProcId) -> bool {
        let now = self.now;
        debug_assert!(
            self.procs[id].is_ready(now),
            "process {id} dispatched at {now} but is not ready"
        );

        if self.current != Some(id) {
            self.events.push(SchedEvent::Switch {
                from: self.current,
                to: Some(id),
                at: now,
            });
            self.current = Some(id);
        }

        // Waiting marks reflect the start of the tick
        self.mark_waiting(Some(id));

        let p = &mut self.procs[id];
        p.timeline.set(now, Mark::Running);
        if p.start_time.is_none() {
            p.start_time = Some(now);
        }
        p.remaining_time -= 1;

        self.now += 1;

        let p = &mut self.procs[id];
        if p.remaining_time == 0 {
            p.finish_time = Some(self.now);
            self.finished += 1;
            self.current = None;
            self.events.push(SchedEvent::Complete {
                proc: id,
                at: self.now,
            });
            return true;
        }
        false
    }

    pub fn idle(&mut self) {
        if let Some(prev) = self.current.take() {
            self.events.push(SchedEvent::Switch {
                from: Some(prev),
                to: None,
                at: self.now,
            });
        }
        self.mark_waiting(None);
        self.events.push(SchedEvent::Idle { at: self.now });
        self.now += 1;
    }

    /// Latest finish tick; the width a complete timeline needs.
    pub fn makespan(&self) -> Ticks {
        self.procs
            .iter()
            .filter_map(|p| p.finish_time)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ProcessSpec> {
        vec![ProcessSpec::new('A', 0, 2), ProcessSpec::new('B', 1, 1)]
    }

    #[test]
    fn timeline_grows_past_horizon() {
        let mut timeline = Timeline::new(2);
        timeline.set(4, Mark::Running);
        assert_eq!(timeline.len(), 5);
        assert_eq!(timeline.get(3), Mark::Unset);
        assert_eq!(timeline.get(4), Mark::Running);
        assert_eq!(timeline.get(100), Mark::Unset);
    }

    #[test]
    fn timeline_reserve_is_capped() {
        let mut timeline = Timeline::new(10_000_000_000);
        assert!(timeline.is_empty());
        assert!(timeline.cells.capacity() <= RESERVED_CELLS);
        timeline.set(2, Mark::Waiting);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.get(9_999_999_999), Mark::Unset);
    }

    #[test]
    fn timeline_window_pads() {
        let mut timeline = Timeline::new(1);
        timeline.set(0, Mark::Waiting);
        let cells: String = timeline.window(3).map(Mark::glyph).collect();
        assert_eq!(cells, ".  ");
    }

    #[test]
    fn execute_marks_running_and_waiting() {
        let mut ctx = RunCtx::new(&specs(), 4);
        assert_eq!(ctx.admit_arrivals(), vec![0]);
        assert!(!ctx.execute(0));
        assert_eq!(ctx.admit_arrivals(), vec![1]);
        assert!(ctx.execute(0));

        let a = ctx.proc(0);
        assert_eq!(a.start_time, Some(0));
        assert_eq!(a.finish_time, Some(2));
        assert_eq!(a.remaining_time, 0);
        assert_eq!(ctx.proc(1).timeline.get(1), Mark::Waiting);
        assert_eq!(ctx.proc(1).timeline.get(0), Mark::Unset);
        assert_eq!(ctx.now, 2);
    }

    #[test]
    fn idle_advances_without_running() {
        let mut ctx = RunCtx::new(&[ProcessSpec::new('A', 2, 1)], 3);
        ctx.idle();
        ctx.idle();
        assert_eq!(ctx.now, 2);
        assert_eq!(ctx.proc(0).timeline.count(Mark::Unset), 3);
        assert!(matches!(ctx.events.last(), Some(SchedEvent::Idle { at: 1 })));
    }

    #[test]
    fn response_ratio_grows_with_wait() {
        let p = Process::new(&ProcessSpec::new('A', 2, 4), 10);
        assert_eq!(p.response_ratio(2), 1.0);
        assert_eq!(p.response_ratio(6), 2.0);
    }
}
