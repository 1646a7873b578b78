use tracing::{debug, info, warn};

use super::Workload;
use crate::{
    config::{HorizonMode, SimConfig},
    core::{self, Process, RunCtx, SchedEvent, Ticks},
    error::SimError,
    scheduler::Policy,
    stats::RunStats,
};

/// Outcome of one policy over the workload.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub policy: Policy,
    /// Number of ticks the report covers.
    pub width: Ticks,
    pub processes: Vec<Process>,
    pub events: Vec<SchedEvent>,
}

impl RunResult {
    pub fn stats(&self) -> Result<RunStats, SimError> {
        RunStats::from_processes(&self.processes).map_err(|source| SimError::Audit {
            policy: self.policy.to_string(),
            source,
        })
    }
}

/// Runs policies over one workload. Every run starts from a context built
/// afresh from the workload, so runs never observe each other's state.
pub struct Sim {
    config: SimConfig,
    workload: Workload,
}

impl Sim {
    pub fn new(config: SimConfig, workload: Workload) -> Self {
        Self { config, workload }
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    pub fn run(&self, policy: Policy) -> Result<RunResult, SimError> {
        let horizon = self.workload.horizon;
        info!(%policy, processes = self.workload.len(), horizon, "running policy");

        let ctx = policy.simulate(RunCtx::new(&self.workload.processes, horizon));
        let required = ctx.makespan();

        let width = if required <= horizon {
            horizon
        } else {
            match self.config.horizon_mode {
                HorizonMode::Strict => {
                    return Err(SimError::HorizonTooShort {
                        policy: policy.to_string(),
                        required,
                        horizon,
                    });
                }
                HorizonMode::Extend => {
                    warn!(%policy, required, horizon, "extending horizon to fit the run");
                    required
                }
            }
        };

        if self.config.audit {
            core::audit(&ctx.procs).map_err(|source| SimError::Audit {
                policy: policy.to_string(),
                source,
            })?;
        }

        for p in &ctx.procs {
            debug!(%policy, name = %p.name, start = ?p.start_time, finish = ?p.finish_time, "process finished");
        }

        Ok(RunResult {
            policy,
            width,
            processes: ctx.procs,
            events: ctx.events,
        })
    }

    pub fn run_all(&self, policies: &[Policy]) -> Result<Vec<RunResult>, SimError> {
        policies.iter().map(|&policy| self.run(policy)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::Mark, error::AuditError, sim::ProcessSpec};

    fn workload(horizon: Ticks) -> Workload {
        Workload::new(
            horizon,
            vec![ProcessSpec::new('A', 0, 3), ProcessSpec::new('B', 1, 2)],
        )
        .unwrap()
    }

    #[test]
    fn strict_horizon_rejects_overflow() {
        let sim = Sim::new(SimConfig::new(), workload(4));
        let err = sim.run(Policy::Fcfs).unwrap_err();
        assert!(matches!(
            err,
            SimError::HorizonTooShort {
                required: 5,
                horizon: 4,
                ..
            }
        ));
    }

    #[test]
    fn extend_horizon_widens_report() {
        let config = SimConfig::new().with_horizon_mode(HorizonMode::Extend);
        let result = Sim::new(config, workload(4)).run(Policy::Fcfs).unwrap();
        assert_eq!(result.width, 5);
        assert_eq!(result.processes[1].timeline.get(4), Mark::Running);
    }

    #[test]
    fn huge_horizon_runs_without_presizing() {
        let result = Sim::new(SimConfig::new(), workload(10_000_000_000))
            .run(Policy::Feedback)
            .unwrap();
        assert_eq!(result.width, 10_000_000_000);
        for p in &result.processes {
            assert!(p.timeline.len() <= 5);
        }
        let finishes: Vec<_> = result.processes.iter().map(|p| p.finish_time).collect();
        assert_eq!(finishes, [Some(5), Some(4)]);
    }

    #[test]
    fn reruns_are_identical() {
        let sim = Sim::new(SimConfig::new(), workload(10));
        let first = sim.run(Policy::Srt).unwrap();
        let second = sim.run(Policy::Srt).unwrap();
        for (a, b) in first.processes.iter().zip(&second.processes) {
            assert_eq!(a.timeline, b.timeline);
            assert_eq!(a.finish_time, b.finish_time);
        }
        assert_eq!(first.events, second.events);
    }

    #[test]
    fn stats_report_unfinished_runs() {
        let mut result = Sim::new(SimConfig::new(), workload(10))
            .run(Policy::Spn)
            .unwrap();
        result.processes[0].finish_time = None;
        assert!(matches!(
            result.stats(),
            Err(SimError::Audit {
                source: AuditError::Unfinished('A'),
                ..
            })
        ));
    }
}
