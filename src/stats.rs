use average::{Estimate, Mean};

use crate::{
    core::{Process, Ticks},
    error::AuditError,
};

/// Turnaround figures for one process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessStats {
    pub name: char,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub finish_time: Ticks,
    pub turnaround: Ticks,
    pub normalized_turnaround: f64,
}

impl ProcessStats {
    pub fn from_process(p: &Process) -> Result<Self, AuditError> {
        let finish_time = p.finish_time.ok_or(AuditError::Unfinished(p.name))?;
        let turnaround = finish_time - p.arrival_time;
        Ok(Self {
            name: p.name,
            arrival_time: p.arrival_time,
            service_time: p.service_time,
            finish_time,
            turnaround,
            normalized_turnaround: turnaround as f64 / p.service_time as f64,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub rows: Vec<ProcessStats>,
    pub mean_turnaround: f64,
    pub mean_normalized_turnaround: f64,
}

impl RunStats {
    pub fn from_processes(procs: &[Process]) -> Result<Self, AuditError> {
        let rows = procs
            .iter()
            .map(ProcessStats::from_process)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            mean_turnaround: avg(rows.iter().map(|r| r.turnaround as f64)),
            mean_normalized_turnaround: avg(rows.iter().map(|r| r.normalized_turnaround)),
            rows,
        })
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
