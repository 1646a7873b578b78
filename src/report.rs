//! Console rendering of finished runs.

use std::fmt;

use crate::{sim::RunResult, stats::RunStats};

const RULE: &str = "------------------------------------------------";
const CELL: usize = 5;

/// Per-tick chart: one row per process, `*` running, `.` waiting.
pub struct TraceChart<'a>(pub &'a RunResult);

impl fmt::Display for TraceChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        write!(f, "{:<6}", result.policy.to_string())?;
        for tick in 0..=result.width {
            write!(f, "{} ", tick % 10)?;
        }
        writeln!(f)?;
        writeln!(f, "{RULE}")?;

        for p in &result.processes {
            write!(f, "{}     ", p.name)?;
            for mark in p.timeline.window(result.width) {
                write!(f, "|{}", mark.glyph())?;
            }
            writeln!(f, "| ")?;
        }

        writeln!(f, "{RULE}")?;
        writeln!(f)
    }
}

/// Finish, turnaround and normalized turnaround table with means.
pub struct StatsTable<'a> {
    pub result: &'a RunResult,
    pub stats: &'a RunStats,
}

impl fmt::Display for StatsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = &self.stats.rows;
        writeln!(f, "{}", self.result.policy)?;

        write!(f, "{:<11}", "Process")?;
        for row in rows {
            write!(f, "|  {}  ", row.name)?;
        }
        writeln!(f, "|")?;

        write!(f, "{:<11}", "Arrival")?;
        for row in rows {
            int_cell(f, row.arrival_time)?;
        }
        writeln!(f, "|")?;

        write!(f, "{:<11}", "Service")?;
        for row in rows {
            int_cell(f, row.service_time)?;
        }
        writeln!(f, "| Mean|")?;

        write!(f, "{:<11}", "Finish")?;
        for row in rows {
            int_cell(f, row.finish_time)?;
        }
        writeln!(f, "|-----|")?;

        write!(f, "{:<11}", "Turnaround")?;
        for row in rows {
            int_cell(f, row.turnaround)?;
        }
        float_cell(f, self.stats.mean_turnaround)?;
        writeln!(f, "|")?;

        write!(f, "{:<11}", "NormTurn")?;
        for row in rows {
            float_cell(f, row.normalized_turnaround)?;
        }
        float_cell(f, self.stats.mean_normalized_turnaround)?;
        writeln!(f, "|")?;
        writeln!(f)
    }
}

pub fn render_trace(result: &RunResult) -> String {
    TraceChart(result).to_string()
}

pub fn render_stats(result: &RunResult, stats: &RunStats) -> String {
    StatsTable { result, stats }.to_string()
}

// Integers lean left when they cannot be centred exactly, floats lean right
fn int_cell(f: &mut impl fmt::Write, value: u64) -> fmt::Result {
    let text = value.to_string();
    let pad = CELL.saturating_sub(text.len());
    let left = pad / 2;
    write!(f, "|{:left$}{text}{:right$}", "", "", right = pad - left)
}

fn float_cell(f: &mut impl fmt::Write, value: f64) -> fmt::Result {
    let text = format!("{value:.2}");
    let pad = CELL.saturating_sub(text.len());
    let right = pad / 2;
    write!(f, "|{:left$}{text}{:right$}", "", "", left = pad - right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SimConfig,
        scheduler::Policy,
        sim::{ProcessSpec, Sim, Workload},
    };

    fn run(policy: Policy) -> RunResult {
        let workload = Workload::new(
            6,
            vec![ProcessSpec::new('A', 0, 3), ProcessSpec::new('B', 1, 2)],
        )
        .unwrap();
        Sim::new(SimConfig::new(), workload).run(policy).unwrap()
    }

    #[test]
    fn trace_layout() {
        let expected = "\
FCFS  0 1 2 3 4 5 6 \n\
------------------------------------------------\n\
A     |*|*|*| | | | \n\
B     | |.|.|*|*| | \n\
------------------------------------------------\n\
\n";
        assert_eq!(render_trace(&run(Policy::Fcfs)), expected);
    }

    #[test]
    fn trace_label_for_round_robin() {
        let out = render_trace(&run(Policy::round_robin(1).unwrap()));
        assert!(out.starts_with("RR-1  0 1 2"));
    }

    #[test]
    fn stats_layout() {
        let result = run(Policy::Fcfs);
        let stats = result.stats().unwrap();
        let expected = "\
FCFS\n\
Process    |  A  |  B  |\n\
Arrival    |  0  |  1  |\n\
Service    |  3  |  2  | Mean|\n\
Finish     |  3  |  5  |-----|\n\
Turnaround |  3  |  4  | 3.50|\n\
NormTurn   | 1.00| 2.00| 1.50|\n\
\n";
        assert_eq!(render_stats(&result, &stats), expected);
    }

    fn cell(write: impl Fn(&mut String) -> fmt::Result) -> String {
        let mut out = String::new();
        write(&mut out).unwrap();
        out
    }

    #[test]
    fn cells_centre() {
        assert_eq!(cell(|out| int_cell(out, 7)), "|  7  ");
        assert_eq!(cell(|out| int_cell(out, 12)), "| 12  ");
        assert_eq!(cell(|out| float_cell(out, 2.5)), "| 2.50");
        assert_eq!(cell(|out| float_cell(out, 12.25)), "|12.25");
        assert_eq!(cell(|out| float_cell(out, 123.0)), "|123.00");
    }

    #[test]
    fn chart_writes_into_any_formatter() {
        let result = run(Policy::Fcfs);
        let padded = format!("{}", TraceChart(&result));
        assert_eq!(padded, render_trace(&result));
        assert!(padded.lines().nth(2).is_some_and(|row| row.starts_with("A     |*|*|*|")));
    }
}
