use rand::prelude::*;
use rustc_hash::FxHashSet;
use tracing::warn;

use super::ProcessSpec;
use crate::{config::Mode, core::Ticks, error::ParseError, scheduler::Policy};

/// Names handed out by the generator: `A..Z` then `a..z`.
const NAMES: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// The fixed process population and the number of ticks to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub horizon: Ticks,
    pub processes: Vec<ProcessSpec>,
}

impl Workload {
    pub fn new(horizon: Ticks, processes: Vec<ProcessSpec>) -> Result<Self, ParseError> {
        let mut seen = FxHashSet::default();
        for p in &processes {
            if !seen.insert(p.name) {
                return Err(ParseError::DuplicateName(p.name));
            }
            if p.service_time == 0 {
                return Err(ParseError::ZeroService(p.name));
            }
        }
        Ok(Self { horizon, processes })
    }

    /// Each tick a process arrives with probability `p_arrival`; it is short
    /// with probability `p_short`. The horizon is the serial upper bound on
    /// the last finish, so strict runs never overflow it.
    pub fn bernoulli(
        ticks: Ticks,
        p_arrival: f64,
        p_short: f64,
        short_ticks: Ticks,
        long_ticks: Ticks,
        seed: u64,
    ) -> Result<Self, ParseError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut names = NAMES.chars();
        let mut processes = Vec::new();

        for t in 0..ticks {
            if rng.random::<f64>() < p_arrival {
                let service_time = if rng.random::<f64>() < p_short {
                    short_ticks
                } else {
                    long_ticks
                };
                let name = names.next().ok_or(ParseError::TooManyProcesses {
                    max: NAMES.len(),
                })?;
                processes.push(ProcessSpec::new(name, t, service_time));
            }
        }

        let horizon = processes
            .iter()
            .fold(0, |end: Ticks, p| end.max(p.arrival_time) + p.service_time);
        Self::new(horizon, processes)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

/// A parsed scenario file: report mode, policies to run and the workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub mode: Mode,
    pub policies: Vec<Policy>,
    pub workload: Workload,
}

impl Scenario {
    /// Parse the line-oriented scenario format:
    ///
    /// ```text
    /// trace
    /// 1,2-4,3
    /// 20
    /// 2
    /// A,0,3
    /// B,2,6
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut lines = input.lines().enumerate().map(|(idx, line)| (idx + 1, line.trim()));
        let mut next_line = |what: &'static str| lines.next().ok_or(ParseError::MissingLine(what));

        let (_, mode) = next_line("mode")?;
        let mode = mode.parse::<Mode>()?;

        let (_, selectors) = next_line("policy")?;
        let policies = parse_policies(selectors)?;

        let (line, horizon) = next_line("horizon")?;
        let horizon = parse_number(line, "horizon", horizon)?;

        let (line, count) = next_line("process count")?;
        let count = parse_number(line, "process count", count)? as usize;

        let mut processes = Vec::with_capacity(count);
        for (line, record) in lines.by_ref().take(count) {
            if record.is_empty() {
                break;
            }
            processes.push(parse_record(line, record)?);
        }
        if processes.len() != count {
            return Err(ParseError::CountMismatch {
                expected: count,
                found: processes.len(),
            });
        }

        Ok(Self {
            mode,
            policies,
            workload: Workload::new(horizon, processes)?,
        })
    }
}

/// Parse a comma separated policy list, skipping codes that name no policy.
pub fn parse_policies(selectors: &str) -> Result<Vec<Policy>, ParseError> {
    let mut policies = Vec::new();
    for selector in selectors.split(',').filter(|s| !s.trim().is_empty()) {
        match Policy::parse_selector(selector)? {
            Some(policy) => policies.push(policy),
            None => warn!(selector = selector.trim(), "skipping unknown policy"),
        }
    }
    Ok(policies)
}

fn parse_number(line: usize, field: &'static str, value: &str) -> Result<Ticks, ParseError> {
    value
        .trim()
        .parse::<Ticks>()
        .map_err(|_| ParseError::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        })
}

fn parse_record(line: usize, record: &str) -> Result<ProcessSpec, ParseError> {
    let malformed = || ParseError::MalformedRecord {
        line,
        record: record.to_string(),
    };

    let mut fields = record.split(',').map(str::trim);
    let (Some(name), Some(arrival), Some(service), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };

    let mut chars = name.chars();
    let (Some(name), None) = (chars.next(), chars.next()) else {
        return Err(malformed());
    };

    Ok(ProcessSpec::new(
        name,
        parse_number(line, "arrival time", arrival)?,
        parse_number(line, "service time", service)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "stats\n1,2-4,9,7\n20\n3\nA,0,3\nB, 2, 6\nC,4,4\n";

    #[test]
    fn parses_scenario() {
        let scenario = Scenario::parse(INPUT).unwrap();
        assert_eq!(scenario.mode, Mode::Stats);
        assert_eq!(
            scenario.policies,
            [
                Policy::Fcfs,
                Policy::round_robin(4).unwrap(),
                Policy::FeedbackExp
            ]
        );
        assert_eq!(scenario.workload.horizon, 20);
        assert_eq!(scenario.workload.processes[1], ProcessSpec::new('B', 2, 6));
    }

    #[test]
    fn reports_bad_numbers_with_line() {
        let err = Scenario::parse("trace\n1\n20\n1\nA,x,3\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 5,
                field: "arrival time",
                value: "x".into()
            }
        );
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(
            Scenario::parse("trace\n1\n").unwrap_err(),
            ParseError::MissingLine("horizon")
        );
        assert_eq!(
            Scenario::parse("trace\n1\n20\n3\nA,0,1\n").unwrap_err(),
            ParseError::CountMismatch {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_bad_records() {
        assert!(matches!(
            Scenario::parse("trace\n1\n20\n1\nAB,0,3\n"),
            Err(ParseError::MalformedRecord { line: 5, .. })
        ));
        assert!(matches!(
            Scenario::parse("trace\n1\n20\n1\nA,0\n"),
            Err(ParseError::MalformedRecord { .. })
        ));
        assert_eq!(
            Scenario::parse("trace\n1\n20\n2\nA,0,3\nA,1,1\n").unwrap_err(),
            ParseError::DuplicateName('A')
        );
        assert_eq!(
            Scenario::parse("trace\n1\n20\n1\nA,0,0\n").unwrap_err(),
            ParseError::ZeroService('A')
        );
    }

    #[test]
    fn generator_is_reproducible() {
        let a = Workload::bernoulli(40, 0.3, 0.3, 2, 6, 7).unwrap();
        let b = Workload::bernoulli(40, 0.3, 0.3, 2, 6, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.processes.iter().all(|p| p.service_time == 2 || p.service_time == 6));
        assert!(a.processes.windows(2).all(|w| w[0].arrival_time < w[1].arrival_time));
    }

    #[test]
    fn generator_runs_out_of_names() {
        assert_eq!(
            Workload::bernoulli(60, 1.0, 0.5, 1, 1, 0).unwrap_err(),
            ParseError::TooManyProcesses { max: 52 }
        );
    }
}
