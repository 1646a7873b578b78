use thiserror::Error;

use crate::core::Ticks;

/// Errors in the textual scenario description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("input ended before the {0} line")]
    MissingLine(&'static str),

    #[error("line {line}: invalid {field} `{value}`")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("unknown mode `{0}`, expected `trace` or `stats`")]
    UnknownMode(String),

    #[error("line {line}: malformed process record `{record}`")]
    MalformedRecord { line: usize, record: String },

    #[error("duplicate process name `{0}`")]
    DuplicateName(char),

    #[error("process `{0}` needs a service time of at least one tick")]
    ZeroService(char),

    #[error("round robin needs a positive quantum, got `{0}`")]
    InvalidQuantum(String),

    #[error("expected {expected} process records, found {found}")]
    CountMismatch { expected: usize, found: usize },

    #[error("at most {max} processes can be given single-character names")]
    TooManyProcesses { max: usize },
}

/// Invariant violations found in a completed run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuditError {
    #[error("process `{0}` never finished")]
    Unfinished(char),

    #[error("process `{name}` ran {ran} ticks but needs {service}")]
    ServiceMismatch { name: char, ran: Ticks, service: Ticks },

    #[error("process `{name}` started at {start}, outside [{arrival}, {finish})")]
    StartOutOfRange {
        name: char,
        start: Ticks,
        arrival: Ticks,
        finish: Ticks,
    },

    #[error("process `{name}` start/finish disagree with its timeline")]
    TimelineDisagrees { name: char },

    #[error("process `{name}` marked at tick {tick} before arriving")]
    MarkedBeforeArrival { name: char, tick: Ticks },

    #[error("process `{name}` marked at tick {tick} after finishing")]
    MarkedAfterFinish { name: char, tick: Ticks },

    #[error("{running} processes running at tick {tick}")]
    DoubleOccupancy { tick: Ticks, running: usize },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{policy}: {source}")]
    Audit {
        policy: String,
        #[source]
        source: AuditError,
    },

    #[error("{policy} needs {required} ticks but the horizon is {horizon}")]
    HorizonTooShort {
        policy: String,
        required: Ticks,
        horizon: Ticks,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
