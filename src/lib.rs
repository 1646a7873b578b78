pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sim;
pub mod stats;

pub use config::{HorizonMode, Mode, SimConfig};
pub use error::{AuditError, ParseError, SimError};
pub use scheduler::{Policy, Scheduler};
pub use sim::{ProcessSpec, RunResult, Scenario, Sim, Workload};
pub use stats::RunStats;
