pub mod driver;
pub mod process;
pub mod workload;

pub use driver::{RunResult, Sim};
pub use process::ProcessSpec;
pub use workload::{Scenario, Workload, parse_policies};
