pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::SchedEvent;
pub use observer::{Observer, audit};
pub use state::{Mark, ProcId, Process, RunCtx, Ticks, Timeline};
