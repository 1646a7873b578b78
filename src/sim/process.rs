use crate::core::Ticks;

/// Immutable input description of one process. Runs never mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub name: char,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
}

impl ProcessSpec {
    pub fn new(name: char, arrival_time: Ticks, service_time: Ticks) -> Self {
        Self {
            name,
            arrival_time,
            service_time,
        }
    }
}
