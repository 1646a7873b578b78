use crate::core::{ProcId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    Admit {
        proc: ProcId,
        at: Ticks,
    },
    // CPU occupant changed; `to: None` when the CPU goes idle
    Switch {
        from: Option<ProcId>,
        to: Option<ProcId>,
        at: Ticks,
    },
    Idle {
        at: Ticks,
    },
    Demote {
        proc: ProcId,
        from: usize,
        to: usize,
        at: Ticks,
    },
    Complete {
        proc: ProcId,
        at: Ticks,
    },
}

impl SchedEvent {
    pub fn at(&self) -> Ticks {
        match *self {
            Self::Admit { at, .. }
            | Self::Switch { at, .. }
            | Self::Idle { at }
            | Self::Demote { at, .. }
            | Self::Complete { at, .. } => at,
        }
    }
}
