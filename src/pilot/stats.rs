use serde::Serialize;

/// Which policy produced the last emitted direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// A legal move landing directly on a fruit
    DirectFruit,
    /// Short-snake chase along an A* path
    EarlyChase,
    /// The Hamiltonian cycle successor
    Cycle,
    /// A validated shortcut off the cycle
    Shortcut,
    /// Survival-score fallback
    Emergency,
    /// No legal move existed; the current direction was echoed back
    NoLegalMove,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::DirectFruit => "direct-fruit",
            Decision::EarlyChase => "early-chase",
            Decision::Cycle => "cycle",
            Decision::Shortcut => "shortcut",
            Decision::Emergency => "emergency",
            Decision::NoLegalMove => "no-legal-move",
        }
    }
}

/// Per-game diagnostic counters exposed to the host
///
/// Reset together with the step counter on `Autopilot::reset_state`.
#[derive(Debug, Clone, Serialize)]
pub struct DebugStats {
    /// Difficulty tag the autopilot was configured with
    pub mode: String,
    /// Whether a valid Hamiltonian cycle exists for this board
    pub cycle_available: bool,
    pub shortcuts_accepted: u64,
    pub shortcuts_rejected: u64,
    /// Calls to the emergency entry point
    pub emergency_count: u64,
    /// Decisions that fell through to the survival-score policy
    pub fallback_count: u64,
    pub last_decision: Option<Decision>,
    /// Cycle-forward head-to-tail distance after the last decision
    pub last_survival_buffer: i32,
    pub step: u64,
}

impl DebugStats {
    pub fn new(mode: String, cycle_available: bool) -> Self {
        Self {
            mode,
            cycle_available,
            shortcuts_accepted: 0,
            shortcuts_rejected: 0,
            emergency_count: 0,
            fallback_count: 0,
            last_decision: None,
            last_survival_buffer: 0,
            step: 0,
        }
    }

    /// Clear everything that varies between games
    pub fn reset(&mut self) {
        let mode = std::mem::take(&mut self.mode);
        *self = Self::new(mode, self.cycle_available);
    }
}
