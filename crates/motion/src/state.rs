#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Detecting,
    Paused,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Detecting => "detecting",
            Phase::Paused => "paused",
        }
    }
}

/// Game progress. `level` counts completed resets, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionState {
    pub phase: Phase,
    pub level: u32,
}

impl DetectionState {
    /// Detection is running.
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Detecting
    }

    /// Motion was caught and the game waits for a resume.
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Stop,
    Reset,
    Resume,
    MotionDetected,
}

/// Side effect the owner of the state must carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Rewind,
    Alert,
}

pub fn transition(state: DetectionState, trigger: Trigger) -> (DetectionState, Action) {
    let level = state.level;
    match trigger {
        Trigger::Start => (
            DetectionState {
                phase: Phase::Detecting,
                level,
            },
            Action::None,
        ),
        Trigger::Stop => (
            DetectionState {
                phase: Phase::Idle,
                level,
            },
            Action::None,
        ),
        Trigger::Reset => (
            DetectionState {
                phase: Phase::Idle,
                level: level.saturating_add(1),
            },
            Action::Rewind,
        ),
        // also accepted from Idle
        Trigger::Resume => (
            DetectionState {
                phase: Phase::Detecting,
                level,
            },
            Action::None,
        ),
        Trigger::MotionDetected => match state.phase {
            Phase::Detecting => (
                DetectionState {
                    phase: Phase::Paused,
                    level,
                },
                Action::Alert,
            ),
            Phase::Idle | Phase::Paused => (state, Action::None),
        },
    }
}
