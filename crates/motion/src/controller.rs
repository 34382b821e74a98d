use {
    crate::*,
    base::Epoch,
    std::sync::Mutex,
    tokio::sync::broadcast,
};

// alerts buffered for slow subscribers
const EVENT_CAPACITY: usize = 16;

/// Published once per pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionEvent {
    pub message: String,
}

/// External commands, as they arrive from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Reset,
    Resume,
}

impl From<Command> for Trigger {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Trigger::Start,
            Command::Stop => Trigger::Stop,
            Command::Reset => Trigger::Reset,
            Command::Resume => Trigger::Resume,
        }
    }
}

/// Owns the process-wide `DetectionState`.
///
/// Every change goes through `transition` under one lock, so pipelines and
/// control handlers never see a half-applied update. Actions are carried out
/// after the new state is stored: a rewind advances the epoch that pipelines
/// watch, an alert is broadcast to subscribers.
pub struct Controller {
    state: Mutex<DetectionState>,
    epoch: Epoch,
    events: broadcast::Sender<MotionEvent>,
    message: String,
}

impl Controller {
    pub fn new(message: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(DetectionState::default()),
            epoch: Epoch::new(),
            events,
            message: message.into(),
        }
    }

    fn apply_trigger(&self, trigger: Trigger) -> (DetectionState, Action) {
        let (next, action) = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let (next, action) = transition(*state, trigger);
            *state = next;
            (next, action)
        };

        match action {
            Action::None => {}
            Action::Rewind => {
                self.epoch.advance();
            }
            Action::Alert => {
                // no subscribers is fine, the state change still stands
                let _ = self.events.send(MotionEvent {
                    message: self.message.clone(),
                });
            }
        }
        (next, action)
    }

    pub fn apply(&self, command: Command) -> DetectionState {
        let (state, _) = self.apply_trigger(command.into());
        match command {
            Command::Start => log::info!("Motion detection started for level {}", state.level + 1),
            Command::Stop => log::info!("Motion detection stopped"),
            Command::Reset => log::info!("Video feed reset for level {}", state.level),
            Command::Resume => log::info!("Video feed resumed for level {}", state.level + 1),
        }
        state
    }

    pub fn start(&self) -> DetectionState {
        self.apply(Command::Start)
    }

    pub fn stop(&self) -> DetectionState {
        self.apply(Command::Stop)
    }

    pub fn reset(&self) -> DetectionState {
        self.apply(Command::Reset)
    }

    pub fn resume(&self) -> DetectionState {
        self.apply(Command::Resume)
    }

    /// Pause the game after the detector fired.
    ///
    /// Returns false when detection was no longer running, in which case no
    /// alert is sent.
    pub fn report_motion(&self) -> bool {
        let (state, action) = self.apply_trigger(Trigger::MotionDetected);
        if action == Action::Alert {
            log::info!("Motion detected, level {} paused", state.level + 1);
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> DetectionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_detecting(&self) -> bool {
        self.state().is_active()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MotionEvent> {
        self.events.subscribe()
    }

    /// Advances on every reset.
    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE)
    }
}
