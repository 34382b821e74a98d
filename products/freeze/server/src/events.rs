use {
    motion::{Command, MotionEvent},
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionAlert {
    pub message: String,
}

/// Messages on the control channel, as `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    StartDetection,
    StopDetection,
    ResetVideoFeed,
    ResumeVideoFeed,
    MotionDetected(MotionAlert),
}

impl Event {
    /// The controller command a client event asks for. Server-to-client
    /// events have none.
    pub fn command(&self) -> Option<Command> {
        match self {
            Event::StartDetection => Some(Command::Start),
            Event::StopDetection => Some(Command::Stop),
            Event::ResetVideoFeed => Some(Command::Reset),
            Event::ResumeVideoFeed => Some(Command::Resume),
            Event::MotionDetected(_) => None,
        }
    }
}

impl From<MotionEvent> for Event {
    fn from(event: MotionEvent) -> Self {
        Event::MotionDetected(MotionAlert {
            message: event.message,
        })
    }
}
