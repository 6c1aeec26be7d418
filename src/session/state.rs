use serde::{Deserialize, Serialize};

use crate::capture::CaptureArtifact;
use crate::models::ProfileReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    Analyze { username: String },
    Compare { first: String, second: String },
}

impl Mode {
    pub fn usernames(&self) -> Vec<&str> {
        match self {
            Mode::Analyze { username } => vec![username.as_str()],
            Mode::Compare { first, second } => vec![first.as_str(), second.as_str()],
        }
    }

    pub fn export_filename(&self) -> String {
        match self {
            Mode::Analyze { username } => format!("github-analysis-{}.png", username),
            Mode::Compare { first, second } => {
                format!("github-comparison-{}-vs-{}.png", first, second)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Fetching,
    Ready,
    Error,
    Capturing,
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Fetching => write!(f, "fetching"),
            Phase::Ready => write!(f, "ready"),
            Phase::Error => write!(f, "error"),
            Phase::Capturing => write!(f, "capturing"),
            Phase::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Slot {
    Pending { username: String },
    Loaded { report: Box<ProfileReport> },
    Failed { username: String, message: String },
}

impl Slot {
    pub fn report(&self) -> Option<&ProfileReport> {
        match self {
            Slot::Loaded { report } => Some(report.as_ref()),
            _ => None,
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started {
        generation: u64,
        mode: Mode,
    },
    ProfileLoaded {
        generation: u64,
        slot: usize,
        report: Box<ProfileReport>,
    },
    ProfileFailed {
        generation: u64,
        slot: usize,
        message: String,
    },
    CaptureStarted {
        generation: u64,
    },
    CaptureFinished {
        generation: u64,
        artifact: Option<CaptureArtifact>,
    },
}

impl SessionEvent {
    pub fn generation(&self) -> u64 {
        match self {
            SessionEvent::Started { generation, .. }
            | SessionEvent::ProfileLoaded { generation, .. }
            | SessionEvent::ProfileFailed { generation, .. }
            | SessionEvent::CaptureStarted { generation }
            | SessionEvent::CaptureFinished { generation, .. } => *generation,
        }
    }
}

/// One analysis run. Replaced wholesale by [`Session::reduce`], never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    generation: u64,
    mode: Option<Mode>,
    phase: Phase,
    slots: Vec<Slot>,
    error: Option<String>,
    capture: Option<CaptureArtifact>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            generation: 0,
            mode: None,
            phase: Phase::Idle,
            slots: Vec::new(),
            error: None,
            capture: None,
        }
    }
}

impl Session {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> Option<&Mode> {
        self.mode.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The first mandatory-fetch error of this run, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn capture(&self) -> Option<&CaptureArtifact> {
        self.capture.as_ref()
    }

    pub fn reports(&self) -> Vec<&ProfileReport> {
        self.slots.iter().filter_map(Slot::report).collect()
    }

    pub fn reduce(self, event: SessionEvent) -> Session {
        if let SessionEvent::Started { generation, mode } = event {
            if generation <= self.generation {
                tracing::debug!(
                    "Ignoring start for generation {} (current {})",
                    generation,
                    self.generation
                );
                return self;
            }
            let slots = mode
                .usernames()
                .into_iter()
                .map(|username| Slot::Pending {
                    username: username.to_string(),
                })
                .collect();
            return Session {
                generation,
                mode: Some(mode),
                phase: Phase::Fetching,
                slots,
                error: None,
                capture: None,
            };
        }

        if event.generation() != self.generation {
            tracing::debug!(
                "Discarding stale event from generation {} (current {})",
                event.generation(),
                self.generation
            );
            return self;
        }

        match event {
            SessionEvent::Started { .. } => self,
            SessionEvent::ProfileLoaded { slot, report, .. } => self.profile_loaded(slot, report),
            SessionEvent::ProfileFailed { slot, message, .. } => {
                self.profile_failed(slot, message)
            }
            SessionEvent::CaptureStarted { .. } => {
                if self.phase != Phase::Ready {
                    tracing::warn!("Capture requested while {}", self.phase);
                    return self;
                }
                Session {
                    phase: Phase::Capturing,
                    ..self
                }
            }
            SessionEvent::CaptureFinished { artifact, .. } => {
                if self.phase != Phase::Capturing {
                    tracing::warn!("Capture finished while {}", self.phase);
                    return self;
                }
                Session {
                    phase: Phase::Done,
                    capture: artifact,
                    ..self
                }
            }
        }
    }

    fn accepts_profiles(&self) -> bool {
        matches!(self.phase, Phase::Fetching | Phase::Error)
    }

    fn profile_loaded(mut self, slot: usize, report: Box<ProfileReport>) -> Session {
        if !self.accepts_profiles() || !self.slots.get(slot).is_some_and(Slot::is_pending) {
            tracing::debug!("Ignoring profile for slot {} while {}", slot, self.phase);
            return self;
        }

        self.slots[slot] = Slot::Loaded { report };

        let all_loaded = self.slots.iter().all(|s| s.report().is_some());
        if self.phase == Phase::Fetching && all_loaded {
            self.phase = Phase::Ready;
        }
        self
    }

    fn profile_failed(mut self, slot: usize, message: String) -> Session {
        if !self.accepts_profiles() || !self.slots.get(slot).is_some_and(Slot::is_pending) {
            tracing::debug!("Ignoring failure for slot {} while {}", slot, self.phase);
            return self;
        }

        let username = match &self.slots[slot] {
            Slot::Pending { username } => username.clone(),
            _ => String::new(),
        };
        if self.error.is_none() {
            self.error = Some(message.clone());
        }
        self.slots[slot] = Slot::Failed { username, message };
        self.phase = Phase::Error;
        self
    }
}
