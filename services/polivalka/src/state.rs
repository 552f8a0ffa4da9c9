//! Owned control state shared between the poll loop, the commander and the
//! display. The value lives in one `watch` channel; writers go through
//! [`ControlState`] and readers either take a [`Snapshot`] or subscribe.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::{FetchError, FetchFailure};
use crate::types::HumidityPercent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Humidity {
    /// No poll has completed yet.
    Awaiting,
    Known(HumidityPercent),
    /// The most recent poll failed; the previous value is not carried over.
    Unknown(FetchFailure),
}

impl Humidity {
    pub fn percent(&self) -> Option<HumidityPercent> {
        match self {
            Humidity::Known(p) => Some(*p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPhase {
    Idle,
    Polling,
    AwaitingCommandResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub humidity: Humidity,
    /// Actuator believed energized. Changes only on an accepted command.
    pub watering: bool,
    pub polling: bool,
    pub pending_command: Option<bool>,
    pub last_reading_at: Option<DateTime<Utc>>,
    pub host_ip: String,
}

impl Snapshot {
    fn new(host_ip: String) -> Self {
        Snapshot {
            humidity: Humidity::Awaiting,
            watering: false,
            polling: false,
            pending_command: None,
            last_reading_at: None,
            host_ip,
        }
    }

    pub fn phase(&self) -> ControlPhase {
        if self.pending_command.is_some() {
            ControlPhase::AwaitingCommandResponse
        } else if self.polling {
            ControlPhase::Polling
        } else {
            ControlPhase::Idle
        }
    }
}

#[derive(Clone)]
pub struct ControlState {
    tx: Arc<watch::Sender<Snapshot>>,
}

impl ControlState {
    pub fn new(host_ip: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::new(host_ip.into()));
        ControlState { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    pub fn watering(&self) -> bool {
        self.tx.borrow().watering
    }

    pub fn humidity(&self) -> Humidity {
        self.tx.borrow().humidity
    }

    pub(crate) fn begin_poll(&self) -> PollInFlight<'_> {
        self.tx.send_modify(|s| s.polling = true);
        PollInFlight {
            state: self,
            finished: false,
        }
    }

    pub(crate) fn begin_command(&self, desired: bool) -> CommandInFlight<'_> {
        self.tx.send_modify(|s| s.pending_command = Some(desired));
        CommandInFlight {
            state: self,
            desired,
            finished: false,
        }
    }
}

/// Marks a poll as in flight. Dropping it without `finish` (the poll future
/// was cancelled) clears the marker and leaves the last reading alone.
pub(crate) struct PollInFlight<'a> {
    state: &'a ControlState,
    finished: bool,
}

impl PollInFlight<'_> {
    pub(crate) fn finish(mut self, result: &Result<HumidityPercent, FetchError>) {
        self.finished = true;
        self.state.tx.send_modify(|s| {
            s.polling = false;
            match result {
                Ok(percent) => {
                    s.humidity = Humidity::Known(*percent);
                    s.last_reading_at = Some(Utc::now());
                }
                Err(e) => s.humidity = Humidity::Unknown(e.kind()),
            }
        });
    }
}

impl Drop for PollInFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.tx.send_modify(|s| s.polling = false);
        }
    }
}

/// Marks a command as awaiting its response. Dropped without `finish`, it
/// clears the marker and never touches the watering flag.
pub(crate) struct CommandInFlight<'a> {
    state: &'a ControlState,
    desired: bool,
    finished: bool,
}

impl CommandInFlight<'_> {
    pub(crate) fn finish(mut self, accepted: bool) {
        self.finished = true;
        let desired = self.desired;
        self.state.tx.send_modify(|s| {
            s.pending_command = None;
            if accepted {
                s.watering = desired;
            }
        });
    }
}

impl Drop for CommandInFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.tx.send_modify(|s| s.pending_command = None);
        }
    }
}
