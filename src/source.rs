//! Where hand observations come from, as seen by the frame loop.
//!
//! The loop only ever asks "what is the latest hand?" and never waits. A
//! backend that runs on another thread pushes into a channel; the
//! [`ObservationMailbox`] drains it each tick and keeps the newest value, so a
//! slow backend just means the same observation is reused.

#[cfg(test)]
#[path = "source_test.rs"]
mod source_test;

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::warn;

use crate::types::HandObservation;

/// Non-blocking poll for the current hand.
pub trait LandmarkSource {
    fn latest(&mut self) -> Option<HandObservation>;
}

/// Receiving end of a backend channel. `None` messages mean "no hand".
pub struct ObservationMailbox {
    rx: Receiver<Option<HandObservation>>,
    cached: Option<HandObservation>,
    closed: bool,
}

impl ObservationMailbox {
    pub fn new(rx: Receiver<Option<HandObservation>>) -> Self {
        Self { rx, cached: None, closed: false }
    }

    /// Fresh channel: hand the sender to the backend, keep the mailbox.
    pub fn channel() -> (Sender<Option<HandObservation>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }

    /// True once the backend has hung up.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl LandmarkSource for ObservationMailbox {
    fn latest(&mut self) -> Option<HandObservation> {
        loop {
            match self.rx.try_recv() {
                Ok(obs) => self.cached = obs,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        warn!("landmark source disconnected");
                        self.closed = true;
                    }
                    self.cached = None;
                    break;
                }
            }
        }
        self.cached.clone()
    }
}

/// Plays back a fixed list of frames, then reports no hand forever.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Option<HandObservation>>,
}

impl ScriptedSource {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Option<HandObservation>>,
    {
        Self { frames: frames.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ScriptedSource {
    fn latest(&mut self) -> Option<HandObservation> {
        self.frames.pop_front().flatten()
    }
}
