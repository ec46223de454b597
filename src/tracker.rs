//! Hand-tracking backends.
//!
//! Two ways to get a hand:
//!
//! * [`SubprocessTracker`]: an external landmark detector (for example a
//!   MediaPipe script) running as a child process. Camera frames go in on its
//!   stdin, one JSON line per frame comes back on stdout. It runs on its own
//!   thread behind [`spawn_tracker`].
//! * [`PointerHand`]: no model at all. A synthetic hand follows the mouse and
//!   pinches while the left button is held. Used when no detector is
//!   configured or the detector fails to start.
//!
//! Both end up behind [`LandmarkSource`], so the session can't tell them apart.
//!
//! ## Detector protocol
//!
//! After start-up the detector prints `READY`. Then, per frame, it receives
//! `width`, `height`, `channels` (little-endian `u32` each) followed by
//! `width * height * channels` bytes of RGB, and answers with:
//!
//! ```text
//! {"hands":[{"score":0.93,"landmarks":[{"x":0.41,"y":0.52}, ...21 entries]}],"error":null}
//! ```

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::thread;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::source::{LandmarkSource, ObservationMailbox};
use crate::types::{FrameBuffer, HandObservation, LANDMARK_COUNT, Landmark};

/// Minimum detector confidence for a hand to count.
pub const DEFAULT_MIN_SCORE: f32 = 0.5;

// ════════════════════════════════════════════════════════════════════════════
// Threaded backends
// ════════════════════════════════════════════════════════════════════════════

/// A backend that turns frames into observations on its own thread.
pub trait TrackerBackend: Send + 'static {
    fn run(self: Box<Self>, frames: FrameFeed, tx: Sender<Option<HandObservation>>);
}

/// Backend's end of the frame channel. Taking a frame frees the slot for the
/// next one.
pub struct FrameFeed {
    rx: Receiver<FrameBuffer>,
    queued: Arc<AtomicBool>,
}

impl Iterator for FrameFeed {
    type Item = FrameBuffer;

    fn next(&mut self) -> Option<FrameBuffer> {
        let frame = self.rx.recv().ok()?;
        self.queued.store(false, Ordering::Release);
        Some(frame)
    }
}

/// Frame loop's end of a threaded backend.
pub struct TrackerHandle {
    frames: SyncSender<FrameBuffer>,
    queued: Arc<AtomicBool>,
    mailbox: ObservationMailbox,
}

impl TrackerHandle {
    /// Offer a frame. Returns false when the backend hasn't picked up the
    /// previous one yet or has gone away; the frame is not copied then.
    pub fn offer(&self, frame: &FrameBuffer) -> bool {
        if self.queued.load(Ordering::Acquire) {
            return false;
        }
        // Set before sending: the backend clears it as soon as it receives.
        self.queued.store(true, Ordering::Release);
        match self.frames.try_send(frame.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => {
                self.queued.store(false, Ordering::Release);
                false
            }
        }
    }

    /// A frame is waiting for the backend.
    pub fn is_busy(&self) -> bool {
        self.queued.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }
}

impl LandmarkSource for TrackerHandle {
    fn latest(&mut self) -> Option<HandObservation> {
        self.mailbox.latest()
    }
}

/// Start `backend` on its own thread. At most one frame waits in the channel.
pub fn spawn_tracker<B: TrackerBackend>(backend: B) -> TrackerHandle {
    let (frame_tx, frame_rx) = mpsc::sync_channel(1);
    let queued = Arc::new(AtomicBool::new(false));
    let (obs_tx, mailbox) = ObservationMailbox::channel();
    let feed = FrameFeed { rx: frame_rx, queued: Arc::clone(&queued) };
    thread::spawn(move || Box::new(backend).run(feed, obs_tx));
    TrackerHandle { frames: frame_tx, queued, mailbox }
}

// ════════════════════════════════════════════════════════════════════════════
// SubprocessTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default = "full_score")]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

fn full_score() -> f32 {
    1.0
}

/// External detector process speaking the line protocol above.
pub struct SubprocessTracker {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_score: f32,
}

impl SubprocessTracker {
    /// Spawn `command` (program and arguments split on whitespace) and wait for
    /// its `READY` line.
    pub fn launch(command: &str, min_score: f32) -> Result<Self, Error> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::TrackerSpawn("empty tracker command".into()))?;

        info!(%command, "starting hand detector");
        let mut cmd = Command::new(program);
        cmd.args(parts);
        Self::start(cmd, min_score)
    }

    /// Spawn a prepared command with piped stdin/stdout and wait for `READY`.
    pub fn start(mut command: Command, min_score: f32) -> Result<Self, Error> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::TrackerSpawn(format!("{program}: {e}")))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(Error::TrackerSpawn("detector pipes unavailable".into()));
        };
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        let read = stdout.read_line(&mut ready);
        if !matches!(read, Ok(n) if n > 0) || ready.trim() != "READY" {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::TrackerSpawn(format!(
                "detector did not signal READY, got {:?}",
                ready.trim()
            )));
        }
        info!("hand detector ready");

        Ok(Self { child, stdin, stdout, min_score })
    }

    /// Send one frame and read back its answer.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<HandObservation>, Error> {
        self.stdin
            .write_all(&encode_frame(frame))
            .and_then(|()| self.stdin.flush())
            .map_err(|e| Error::TrackerProtocol(format!("write frame: {e}")))?;

        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| Error::TrackerProtocol(format!("read reply: {e}")))?;
        if n == 0 {
            return Err(Error::TrackerProtocol("detector closed its output".into()));
        }
        parse_detection(&line, self.min_score)
    }
}

impl TrackerBackend for SubprocessTracker {
    fn run(mut self: Box<Self>, frames: FrameFeed, tx: Sender<Option<HandObservation>>) {
        for frame in frames {
            match self.detect(&frame) {
                Ok(obs) => {
                    if tx.send(obs).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "hand detector stopped");
                    break;
                }
            }
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
        debug!("hand detector thread exiting");
    }
}

/// Frame header (`width`, `height`, `channels` as LE u32) plus packed RGB.
pub fn encode_frame(frame: &FrameBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + frame.pixels.len() * 3);
    out.extend_from_slice(&(frame.width as u32).to_le_bytes());
    out.extend_from_slice(&(frame.height as u32).to_le_bytes());
    out.extend_from_slice(&3u32.to_le_bytes());
    for &px in &frame.pixels {
        // px = 0x00RRGGBB
        out.push(((px >> 16) & 0xFF) as u8);
        out.push(((px >> 8) & 0xFF) as u8);
        out.push((px & 0xFF) as u8);
    }
    out
}

/// Read one detector reply. The first hand at or above `min_score` with a full
/// set of landmarks wins; anything else is "no hand".
pub fn parse_detection(line: &str, min_score: f32) -> Result<Option<HandObservation>, Error> {
    let reply: DetectionJson = serde_json::from_str(line.trim())
        .map_err(|e| Error::TrackerProtocol(format!("bad reply {:?}: {e}", line.trim())))?;

    if let Some(error) = reply.error {
        warn!(%error, "detector reported an error");
        return Ok(None);
    }

    for hand in reply.hands {
        if hand.score < min_score {
            continue;
        }
        let points: Vec<Landmark> =
            hand.landmarks.iter().map(|l| Landmark::new(l.x, l.y)).collect();
        match HandObservation::from_slice(&points) {
            Ok(obs) => return Ok(Some(obs)),
            Err(e) => warn!(error = %e, "skipping hand"),
        }
    }
    Ok(None)
}

// ════════════════════════════════════════════════════════════════════════════
// PointerHand: mouse-driven fallback
// ════════════════════════════════════════════════════════════════════════════

/// Joint offsets from the index tip for a relaxed right hand, in normalized
/// units. Index 4 is the thumb tip with the hand open.
const HAND_TEMPLATE: [(f32, f32); LANDMARK_COUNT] = [
    (0.020, 0.240),
    (-0.030, 0.210),
    (-0.060, 0.170),
    (-0.080, 0.130),
    (-0.100, 0.090),
    (0.000, 0.130),
    (0.000, 0.080),
    (0.000, 0.040),
    (0.000, 0.000),
    (0.030, 0.130),
    (0.035, 0.080),
    (0.040, 0.040),
    (0.040, 0.005),
    (0.060, 0.140),
    (0.065, 0.100),
    (0.070, 0.065),
    (0.072, 0.035),
    (0.085, 0.155),
    (0.095, 0.125),
    (0.100, 0.100),
    (0.105, 0.075),
];

/// Thumb tip offset while "pinching". About 0.0036 away, well under
/// `controls::THRESHOLD_MIN`.
const PINCHED_THUMB: (f32, f32) = (-0.003, 0.002);
/// Thumb knuckle pulled in alongside so the skeleton doesn't look broken.
const PINCHED_THUMB_IP: (f32, f32) = (-0.040, 0.060);

/// Mouse-driven stand-in for a tracker.
#[derive(Debug, Default)]
pub struct PointerHand {
    observation: Option<HandObservation>,
}

impl PointerHand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's pointer (window pixels) and button state.
    pub fn observe(&mut self, pointer: Option<(f32, f32)>, pressed: bool, width: f32, height: f32) {
        self.observation = match pointer {
            Some((px, py)) if width > 0.0 && height > 0.0 => {
                Some(Self::synthesize(Landmark::new(px / width, py / height), pressed))
            }
            _ => None,
        };
    }

    /// A full 21-joint hand with its index tip at `index_tip`.
    pub fn synthesize(index_tip: Landmark, pinched: bool) -> HandObservation {
        let mut joints = HAND_TEMPLATE;
        if pinched {
            joints[3] = PINCHED_THUMB_IP;
            joints[4] = PINCHED_THUMB;
        }
        HandObservation::new(
            joints.map(|(dx, dy)| Landmark::new(index_tip.x + dx, index_tip.y + dy)),
        )
    }
}

impl LandmarkSource for PointerHand {
    fn latest(&mut self) -> Option<HandObservation> {
        self.observation.clone()
    }
}
