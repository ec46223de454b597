use std::time::{Duration, Instant};

use super::*;
use crate::controls::{Control, THRESHOLD_MAX, THRESHOLD_MIN, ViewFlags};
use crate::gesture::{DEFAULT_THRESHOLD, is_pinched};
use crate::session::DrawSettings;
use crate::types::INDEX_TIP;

fn landmarks_json(n: usize) -> String {
    let pts: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"x":{},"y":0.5,"z":-0.01}}"#, i as f32 / 100.0))
        .collect();
    format!("[{}]", pts.join(","))
}

// =============================================================
// Frame encoding
// =============================================================

#[test]
fn encode_frame_writes_header_then_rgb() {
    let fb = FrameBuffer { width: 2, height: 1, pixels: vec![0x00_11_22_33, 0x00_AA_BB_CC] };
    let bytes = encode_frame(&fb);
    assert_eq!(&bytes[0..4], &2u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &3u32.to_le_bytes());
    assert_eq!(&bytes[12..], &[0x11, 0x22, 0x33, 0xAA, 0xBB, 0xCC]);
}

// =============================================================
// Reply parsing
// =============================================================

#[test]
fn parses_a_full_hand() {
    let line = format!(r#"{{"hands":[{{"handedness":"Right","score":0.9,"landmarks":{}}}],"error":null}}"#, landmarks_json(21));
    let hand = parse_detection(&line, DEFAULT_MIN_SCORE).unwrap().unwrap();
    assert_eq!(hand.index_tip(), Landmark::new(0.08, 0.5));
}

#[test]
fn low_confidence_hands_are_ignored() {
    let line = format!(r#"{{"hands":[{{"score":0.2,"landmarks":{}}}]}}"#, landmarks_json(21));
    assert_eq!(parse_detection(&line, DEFAULT_MIN_SCORE).unwrap(), None);
}

#[test]
fn missing_score_counts_as_confident() {
    let line = format!(r#"{{"hands":[{{"landmarks":{}}}]}}"#, landmarks_json(21));
    assert!(parse_detection(&line, DEFAULT_MIN_SCORE).unwrap().is_some());
}

#[test]
fn incomplete_hand_is_skipped_for_the_next_one() {
    let line = format!(
        r#"{{"hands":[{{"score":0.9,"landmarks":{}}},{{"score":0.8,"landmarks":{}}}]}}"#,
        landmarks_json(5),
        landmarks_json(21)
    );
    assert!(parse_detection(&line, DEFAULT_MIN_SCORE).unwrap().is_some());

    let only_bad = format!(r#"{{"hands":[{{"score":0.9,"landmarks":{}}}]}}"#, landmarks_json(20));
    assert_eq!(parse_detection(&only_bad, DEFAULT_MIN_SCORE).unwrap(), None);
}

#[test]
fn empty_and_error_replies_mean_no_hand() {
    assert_eq!(parse_detection(r#"{"hands":[]}"#, DEFAULT_MIN_SCORE).unwrap(), None);
    assert_eq!(parse_detection("{}\n", DEFAULT_MIN_SCORE).unwrap(), None);
    assert_eq!(
        parse_detection(r#"{"hands":[],"error":"model not loaded"}"#, DEFAULT_MIN_SCORE).unwrap(),
        None
    );
}

#[test]
fn garbage_reply_is_a_protocol_error() {
    let err = parse_detection("not json at all", DEFAULT_MIN_SCORE).unwrap_err();
    assert!(matches!(err, Error::TrackerProtocol(_)));
}

// =============================================================
// Subprocess launch
// =============================================================

#[test]
fn empty_command_is_rejected() {
    assert!(matches!(SubprocessTracker::launch("   ", DEFAULT_MIN_SCORE), Err(Error::TrackerSpawn(_))));
}

#[test]
fn missing_program_is_a_spawn_error() {
    let res = SubprocessTracker::launch("pinch-draw-no-such-detector-binary --flag", DEFAULT_MIN_SCORE);
    assert!(matches!(res, Err(Error::TrackerSpawn(_))));
}

/// Bytes `encode_frame` writes for the 2x1 test frame.
#[cfg(unix)]
const SMALL_FRAME_BYTES: usize = 12 + 2 * 3;

#[cfg(unix)]
fn fake_detector(script: &str) -> Result<SubprocessTracker, Error> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    SubprocessTracker::start(cmd, DEFAULT_MIN_SCORE)
}

#[cfg(unix)]
fn hand_reply() -> String {
    format!(r#"{{"hands":[{{"score":0.9,"landmarks":{}}}],"error":null}}"#, landmarks_json(21))
}

#[cfg(unix)]
#[test]
fn detector_answers_reach_the_handle() {
    let script = format!(
        "echo READY; while head -c {SMALL_FRAME_BYTES} >/dev/null; do echo '{}'; done",
        hand_reply()
    );
    let mut handle = spawn_tracker(fake_detector(&script).unwrap());
    let frame = FrameBuffer::new(2, 1);
    assert_eq!(encode_frame(&frame).len(), SMALL_FRAME_BYTES);

    assert!(wait_for(|| handle.offer(&frame)));
    assert!(wait_for(|| handle.latest().is_some()));
    assert_eq!(handle.latest().map(|h| h.index_tip()), Some(Landmark::new(0.08, 0.5)));
    assert!(!handle.is_closed());
}

#[cfg(unix)]
#[test]
fn detector_without_ready_is_a_spawn_error() {
    assert!(matches!(fake_detector("echo HELLO"), Err(Error::TrackerSpawn(_))));
    assert!(matches!(fake_detector("exit 0"), Err(Error::TrackerSpawn(_))));
}

#[cfg(unix)]
#[test]
fn detector_exiting_closes_the_handle() {
    let script = format!(
        "echo READY; head -c {SMALL_FRAME_BYTES} >/dev/null; echo '{}'",
        hand_reply()
    );
    let mut handle = spawn_tracker(fake_detector(&script).unwrap());
    let frame = FrameBuffer::new(2, 1);

    assert!(wait_for(|| {
        handle.offer(&frame);
        let _ = handle.latest();
        handle.is_closed()
    }));
    assert_eq!(handle.latest(), None);
}

// =============================================================
// Threaded handle
// =============================================================

/// Answers every frame with a hand whose index tip x encodes the frame width.
struct EchoBackend;

impl TrackerBackend for EchoBackend {
    fn run(self: Box<Self>, frames: FrameFeed, tx: Sender<Option<HandObservation>>) {
        for frame in frames {
            let tip = Landmark::new(frame.width as f32 / 100.0, 0.5);
            if tx.send(Some(PointerHand::synthesize(tip, false))).is_err() {
                break;
            }
        }
    }
}

fn wait_for<F: FnMut() -> bool>(mut done: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

/// Holds off reading frames until the gate opens.
struct GatedBackend {
    gate: Receiver<()>,
}

impl TrackerBackend for GatedBackend {
    fn run(self: Box<Self>, frames: FrameFeed, tx: Sender<Option<HandObservation>>) {
        if self.gate.recv().is_err() {
            return;
        }
        for _ in frames {
            if tx.send(None).is_err() {
                break;
            }
        }
    }
}

#[test]
fn offers_are_refused_until_the_backend_takes_the_frame() {
    let (open, gate) = mpsc::channel();
    let handle = spawn_tracker(GatedBackend { gate });
    let frame = FrameBuffer::new(8, 8);

    assert!(!handle.is_busy());
    assert!(handle.offer(&frame));
    assert!(handle.is_busy());
    assert!(!handle.offer(&frame));

    open.send(()).unwrap();
    assert!(wait_for(|| !handle.is_busy()));
    assert!(handle.offer(&frame));
}

#[test]
fn threaded_backend_results_show_up_without_blocking() {
    let mut handle = spawn_tracker(EchoBackend);
    assert_eq!(handle.latest(), None);

    let frame = FrameBuffer::new(25, 4);
    assert!(wait_for(|| handle.offer(&frame)));
    assert!(wait_for(|| handle.latest().is_some()));
    assert_eq!(handle.latest().map(|h| h.index_tip()), Some(Landmark::new(0.25, 0.5)));
    assert!(!handle.is_closed());
}

// =============================================================
// PointerHand
// =============================================================

#[test]
fn pointer_hand_follows_the_pointer() {
    let mut p = PointerHand::new();
    p.observe(Some((320.0, 120.0)), false, 640.0, 480.0);
    let hand = p.latest().unwrap();
    assert_eq!(hand.landmarks()[INDEX_TIP], Landmark::new(0.5, 0.25));
}

#[test]
fn pointer_button_is_the_pinch() {
    let tip = Landmark::new(0.5, 0.5);
    assert!(is_pinched(&PointerHand::synthesize(tip, true), DEFAULT_THRESHOLD));
    assert!(!is_pinched(&PointerHand::synthesize(tip, false), DEFAULT_THRESHOLD));
    // Open stays open across the whole adjustable threshold range.
    assert!(!is_pinched(&PointerHand::synthesize(tip, false), THRESHOLD_MAX));
}

#[test]
fn pointer_pinch_holds_at_the_tightest_threshold() {
    let mut settings = DrawSettings::default();
    let mut view = ViewFlags::default();
    for _ in 0..20 {
        Control::Tighter.adjust(&mut settings, &mut view);
    }
    assert_eq!(settings.threshold, THRESHOLD_MIN);

    for i in 0..50 {
        for j in 0..50 {
            let tip = Landmark::new(i as f32 / 49.0, j as f32 / 49.0);
            let hand = PointerHand::synthesize(tip, true);
            assert!(is_pinched(&hand, settings.threshold), "not pinched at {tip:?}");
        }
    }
}

#[test]
fn pointer_outside_window_means_no_hand() {
    let mut p = PointerHand::new();
    p.observe(Some((10.0, 10.0)), true, 100.0, 100.0);
    assert!(p.latest().is_some());
    p.observe(None, true, 100.0, 100.0);
    assert_eq!(p.latest(), None);
    p.observe(Some((10.0, 10.0)), true, 0.0, 100.0);
    assert_eq!(p.latest(), None);
}
