use super::*;
use crate::surface::Canvas;
use crate::test_support::{FakeSurface, hand_at};

const OPEN: f32 = 0.3;
const CLOSED: f32 = 0.01;

fn fake_session() -> DrawSession<FakeSurface> {
    DrawSession::new(FakeSurface::new(200, 100), DrawSettings::default())
}

#[test]
fn no_hand_reports_nothing() {
    let mut s = fake_session();
    let fb = s.tick(None);
    assert_eq!(fb, FrameFeedback::default());
    assert!(!s.is_drawing());
}

#[test]
fn cursor_is_projected_onto_the_surface() {
    let mut s = fake_session();
    let fb = s.tick(Some(&hand_at((0.5, 0.5), OPEN)));
    assert!(fb.hand_visible);
    assert!(!fb.pinched);
    assert_eq!(fb.cursor, Some(ScreenPoint::new(100.0, 50.0)));
    assert!(fb.pinch_distance.is_some_and(|d| (d - OPEN).abs() < 1e-6));
}

#[test]
fn pinch_draws_smoothed_segments() {
    let mut s = fake_session();
    s.settings.alpha = 0.5;
    s.tick(Some(&hand_at((0.0, 0.5), CLOSED)));
    let fb = s.tick(Some(&hand_at((1.0, 0.5), CLOSED)));

    assert!(fb.pinched && fb.drawing);
    // Half way from x=0 to x=200.
    assert_eq!(fb.cursor, Some(ScreenPoint::new(100.0, 50.0)));
    let seg = s.surface().segments[0];
    assert_eq!((seg.from, seg.to), (ScreenPoint::new(0.0, 50.0), ScreenPoint::new(100.0, 50.0)));
    assert_eq!(s.surface().serializations(), 1);
}

#[test]
fn losing_the_hand_ends_the_stroke_and_resets_the_cursor() {
    let mut s = fake_session();
    s.tick(Some(&hand_at((0.1, 0.1), CLOSED)));
    s.tick(Some(&hand_at((0.2, 0.1), CLOSED)));
    assert!(s.is_drawing());

    assert_eq!(s.tick(None), FrameFeedback::default());
    assert!(!s.is_drawing());

    // Reacquired: cursor snaps, no smoothing lag from the old position.
    let fb = s.tick(Some(&hand_at((0.75, 0.25), OPEN)));
    assert_eq!(fb.cursor, Some(ScreenPoint::new(150.0, 25.0)));
}

#[test]
fn settings_changes_apply_on_the_next_tick() {
    let mut s = fake_session();
    let hand = hand_at((0.5, 0.5), 0.08);
    assert!(!s.tick(Some(&hand)).pinched);

    s.settings.threshold = 0.1;
    assert!(s.tick(Some(&hand)).pinched);

    s.settings.color = Color::rgb(0, 255, 0);
    s.settings.width = 12.0;
    s.tick(Some(&hand));
    let seg = s.surface().segments[0];
    assert_eq!(seg.color, Color::rgb(0, 255, 0));
    assert_eq!(seg.width, 12.0);
}

#[test]
fn out_of_range_settings_are_pulled_back_in() {
    let s = DrawSettings { threshold: -1.0, alpha: 1.5, color: DEFAULT_COLOR, width: 0.0 }.sanitized();
    assert!(s.threshold > 0.0);
    assert_eq!(s.alpha, 0.99);
    assert_eq!(s.width, 1.0);

    let nan = DrawSettings { alpha: f32::NAN, ..DrawSettings::default() }.sanitized();
    assert_eq!(nan.alpha, DEFAULT_ALPHA);
}

#[test]
fn boundary_flicker_starts_a_stroke_per_crossing() {
    let mut s = fake_session();
    // No hysteresis: every dip under the threshold is a new stroke.
    for gap in [0.049, 0.051, 0.049, 0.051, 0.049] {
        s.tick(Some(&hand_at((0.5, 0.5), gap)));
    }
    assert_eq!(s.surface().serializations(), 3);
    assert_eq!(s.history().undo_len(), 3);
}

#[test]
fn undo_after_a_stroke_restores_the_blank_canvas() {
    let mut s = DrawSession::new(Canvas::new(64, 48), DrawSettings::default());
    let blank = s.surface().image().as_raw().clone();

    s.tick(Some(&hand_at((0.2, 0.5), CLOSED)));
    s.tick(Some(&hand_at((0.8, 0.5), CLOSED)));
    s.tick(Some(&hand_at((0.8, 0.5), OPEN)));
    let drawn = s.surface().image().as_raw().clone();
    assert!(s.surface().painted_pixels() > 0);

    s.undo();
    assert_eq!(s.surface().image().as_raw(), &blank);
    s.redo();
    assert_eq!(s.surface().image().as_raw(), &drawn);
}

#[test]
fn clear_is_recorded_in_history() {
    let mut s = DrawSession::new(Canvas::new(32, 32), DrawSettings::default());
    s.tick(Some(&hand_at((0.2, 0.5), CLOSED)));
    s.tick(Some(&hand_at((0.8, 0.5), CLOSED)));
    s.clear();
    assert_eq!(s.surface().painted_pixels(), 0);
    assert_eq!(s.history().undo_len(), 2);
    assert_eq!(s.history().redo_len(), 0);
}

#[test]
fn pinch_feedback_matches_the_gesture_detector() {
    let mut s = fake_session();
    for gap in [0.0, 0.02, 0.049, 0.05, 0.051, 0.3] {
        let hand = hand_at((0.5, 0.5), gap);
        let fb = s.tick(Some(&hand));
        assert_eq!(fb.pinched, gesture::is_pinched(&hand, s.settings.threshold), "gap {gap}");
        assert_eq!(fb.pinch_distance, Some(gesture::pinch_distance(&hand)));
    }
}
