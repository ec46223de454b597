// What you SEE:
// • The live camera, mirrored, with your drawing on top.
// • Pinch thumb + index together to draw; open them to lift the pen.
// • U undo, R redo, C clear, S save PNG, G skeleton guides, P pointer dot.
// • [ ] stroke size, - = pinch threshold, , . smoothing, 1-5 colors. ESC quits.
// • Without PINCH_TRACKER set, the mouse stands in for the hand
//   (left button = pinch).

mod camera;
mod draw;

use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use camera::CameraCapture;
use draw::Drawer;
use pinch_draw::compose::composite_canvas;
use pinch_draw::config::AppConfig;
use pinch_draw::controls::{Control, ViewFlags};
use pinch_draw::error::Error;
use pinch_draw::gamma::GammaLut;
use pinch_draw::hud::{FpsCounter, hud_line};
use pinch_draw::overlay::{GUIDE_COLOR, HUD_COLOR, draw_cursor, draw_skeleton, draw_text_5x7};
use pinch_draw::session::DrawSession;
use pinch_draw::source::LandmarkSource;
use pinch_draw::surface::Canvas;
use pinch_draw::tracker::{DEFAULT_MIN_SCORE, PointerHand, SubprocessTracker, TrackerHandle, spawn_tracker};
use pinch_draw::types::{FrameBuffer, HandObservation};

const TOAST_FOR: Duration = Duration::from_secs(2);

/// Whichever backend is feeding hands this run.
enum Tracker {
    Detector(TrackerHandle),
    Pointer(PointerHand),
}

impl Tracker {
    /// External detector if configured and it starts; otherwise the mouse.
    fn select(cfg: &AppConfig) -> Self {
        match &cfg.tracker_command {
            Some(cmd) => match SubprocessTracker::launch(cmd, DEFAULT_MIN_SCORE) {
                Ok(detector) => return Tracker::Detector(spawn_tracker(detector)),
                Err(e) => warn!(error = %e, "hand detector unavailable, using the mouse instead"),
            },
            None => info!("PINCH_TRACKER not set, using the mouse as the hand"),
        }
        Tracker::Pointer(PointerHand::new())
    }

    /// Latest hand for this frame. Never waits on the detector.
    fn poll(&mut self, frame: &FrameBuffer, drawer: &Drawer) -> Option<HandObservation> {
        match self {
            Tracker::Detector(handle) => {
                handle.offer(frame);
                let hand = handle.latest();
                if handle.is_closed() {
                    warn!("hand detector gone, switching to the mouse");
                    *self = Tracker::Pointer(PointerHand::new());
                }
                hand
            }
            Tracker::Pointer(pointer) => {
                pointer.observe(
                    drawer.mouse_pos(),
                    drawer.left_mouse_down(),
                    frame.width as f32,
                    frame.height as f32,
                );
                pointer.latest()
            }
        }
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env();
    cfg.validate()?;

    /* --- Camera + window ---
       Visual: window opens at the camera's actual resolution. */
    let mut cam = CameraCapture::new(cfg.camera_index, cfg.width, cfg.height, cfg.mirror)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Pinch Draw", w as usize, h as usize)?;

    /* --- Drawing session: transparent canvas the same size as the feed --- */
    let mut session = DrawSession::new(Canvas::new(w, h), cfg.draw);
    let mut tracker = Tracker::select(&cfg);

    let lut = GammaLut::new();
    let mut view = ViewFlags::default();
    let mut fps = FpsCounter::new(Instant::now());
    let mut toast: Option<(String, Instant)> = None;

    info!(width = w, height = h, "pinch draw ready");

    /* ------------------------------ Main loop ------------------------------ */
    'frames: while drawer.is_open() {
        let now = Instant::now();

        /* 1) Fresh camera frame (already mirrored if configured). */
        let live = cam.next_frame()?;

        /* 2) Keys */
        for control in drawer.controls() {
            let note = match control {
                Control::Undo => {
                    session.undo();
                    "UNDO".to_string()
                }
                Control::Redo => {
                    session.redo();
                    "REDO".to_string()
                }
                Control::Clear => {
                    session.clear();
                    "CLEARED".to_string()
                }
                Control::Save => match session.surface().save_png(&cfg.export_path) {
                    Ok(()) => {
                        info!(path = %cfg.export_path.display(), "drawing saved");
                        "SAVED".to_string()
                    }
                    Err(e) => {
                        warn!(error = %e, "save failed");
                        "SAVE FAILED".to_string()
                    }
                },
                Control::Quit => break 'frames,
                other => {
                    other.adjust(&mut session.settings, &mut view);
                    continue;
                }
            };
            toast = Some((note, now));
        }

        /* 3) Hand -> pinch -> cursor -> stroke */
        let hand = tracker.poll(&live, &drawer);
        let feedback = session.tick(hand.as_ref());

        /* 4) Compose: camera, then paint, then guides and cursor. */
        let mut screen = live;
        composite_canvas(&mut screen, session.surface(), &lut)?;

        if view.show_guides {
            if let Some(hand) = &hand {
                draw_skeleton(&mut screen, hand, GUIDE_COLOR);
            }
        }
        if view.show_pointer {
            if let Some(cursor) = feedback.cursor {
                let radius = (session.settings.width * 0.5).round().max(3.0) as i32;
                draw_cursor(&mut screen, cursor, radius, session.settings.color.to_u32(), feedback.drawing);
            }
        }

        /* 5) HUD + toast */
        let line = hud_line(&feedback, &session.settings, fps.fps());
        draw_text_5x7(&mut screen, 8, 8, &line, HUD_COLOR);
        if toast.as_ref().is_some_and(|(_, at)| now.duration_since(*at) >= TOAST_FOR) {
            toast = None;
        }
        if let Some((note, _)) = &toast {
            let y = screen.height as i32 - 16;
            draw_text_5x7(&mut screen, 8, y, note, HUD_COLOR);
        }

        /* 6) Present */
        drawer.present(&screen)?;

        if let Some(rate) = fps.frame(now) {
            info!("FPS: {rate:.1}");
        }
    }

    Ok(())
}
