// The window: shows the composited frame, reports keys and the mouse.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use pinch_draw::controls::Control;
use pinch_draw::error::Error;
use pinch_draw::types::FrameBuffer;

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Open a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push this frame's pixels to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// False once the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Mouse in window pixels; `None` while it is outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Controls for the keys hit since the last frame. Size, threshold and
    /// smoothing keys repeat while held.
    pub fn controls(&self) -> Vec<Control> {
        let once = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(control_for)
            .filter(|c| !c.repeats());
        let held = self
            .window
            .get_keys_pressed(KeyRepeat::Yes)
            .into_iter()
            .filter_map(control_for)
            .filter(|c| c.repeats());
        once.chain(held).collect()
    }
}

fn control_for(key: Key) -> Option<Control> {
    Some(match key {
        Key::U => Control::Undo,
        Key::R => Control::Redo,
        Key::C => Control::Clear,
        Key::S => Control::Save,
        Key::G => Control::ToggleGuides,
        Key::P => Control::TogglePointer,
        Key::RightBracket => Control::Thicker,
        Key::LeftBracket => Control::Thinner,
        Key::Equal => Control::Looser,
        Key::Minus => Control::Tighter,
        Key::Period => Control::Smoother,
        Key::Comma => Control::Snappier,
        Key::Key1 => Control::Palette(0),
        Key::Key2 => Control::Palette(1),
        Key::Key3 => Control::Palette(2),
        Key::Key4 => Control::Palette(3),
        Key::Key5 => Control::Palette(4),
        Key::Escape => Control::Quit,
        _ => return None,
    })
}
