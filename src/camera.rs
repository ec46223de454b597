// Webcam capture into window-ready frames.
// Each `next_frame()` yields 0x00RRGGBB pixels, mirrored when asked so the
// picture moves the same way your hand does.

use image::{ImageBuffer, Rgb};
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
};
use tracing::info;

use pinch_draw::error::Error;
use pinch_draw::types::FrameBuffer;

pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index` as close to `width` x `height` @ 30 fps as it allows.
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self, Error> {
        let fmt = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, 30);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("open stream: {e}")))?;

        // The device may settle on a different size than requested.
        let actual = cam.resolution();
        info!(index, width = actual.width(), height = actual.height(), mirror, "camera streaming");

        Ok(Self { cam, width: actual.width(), height: actual.height(), mirror })
    }

    /// Block for the next frame and convert it.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("fetch frame: {e}")))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("decode RGB: {e}")))?;

        let mut out = frame_from_rgb(&rgb);
        if self.mirror {
            out.mirror_horizontal();
        }
        Ok(out)
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Pack an RGB image as 0x00RRGGBB.
pub fn frame_from_rgb(rgb: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> FrameBuffer {
    let (w, h) = rgb.dimensions();
    let pixels = rgb
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}
