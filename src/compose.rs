// Paint layer over camera frame.

#[cfg(test)]
#[path = "compose_test.rs"]
mod compose_test;

use crate::error::Error;
use crate::gamma::GammaLut;
use crate::surface::Canvas;
use crate::types::FrameBuffer;

/// Blend the canvas onto `screen` in place (source-over, linear light).
pub fn composite_canvas(screen: &mut FrameBuffer, canvas: &Canvas, lut: &GammaLut) -> Result<(), Error> {
    let img = canvas.image();
    if img.width() as usize != screen.width || img.height() as usize != screen.height {
        return Err(Error::CameraFrame(format!(
            "composite: canvas {}x{} vs frame {}x{}",
            img.width(),
            img.height(),
            screen.width,
            screen.height
        )));
    }

    for (dst, px) in screen.pixels.iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = px.0;
        match a {
            0 => continue,
            255 => *dst = ((r as u32) << 16) | ((g as u32) << 8) | b as u32,
            _ => {
                let alpha = a as f32 / 255.0;
                let br = ((*dst >> 16) & 0xFF) as u8;
                let bg = ((*dst >> 8) & 0xFF) as u8;
                let bb = (*dst & 0xFF) as u8;
                let nr = lut.mix(r, br, alpha) as u32;
                let ng = lut.mix(g, bg, alpha) as u32;
                let nb = lut.mix(b, bb, alpha) as u32;
                *dst = (nr << 16) | (ng << 8) | nb;
            }
        }
    }
    Ok(())
}
